use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};

use backend_domain::ports::{SpinEventSink, SpinHistoryRepository};
use backend_domain::{HistoryWriterStats, NewSpinRecord};

#[derive(Debug, Default)]
struct WriterCounters {
    queued: AtomicU64,
    delivered: AtomicU64,
    failed: AtomicU64,
    last_error: RwLock<Option<String>>,
}

/// Spin history sink backed by an unbounded queue and a single worker task.
///
/// Records are appended in arrival order; a failed append is counted and
/// dropped, it never reaches the spin that produced it.
pub struct QueuedHistoryWriter {
    sender: mpsc::UnboundedSender<NewSpinRecord>,
    counters: Arc<WriterCounters>,
}

impl QueuedHistoryWriter {
    /// Must be called inside a tokio runtime.
    pub fn spawn(repo: Arc<dyn SpinHistoryRepository>) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<NewSpinRecord>();
        let counters = Arc::new(WriterCounters::default());
        let worker = counters.clone();

        tokio::spawn(async move {
            while let Some(record) = receiver.recv().await {
                let location = record.location.clone();
                match repo.append_spin_record(record).await {
                    Ok(id) => {
                        worker.delivered.fetch_add(1, Ordering::Relaxed);
                        debug!("spin {} at {} recorded", id, location);
                    }
                    Err(err) => {
                        worker.failed.fetch_add(1, Ordering::Relaxed);
                        warn!("failed to record spin at {}: {}", location, err);
                        *worker.last_error.write().await = Some(err.to_string());
                    }
                }
            }
            debug!("history writer stopped");
        });

        Self { sender, counters }
    }
}

#[async_trait]
impl SpinEventSink for QueuedHistoryWriter {
    fn emit(&self, record: NewSpinRecord) {
        match self.sender.send(record) {
            Ok(()) => {
                self.counters.queued.fetch_add(1, Ordering::Relaxed);
            }
            Err(_) => {
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
                warn!("history writer is gone, spin record dropped");
            }
        }
    }

    async fn stats(&self) -> HistoryWriterStats {
        HistoryWriterStats {
            queued: self.counters.queued.load(Ordering::Relaxed),
            delivered: self.counters.delivered.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
            last_error: self.counters.last_error.read().await.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use anyhow::anyhow;
    use backend_domain::{HistoryQuery, Outcome, SpinRecord, StoreError};

    use crate::repositories::MemoryHistoryRepository;

    struct BrokenHistory;

    #[async_trait]
    impl SpinHistoryRepository for BrokenHistory {
        async fn append_spin_record(&self, _record: NewSpinRecord) -> Result<String, StoreError> {
            Err(StoreError::Unavailable(anyhow!("connection refused")))
        }

        async fn query_records_by_date(&self, _date: &str) -> Result<Vec<SpinRecord>, StoreError> {
            Ok(Vec::new())
        }

        async fn query_history(&self, _query: &HistoryQuery) -> Result<Vec<SpinRecord>, StoreError> {
            Ok(Vec::new())
        }

        async fn ping(&self) -> Result<(), StoreError> {
            Err(StoreError::Unavailable(anyhow!("connection refused")))
        }
    }

    fn record(ts: i64) -> NewSpinRecord {
        NewSpinRecord::new("location1", "Goma", Outcome::new(2).expect("outcome"), ts, None)
    }

    async fn wait_for(writer: &QueuedHistoryWriter, settled: u64) -> HistoryWriterStats {
        for _ in 0..200 {
            let stats = writer.stats().await;
            if stats.delivered + stats.failed >= settled {
                return stats;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        writer.stats().await
    }

    #[tokio::test]
    async fn records_reach_the_repository() {
        let repo = Arc::new(MemoryHistoryRepository::new());
        let writer = QueuedHistoryWriter::spawn(repo.clone());
        for ts in 0..3 {
            writer.emit(record(ts));
        }
        let stats = wait_for(&writer, 3).await;
        assert_eq!(stats.queued, 3);
        assert_eq!(stats.delivered, 3);
        assert_eq!(repo.len().await, 3);
    }

    #[tokio::test]
    async fn failures_are_counted_not_raised() {
        let writer = QueuedHistoryWriter::spawn(Arc::new(BrokenHistory));
        writer.emit(record(0));
        writer.emit(record(1));
        let stats = wait_for(&writer, 2).await;
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.delivered, 0);
        assert!(stats.last_error.expect("last error").contains("connection refused"));
    }
}
