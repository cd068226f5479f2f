use async_trait::async_trait;

use crate::entities::{HistoryWriterStats, NewSpinRecord};

/// Fire-and-forget outlet for spin records.
///
/// `emit` must return immediately and never fail the caller; delivery errors
/// are the sink's own concern and only show up in `stats`.
#[async_trait]
pub trait SpinEventSink: Send + Sync {
    fn emit(&self, record: NewSpinRecord);
    async fn stats(&self) -> HistoryWriterStats;
}
