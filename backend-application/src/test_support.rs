// In-memory fakes for command and query tests

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use backend_domain::ports::{InventoryRepository, SpinEventSink, SpinHistoryRepository};
use backend_domain::services::SequenceSource;
use backend_domain::{
    DecrementOutcome, HistoryQuery, HistoryWriterStats, Inventory, Location, NewSpinRecord,
    Outcome, RuntimeConfig, SlotVector, SpinRecord, StoreError,
};
use tokio::sync::{Mutex, RwLock};

use crate::{AppState, Metrics};

#[derive(Default)]
pub struct FakeInventory {
    pub inventory: Mutex<Option<Inventory>>,
    /// Served by reads instead of the real document, to model a racing spin.
    pub stale_read: Mutex<Option<Inventory>>,
    /// Vectors answered as `Depleted` before the real document is touched.
    pub depleted_replies: Mutex<Vec<SlotVector>>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl FakeInventory {
    pub fn with(inventory: Inventory) -> Self {
        Self {
            inventory: Mutex::new(Some(inventory)),
            ..Self::default()
        }
    }

    pub async fn snapshot(&self) -> Option<Inventory> {
        self.inventory.lock().await.clone()
    }

    fn check_writes(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(anyhow!("write refused")));
        }
        Ok(())
    }
}

#[async_trait]
impl InventoryRepository for FakeInventory {
    async fn get_inventory(&self) -> Result<Inventory, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(anyhow!("read refused")));
        }
        if let Some(stale) = self.stale_read.lock().await.take() {
            return Ok(stale);
        }
        self.inventory
            .lock()
            .await
            .clone()
            .ok_or_else(|| StoreError::NotFound("inventory".to_string()))
    }

    async fn set_inventory_slots(&self, location_id: &str, slots: SlotVector) -> Result<(), StoreError> {
        self.check_writes()?;
        let mut guard = self.inventory.lock().await;
        let location = guard
            .as_mut()
            .and_then(|inventory| inventory.get_mut(location_id))
            .ok_or_else(|| StoreError::NotFound(location_id.to_string()))?;
        location.slots = slots;
        Ok(())
    }

    async fn set_inventory_record(&self, location_id: &str, location: Location) -> Result<(), StoreError> {
        self.check_writes()?;
        let mut guard = self.inventory.lock().await;
        guard
            .get_or_insert_with(Inventory::new)
            .insert(location_id.to_string(), location);
        Ok(())
    }

    async fn replace_inventory(&self, inventory: &Inventory) -> Result<(), StoreError> {
        self.check_writes()?;
        *self.inventory.lock().await = Some(inventory.clone());
        Ok(())
    }

    async fn decrement_slot(&self, location_id: &str, outcome: Outcome) -> Result<DecrementOutcome, StoreError> {
        self.check_writes()?;
        {
            let mut replies = self.depleted_replies.lock().await;
            if !replies.is_empty() {
                return Ok(DecrementOutcome::Depleted(replies.remove(0)));
            }
        }
        let mut guard = self.inventory.lock().await;
        let Some(location) = guard.as_mut().and_then(|inventory| inventory.get_mut(location_id)) else {
            return Ok(DecrementOutcome::UnknownLocation);
        };
        if location.slots.get(outcome) == 0 {
            return Ok(DecrementOutcome::Depleted(location.slots));
        }
        location.slots = location.slots.decremented(outcome);
        Ok(DecrementOutcome::Applied(location.slots))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeHistory {
    pub records: Mutex<Vec<SpinRecord>>,
}

impl FakeHistory {
    pub fn with(records: Vec<SpinRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

#[async_trait]
impl SpinHistoryRepository for FakeHistory {
    async fn append_spin_record(&self, record: NewSpinRecord) -> Result<String, StoreError> {
        let mut records = self.records.lock().await;
        let id = format!("rec-{}", records.len() + 1);
        records.push(record.with_id(id.clone()));
        Ok(id)
    }

    async fn query_records_by_date(&self, date: &str) -> Result<Vec<SpinRecord>, StoreError> {
        let records = self.records.lock().await;
        Ok(records.iter().filter(|record| record.date == date).cloned().collect())
    }

    async fn query_history(&self, query: &HistoryQuery) -> Result<Vec<SpinRecord>, StoreError> {
        let records = self.records.lock().await;
        let mut matched = records
            .iter()
            .filter(|record| query.start_date.as_deref().map_or(true, |start| record.date.as_str() >= start))
            .filter(|record| query.end_date.as_deref().map_or(true, |end| record.date.as_str() <= end))
            .filter(|record| query.location.as_deref().map_or(true, |location| record.location == location))
            .cloned()
            .collect::<Vec<_>>();
        matched.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }
        Ok(matched)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub records: std::sync::Mutex<Vec<NewSpinRecord>>,
}

impl RecordingSink {
    pub fn emitted(&self) -> Vec<NewSpinRecord> {
        self.records.lock().expect("sink lock").clone()
    }
}

#[async_trait]
impl SpinEventSink for RecordingSink {
    fn emit(&self, record: NewSpinRecord) {
        self.records.lock().expect("sink lock").push(record);
    }

    async fn stats(&self) -> HistoryWriterStats {
        let queued = self.records.lock().expect("sink lock").len() as u64;
        HistoryWriterStats {
            queued,
            delivered: queued,
            ..HistoryWriterStats::default()
        }
    }
}

pub struct Harness {
    pub state: AppState,
    pub inventory: Arc<FakeInventory>,
    pub history: Arc<FakeHistory>,
    pub sink: Arc<RecordingSink>,
}

pub fn harness(inventory: FakeInventory, tickets: Vec<u64>) -> Harness {
    harness_with_history(inventory, FakeHistory::default(), tickets)
}

pub fn harness_with_history(inventory: FakeInventory, history: FakeHistory, tickets: Vec<u64>) -> Harness {
    let inventory = Arc::new(inventory);
    let history = Arc::new(history);
    let sink = Arc::new(RecordingSink::default());
    let state = AppState {
        config: RuntimeConfig::default(),
        inventory_repo: inventory.clone(),
        history_repo: history.clone(),
        history_sink: sink.clone(),
        rng: Arc::new(Mutex::new(Box::new(SequenceSource::new(tickets)))),
        local_inventory: Arc::new(RwLock::new(Inventory::new())),
        metrics: Arc::new(Metrics::default()),
    };
    Harness {
        state,
        inventory,
        history,
        sink,
    }
}

pub fn single_location(id: &str, name: &str, slots: [u32; 8]) -> Inventory {
    Inventory::from([(id.to_string(), Location::new(name, SlotVector::new(slots)))])
}
