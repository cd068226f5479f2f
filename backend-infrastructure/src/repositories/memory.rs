// In-memory adapters
// Used by the `memory` backends and as the reference behaviour for the
// durable adapters.

use std::cmp::Reverse;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use backend_domain::ports::{InventoryRepository, SpinHistoryRepository};
use backend_domain::{
    DecrementOutcome, HistoryQuery, Inventory, Location, NewSpinRecord, Outcome, SlotVector,
    SpinRecord, StoreError,
};

/// Conditional decrement shared by every inventory adapter; callers hold
/// their store lock around it.
pub(crate) fn decrement_in(inventory: &mut Inventory, location_id: &str, outcome: Outcome) -> DecrementOutcome {
    let Some(location) = inventory.get_mut(location_id) else {
        return DecrementOutcome::UnknownLocation;
    };
    if location.slots.get(outcome) == 0 {
        return DecrementOutcome::Depleted(location.slots);
    }
    location.slots = location.slots.decremented(outcome);
    DecrementOutcome::Applied(location.slots)
}

pub(crate) fn matches_history_query(record: &SpinRecord, query: &HistoryQuery) -> bool {
    query
        .start_date
        .as_deref()
        .map_or(true, |start| record.date.as_str() >= start)
        && query
            .end_date
            .as_deref()
            .map_or(true, |end| record.date.as_str() <= end)
        && query
            .location
            .as_deref()
            .map_or(true, |location| record.location == location)
}

#[derive(Default)]
pub struct MemoryInventoryRepository {
    inventory: Mutex<Option<Inventory>>,
}

impl MemoryInventoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inventory(inventory: Inventory) -> Self {
        Self {
            inventory: Mutex::new(Some(inventory)),
        }
    }
}

#[async_trait]
impl InventoryRepository for MemoryInventoryRepository {
    async fn get_inventory(&self) -> Result<Inventory, StoreError> {
        self.inventory
            .lock()
            .await
            .clone()
            .ok_or_else(|| StoreError::NotFound("inventory".to_string()))
    }

    async fn set_inventory_slots(&self, location_id: &str, slots: SlotVector) -> Result<(), StoreError> {
        let mut guard = self.inventory.lock().await;
        let location = guard
            .as_mut()
            .and_then(|inventory| inventory.get_mut(location_id))
            .ok_or_else(|| StoreError::NotFound(location_id.to_string()))?;
        location.slots = slots;
        Ok(())
    }

    async fn set_inventory_record(&self, location_id: &str, location: Location) -> Result<(), StoreError> {
        self.inventory
            .lock()
            .await
            .get_or_insert_with(Inventory::new)
            .insert(location_id.to_string(), location);
        Ok(())
    }

    async fn replace_inventory(&self, inventory: &Inventory) -> Result<(), StoreError> {
        *self.inventory.lock().await = Some(inventory.clone());
        Ok(())
    }

    async fn decrement_slot(&self, location_id: &str, outcome: Outcome) -> Result<DecrementOutcome, StoreError> {
        let mut guard = self.inventory.lock().await;
        Ok(match guard.as_mut() {
            Some(inventory) => decrement_in(inventory, location_id, outcome),
            None => DecrementOutcome::UnknownLocation,
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryHistoryRepository {
    records: Mutex<Vec<SpinRecord>>,
}

impl MemoryHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.records.lock().await.len()
    }
}

#[async_trait]
impl SpinHistoryRepository for MemoryHistoryRepository {
    async fn append_spin_record(&self, record: NewSpinRecord) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        self.records.lock().await.push(record.with_id(id.clone()));
        Ok(id)
    }

    async fn query_records_by_date(&self, date: &str) -> Result<Vec<SpinRecord>, StoreError> {
        let mut records = self
            .records
            .lock()
            .await
            .iter()
            .filter(|record| record.date == date)
            .cloned()
            .collect::<Vec<_>>();
        records.sort_by_key(|record| record.timestamp_ms);
        Ok(records)
    }

    async fn query_history(&self, query: &HistoryQuery) -> Result<Vec<SpinRecord>, StoreError> {
        let mut records = self
            .records
            .lock()
            .await
            .iter()
            .filter(|record| matches_history_query(record, query))
            .cloned()
            .collect::<Vec<_>>();
        records.sort_by_key(|record| Reverse(record.timestamp_ms));
        if let Some(limit) = query.limit {
            records.truncate(limit);
        }
        Ok(records)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
