use async_trait::async_trait;

use crate::entities::{
    DecrementOutcome,
    HistoryQuery,
    Inventory,
    Location,
    NewSpinRecord,
    SpinRecord,
};
use crate::error::StoreError;
use crate::value_objects::{Outcome, SlotVector};

#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Fails with `StoreError::NotFound` until the inventory has been seeded.
    async fn get_inventory(&self) -> Result<Inventory, StoreError>;
    async fn set_inventory_slots(
        &self,
        location_id: &str,
        slots: SlotVector,
    ) -> Result<(), StoreError>;
    async fn set_inventory_record(
        &self,
        location_id: &str,
        location: Location,
    ) -> Result<(), StoreError>;
    async fn replace_inventory(&self, inventory: &Inventory) -> Result<(), StoreError>;
    /// Atomically decrements the outcome's slot only if it is still above zero.
    async fn decrement_slot(
        &self,
        location_id: &str,
        outcome: Outcome,
    ) -> Result<DecrementOutcome, StoreError>;
    async fn ping(&self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait SpinHistoryRepository: Send + Sync {
    async fn append_spin_record(&self, record: NewSpinRecord) -> Result<String, StoreError>;
    /// Records of one calendar date, oldest first.
    async fn query_records_by_date(&self, date: &str) -> Result<Vec<SpinRecord>, StoreError>;
    /// Records matching the optional filters, newest first.
    async fn query_history(&self, query: &HistoryQuery) -> Result<Vec<SpinRecord>, StoreError>;
    async fn ping(&self) -> Result<(), StoreError>;
}
