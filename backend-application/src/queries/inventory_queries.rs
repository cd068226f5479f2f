use tracing::warn;

use crate::commands::inventory_sync_commands::remember_inventory;
use crate::{AppError, AppState};
use backend_domain::{Inventory, StoreError};

/// Current inventory from the store, or the local view while the store is down.
pub async fn get_inventory(state: &AppState) -> Result<Inventory, AppError> {
    match state.inventory_repo.get_inventory().await {
        Ok(inventory) => {
            remember_inventory(state, &inventory).await;
            Ok(inventory)
        }
        Err(StoreError::NotFound(_)) => Ok(Inventory::new()),
        Err(err) => {
            let local = state.local_inventory.read().await;
            if local.is_empty() {
                return Err(AppError::from(err));
            }
            warn!("inventory store unreachable, serving local view: {}", err);
            Ok(local.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{harness, single_location, FakeInventory};
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn read_refreshes_local_view() {
        let h = harness(FakeInventory::with(single_location("location1", "Goma", [4; 8])), vec![0]);
        let inventory = get_inventory(&h.state).await.expect("inventory");
        assert_eq!(inventory["location1"].slots.total(), 32);
        assert_eq!(*h.state.local_inventory.read().await, inventory);
    }

    #[tokio::test]
    async fn store_outage_serves_local_view() {
        let h = harness(FakeInventory::with(single_location("location1", "Goma", [4; 8])), vec![0]);
        get_inventory(&h.state).await.expect("warm local view");
        h.inventory.fail_reads.store(true, Ordering::SeqCst);

        let inventory = get_inventory(&h.state).await.expect("local view");
        assert_eq!(inventory.len(), 1);
    }

    #[tokio::test]
    async fn store_outage_without_local_view_fails() {
        let h = harness(FakeInventory::default(), vec![0]);
        h.inventory.fail_reads.store(true, Ordering::SeqCst);
        let err = get_inventory(&h.state).await.expect_err("nothing cached");
        assert!(matches!(err, AppError::Persistence(_)));
    }
}
