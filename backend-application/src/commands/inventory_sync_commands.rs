use tracing::{info, warn};

use crate::{AppError, AppState};
use backend_domain::{Inventory, Location, SlotVector, StoreError};

/// Replaces the local view with a fresh store copy.
pub async fn remember_inventory(state: &AppState, inventory: &Inventory) {
    *state.local_inventory.write().await = inventory.clone();
}

/// Records one location's latest vector in the local view.
pub async fn remember_slots(state: &AppState, location_id: &str, name: &str, slots: SlotVector) {
    let mut local = state.local_inventory.write().await;
    local
        .entry(location_id.to_string())
        .and_modify(|location| location.slots = slots)
        .or_insert_with(|| Location::new(name, slots));
}

/// Pulls the store's inventory into the local view.
///
/// Returns the number of locations now cached. An uninitialized store leaves
/// the local view untouched.
pub async fn reconcile_inventory(state: &AppState) -> Result<usize, AppError> {
    match state.inventory_repo.get_inventory().await {
        Ok(inventory) => {
            let count = inventory.len();
            remember_inventory(state, &inventory).await;
            Ok(count)
        }
        Err(StoreError::NotFound(_)) => {
            info!("inventory store not initialized yet, keeping local view");
            Ok(state.local_inventory.read().await.len())
        }
        Err(err) => {
            warn!("inventory reconciliation failed: {}", err);
            Err(AppError::from(err))
        }
    }
}
