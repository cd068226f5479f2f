use serde_json::Value;
use tracing::{error, info};

use crate::commands::inventory_sync_commands::remember_inventory;
use crate::{AppError, AppState};
use backend_domain::{default_inventory, Inventory, Location, SlotVector, StoreError};

/// Overwrites one location's slot counts from loosely typed admin input. The
/// stored name is kept.
pub async fn set_slots(
    state: &AppState,
    location_id: &str,
    raw: Vec<Value>,
) -> Result<Location, AppError> {
    let location_id = location_id.trim();
    let slots = SlotVector::from_admin_input(&raw).map_err(|err| AppError::BadRequest(err.to_string()))?;

    match state.inventory_repo.set_inventory_slots(location_id, slots).await {
        Ok(()) => {}
        Err(StoreError::NotFound(_)) => {
            return Err(AppError::BadRequest(format!("unknown location '{}'", location_id)));
        }
        Err(err) => {
            error!("failed to save slots for {}: {}", location_id, err);
            return Err(AppError::from(err));
        }
    }

    let inventory = refreshed_inventory(state).await?;
    let location = inventory
        .get(location_id)
        .cloned()
        .ok_or_else(|| AppError::Persistence(format!("location '{}' missing after update", location_id)))?;
    info!("slots updated for {} (total {})", location_id, slots.total());
    Ok(location)
}

/// Saves every submitted location record one by one, so spins committed on
/// other locations in the meantime are kept. Locations missing from the
/// payload are left as they are.
pub async fn save_distributions(state: &AppState, incoming: Inventory) -> Result<Inventory, AppError> {
    if incoming.is_empty() {
        return Err(AppError::BadRequest("no locations submitted".to_string()));
    }

    let mut records = Vec::with_capacity(incoming.len());
    for (id, mut location) in incoming {
        let id = id.trim().to_string();
        if id.is_empty() {
            return Err(AppError::BadRequest("location id must not be empty".to_string()));
        }
        location.name = location.name.trim().to_string();
        if location.name.is_empty() {
            return Err(AppError::BadRequest(format!("location '{}' needs a name", id)));
        }
        records.push((id, location));
    }

    let count = records.len();
    write_records(state, records).await?;
    let inventory = refreshed_inventory(state).await?;
    info!("saved distributions for {} locations", count);
    Ok(inventory)
}

/// Restores the built-in baseline for every baseline location. Other
/// locations are untouched.
pub async fn reset_to_defaults(state: &AppState) -> Result<Inventory, AppError> {
    write_records(state, default_inventory()).await?;
    let inventory = refreshed_inventory(state).await?;
    info!("inventory reset to defaults");
    Ok(inventory)
}

async fn write_records(
    state: &AppState,
    records: impl IntoIterator<Item = (String, Location)>,
) -> Result<(), AppError> {
    for (id, location) in records {
        state
            .inventory_repo
            .set_inventory_record(&id, location)
            .await
            .map_err(|err| {
                error!("failed to save location {}: {}", id, err);
                AppError::from(err)
            })?;
    }
    Ok(())
}

/// Re-reads the store after an admin write and caches the result.
async fn refreshed_inventory(state: &AppState) -> Result<Inventory, AppError> {
    let inventory = state.inventory_repo.get_inventory().await.map_err(|err| {
        error!("failed to read inventory after update: {}", err);
        AppError::from(err)
    })?;
    remember_inventory(state, &inventory).await;
    Ok(inventory)
}
