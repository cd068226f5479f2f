use tracing::{debug, info, warn};

use crate::commands::inventory_sync_commands::{remember_inventory, remember_slots};
use crate::{AppError, AppState};
use backend_domain::services::{draw, Draw};
use backend_domain::utils::current_millis;
use backend_domain::{
    DecrementOutcome, GeoAnnotation, Location, NewSpinRecord, Outcome, SlotVector, SpinOutcome,
    SpinRequest, StoreError,
};

pub async fn spin(state: &AppState, request: SpinRequest) -> Result<SpinOutcome, AppError> {
    let location_id = request.location_id.trim().to_string();
    if location_id.is_empty() {
        return Err(AppError::BadRequest("location_id is required".to_string()));
    }

    let location = load_location(state, &location_id).await?;
    let mut slots = location.slots;
    let mut attempt = 0u32;

    // Each depleted slot means another spin took a prize, so redrawing against
    // the current vector ends in a win or in exhaustion.
    loop {
        attempt += 1;
        let outcome = {
            let mut rng = state.rng.lock().await;
            match draw(&slots, &mut **rng) {
                Draw::Won(outcome) => outcome,
                Draw::Exhausted => {
                    state.metrics.record_exhausted();
                    info!("location {} has no prizes left", location_id);
                    return Err(AppError::no_inventory(location_id));
                }
            }
        };

        let expected = slots.decremented(outcome);
        match state.inventory_repo.decrement_slot(&location_id, outcome).await {
            Ok(DecrementOutcome::Applied(remaining)) => {
                remember_slots(state, &location_id, &location.name, remaining).await;
                return Ok(commit(state, &location_id, &location, outcome, remaining, true, request.actual_location));
            }
            Ok(DecrementOutcome::Depleted(current)) => {
                state.metrics.record_conflict();
                debug!(
                    "slot {} at {} emptied by a concurrent spin (attempt {})",
                    outcome, location_id, attempt
                );
                remember_slots(state, &location_id, &location.name, current).await;
                slots = current;
            }
            Ok(DecrementOutcome::UnknownLocation) => {
                return Err(AppError::no_inventory(location_id));
            }
            Err(err) => {
                warn!("inventory write failed for {}: {}", location_id, err);
                state.metrics.record_inventory_write_error();
                remember_slots(state, &location_id, &location.name, expected).await;
                return Ok(commit(state, &location_id, &location, outcome, expected, false, request.actual_location));
            }
        }
    }
}

/// Reads the location from the store, falling back to the local view when the
/// store cannot be reached.
async fn load_location(state: &AppState, location_id: &str) -> Result<Location, AppError> {
    match state.inventory_repo.get_inventory().await {
        Ok(inventory) => {
            remember_inventory(state, &inventory).await;
            inventory
                .get(location_id)
                .cloned()
                .ok_or_else(|| AppError::no_inventory(location_id))
        }
        Err(StoreError::NotFound(_)) => Err(AppError::no_inventory(location_id)),
        Err(err) => {
            warn!("inventory store unreachable, using local view for {}: {}", location_id, err);
            let local = state.local_inventory.read().await;
            if local.is_empty() {
                return Err(AppError::Persistence(format!("inventory store unavailable: {}", err)));
            }
            local
                .get(location_id)
                .cloned()
                .ok_or_else(|| AppError::no_inventory(location_id))
        }
    }
}

fn commit(
    state: &AppState,
    location_id: &str,
    location: &Location,
    outcome: Outcome,
    remaining: SlotVector,
    inventory_persisted: bool,
    actual_location: Option<GeoAnnotation>,
) -> SpinOutcome {
    let record = NewSpinRecord::new(
        location_id,
        location.name.clone(),
        outcome,
        current_millis(),
        actual_location,
    );
    state.history_sink.emit(record);
    state.metrics.record_spin();
    info!("spin at {} won {} ({} left)", location_id, outcome, remaining.total());

    SpinOutcome {
        number: outcome,
        location_id: location_id.to_string(),
        location_name: location.name.clone(),
        remaining,
        inventory_persisted,
    }
}
