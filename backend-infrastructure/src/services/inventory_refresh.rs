use std::time::Duration;

use tracing::{debug, info, warn};

use backend_application::commands::inventory_sync_commands::reconcile_inventory;
use backend_application::AppState;

/// Periodically pulls the inventory store into the local view. A zero
/// interval disables the loop.
pub async fn schedule_inventory_refresh(state: AppState) {
    let seconds = state.config.inventory_refresh_seconds;
    if seconds == 0 {
        info!("inventory refresh disabled");
        return;
    }
    let mut ticker = tokio::time::interval(Duration::from_secs(seconds));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        match reconcile_inventory(&state).await {
            Ok(count) => debug!("inventory refreshed ({} locations)", count),
            Err(err) => warn!("inventory refresh failed: {}", err),
        }
    }
}
