use std::sync::Arc;

use backend_domain::ports::{InventoryRepository, SpinEventSink, SpinHistoryRepository};
use backend_domain::services::RandomSource;
use backend_domain::{Inventory, RuntimeConfig};
use tokio::sync::{Mutex, RwLock};

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub inventory_repo: Arc<dyn InventoryRepository>,
    pub history_repo: Arc<dyn SpinHistoryRepository>,
    pub history_sink: Arc<dyn SpinEventSink>,
    pub rng: Arc<Mutex<Box<dyn RandomSource>>>,
    /// Last inventory seen by this process; serves spins while the store is down.
    pub local_inventory: Arc<RwLock<Inventory>>,
    pub metrics: Arc<Metrics>,
}
