use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use backend_application::{AppState, Metrics};
use backend_domain::ports::{InventoryRepository, SpinHistoryRepository};
use backend_domain::services::{RandomSource, RngSource};
use backend_domain::{default_inventory, Inventory};
use backend_infrastructure::{
    AppConfig, ClickhouseHistoryRepository, HistoryBackend, InventoryBackend,
    JsonInventoryRepository, MemoryHistoryRepository, MemoryInventoryRepository,
    QueuedHistoryWriter,
};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        Self::from_config(&config).await
    }

    /// Wires stores, history writer and random source. Spawns the history
    /// writer task, so it must run inside a tokio runtime.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let inventory_repo: Arc<dyn InventoryRepository> = match config.inventory_backend {
            InventoryBackend::File => Arc::new(JsonInventoryRepository::new(&config.inventory_path)),
            InventoryBackend::Memory => Arc::new(MemoryInventoryRepository::new()),
        };
        let history_repo: Arc<dyn SpinHistoryRepository> = match config.history_backend {
            HistoryBackend::Clickhouse => {
                let repo = ClickhouseHistoryRepository::from_config(&config.to_db_config());
                repo.ensure_schema().await?;
                Arc::new(repo)
            }
            HistoryBackend::Memory => Arc::new(MemoryHistoryRepository::new()),
        };
        info!(
            "inventory backend: {}, history backend: {}",
            config.inventory_backend, config.history_backend
        );

        let local_inventory = load_or_seed(inventory_repo.as_ref(), config.seed_inventory).await?;

        let rng: Box<dyn RandomSource> = match config.rng_seed {
            Some(seed) => {
                warn!("draws use the fixed seed {}", seed);
                Box::new(RngSource::seeded(seed))
            }
            None => Box::new(RngSource::from_entropy()),
        };

        let state = AppState {
            config: config.to_runtime_config(),
            inventory_repo,
            history_repo: history_repo.clone(),
            history_sink: Arc::new(QueuedHistoryWriter::spawn(history_repo)),
            rng: Arc::new(Mutex::new(rng)),
            local_inventory: Arc::new(RwLock::new(local_inventory)),
            metrics: Arc::new(Metrics::default()),
        };

        Ok(Self { state })
    }
}

/// Initial local view; writes the baseline when the store is empty and
/// seeding is enabled. An unreachable store is not fatal.
async fn load_or_seed(repo: &dyn InventoryRepository, seed: bool) -> Result<Inventory> {
    match repo.get_inventory().await {
        Ok(inventory) => Ok(inventory),
        Err(err) if err.is_not_found() && seed => {
            let inventory = default_inventory();
            repo.replace_inventory(&inventory).await?;
            info!("inventory seeded with {} baseline locations", inventory.len());
            Ok(inventory)
        }
        Err(err) if err.is_not_found() => {
            warn!("inventory store is empty and seeding is disabled");
            Ok(Inventory::new())
        }
        Err(err) => {
            warn!("inventory store unreachable at startup: {}", err);
            Ok(Inventory::new())
        }
    }
}
