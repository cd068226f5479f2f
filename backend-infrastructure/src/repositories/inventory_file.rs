use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

use backend_domain::ports::InventoryRepository;
use backend_domain::{DecrementOutcome, Inventory, Location, Outcome, SlotVector, StoreError};

use crate::repositories::memory::decrement_in;

/// Inventory kept as one JSON document on disk.
///
/// Every mutation is a read-modify-write of the whole document under a
/// process-wide lock; the file is replaced through a rename so readers never
/// see a partial write.
pub struct JsonInventoryRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonInventoryRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Option<Inventory>> {
        if !fs::try_exists(&self.path).await? {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("read {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        let inventory = serde_json::from_str(&content)
            .with_context(|| format!("parse {}", self.path.display()))?;
        Ok(Some(inventory))
    }

    async fn write_document(&self, inventory: &Inventory) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(inventory)?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, content).await?;
        fs::rename(&staging, &self.path)
            .await
            .with_context(|| format!("replace {}", self.path.display()))?;
        Ok(())
    }

    async fn load_existing(&self) -> Result<Inventory, StoreError> {
        self.read_document()
            .await?
            .ok_or_else(|| StoreError::NotFound(self.path.display().to_string()))
    }
}

#[async_trait]
impl InventoryRepository for JsonInventoryRepository {
    async fn get_inventory(&self) -> Result<Inventory, StoreError> {
        let _guard = self.lock.lock().await;
        self.load_existing().await
    }

    async fn set_inventory_slots(&self, location_id: &str, slots: SlotVector) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut inventory = self.load_existing().await?;
        let location = inventory
            .get_mut(location_id)
            .ok_or_else(|| StoreError::NotFound(location_id.to_string()))?;
        location.slots = slots;
        self.write_document(&inventory).await?;
        Ok(())
    }

    async fn set_inventory_record(&self, location_id: &str, location: Location) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut inventory = self.read_document().await?.unwrap_or_default();
        inventory.insert(location_id.to_string(), location);
        self.write_document(&inventory).await?;
        Ok(())
    }

    async fn replace_inventory(&self, inventory: &Inventory) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        self.write_document(inventory).await?;
        Ok(())
    }

    async fn decrement_slot(&self, location_id: &str, outcome: Outcome) -> Result<DecrementOutcome, StoreError> {
        let _guard = self.lock.lock().await;
        let Some(mut inventory) = self.read_document().await? else {
            return Ok(DecrementOutcome::UnknownLocation);
        };
        let result = decrement_in(&mut inventory, location_id, outcome);
        if matches!(result, DecrementOutcome::Applied(_)) {
            self.write_document(&inventory).await?;
        }
        Ok(result)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        self.read_document().await?;
        Ok(())
    }
}
