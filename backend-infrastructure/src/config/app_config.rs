use std::env;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::{DbConfig, RuntimeConfig};

use crate::config::validation::{
    validate_bind_addr, validate_clickhouse_url, validate_path, validate_report_time,
};

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InventoryBackend {
    File,
    Memory,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HistoryBackend {
    Clickhouse,
    Memory,
}

impl FromStr for InventoryBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(anyhow!("unknown inventory_backend '{}'", other)),
        }
    }
}

impl FromStr for HistoryBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "clickhouse" => Ok(Self::Clickhouse),
            "memory" => Ok(Self::Memory),
            other => Err(anyhow!("unknown history_backend '{}'", other)),
        }
    }
}

impl fmt::Display for InventoryBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::File => "file",
            Self::Memory => "memory",
        })
    }
}

impl fmt::Display for HistoryBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Clickhouse => "clickhouse",
            Self::Memory => "memory",
        })
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub inventory_backend: InventoryBackend,
    pub inventory_path: String,
    pub history_backend: HistoryBackend,
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
    /// Write the built-in baseline when the inventory store is empty.
    pub seed_inventory: bool,
    /// Fixed seed for reproducible draws; entropy when unset.
    pub rng_seed: Option<u64>,
    pub report_dir: String,
    pub report_hour: u32,
    pub report_minute: u32,
    pub inventory_refresh_seconds: u64,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let runtime = RuntimeConfig::default();
        Self {
            bind_addr: runtime.bind_addr,
            api_token: None,
            inventory_backend: InventoryBackend::File,
            inventory_path: "./inventory.json".to_string(),
            history_backend: HistoryBackend::Clickhouse,
            clickhouse_url: "http://127.0.0.1:8123".to_string(),
            clickhouse_database: "fortune_wheel".to_string(),
            clickhouse_user: None,
            clickhouse_password: None,
            seed_inventory: true,
            rng_seed: None,
            report_dir: runtime.report_dir,
            report_hour: runtime.report_hour,
            report_minute: runtime.report_minute,
            inventory_refresh_seconds: runtime.inventory_refresh_seconds,
            max_body_bytes: runtime.max_body_bytes,
            request_timeout_seconds: runtime.request_timeout_seconds,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var("WHEEL_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let base_dir = file_path.parent();
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            toml::from_str(&content)?
        } else {
            warn!("{} not found, using defaults", path);
            AppConfig::default()
        };
        config.apply_env_overrides()?;
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        self.api_token = normalize_secret(self.api_token.take());
        self.clickhouse_user = normalize_secret(self.clickhouse_user.take());
        self.clickhouse_password = normalize_secret(self.clickhouse_password.take());
        self.clickhouse_url = self.clickhouse_url.trim().trim_end_matches('/').to_string();
        self.clickhouse_database = self.clickhouse_database.trim().to_string();
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.report_dir = resolve_path(base, &self.report_dir);
        self.inventory_path = resolve_path(base, &self.inventory_path);
    }

    pub fn validate(&self) -> Result<()> {
        validate_bind_addr(&self.bind_addr)?;
        validate_report_time(self.report_hour, self.report_minute)?;
        validate_path("report_dir", &self.report_dir)?;
        if self.inventory_backend == InventoryBackend::File {
            validate_path("inventory_path", &self.inventory_path)?;
        }
        if self.history_backend == HistoryBackend::Clickhouse {
            validate_clickhouse_url(&self.clickhouse_url)?;
            if self.clickhouse_database.is_empty() {
                return Err(anyhow!("clickhouse_database must not be empty"));
            }
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            report_dir: self.report_dir.clone(),
            report_hour: self.report_hour,
            report_minute: self.report_minute,
            inventory_refresh_seconds: self.inventory_refresh_seconds,
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            clickhouse_url: self.clickhouse_url.clone(),
            clickhouse_database: self.clickhouse_database.clone(),
            clickhouse_user: self.clickhouse_user.clone(),
            clickhouse_password: self.clickhouse_password.clone(),
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(value) = env::var("WHEEL_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("WHEEL_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Ok(value) = env::var("WHEEL_INVENTORY_BACKEND") {
            self.inventory_backend = value.parse()?;
        }
        if let Ok(value) = env::var("WHEEL_INVENTORY_PATH") {
            self.inventory_path = value;
        }
        if let Ok(value) = env::var("WHEEL_HISTORY_BACKEND") {
            self.history_backend = value.parse()?;
        }
        if let Ok(value) = env::var("WHEEL_CLICKHOUSE_URL") {
            self.clickhouse_url = value;
        }
        if let Ok(value) = env::var("WHEEL_CLICKHOUSE_DATABASE") {
            self.clickhouse_database = value;
        }
        if let Ok(value) = env::var("WHEEL_CLICKHOUSE_USER") {
            self.clickhouse_user = Some(value);
        }
        if let Ok(value) = env::var("WHEEL_CLICKHOUSE_PASSWORD") {
            self.clickhouse_password = Some(value);
        }
        if let Ok(value) = env::var("WHEEL_SEED_INVENTORY") {
            self.seed_inventory = value.parse().unwrap_or(self.seed_inventory);
        }
        if let Ok(value) = env::var("WHEEL_RNG_SEED") {
            self.rng_seed = value.parse().ok();
        }
        if let Ok(value) = env::var("WHEEL_REPORT_DIR") {
            self.report_dir = value;
        }
        if let Ok(value) = env::var("WHEEL_REPORT_HOUR") {
            self.report_hour = value.parse().unwrap_or(self.report_hour);
        }
        if let Ok(value) = env::var("WHEEL_REPORT_MINUTE") {
            self.report_minute = value.parse().unwrap_or(self.report_minute);
        }
        if let Ok(value) = env::var("WHEEL_INVENTORY_REFRESH_SECONDS") {
            self.inventory_refresh_seconds = value.parse().unwrap_or(self.inventory_refresh_seconds);
        }
        if let Ok(value) = env::var("WHEEL_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("WHEEL_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        Ok(())
    }
}

fn normalize_secret(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}
