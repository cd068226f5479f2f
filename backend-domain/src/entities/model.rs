use serde::{Deserialize, Serialize};

use crate::value_objects::FrequencyBand;

#[derive(Debug, Default, Deserialize)]
pub struct DailyReportQuery {
    pub date: Option<String>,
    pub number: Option<u8>,
    pub location: Option<String>,
    pub frequency: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportFilter {
    pub number: Option<u8>,
    pub location: Option<String>,
    pub frequency: Option<FrequencyBand>,
    pub search: Option<String>,
}

impl ReportFilter {
    pub fn active_count(&self) -> usize {
        [
            self.number.is_some(),
            self.location.is_some(),
            self.frequency.is_some(),
            self.search.is_some(),
        ]
        .iter()
        .filter(|active| **active)
        .count()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub location: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RangeSummaryQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetSlotsPayload {
    pub slots: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct HistoryWriterStats {
    pub queued: u64,
    pub delivered: u64,
    pub failed: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub report_dir: String,
    pub report_hour: u32,
    pub report_minute: u32,
    pub inventory_refresh_seconds: u64,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3240".to_string(),
            api_token: None,
            report_dir: "./reports".to_string(),
            report_hour: 23,
            report_minute: 55,
            inventory_refresh_seconds: 30,
            max_body_bytes: 64 * 1024,
            request_timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
}
