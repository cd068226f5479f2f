use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn current_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn parse_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).map_err(|err| anyhow!(err))
}

/// UTC calendar date (`YYYY-MM-DD`) of a millisecond timestamp.
pub fn date_of_millis(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .unwrap_or_else(Utc::now)
        .format(DATE_FORMAT)
        .to_string()
}

pub fn today_utc() -> String {
    Utc::now().format(DATE_FORMAT).to_string()
}

pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
