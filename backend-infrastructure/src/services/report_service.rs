use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use tokio::fs;
use tracing::{error, info};

use backend_application::queries::report_queries::build_daily_report;
use backend_application::AppState;
use backend_domain::RuntimeConfig;

/// Writes one JSON report snapshot per day at the configured UTC time.
///
/// Spin dates are UTC calendar days, so the snapshot always covers the day the
/// trigger was scheduled on, even if the timer wakes up after midnight.
pub async fn schedule_reports(state: AppState) {
    loop {
        let next = next_report_time(&state.config, Utc::now());
        let duration = next.signed_duration_since(Utc::now());
        let sleep_ms = duration.num_milliseconds().max(0) as u64;
        tokio::time::sleep(std::time::Duration::from_millis(sleep_ms)).await;

        let date = report_date(next);
        if let Err(err) = generate_daily_report(&state, &date).await {
            error!("report generation for {} failed: {}", date, err);
        }
    }
}

/// Writes the report of one UTC date to `<report_dir>/<date>.json`.
pub async fn generate_daily_report(state: &AppState, date: &str) -> Result<PathBuf> {
    let report = build_daily_report(state, date).await?;

    let report_dir = Path::new(&state.config.report_dir);
    fs::create_dir_all(report_dir).await?;
    let path = report_dir.join(format!("{}.json", date));
    fs::write(&path, serde_json::to_vec_pretty(&report)?).await?;

    info!("daily report for {} written to {} ({} spins)", date, path.display(), report.total_spins);
    Ok(path)
}

fn report_date(fired_at: DateTime<Utc>) -> String {
    fired_at.date_naive().format("%Y-%m-%d").to_string()
}

fn next_report_time(config: &RuntimeConfig, now: DateTime<Utc>) -> DateTime<Utc> {
    let at = |day: NaiveDate| {
        day.and_hms_opt(config.report_hour, config.report_minute, 0)
            .map(|target| target.and_utc())
    };
    let today = now.date_naive();
    match at(today) {
        Some(target) if target > now => target,
        _ => today
            .succ_opt()
            .and_then(at)
            .unwrap_or_else(|| now + Duration::days(1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use backend_application::Metrics;
    use backend_domain::services::SequenceSource;
    use backend_domain::utils::{current_millis, today_utc};
    use backend_domain::ports::SpinHistoryRepository;
    use backend_domain::{DailyReport, Inventory, NewSpinRecord, Outcome};
    use tokio::sync::{Mutex, RwLock};
    use uuid::Uuid;

    use crate::repositories::{MemoryHistoryRepository, MemoryInventoryRepository};
    use crate::services::QueuedHistoryWriter;

    fn utc(text: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(text).expect("timestamp").with_timezone(&Utc)
    }

    #[test]
    fn next_report_time_is_in_the_future() {
        let config = RuntimeConfig {
            report_hour: 0,
            report_minute: 0,
            ..RuntimeConfig::default()
        };
        let now = Utc::now();
        let next = next_report_time(&config, now);
        assert!(next > now);
        assert!(next - now <= Duration::hours(24));
    }

    #[test]
    fn late_evening_trigger_snapshots_the_closing_utc_day() {
        let config = RuntimeConfig::default();
        assert_eq!((config.report_hour, config.report_minute), (23, 55));

        let next = next_report_time(&config, utc("2024-03-01T10:00:00Z"));
        assert_eq!(next, utc("2024-03-01T23:55:00Z"));
        assert_eq!(report_date(next), "2024-03-01");

        let next = next_report_time(&config, utc("2024-03-01T23:56:00Z"));
        assert_eq!(next, utc("2024-03-02T23:55:00Z"));
        assert_eq!(report_date(next), "2024-03-02");
    }

    #[tokio::test]
    async fn snapshot_is_written_as_json() {
        let history = Arc::new(MemoryHistoryRepository::new());
        history
            .append_spin_record(NewSpinRecord::new(
                "location1",
                "Goma",
                Outcome::new(1).expect("outcome"),
                current_millis(),
                None,
            ))
            .await
            .expect("append");

        let report_dir = std::env::temp_dir().join(format!("wheel-reports-{}", Uuid::new_v4()));
        let state = AppState {
            config: RuntimeConfig {
                report_dir: report_dir.to_string_lossy().to_string(),
                ..RuntimeConfig::default()
            },
            inventory_repo: Arc::new(MemoryInventoryRepository::new()),
            history_repo: history.clone(),
            history_sink: Arc::new(QueuedHistoryWriter::spawn(history)),
            rng: Arc::new(Mutex::new(Box::new(SequenceSource::new(vec![0])))),
            local_inventory: Arc::new(RwLock::new(Inventory::new())),
            metrics: Arc::new(Metrics::default()),
        };

        let date = today_utc();
        let path = generate_daily_report(&state, &date).await.expect("report");
        assert!(path.ends_with(format!("{}.json", date)));
        let content = std::fs::read_to_string(&path).expect("read report");
        let report: DailyReport = serde_json::from_str(&content).expect("parse report");
        assert_eq!(report.total_spins, 1);
        assert_eq!(report.number_frequency[&1], 1);

        let _ = std::fs::remove_dir_all(report_dir);
    }
}
