use tracing::error;

use crate::queries::report_queries::resolve_date;
use crate::{AppError, AppState};
use backend_domain::utils::normalize_optional_text;
use backend_domain::{HistoryQuery, SpinRecord};

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 1000;

/// Spin records newest first, optionally narrowed by date range and location.
pub async fn list_history(state: &AppState, query: HistoryQuery) -> Result<Vec<SpinRecord>, AppError> {
    let start_date = normalize_optional_text(query.start_date)
        .map(|date| resolve_date(Some(date)))
        .transpose()?;
    let end_date = normalize_optional_text(query.end_date)
        .map(|date| resolve_date(Some(date)))
        .transpose()?;
    if let (Some(start), Some(end)) = (&start_date, &end_date) {
        if start > end {
            return Err(AppError::BadRequest(format!(
                "start_date {} is after end_date {}",
                start, end
            )));
        }
    }

    let normalized = HistoryQuery {
        start_date,
        end_date,
        location: normalize_optional_text(query.location),
        limit: Some(query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)),
    };
    state.history_repo.query_history(&normalized).await.map_err(|err| {
        error!("failed to query spin history: {}", err);
        AppError::from(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{harness_with_history, FakeHistory, FakeInventory};
    use backend_domain::{NewSpinRecord, Outcome};

    fn history() -> FakeHistory {
        let records = (0..5)
            .map(|i| {
                let outcome = Outcome::new(1 + i as u8).expect("outcome");
                let location = if i % 2 == 0 { "location1" } else { "location2" };
                NewSpinRecord::new(location, location, outcome, 1_709_287_200_000 + i * 1_000, None)
                    .with_id(format!("rec-{i}"))
            })
            .collect();
        FakeHistory::with(records)
    }

    #[tokio::test]
    async fn history_is_newest_first_and_filtered() {
        let h = harness_with_history(FakeInventory::default(), history(), vec![0]);
        let query = HistoryQuery {
            location: Some(" location1 ".to_string()),
            ..HistoryQuery::default()
        };
        let records = list_history(&h.state, query).await.expect("history");
        let ids = records.iter().map(|record| record.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["rec-4", "rec-2", "rec-0"]);
    }

    #[tokio::test]
    async fn history_limit_is_clamped() {
        let h = harness_with_history(FakeInventory::default(), history(), vec![0]);
        let query = HistoryQuery {
            limit: Some(0),
            ..HistoryQuery::default()
        };
        let records = list_history(&h.state, query).await.expect("history");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "rec-4");
    }

    #[tokio::test]
    async fn history_rejects_malformed_dates() {
        let h = harness_with_history(FakeInventory::default(), history(), vec![0]);
        let query = HistoryQuery {
            start_date: Some("yesterday".to_string()),
            ..HistoryQuery::default()
        };
        let err = list_history(&h.state, query).await.expect_err("bad date");
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
