use tracing::error;

use crate::{AppError, AppState};
use backend_domain::services::{aggregate, apply_filter, summarize_range};
use backend_domain::utils::{normalize_optional_text, parse_date, today_utc, DATE_FORMAT};
use backend_domain::{
    DailyReport, DailyReportQuery, FilteredReport, FrequencyBand, HistoryQuery, Outcome,
    RangeSummary, RangeSummaryQuery, ReportFilter,
};

pub async fn daily_report(state: &AppState, query: DailyReportQuery) -> Result<FilteredReport, AppError> {
    let date = resolve_date(query.date)?;
    let filter = build_filter(query.number, query.location, query.frequency, query.search)?;
    let report = build_daily_report(state, &date).await?;
    Ok(apply_filter(&report, &filter))
}

/// Unfiltered report of one UTC date.
pub async fn build_daily_report(state: &AppState, date: &str) -> Result<DailyReport, AppError> {
    let records = state.history_repo.query_records_by_date(date).await.map_err(|err| {
        error!("failed to load spin records for {}: {}", date, err);
        AppError::from(err)
    })?;
    Ok(aggregate(date, &records))
}

pub async fn range_summary(state: &AppState, query: RangeSummaryQuery) -> Result<RangeSummary, AppError> {
    let end_date = resolve_date(query.end_date)?;
    let start_date = match normalize_optional_text(query.start_date) {
        Some(start) => resolve_date(Some(start))?,
        None => end_date.clone(),
    };
    if start_date > end_date {
        return Err(AppError::BadRequest(format!(
            "start_date {} is after end_date {}",
            start_date, end_date
        )));
    }

    let history_query = HistoryQuery {
        start_date: Some(start_date),
        end_date: Some(end_date),
        ..HistoryQuery::default()
    };
    let records = state.history_repo.query_history(&history_query).await.map_err(|err| {
        error!("failed to load spin records for range summary: {}", err);
        AppError::from(err)
    })?;
    Ok(summarize_range(&records))
}

/// Normalized `YYYY-MM-DD`, defaulting to today (UTC).
pub fn resolve_date(date: Option<String>) -> Result<String, AppError> {
    match normalize_optional_text(date) {
        Some(raw) => parse_date(&raw)
            .map(|date| date.format(DATE_FORMAT).to_string())
            .map_err(|_| AppError::BadRequest(format!("invalid date '{}', expected YYYY-MM-DD", raw))),
        None => Ok(today_utc()),
    }
}

fn build_filter(
    number: Option<u8>,
    location: Option<String>,
    frequency: Option<String>,
    search: Option<String>,
) -> Result<ReportFilter, AppError> {
    if let Some(number) = number {
        if Outcome::new(number).is_none() {
            return Err(AppError::BadRequest(format!(
                "number must be between {} and {}",
                Outcome::MIN,
                Outcome::MAX
            )));
        }
    }
    let frequency = match normalize_optional_text(frequency) {
        Some(raw) => Some(FrequencyBand::parse(&raw).ok_or_else(|| {
            AppError::BadRequest(format!(
                "unknown frequency band '{}', expected high, medium, low or zero",
                raw
            ))
        })?),
        None => None,
    };
    Ok(ReportFilter {
        number,
        location: normalize_optional_text(location),
        frequency,
        search: normalize_optional_text(search),
    })
}
