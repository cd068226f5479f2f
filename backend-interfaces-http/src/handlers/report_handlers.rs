use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;

use backend_application::queries::{history_queries, report_queries};
use backend_application::AppState;
use backend_domain::{
    DailyReportQuery, FilteredReport, HistoryQuery, RangeSummary, RangeSummaryQuery, SpinRecord,
};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn daily_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DailyReportQuery>,
) -> Result<Json<FilteredReport>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let report = report_queries::daily_report(&state, query).await?;
    Ok(Json(report))
}

pub async fn range_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RangeSummaryQuery>,
) -> Result<Json<RangeSummary>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let summary = report_queries::range_summary(&state, query).await?;
    Ok(Json(summary))
}

pub async fn list_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<SpinRecord>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let records = history_queries::list_history(&state, query).await?;
    Ok(Json(records))
}
