use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use tokio::time::{timeout, Duration};
use tracing::error;

use backend_application::AppState;
use backend_domain::{HistoryWriterStats, StoreError};

use crate::error::HttpError;
use crate::middleware::authorize;

#[derive(Serialize)]
struct ReadyStatus {
    inventory: &'static str,
    history: &'static str,
}

pub async fn health_live() -> StatusCode {
    StatusCode::OK
}

pub async fn health_ready(State(state): State<AppState>) -> impl IntoResponse {
    let timeout_secs = state.config.request_timeout_seconds.max(1);
    let timeout_duration = Duration::from_secs(timeout_secs);
    let inventory = check_store("inventory", timeout(timeout_duration, state.inventory_repo.ping()).await);
    let history = check_store("history", timeout(timeout_duration, state.history_repo.ping()).await);
    let status = if inventory == "ok" && history == "ok" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(ReadyStatus { inventory, history }))
}

fn check_store(
    store: &str,
    result: Result<Result<(), StoreError>, tokio::time::error::Elapsed>,
) -> &'static str {
    match result {
        Ok(Ok(())) => "ok",
        Ok(Err(err)) => {
            error!("{} store not ready: {}", store, err);
            "error"
        }
        Err(_) => {
            error!("{} store ready check timed out", store);
            "timeout"
        }
    }
}

pub async fn metrics_prometheus(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if !authorize(&state.config, &headers) {
        return (StatusCode::UNAUTHORIZED, "unauthorized".to_string()).into_response();
    }
    let history = state.history_sink.stats().await;
    let payload = state
        .metrics
        .render_prometheus(history.delivered, history.failed);
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    (headers, payload).into_response()
}

pub async fn history_writer_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<HistoryWriterStats>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(state.history_sink.stats().await))
}
