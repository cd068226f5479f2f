use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use backend_application::commands::spin_commands;
use backend_application::AppState;
use backend_domain::{SpinOutcome, SpinRequest};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn spin(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SpinRequest>,
) -> Result<Json<SpinOutcome>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let outcome = spin_commands::spin(&state, payload).await?;
    Ok(Json(outcome))
}
