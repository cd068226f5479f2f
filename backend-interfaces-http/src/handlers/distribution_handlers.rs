use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;

use backend_application::commands::distribution_commands;
use backend_application::queries::inventory_queries;
use backend_application::AppState;
use backend_domain::{Inventory, Location, SetSlotsPayload};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn get_inventory(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Inventory>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let inventory = inventory_queries::get_inventory(&state).await?;
    Ok(Json(inventory))
}

pub async fn save_distributions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<Inventory>,
) -> Result<Json<Inventory>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let inventory = distribution_commands::save_distributions(&state, payload).await?;
    Ok(Json(inventory))
}

pub async fn set_slots(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(location_id): Path<String>,
    Json(payload): Json<SetSlotsPayload>,
) -> Result<Json<Location>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let location = distribution_commands::set_slots(&state, &location_id, payload.slots).await?;
    Ok(Json(location))
}

pub async fn reset_inventory(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Inventory>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let inventory = distribution_commands::reset_to_defaults(&state).await?;
    Ok(Json(inventory))
}
