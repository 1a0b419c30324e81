//! Cleaned listing handler.

use axum::{extract::State, Json};
use serde_json::Value as JsonValue;

use autoclean::export::records;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Maximum number of listings returned.
pub const MAX_LISTINGS: usize = 500;

/// The first [`MAX_LISTINGS`] cleaned rows, one object per row.
pub async fn get_cars(State(state): State<AppState>) -> Result<Json<JsonValue>, ApiError> {
    let rows = records(&state.outcome.table, MAX_LISTINGS);
    Ok(Json(serde_json::to_value(rows)?))
}
