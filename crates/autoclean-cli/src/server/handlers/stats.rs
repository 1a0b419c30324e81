//! Aggregate handlers.

use axum::{extract::State, Json};

use autoclean::OwnerStat;

use crate::server::state::AppState;

/// Average mileage per owner category, highest first.
pub async fn get_owner_stats(State(state): State<AppState>) -> Json<Vec<OwnerStat>> {
    Json(state.owner_stats.as_ref().clone())
}
