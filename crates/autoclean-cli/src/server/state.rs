//! Application state for the web server.

use std::sync::Arc;

use autoclean::{owner_mileage_stats, CleanOutcome, OwnerStat};

/// Shared application state. The table is cleaned once at startup and
/// never mutated, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    /// The cleaned listings.
    pub outcome: Arc<CleanOutcome>,
    /// Owner aggregates, computed once.
    pub owner_stats: Arc<Vec<OwnerStat>>,
}

impl AppState {
    /// Create new application state.
    pub fn new(outcome: CleanOutcome) -> Self {
        let owner_stats = owner_mileage_stats(&outcome.table, &outcome.schema);
        Self {
            outcome: Arc::new(outcome),
            owner_stats: Arc::new(owner_stats),
        }
    }
}
