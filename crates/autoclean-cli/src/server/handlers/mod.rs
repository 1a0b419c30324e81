//! API request handlers.

mod listings;
mod stats;

pub use listings::*;
pub use stats::*;

use axum::http::Uri;

use crate::server::error::ApiError;

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
