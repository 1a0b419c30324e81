//! Error types for the autoclean library.

use std::path::PathBuf;
use thiserror::Error;

use crate::schema::CanonicalRole;

/// Main error type for cleaning operations.
#[derive(Debug, Error)]
pub enum CleanError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no data to clean.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// A mandatory canonical role could not be resolved to a column.
    #[error("No {role} column found")]
    MissingColumn { role: CanonicalRole },

    /// Failure while encoding the cleaned table.
    #[error("Encode error: {0}")]
    Encode(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CleanError {
    /// Whether the error means the input itself is malformed.
    ///
    /// Structural errors are not retryable: the same bytes will fail the
    /// same way on every run.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            CleanError::EmptyData(_) | CleanError::MissingColumn { .. }
        )
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleanError>;
