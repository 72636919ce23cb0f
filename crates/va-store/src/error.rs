//! Store error types for va-store.

use thiserror::Error;
use va_core::errors::CoreError;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No report with this id.
    #[error("Report not found: {0}")]
    NotFound(String),

    /// A domain rule rejected the mutation; nothing was persisted.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Invalid state encountered (e.g., a file named for one id holding another).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
