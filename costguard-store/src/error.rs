//! Store error types.

use costguard_core::CoreError;
use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV encoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Report file is readable JSON but not a valid report.
    #[error("Invalid report: {0}")]
    InvalidReport(String),

    /// Error from the accounting engine.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// Returns true if the error means the file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}
