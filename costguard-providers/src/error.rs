//! Provider error types.

use costguard_core::CoreError;
use thiserror::Error;

/// Errors from tracked completion calls.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The budget blocked the call, or its usage could not be priced.
    #[error(transparent)]
    Guard(#[from] CoreError),

    /// HTTP transport failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error text from the response body.
        message: String,
    },

    /// The API key cannot be sent as a header.
    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    /// The response body could not be parsed.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Returns true if a budget policy blocked the call.
    pub fn is_budget_exceeded(&self) -> bool {
        matches!(self, ProviderError::Guard(CoreError::BudgetExceeded(_)))
    }
}
