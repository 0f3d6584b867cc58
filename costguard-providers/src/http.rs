//! Shared HTTP plumbing for the API clients.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::ProviderError;

/// User agent sent with every request.
pub(crate) const USER_AGENT_VALUE: &str = concat!("costguard/", env!("CARGO_PKG_VERSION"));

/// Builds a reqwest client with the given request timeout.
pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Turns a non-success response into `ProviderError::Api`.
///
/// Both vendors wrap errors as `{"error": {"message": ...}}`; anything else
/// is passed through as raw text.
pub(crate) fn api_error(status: StatusCode, body: &str) -> ProviderError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    ProviderError::Api {
        status: status.as_u16(),
        message,
    }
}
