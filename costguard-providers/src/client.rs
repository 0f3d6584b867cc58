//! The completion client abstraction.
//!
//! A client exposes exactly one metered operation, [`CompletionClient::create`].
//! Anything else a concrete client offers stays on the concrete type and is
//! reached through [`Tracked::inner`](crate::Tracked::inner).

use async_trait::async_trait;

use crate::error::ProviderError;

/// Token counts reported by an API response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    /// Prompt tokens.
    pub input_tokens: u64,
    /// Completion tokens.
    pub output_tokens: u64,
}

impl TokenUsage {
    /// Creates a usage value.
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }
}

/// A request that names the model it targets.
pub trait RequestModel {
    /// Requested model identifier.
    fn model(&self) -> &str;
}

/// A response that may report its model and token usage.
pub trait ReportsUsage {
    /// Model that served the call, if the API reports it.
    fn model(&self) -> Option<&str>;

    /// Token usage, if the API reports it.
    fn usage(&self) -> Option<TokenUsage>;
}

/// A client for one kind of completion call.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Request body.
    type Request: RequestModel + Send + 'static;
    /// Parsed response.
    type Response: ReportsUsage + Send;

    /// Performs the call.
    async fn create(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;
}
