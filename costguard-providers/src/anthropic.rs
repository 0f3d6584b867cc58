//! Anthropic messages client.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::client::{CompletionClient, ReportsUsage, RequestModel, TokenUsage};
use crate::error::ProviderError;
use crate::http::{api_error, build_http_client, USER_AGENT_VALUE};

/// Anthropic API base URL.
pub const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com";

/// API version header value.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

const MESSAGES_ENDPOINT: &str = "/v1/messages";

// ============================================================================
// Request / Response Types
// ============================================================================

/// One conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// `user` or `assistant`.
    pub role: String,
    /// Turn text.
    pub content: String,
}

impl Message {
    /// Creates a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Creates an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Body of `POST /v1/messages`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessagesRequest {
    /// Model identifier.
    pub model: String,
    /// Output token limit (required by the API).
    pub max_tokens: u32,
    /// Conversation turns.
    pub messages: Vec<Message>,
    /// System prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

impl MessagesRequest {
    /// Creates a request.
    pub fn new(model: impl Into<String>, max_tokens: u32, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            messages,
            system: None,
        }
    }

    /// Sets the system prompt.
    #[must_use]
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

impl RequestModel for MessagesRequest {
    fn model(&self) -> &str {
        &self.model
    }
}

/// Usage block of a messages response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct AnthropicUsage {
    /// Input tokens.
    #[serde(default)]
    pub input_tokens: u64,
    /// Output tokens.
    #[serde(default)]
    pub output_tokens: u64,
}

/// A content block of a response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContentBlock {
    /// Block type, `text` for plain output.
    #[serde(rename = "type")]
    pub kind: String,
    /// Text, present for `text` blocks.
    #[serde(default)]
    pub text: Option<String>,
}

/// Response of `POST /v1/messages`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MessagesResponse {
    /// Message id.
    #[serde(default)]
    pub id: String,
    /// Model that served the call.
    #[serde(default)]
    pub model: Option<String>,
    /// Output blocks.
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    /// Why generation stopped.
    #[serde(default)]
    pub stop_reason: Option<String>,
    /// Token usage.
    #[serde(default)]
    pub usage: Option<AnthropicUsage>,
}

impl MessagesResponse {
    /// Concatenated text of all `text` blocks.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter(|b| b.kind == "text")
            .filter_map(|b| b.text.as_deref())
            .collect()
    }
}

impl ReportsUsage for MessagesResponse {
    fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    fn usage(&self) -> Option<TokenUsage> {
        self.usage
            .map(|u| TokenUsage::new(u.input_tokens, u.output_tokens))
    }
}

// ============================================================================
// API Client
// ============================================================================

/// Anthropic messages client.
#[derive(Clone)]
pub struct AnthropicClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

// The API key never appears in debug output.
impl fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl AnthropicClient {
    /// Creates a client for the public API.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        Ok(Self {
            http: build_http_client(Duration::from_secs(120))?,
            base_url: ANTHROPIC_API_BASE.to_string(),
            api_key: api_key.into(),
        })
    }

    /// Points the client at another server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Full URL of the messages endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, MESSAGES_ENDPOINT)
    }

    fn build_headers(&self) -> Result<HeaderMap, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| ProviderError::InvalidApiKey(e.to_string()))?,
        );
        Ok(headers)
    }
}

#[async_trait]
impl CompletionClient for AnthropicClient {
    type Request = MessagesRequest;
    type Response = MessagesResponse;

    #[instrument(skip_all, fields(model = %request.model))]
    async fn create(&self, request: MessagesRequest) -> Result<MessagesResponse, ProviderError> {
        debug!("Sending messages request");

        let response = self
            .http
            .post(self.endpoint())
            .headers(self.build_headers()?)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, "Failed to parse messages response");
            ProviderError::InvalidResponse(format!("JSON error: {e}"))
        })
    }
}
