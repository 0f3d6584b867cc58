//! OpenAI chat completions client.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::client::{CompletionClient, ReportsUsage, RequestModel, TokenUsage};
use crate::error::ProviderError;
use crate::http::{api_error, build_http_client, USER_AGENT_VALUE};

// ============================================================================
// Constants
// ============================================================================

/// OpenAI API base URL.
pub const OPENAI_API_BASE: &str = "https://api.openai.com";

/// Chat completions endpoint.
const CHAT_COMPLETIONS_ENDPOINT: &str = "/v1/chat/completions";

// ============================================================================
// Request / Response Types
// ============================================================================

/// One chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `system`, `user`, or `assistant`.
    pub role: String,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Creates a message with the given role.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }
}

/// Body of `POST /v1/chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    /// Model identifier.
    pub model: String,
    /// Conversation so far.
    pub messages: Vec<ChatMessage>,
    /// Completion token limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ChatCompletionRequest {
    /// Creates a request with no sampling options.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: None,
            temperature: None,
        }
    }

    /// Sets the completion token limit.
    #[must_use]
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

impl RequestModel for ChatCompletionRequest {
    fn model(&self) -> &str {
        &self.model
    }
}

/// Usage block of a chat completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct OpenAiUsage {
    /// Prompt tokens.
    #[serde(default)]
    pub prompt_tokens: u64,
    /// Completion tokens.
    #[serde(default)]
    pub completion_tokens: u64,
    /// Sum of both.
    #[serde(default)]
    pub total_tokens: u64,
}

/// One completion choice.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatChoice {
    /// Choice index.
    #[serde(default)]
    pub index: u32,
    /// Generated message.
    pub message: ChatMessage,
    /// Why generation stopped.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Response of `POST /v1/chat/completions`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatCompletion {
    /// Completion id.
    #[serde(default)]
    pub id: String,
    /// Model that served the call (usually a dated id).
    #[serde(default)]
    pub model: Option<String>,
    /// Generated choices.
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    /// Token usage.
    #[serde(default)]
    pub usage: Option<OpenAiUsage>,
}

impl ChatCompletion {
    /// Text of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

impl ReportsUsage for ChatCompletion {
    fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    fn usage(&self) -> Option<TokenUsage> {
        self.usage
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
    }
}

// ============================================================================
// API Client
// ============================================================================

/// OpenAI chat completions client.
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

// The API key never appears in debug output.
impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    /// Creates a client for the public API.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        Ok(Self {
            http: build_http_client(Duration::from_secs(60))?,
            base_url: OPENAI_API_BASE.to_string(),
            api_key: api_key.into(),
        })
    }

    /// Points the client at a compatible server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Full URL of the chat completions endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, CHAT_COMPLETIONS_ENDPOINT)
    }

    fn build_headers(&self) -> Result<HeaderMap, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let auth_value = format!("Bearer {}", self.api_key);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value)
                .map_err(|e| ProviderError::InvalidApiKey(e.to_string()))?,
        );

        Ok(headers)
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    type Request = ChatCompletionRequest;
    type Response = ChatCompletion;

    #[instrument(skip_all, fields(model = %request.model))]
    async fn create(&self, request: ChatCompletionRequest) -> Result<ChatCompletion, ProviderError> {
        debug!("Sending chat completion");

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
            warn!(error = %e, "Failed to parse chat completion");
            ProviderError::InvalidResponse(format!("JSON error: {e}"))
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization_skips_unset_options() {
        let request = ChatCompletionRequest::new("gpt-4o", vec![ChatMessage::user("hi")]);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["messages"][0]["role"], "user");
        assert!(json.get("max_tokens").is_none());
        assert!(json.get("temperature").is_none());

        let json = serde_json::to_value(request.max_tokens(64)).unwrap();
        assert_eq!(json["max_tokens"], 64);
    }

    #[test]
    fn test_parse_completion() {
        let json = r#"{
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "model": "gpt-4o-2024-08-06",
            "choices": [{"index": 0,
                "message": {"role": "assistant", "content": "Hello!"},
                "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
        }"#;

        let completion: ChatCompletion = serde_json::from_str(json).unwrap();
        assert_eq!(completion.text(), Some("Hello!"));
        assert_eq!(ReportsUsage::model(&completion), Some("gpt-4o-2024-08-06"));
        assert_eq!(completion.usage(), Some(TokenUsage::new(12, 3)));
    }

    #[test]
    fn test_parse_completion_without_usage() {
        let json = r#"{"id": "x", "choices": []}"#;
        let completion: ChatCompletion = serde_json::from_str(json).unwrap();
        assert!(completion.usage().is_none());
        assert!(ReportsUsage::model(&completion).is_none());
    }

    #[test]
    fn test_endpoint_with_custom_base() {
        let client = OpenAiClient::new("sk-test")
            .unwrap()
            .with_base_url("http://localhost:8080/");
        assert_eq!(client.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_invalid_api_key_header() {
        let client = OpenAiClient::new("bad\nkey").unwrap();
        assert!(matches!(
            client.build_headers(),
            Err(ProviderError::InvalidApiKey(_))
        ));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let client = OpenAiClient::new("sk-secret-123").unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("sk-secret-123"));
        assert!(debug.contains("[redacted]"));

        let tracked = crate::Tracked::new(client, costguard_core::CostTracker::new());
        assert!(!format!("{tracked:?}").contains("sk-secret-123"));
    }
}
