// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Costguard Providers
//!
//! Cost-tracked completion clients.
//!
//! [`Tracked`] wraps any [`CompletionClient`]: each `create` call enforces
//! the budget first, then records the usage the response reports. Two
//! clients ship with the crate:
//!
//! | Client | Endpoint | Auth |
//! |--------|----------|------|
//! | [`OpenAiClient`] | `/v1/chat/completions` | `Authorization: Bearer` |
//! | [`AnthropicClient`] | `/v1/messages` | `x-api-key` |
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use costguard_core::{BudgetManager, CostTracker, HardCapPolicy};
//! use costguard_providers::{ChatCompletionRequest, ChatMessage, OpenAiClient, Tracked};
//!
//! # async fn demo() -> Result<(), costguard_providers::ProviderError> {
//! let tracker = CostTracker::new();
//! let budget = Arc::new(BudgetManager::new().with_policy(HardCapPolicy::new(5.0)));
//! let client = Tracked::new(OpenAiClient::new("sk-...")?, tracker.clone()).with_budget(budget);
//!
//! let request = ChatCompletionRequest::new("gpt-4o", vec![ChatMessage::user("Hello")]);
//! let response = client.create(request).await?;
//! println!("{:?} cost so far: ${:.4}", response.text(), tracker.total_cost());
//! # Ok(())
//! # }
//! ```

pub mod anthropic;
pub mod client;
pub mod error;
mod http;
pub mod openai;
pub mod tracked;

pub use anthropic::{AnthropicClient, Message, MessagesRequest, MessagesResponse};
pub use client::{CompletionClient, ReportsUsage, RequestModel, TokenUsage};
pub use error::ProviderError;
pub use openai::{ChatCompletion, ChatCompletionRequest, ChatMessage, OpenAiClient};
pub use tracked::Tracked;
