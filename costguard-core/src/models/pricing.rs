//! Per-model pricing entries.
//!
//! All prices are in USD per 1M tokens.

use serde::{Deserialize, Serialize};

use super::provider::Provider;

/// Tokens per pricing unit.
pub const TOKENS_PER_PRICING_UNIT: f64 = 1_000_000.0;

// ============================================================================
// Model Pricing
// ============================================================================

/// Per-token pricing for a single model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    /// Registered model name (also the prefix used for versioned ids).
    pub name: String,
    /// Vendor serving the model.
    pub provider: Provider,
    /// Cost in USD per 1M input tokens.
    pub input_cost_per_1m: f64,
    /// Cost in USD per 1M output tokens.
    pub output_cost_per_1m: f64,
    /// Context window in tokens, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_window: Option<u64>,
}

impl ModelPricing {
    /// Creates a new pricing entry.
    pub fn new(
        name: impl Into<String>,
        provider: Provider,
        input_cost_per_1m: f64,
        output_cost_per_1m: f64,
    ) -> Self {
        Self {
            name: name.into(),
            provider,
            input_cost_per_1m,
            output_cost_per_1m,
            context_window: None,
        }
    }

    /// Sets the context window.
    pub fn with_context_window(mut self, tokens: u64) -> Self {
        self.context_window = Some(tokens);
        self
    }

    /// Cost in USD of a single input token.
    pub fn input_cost_per_token(&self) -> f64 {
        self.input_cost_per_1m / TOKENS_PER_PRICING_UNIT
    }

    /// Cost in USD of a single output token.
    pub fn output_cost_per_token(&self) -> f64 {
        self.output_cost_per_1m / TOKENS_PER_PRICING_UNIT
    }

    /// Calculates the cost of a call. No rounding is applied.
    #[allow(clippy::cast_precision_loss)]
    pub fn calculate_cost(&self, input_tokens: u64, output_tokens: u64) -> f64 {
        input_tokens as f64 * self.input_cost_per_token()
            + output_tokens as f64 * self.output_cost_per_token()
    }
}

// ============================================================================
// Tests
// ============================================================================
