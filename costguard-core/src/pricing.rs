//! Pricing table and model resolution.
//!
//! The table keeps entries in registration order so that prefix resolution
//! of versioned model ids (e.g. `gpt-4o-2024-08-06`) is reproducible: the
//! first registered name that prefixes the id wins.
//!
//! Prices last updated 2025-01-15.

use std::collections::HashMap;
use std::sync::OnceLock;

use tracing::debug;

use crate::error::CoreError;
use crate::models::{ModelPricing, Provider};

// ============================================================================
// Static Registry
// ============================================================================

/// Built-in pricing table, initialized once on first access.
static GLOBAL_TABLE: OnceLock<PricingTable> = OnceLock::new();

/// Builds the built-in model list.
///
/// Order matters for prefix resolution:
/// 1. OpenAI
/// 2. Anthropic
/// 3. Google
fn init_models() -> PricingTable {
    use Provider::{Anthropic, Google, OpenAI};

    PricingTable::builder()
        // OpenAI
        .model(ModelPricing::new("gpt-4o", OpenAI, 2.50, 10.00).with_context_window(128_000))
        .model(ModelPricing::new("gpt-4o-mini", OpenAI, 0.15, 0.60).with_context_window(128_000))
        .model(ModelPricing::new("gpt-4-turbo", OpenAI, 10.00, 30.00).with_context_window(128_000))
        .model(ModelPricing::new("gpt-4", OpenAI, 30.00, 60.00).with_context_window(8_192))
        .model(ModelPricing::new("gpt-3.5-turbo", OpenAI, 0.50, 1.50).with_context_window(16_385))
        .model(ModelPricing::new("o1", OpenAI, 15.00, 60.00).with_context_window(200_000))
        .model(ModelPricing::new("o1-mini", OpenAI, 3.00, 12.00).with_context_window(128_000))
        .model(ModelPricing::new("o3-mini", OpenAI, 1.10, 4.40).with_context_window(200_000))
        // Anthropic
        .model(ModelPricing::new("claude-opus-4-20250514", Anthropic, 15.00, 75.00).with_context_window(200_000))
        .model(ModelPricing::new("claude-sonnet-4-20250514", Anthropic, 3.00, 15.00).with_context_window(200_000))
        .model(ModelPricing::new("claude-3-5-sonnet-20241022", Anthropic, 3.00, 15.00).with_context_window(200_000))
        .model(ModelPricing::new("claude-3-5-haiku-20241022", Anthropic, 0.80, 4.00).with_context_window(200_000))
        .model(ModelPricing::new("claude-3-opus-20240229", Anthropic, 15.00, 75.00).with_context_window(200_000))
        .model(ModelPricing::new("claude-3-haiku-20240307", Anthropic, 0.25, 1.25).with_context_window(200_000))
        // Google
        .model(ModelPricing::new("gemini-2.0-flash", Google, 0.10, 0.40).with_context_window(1_000_000))
        .model(ModelPricing::new("gemini-1.5-pro", Google, 1.25, 5.00).with_context_window(2_000_000))
        .model(ModelPricing::new("gemini-1.5-flash", Google, 0.075, 0.30).with_context_window(1_000_000))
        .build()
}

// ============================================================================
// Pricing Table
// ============================================================================

/// Read-only, ordered mapping from model name to pricing.
#[derive(Debug, Clone, Default)]
pub struct PricingTable {
    /// Entries in registration order.
    entries: Vec<ModelPricing>,
    /// Name to position in `entries`.
    index: HashMap<String, usize>,
}

impl PricingTable {
    /// Returns a builder for a custom table.
    pub fn builder() -> PricingTableBuilder {
        PricingTableBuilder::new()
    }

    /// Returns the built-in table.
    pub fn global() -> &'static PricingTable {
        GLOBAL_TABLE.get_or_init(init_models)
    }

    /// Returns a builder pre-populated with this table's entries.
    pub fn to_builder(&self) -> PricingTableBuilder {
        PricingTableBuilder {
            table: self.clone(),
        }
    }

    /// Resolves a model id to its pricing.
    ///
    /// Tries an exact match first, then the first registered name that is a
    /// prefix of `model`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnknownModel` when neither matches.
    pub fn resolve(&self, model: &str) -> Result<&ModelPricing, CoreError> {
        if let Some(&pos) = self.index.get(model) {
            return Ok(&self.entries[pos]);
        }

        let found = self.entries.iter().find(|e| model.starts_with(e.name.as_str()));
        match found {
            Some(entry) => {
                debug!(model = %model, resolved = %entry.name, "Resolved model by prefix");
                Ok(entry)
            }
            None => Err(CoreError::UnknownModel(model.to_string())),
        }
    }

    /// Returns the exact entry for a registered name.
    pub fn get(&self, name: &str) -> Option<&ModelPricing> {
        self.index.get(name).map(|&pos| &self.entries[pos])
    }

    /// Calculates the cost of a call against a model.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnknownModel` if the model cannot be resolved.
    pub fn calculate_cost(
        &self,
        model: &str,
        input_tokens: u64,
        output_tokens: u64,
    ) -> Result<f64, CoreError> {
        Ok(self.resolve(model)?.calculate_cost(input_tokens, output_tokens))
    }

    /// Lists entries sorted by name, optionally filtered by provider.
    pub fn list(&self, provider: Option<Provider>) -> Vec<&ModelPricing> {
        let mut models: Vec<_> = self
            .entries
            .iter()
            .filter(|e| provider.is_none_or(|p| e.provider == p))
            .collect();
        models.sort_by(|a, b| a.name.cmp(&b.name));
        models
    }

    /// Returns entries in registration order.
    pub fn entries(&self) -> &[ModelPricing] {
        &self.entries
    }

    /// Returns the number of registered models.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no models are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`PricingTable`].
#[derive(Debug, Default)]
pub struct PricingTableBuilder {
    table: PricingTable,
}

impl PricingTableBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from the built-in models.
    pub fn with_defaults() -> Self {
        PricingTable::global().to_builder()
    }

    /// Registers a model.
    ///
    /// Re-registering an existing name replaces the entry but keeps its
    /// original position.
    #[must_use]
    pub fn model(mut self, pricing: ModelPricing) -> Self {
        self.insert(pricing);
        self
    }

    /// Registers a model in place.
    pub fn insert(&mut self, pricing: ModelPricing) {
        let table = &mut self.table;
        if let Some(&pos) = table.index.get(&pricing.name) {
            table.entries[pos] = pricing;
        } else {
            table.index.insert(pricing.name.clone(), table.entries.len());
            table.entries.push(pricing);
        }
    }

    /// Finishes the table.
    pub fn build(self) -> PricingTable {
        self.table
    }
}

// ============================================================================
// Global helpers
// ============================================================================

/// Looks up pricing in the built-in table.
///
/// # Errors
///
/// Returns `CoreError::UnknownModel` if the model cannot be resolved.
pub fn get_pricing(model: &str) -> Result<&'static ModelPricing, CoreError> {
    PricingTable::global().resolve(model)
}

/// Lists built-in models sorted by name, optionally filtered by provider.
pub fn list_models(provider: Option<Provider>) -> Vec<&'static ModelPricing> {
    PricingTable::global().list(provider)
}

// ============================================================================
// Tests
// ============================================================================
