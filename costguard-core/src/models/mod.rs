//! Domain models for costguard.
//!
//! This module contains the plain data structures shared by the pricing
//! table, the tracker and the budget policies.
//!
//! ## Submodules
//!
//! - [`provider`] - Provider tag (OpenAI, Anthropic, Google)
//! - [`pricing`] - Per-model pricing entries
//! - [`usage`] - Usage records and summaries
//! - [`budget`] - Budget actions and outcomes

mod budget;
mod pricing;
mod provider;
mod usage;

// Re-export everything at the models level
pub use budget::{Action, BudgetResult};
pub use pricing::{ModelPricing, TOKENS_PER_PRICING_UNIT};
pub use provider::Provider;
pub use usage::{round_to, RecordRequest, UsageRecord, UsageSummary, SUMMARY_COST_DECIMALS};
