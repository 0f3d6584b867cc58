// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Costguard Core
//!
//! Usage accounting and budget enforcement for metered LLM API calls.
//!
//! This crate provides the in-memory engine used by all other costguard
//! crates:
//!
//! - A pricing table that resolves model ids (exact, then prefix match)
//! - A thread-safe usage tracker with running totals
//! - Budget policies and a manager that warns or blocks calls
//!
//! ## Key Types
//!
//! ### Pricing
//! - [`PricingTable`] - Ordered, read-only model pricing registry
//! - [`ModelPricing`] - Per-model rates (USD per 1M tokens)
//! - [`Provider`] - Vendor tag
//!
//! ### Tracking
//! - [`CostTracker`] - Thread-safe accumulator
//! - [`UsageRecord`] - One recorded call
//! - [`UsageSummary`] - Consistent snapshot of totals
//!
//! ### Budgets
//! - [`BudgetPolicy`] - Rule trait
//! - [`BudgetManager`] - Combines policies (`Block > Warn > Allow`)
//! - [`BudgetResult`] / [`Action`] - Policy outcomes
//!
//! ## Usage
//!
//! ```
//! use costguard_core::{BudgetManager, CostTracker, HardCapPolicy, SoftWarningPolicy};
//!
//! let tracker = CostTracker::new();
//! let budget = BudgetManager::new()
//!     .with_policy(SoftWarningPolicy::new(5.0))
//!     .with_policy(HardCapPolicy::new(10.0));
//!
//! budget.enforce(&tracker)?;
//! tracker.record("gpt-4o", 1_000_000, 500_000)?;
//! assert!((tracker.total_cost() - 7.5).abs() < 1e-9);
//! # Ok::<(), costguard_core::CoreError>(())
//! ```

pub mod budget;
pub mod error;
pub mod models;
pub mod pricing;
pub mod traits;
pub mod tracker;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    round_to, Action, BudgetResult, ModelPricing, Provider, RecordRequest, UsageRecord,
    UsageSummary,
};

// Re-export engine types
pub use budget::{
    BudgetManager, HardCapPolicy, SlidingWindowPolicy, SoftWarningPolicy, WarnHook,
    DEFAULT_WINDOW_SECS,
};
pub use pricing::{get_pricing, list_models, PricingTable, PricingTableBuilder};
pub use tracker::{CostTracker, RecordCallback};

// Re-export traits
pub use traits::BudgetPolicy;
