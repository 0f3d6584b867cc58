//! Usage-related types.
//!
//! This module contains types related to usage tracking:
//! - [`UsageRecord`] - One metered call
//! - [`RecordRequest`] - Input to [`CostTracker::record_with`](crate::CostTracker::record_with)
//! - [`UsageSummary`] - Point-in-time totals

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Decimal places kept for `total_cost_usd` in summaries.
pub const SUMMARY_COST_DECIMALS: i32 = 6;

/// Rounds `value` to `decimals` places. Display and export only.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// ============================================================================
// Usage Record
// ============================================================================

/// A single API call's usage and cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Model identifier as reported by the call.
    pub model: String,
    /// Input (prompt) tokens.
    pub input_tokens: u64,
    /// Output (completion) tokens.
    pub output_tokens: u64,
    /// Cost in USD.
    pub cost: f64,
    /// When the record was created.
    pub timestamp: DateTime<Utc>,
    /// Free-form caller metadata.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl UsageRecord {
    /// Creates a record stamped with the current time.
    pub fn new(model: impl Into<String>, input_tokens: u64, output_tokens: u64, cost: f64) -> Self {
        Self {
            model: model.into(),
            input_tokens,
            output_tokens,
            cost,
            timestamp: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    /// Returns input plus output tokens.
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }

    /// Returns the timestamp as fractional seconds since the Unix epoch.
    #[allow(clippy::cast_precision_loss)]
    pub fn unix_seconds(&self) -> f64 {
        self.timestamp.timestamp_micros() as f64 / 1_000_000.0
    }
}

// ============================================================================
// Record Request
// ============================================================================

/// Parameters for recording one call.
///
/// When `cost` is `None` the tracker prices the call from its pricing table.
/// When `timestamp` is `None` the current time is used.
#[derive(Debug, Clone, Default)]
pub struct RecordRequest {
    /// Model identifier.
    pub model: String,
    /// Input tokens.
    pub input_tokens: u64,
    /// Output tokens.
    pub output_tokens: u64,
    /// Explicit cost override in USD.
    pub cost: Option<f64>,
    /// Caller metadata.
    pub metadata: HashMap<String, String>,
    /// Explicit timestamp (used when replaying exported records).
    pub timestamp: Option<DateTime<Utc>>,
}

impl RecordRequest {
    /// Creates a request for the given model and token counts.
    pub fn new(model: impl Into<String>, input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            model: model.into(),
            input_tokens,
            output_tokens,
            ..Default::default()
        }
    }

    /// Sets an explicit cost, bypassing pricing resolution.
    pub fn cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Adds one metadata entry.
    pub fn meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Replaces all metadata.
    pub fn metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Sets an explicit timestamp.
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

// ============================================================================
// Usage Summary
// ============================================================================

/// Consistent snapshot of a tracker's totals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UsageSummary {
    /// Total cost in USD, rounded to six decimals.
    pub total_cost_usd: f64,
    /// Total input tokens.
    pub total_input_tokens: u64,
    /// Total output tokens.
    pub total_output_tokens: u64,
    /// Number of recorded calls.
    pub total_requests: usize,
    /// Cost per model in USD (unrounded).
    #[serde(default)]
    pub cost_by_model: BTreeMap<String, f64>,
}

impl UsageSummary {
    /// Returns input plus output tokens.
    pub fn total_tokens(&self) -> u64 {
        self.total_input_tokens.saturating_add(self.total_output_tokens)
    }
}

// ============================================================================
// Tests
// ============================================================================
