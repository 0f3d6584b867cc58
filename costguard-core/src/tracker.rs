//! Core cost tracking engine.
//!
//! [`CostTracker`] is a thread-safe, append-only ledger of [`UsageRecord`]s
//! with running totals. The record sequence and the totals live behind one
//! mutex and are always updated together, so no reader can observe totals
//! that disagree with the records.
//!
//! The optional observer callback runs after the lock is released and may
//! call back into the tracker.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::CoreError;
use crate::models::{round_to, RecordRequest, UsageRecord, UsageSummary, SUMMARY_COST_DECIMALS};
use crate::pricing::PricingTable;

/// Callback invoked after every record with `(record, cumulative_cost)`.
pub type RecordCallback = Arc<dyn Fn(&UsageRecord, f64) + Send + Sync>;

// ============================================================================
// Inner State
// ============================================================================

/// State guarded by the tracker's mutex.
#[derive(Debug, Default)]
struct TrackerInner {
    records: Vec<UsageRecord>,
    total_cost: f64,
    total_input_tokens: u64,
    total_output_tokens: u64,
}

impl TrackerInner {
    fn cost_by_model(&self) -> BTreeMap<String, f64> {
        let mut result = BTreeMap::new();
        for r in &self.records {
            *result.entry(r.model.clone()).or_insert(0.0) += r.cost;
        }
        result
    }

    fn summary(&self) -> UsageSummary {
        UsageSummary {
            total_cost_usd: round_to(self.total_cost, SUMMARY_COST_DECIMALS),
            total_input_tokens: self.total_input_tokens,
            total_output_tokens: self.total_output_tokens,
            total_requests: self.records.len(),
            cost_by_model: self.cost_by_model(),
        }
    }
}

// ============================================================================
// Cost Tracker
// ============================================================================

/// Thread-safe accumulator for LLM API costs.
///
/// Cloning a tracker is cheap and yields a handle to the same ledger.
#[derive(Clone)]
pub struct CostTracker {
    inner: Arc<Mutex<TrackerInner>>,
    pricing: Arc<PricingTable>,
    on_record: Option<RecordCallback>,
}

impl Default for CostTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CostTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("CostTracker")
            .field("records", &inner.records.len())
            .field("total_cost", &inner.total_cost)
            .field("has_callback", &self.on_record.is_some())
            .finish()
    }
}

impl CostTracker {
    /// Creates a tracker priced by the built-in table.
    pub fn new() -> Self {
        Self::with_pricing(PricingTable::global().clone())
    }

    /// Creates a tracker priced by a custom table.
    pub fn with_pricing(pricing: PricingTable) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TrackerInner::default())),
            pricing: Arc::new(pricing),
            on_record: None,
        }
    }

    /// Sets the callback invoked after every record.
    #[must_use]
    pub fn on_record<F>(mut self, callback: F) -> Self
    where
        F: Fn(&UsageRecord, f64) + Send + Sync + 'static,
    {
        self.on_record = Some(Arc::new(callback));
        self
    }

    /// Returns the pricing table used for calls without an explicit cost.
    pub fn pricing(&self) -> &PricingTable {
        &self.pricing
    }

    // Critical sections only mutate after every fallible step has passed,
    // so a poisoned lock still guards valid data.
    fn lock(&self) -> MutexGuard<'_, TrackerInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ========================================================================
    // Recording
    // ========================================================================

    /// Records a call, pricing it from the tracker's table.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnknownModel` if the model cannot be priced.
    pub fn record(
        &self,
        model: &str,
        input_tokens: u64,
        output_tokens: u64,
    ) -> Result<UsageRecord, CoreError> {
        self.record_with(RecordRequest::new(model, input_tokens, output_tokens))
    }

    /// Records a call with optional cost, metadata and timestamp.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnknownModel` if no cost is given and the model
    /// cannot be priced, `CoreError::InvalidCost` if the cost is negative or
    /// not finite, and `CoreError::TokenOverflow` if a running token total
    /// would overflow. Nothing is recorded in any of these cases.
    pub fn record_with(&self, request: RecordRequest) -> Result<UsageRecord, CoreError> {
        let cost = match request.cost {
            Some(cost) => cost,
            None => self
                .pricing
                .resolve(&request.model)?
                .calculate_cost(request.input_tokens, request.output_tokens),
        };
        if !cost.is_finite() || cost < 0.0 {
            return Err(CoreError::InvalidCost(cost));
        }

        let record = UsageRecord {
            model: request.model,
            input_tokens: request.input_tokens,
            output_tokens: request.output_tokens,
            cost,
            timestamp: request.timestamp.unwrap_or_else(Utc::now),
            metadata: request.metadata,
        };

        let stored = record.clone();
        let cumulative = {
            let mut inner = self.lock();
            let input = inner.total_input_tokens.checked_add(record.input_tokens);
            let output = inner.total_output_tokens.checked_add(record.output_tokens);
            let (Some(input), Some(output)) = (input, output) else {
                return Err(CoreError::TokenOverflow {
                    model: record.model,
                });
            };

            inner.records.push(stored);
            inner.total_cost += cost;
            inner.total_input_tokens = input;
            inner.total_output_tokens = output;
            inner.total_cost
        };

        debug!(
            model = %record.model,
            input_tokens = record.input_tokens,
            output_tokens = record.output_tokens,
            cost,
            cumulative,
            "Recorded usage"
        );

        if let Some(callback) = &self.on_record {
            callback(&record, cumulative);
        }

        Ok(record)
    }

    // ========================================================================
    // Totals
    // ========================================================================

    /// Total cost in USD.
    pub fn total_cost(&self) -> f64 {
        self.lock().total_cost
    }

    /// Total input tokens.
    pub fn total_input_tokens(&self) -> u64 {
        self.lock().total_input_tokens
    }

    /// Total output tokens.
    pub fn total_output_tokens(&self) -> u64 {
        self.lock().total_output_tokens
    }

    /// Total input plus output tokens, saturating at `u64::MAX`.
    pub fn total_tokens(&self) -> u64 {
        let inner = self.lock();
        inner
            .total_input_tokens
            .saturating_add(inner.total_output_tokens)
    }

    /// Number of recorded calls.
    pub fn request_count(&self) -> usize {
        self.lock().records.len()
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    /// Returns a copy of all records in arrival order.
    pub fn records(&self) -> Vec<UsageRecord> {
        self.lock().records.clone()
    }

    /// Returns cumulative cost per model.
    pub fn cost_by_model(&self) -> BTreeMap<String, f64> {
        self.lock().cost_by_model()
    }

    /// Returns the cost of records stamped at or after `since`.
    pub fn window_cost(&self, since: DateTime<Utc>) -> f64 {
        self.lock()
            .records
            .iter()
            .filter(|r| r.timestamp >= since)
            .map(|r| r.cost)
            .sum()
    }

    /// Returns a consistent snapshot of all totals.
    pub fn summary(&self) -> UsageSummary {
        self.lock().summary()
    }

    /// Returns the summary and a copy of the records taken together.
    pub fn snapshot(&self) -> (UsageSummary, Vec<UsageRecord>) {
        let inner = self.lock();
        (inner.summary(), inner.records.clone())
    }

    /// Returns the unrounded total cost and the summary taken together.
    ///
    /// `UsageSummary::total_cost_usd` is rounded for display; exporters that
    /// need full precision read the first element instead.
    pub fn summary_with_total(&self) -> (f64, UsageSummary) {
        let inner = self.lock();
        (inner.total_cost, inner.summary())
    }

    /// Clears all tracked data.
    pub fn reset(&self) {
        let mut inner = self.lock();
        *inner = TrackerInner::default();
        debug!("Tracker reset");
    }
}

// ============================================================================
// Tests
// ============================================================================
