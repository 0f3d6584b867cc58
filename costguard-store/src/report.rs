//! JSON cost reports.
//!
//! A report is the on-disk form of a tracker: a summary plus every record.
//! Reports can be loaded back and replayed into a fresh tracker, which is how
//! the CLI evaluates budgets against past spend.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use costguard_core::{round_to, CostTracker, RecordRequest, UsageRecord, UsageSummary};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;
use crate::export::RECORD_COST_DECIMALS;
use crate::persistence::load_json;

/// One record as it appears in an exported report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedRecord {
    /// Model identifier.
    pub model: String,
    /// Input tokens.
    pub input_tokens: u64,
    /// Output tokens.
    pub output_tokens: u64,
    /// Cost in USD, rounded to eight decimals.
    pub cost_usd: f64,
    /// Seconds since the Unix epoch.
    pub timestamp: f64,
    /// Caller metadata.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl From<&UsageRecord> for ExportedRecord {
    fn from(record: &UsageRecord) -> Self {
        Self {
            model: record.model.clone(),
            input_tokens: record.input_tokens,
            output_tokens: record.output_tokens,
            cost_usd: round_to(record.cost, RECORD_COST_DECIMALS),
            timestamp: record.unix_seconds(),
            metadata: record.metadata.clone(),
        }
    }
}

impl ExportedRecord {
    /// Converts the float timestamp back to a UTC instant.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidReport` for non-finite or out-of-range values.
    #[allow(clippy::cast_possible_truncation)]
    pub fn datetime(&self) -> Result<DateTime<Utc>, StoreError> {
        if !self.timestamp.is_finite() {
            return Err(StoreError::InvalidReport(format!(
                "non-finite timestamp for model {:?}",
                self.model
            )));
        }
        let micros = (self.timestamp * 1_000_000.0).round() as i64;
        DateTime::from_timestamp_micros(micros).ok_or_else(|| {
            StoreError::InvalidReport(format!("timestamp out of range: {}", self.timestamp))
        })
    }

    /// Builds a request that re-records this entry with its original cost
    /// and timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the timestamp is invalid.
    pub fn to_request(&self) -> Result<RecordRequest, StoreError> {
        Ok(RecordRequest::new(&self.model, self.input_tokens, self.output_tokens)
            .cost(self.cost_usd)
            .timestamp(self.datetime()?)
            .metadata(self.metadata.clone()))
    }
}

/// Summary plus records, as written by [`to_json`](crate::export::to_json).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CostReport {
    /// Totals at export time.
    pub summary: UsageSummary,
    /// Every recorded call in insertion order.
    #[serde(default)]
    pub records: Vec<ExportedRecord>,
}

impl CostReport {
    /// Builds a report from a consistent snapshot of the tracker.
    pub fn from_tracker(tracker: &CostTracker) -> Self {
        let (summary, records) = tracker.snapshot();
        Self {
            summary,
            records: records.iter().map(ExportedRecord::from).collect(),
        }
    }

    /// Re-records every entry into `tracker`, returning how many were added.
    ///
    /// Costs come from the report, so models missing from the tracker's
    /// pricing table replay fine. Timestamps are validated up front; on
    /// error nothing is recorded.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidReport` if any timestamp is invalid.
    pub fn replay(&self, tracker: &CostTracker) -> Result<usize, StoreError> {
        let requests = self
            .records
            .iter()
            .map(ExportedRecord::to_request)
            .collect::<Result<Vec<_>, _>>()?;

        let count = requests.len();
        for request in requests {
            tracker.record_with(request)?;
        }

        debug!(count, "Replayed report records");
        Ok(count)
    }
}

/// Loads a JSON report written by [`save_json_report`](crate::export::save_json_report).
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub async fn load_report(path: &Path) -> Result<CostReport, StoreError> {
    load_json(path).await
}

// ============================================================================
// Tests
// ============================================================================
