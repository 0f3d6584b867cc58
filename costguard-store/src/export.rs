//! Export tracker contents as JSON, CSV, or Prometheus text.
//!
//! JSON and CSV read a single [`CostTracker::snapshot`], so the summary and
//! the record list always describe the same set of calls.

use std::fmt::Write as _;
use std::path::Path;

use costguard_core::{round_to, CostTracker, UsageRecord};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::persistence::save_text;
use crate::report::CostReport;

/// Default metric name prefix for [`to_prometheus`].
pub const DEFAULT_METRIC_PREFIX: &str = "llm_cost_guardian";

/// Decimal places kept for per-record costs and the Prometheus cost gauges.
pub const RECORD_COST_DECIMALS: i32 = 8;

const CSV_HEADER: &str = "timestamp,model,input_tokens,output_tokens,cost_usd";

// ============================================================================
// JSON
// ============================================================================

/// Serializes the tracker as a JSON report (`summary` + `records`).
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json(tracker: &CostTracker, pretty: bool) -> Result<String, StoreError> {
    let report = CostReport::from_tracker(tracker);
    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    Ok(json)
}

/// Writes a JSON report to `path`.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub async fn save_json_report(tracker: &CostTracker, path: &Path) -> Result<(), StoreError> {
    let json = to_json(tracker, true)?;
    save_text(path, &json).await?;
    info!(path = %path.display(), "Saved JSON report");
    Ok(())
}

// ============================================================================
// CSV
// ============================================================================

/// Renders every record as a CSV row.
///
/// # Errors
///
/// Returns an error if the CSV writer fails.
pub fn to_csv(tracker: &CostTracker) -> Result<String, StoreError> {
    let (_, records) = tracker.snapshot();
    records_to_csv(&records)
}

fn records_to_csv(records: &[UsageRecord]) -> Result<String, StoreError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::with_capacity(CSV_HEADER.len() + 1 + records.len() * 64));
    writer.write_record(CSV_HEADER.split(','))?;

    for record in records {
        writer.write_record([
            record.unix_seconds().to_string(),
            record.model.clone(),
            record.input_tokens.to_string(),
            record.output_tokens.to_string(),
            round_to(record.cost, RECORD_COST_DECIMALS).to_string(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| StoreError::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| StoreError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Writes the CSV export to `path`.
///
/// # Errors
///
/// Returns an error if encoding or the write fails.
pub async fn save_csv(tracker: &CostTracker, path: &Path) -> Result<(), StoreError> {
    let csv = to_csv(tracker)?;
    save_text(path, &csv).await?;
    info!(path = %path.display(), "Saved CSV export");
    Ok(())
}

// ============================================================================
// Prometheus
// ============================================================================

/// Renders the tracker summary in the Prometheus text exposition format.
///
/// Passing `None` uses [`DEFAULT_METRIC_PREFIX`].
pub fn to_prometheus(tracker: &CostTracker, prefix: Option<&str>) -> String {
    let prefix = prefix.unwrap_or(DEFAULT_METRIC_PREFIX);
    let (total_cost, summary) = tracker.summary_with_total();
    debug!(prefix, models = summary.cost_by_model.len(), "Rendering Prometheus metrics");

    let mut out = String::new();

    metric(
        &mut out,
        &format!("{prefix}_total_cost_usd"),
        "Total LLM API cost in USD",
        "gauge",
        &round_to(total_cost, RECORD_COST_DECIMALS).to_string(),
    );
    metric(
        &mut out,
        &format!("{prefix}_total_requests"),
        "Total LLM API requests",
        "counter",
        &summary.total_requests.to_string(),
    );
    metric(
        &mut out,
        &format!("{prefix}_total_input_tokens"),
        "Total input tokens",
        "counter",
        &summary.total_input_tokens.to_string(),
    );
    metric(
        &mut out,
        &format!("{prefix}_total_output_tokens"),
        "Total output tokens",
        "counter",
        &summary.total_output_tokens.to_string(),
    );

    let name = format!("{prefix}_cost_by_model_usd");
    let _ = writeln!(out, "# HELP {name} Cost per model in USD");
    let _ = writeln!(out, "# TYPE {name} gauge");
    for (model, cost) in &summary.cost_by_model {
        let _ = writeln!(
            out,
            "{name}{{model=\"{}\"}} {}",
            escape_label(model),
            round_to(*cost, RECORD_COST_DECIMALS)
        );
    }

    out
}

fn metric(out: &mut String, name: &str, help: &str, kind: &str, value: &str) {
    let _ = writeln!(out, "# HELP {name} {help}");
    let _ = writeln!(out, "# TYPE {name} {kind}");
    let _ = writeln!(out, "{name} {value}");
}

/// Escapes a label value: backslash, double quote, and newline.
fn escape_label(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }
    escaped
}

// ============================================================================
// Tests
// ============================================================================
