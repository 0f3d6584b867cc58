//! JSON output formatting.

use anyhow::Result;
use costguard_core::{Action, BudgetResult, ModelPricing, UsageSummary};
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// One priced model.
#[derive(Debug, Serialize)]
pub struct ModelOutput<'a> {
    pub name: &'a str,
    pub provider: &'a str,
    pub input_per_1m: f64,
    pub output_per_1m: f64,
}

/// A cost estimate.
#[derive(Debug, Serialize)]
pub struct EstimateOutput<'a> {
    pub model: &'a str,
    pub requested: &'a str,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cost_usd: f64,
}

/// A budget check outcome.
#[derive(Debug, Serialize)]
pub struct CheckOutput<'a> {
    pub action: Action,
    pub message: &'a str,
    pub current_cost: f64,
    pub limit: f64,
    pub records_replayed: usize,
    pub policies: usize,
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(data)?)
        } else {
            Ok(serde_json::to_string(data)?)
        }
    }

    /// Formats the models listing as an array.
    pub fn format_models(&self, models: &[&ModelPricing]) -> Result<String> {
        let output: Vec<_> = models
            .iter()
            .map(|m| ModelOutput {
                name: &m.name,
                provider: m.provider.cli_name(),
                input_per_1m: m.input_cost_per_1m,
                output_per_1m: m.output_cost_per_1m,
            })
            .collect();
        self.format(&output)
    }

    /// Formats an estimate.
    pub fn format_estimate(
        &self,
        requested: &str,
        pricing: &ModelPricing,
        input_tokens: u64,
        output_tokens: u64,
        cost: f64,
    ) -> Result<String> {
        self.format(&EstimateOutput {
            model: &pricing.name,
            requested,
            input_tokens,
            output_tokens,
            cost_usd: cost,
        })
    }

    /// Formats a report summary.
    pub fn format_report(&self, summary: &UsageSummary) -> Result<String> {
        self.format(summary)
    }

    /// Formats a budget check outcome.
    pub fn format_budget(
        &self,
        result: &BudgetResult,
        replayed: usize,
        policies: usize,
    ) -> Result<String> {
        self.format(&CheckOutput {
            action: result.action,
            message: &result.message,
            current_cost: result.current_cost,
            limit: result.limit,
            records_replayed: replayed,
            policies,
        })
    }
}
