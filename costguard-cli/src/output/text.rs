//! Text output formatting with optional colors.

use costguard_core::{Action, BudgetResult, ModelPricing, UsageSummary};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";

/// Width of the separator under the models header.
const MODELS_RULE_WIDTH: usize = 74;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    // ========================================================================
    // Models
    // ========================================================================

    /// Header and rule for the models table.
    pub fn format_models_header(&self) -> String {
        let header = format!(
            "{:<40} {:<12} {:>10} {:>10}",
            "Model", "Provider", "Input/1M", "Output/1M"
        );
        format!("{}\n{}", self.bold(&header), "-".repeat(MODELS_RULE_WIDTH))
    }

    /// One row of the models table.
    pub fn format_model_line(&self, pricing: &ModelPricing) -> String {
        format!(
            "{:<40} {:<12} ${:>8.3} ${:>8.3}",
            pricing.name,
            pricing.provider.cli_name(),
            pricing.input_cost_per_1m,
            pricing.output_cost_per_1m
        )
    }

    // ========================================================================
    // Estimate
    // ========================================================================

    /// Estimate block. Shows the requested id when it resolved by prefix.
    pub fn format_estimate(
        &self,
        requested: &str,
        pricing: &ModelPricing,
        input_tokens: u64,
        output_tokens: u64,
        cost: f64,
    ) -> String {
        let mut lines = Vec::new();

        if requested == pricing.name {
            lines.push(format!("Model:         {}", pricing.name));
        } else {
            lines.push(format!(
                "Model:         {} {}",
                pricing.name,
                self.dim(&format!("(from {requested})"))
            ));
        }
        lines.push(format!("Input tokens:  {}", format_count(input_tokens)));
        lines.push(format!("Output tokens: {}", format_count(output_tokens)));
        lines.push(format!("Estimated cost: {}", self.bold(&format!("${cost:.6}"))));

        lines.join("\n")
    }

    // ========================================================================
    // Report
    // ========================================================================

    /// Report summary with costs per model sorted by name.
    pub fn format_report(&self, summary: &UsageSummary) -> String {
        let mut lines = Vec::new();

        lines.push(self.bold("=== LLM Cost Report ==="));
        lines.push(format!("Total cost:     ${:.6}", summary.total_cost_usd));
        lines.push(format!("Total requests: {}", summary.total_requests));
        lines.push(format!(
            "Input tokens:   {}",
            format_count(summary.total_input_tokens)
        ));
        lines.push(format!(
            "Output tokens:  {}",
            format_count(summary.total_output_tokens)
        ));

        if !summary.cost_by_model.is_empty() {
            lines.push(String::new());
            lines.push("Cost by model:".to_string());
            for (model, cost) in &summary.cost_by_model {
                lines.push(format!("  {model:<35} ${cost:.6}"));
            }
        }

        lines.join("\n")
    }

    // ========================================================================
    // Budget Check
    // ========================================================================

    /// Outcome of a budget check.
    pub fn format_budget(&self, result: &BudgetResult, replayed: usize, policies: usize) -> String {
        let label = format!("[{}]", result.action.as_str().to_uppercase());
        let label = match result.action {
            Action::Allow => self.green(&label),
            Action::Warn => self.yellow(&label),
            Action::Block => self.red(&label),
        };

        let mut lines = vec![format!("{label} {}", result.message)];
        if result.limit > 0.0 || result.current_cost > 0.0 {
            lines.push(format!(
                "Spend: ${:.4} / limit ${:.2}",
                result.current_cost, result.limit
            ));
        }
        lines.push(self.dim(&format!(
            "{replayed} records replayed, {policies} policies evaluated"
        )));

        lines.join("\n")
    }

    // ========================================================================
    // Color Helpers
    // ========================================================================

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }
}

/// Formats a count with thousands separators (`1234567` -> `1,234,567`).
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
