//! CLI output formatting tests.
//!
//! These tests verify that CLI output is correctly formatted for both
//! text and JSON output modes.

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::{format_count, TextFormatter};
    use costguard_core::{get_pricing, Action, BudgetResult, UsageSummary};
    use std::collections::BTreeMap;

    fn summary() -> UsageSummary {
        let mut cost_by_model = BTreeMap::new();
        cost_by_model.insert("gpt-4o".to_string(), 0.0075);
        cost_by_model.insert("claude-3-haiku-20240307".to_string(), 0.00175);
        UsageSummary {
            total_cost_usd: 0.00925,
            total_input_tokens: 3_000,
            total_output_tokens: 1_500,
            total_requests: 2,
            cost_by_model,
        }
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
        assert_eq!(format_count(100_000), "100,000");
    }

    #[test]
    fn test_models_header_layout() {
        let formatter = TextFormatter::new(false);
        let header = formatter.format_models_header();
        let lines: Vec<&str> = header.lines().collect();

        assert!(lines[0].starts_with("Model"));
        assert!(lines[0].ends_with("Output/1M"));
        assert_eq!(lines[1], "-".repeat(74));
    }

    #[test]
    fn test_model_line() {
        let formatter = TextFormatter::new(false);
        let line = formatter.format_model_line(get_pricing("gpt-4o").unwrap());

        assert_eq!(
            line,
            format!("{:<40} {:<12} $   2.500 $  10.000", "gpt-4o", "openai")
        );
    }

    #[test]
    fn test_estimate_exact_model() {
        let formatter = TextFormatter::new(false);
        let pricing = get_pricing("gpt-4o").unwrap();
        let out = formatter.format_estimate("gpt-4o", pricing, 1_000, 500, 0.0075);

        assert!(out.contains("Model:         gpt-4o\n"));
        assert!(out.contains("Input tokens:  1,000"));
        assert!(out.contains("Output tokens: 500"));
        assert!(out.ends_with("Estimated cost: $0.007500"));
    }

    #[test]
    fn test_estimate_prefix_model_mentions_request() {
        let formatter = TextFormatter::new(false);
        let pricing = get_pricing("gpt-4o-2024-08-06").unwrap();
        let out = formatter.format_estimate("gpt-4o-2024-08-06", pricing, 1, 1, 0.0);

        assert!(out.contains("gpt-4o (from gpt-4o-2024-08-06)"));
    }

    #[test]
    fn test_report_sorted_by_model() {
        let formatter = TextFormatter::new(false);
        let out = formatter.format_report(&summary());

        assert!(out.starts_with("=== LLM Cost Report ==="));
        assert!(out.contains("Total cost:     $0.009250"));
        assert!(out.contains("Input tokens:   3,000"));

        let claude = out.find("claude-3-haiku").unwrap();
        let gpt = out.find("  gpt-4o").unwrap();
        assert!(claude < gpt);
    }

    #[test]
    fn test_report_without_models() {
        let formatter = TextFormatter::new(false);
        let out = formatter.format_report(&UsageSummary::default());
        assert!(!out.contains("Cost by model"));
    }

    #[test]
    fn test_budget_colors() {
        let block = BudgetResult::new(Action::Block, "Hard cap reached", 2.0, 1.0);

        let plain = TextFormatter::new(false).format_budget(&block, 3, 1);
        assert!(plain.starts_with("[BLOCK] Hard cap reached"));
        assert!(plain.contains("Spend: $2.0000 / limit $1.00"));
        assert!(plain.contains("3 records replayed, 1 policies evaluated"));

        let colored = TextFormatter::new(true).format_budget(&block, 3, 1);
        assert!(colored.contains("\x1b[31m[BLOCK]"));
    }

    #[test]
    fn test_budget_allow_without_policies_hides_spend() {
        let allow = BudgetResult::allow("No policies configured");
        let out = TextFormatter::new(false).format_budget(&allow, 0, 0);
        assert!(!out.contains("Spend:"));
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::JsonFormatter;
    use costguard_core::{list_models, Action, BudgetResult, Provider, UsageSummary};

    #[test]
    fn test_format_pretty_json() {
        let formatter = JsonFormatter::new(true);
        let out = formatter.format(&serde_json::json!({"a": 1})).unwrap();
        assert!(out.contains('\n'));
    }

    #[test]
    fn test_format_compact_json() {
        let formatter = JsonFormatter::new(false);
        let out = formatter.format(&serde_json::json!({"a": 1})).unwrap();
        assert_eq!(out, r#"{"a":1}"#);
    }

    #[test]
    fn test_models_keys() {
        let formatter = JsonFormatter::new(false);
        let models = list_models(Some(Provider::Google));
        let out = formatter.format_models(&models).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 3);
        for entry in array {
            assert_eq!(entry["provider"], "google");
            assert!(entry["input_per_1m"].is_f64());
            assert!(entry["output_per_1m"].is_f64());
            assert!(entry["name"].as_str().unwrap().starts_with("gemini"));
        }
    }

    #[test]
    fn test_report_is_summary() {
        let formatter = JsonFormatter::new(false);
        let out = formatter.format_report(&UsageSummary::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["total_requests"], 0);
    }

    #[test]
    fn test_budget_output() {
        let formatter = JsonFormatter::new(false);
        let result = BudgetResult::new(Action::Warn, "careful", 6.0, 5.0);
        let out = formatter.format_budget(&result, 4, 2).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["action"], "warn");
        assert_eq!(value["message"], "careful");
        assert_eq!(value["limit"], 5.0);
        assert_eq!(value["records_replayed"], 4);
        assert_eq!(value["policies"], 2);
    }
}
