//! Check command - evaluate budget policies against a report.

use std::path::PathBuf;

use anyhow::Result;
use costguard_core::{Action, CostTracker};
use costguard_store::{load_report, GuardConfig, PolicyConfig};
use tracing::{info, warn};

use crate::output::{JsonFormatter, TextFormatter};
use crate::{ensure_exists, report_path, Cli, ExitCode, OutputFormat};

/// Arguments for the check command.
#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// JSON report whose records are replayed before checking.
    ///
    /// Defaults to `report.json` in the costguard data directory.
    pub file: Option<PathBuf>,

    /// Add a hard cap in USD after the configured policies.
    #[arg(long, value_name = "USD")]
    pub hard_cap: Option<f64>,

    /// Add a soft warning threshold in USD after the configured policies.
    #[arg(long, value_name = "USD")]
    pub soft_warning: Option<f64>,
}

impl CheckArgs {
    /// Appends the ad-hoc policies from the command line.
    fn apply(&self, config: &mut GuardConfig) {
        if let Some(limit_usd) = self.hard_cap {
            config.budget.policies.push(PolicyConfig::HardCap { limit_usd });
        }
        if let Some(warning_usd) = self.soft_warning {
            config
                .budget
                .policies
                .push(PolicyConfig::SoftWarning { warning_usd });
        }
    }
}

/// Runs the check command.
///
/// Returns [`ExitCode::BudgetBlocked`] when a policy blocks.
pub async fn run(args: &CheckArgs, cli: &Cli) -> Result<ExitCode> {
    let file = report_path(args.file.as_deref());
    info!(file = %file.display(), "Checking budget");

    let mut config = cli.load_config().await?;
    args.apply(&mut config);
    config.validate()?;

    ensure_exists(&file)?;
    let report = load_report(&file).await?;

    let tracker = CostTracker::with_pricing(config.build_pricing());
    let replayed = report.replay(&tracker)?;

    let manager = config.build_manager();
    let result = manager.check(&tracker);

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_budget(&result, replayed, manager.len()));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_budget(&result, replayed, manager.len())?);
        }
    }

    if result.action == Action::Block {
        warn!(message = %result.message, "Budget blocked");
        return Ok(ExitCode::BudgetBlocked);
    }

    Ok(ExitCode::Success)
}
