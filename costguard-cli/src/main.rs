// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Costguard CLI - LLM pricing, estimates and budget checks from the command line.
//!
//! # Examples
//!
//! ```bash
//! # List priced models
//! costguard models --provider anthropic
//!
//! # Estimate a call
//! costguard estimate gpt-4o -i 12000 -o 800
//!
//! # Summarize an exported report
//! costguard report report.json
//!
//! # Evaluate configured budgets against a report (exit 5 when blocked)
//! costguard check report.json --hard-cap 25
//!
//! # Convert a report for scraping
//! costguard export report.json --to prometheus
//! ```

mod commands;
mod output;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use costguard_store::{default_report_path, GuardConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{check, estimate, export, models, report};

// ============================================================================
// CLI Definition
// ============================================================================

/// Costguard CLI - cost monitoring for LLM API calls.
#[derive(Parser)]
#[command(name = "costguard")]
#[command(about = "Real-time cost monitoring and budget enforcement for LLM APIs")]
#[command(long_about = r#"
Costguard prices LLM calls and enforces spend budgets.

Budgets and extra model prices are read from config.json in the
costguard config directory, or from the file given with --config.
Report commands read report.json from the costguard data directory
when no file is given.

Examples:
  costguard models                        # All priced models
  costguard estimate gpt-4o -i 1000 -o 500
  costguard report report.json            # Summarize an export
  costguard check report.json             # Evaluate budgets
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (no logging, no error text).
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Config file to use instead of the default location.
    #[arg(long, short = 'c', global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// List supported models and their pricing.
    #[command(visible_alias = "m")]
    Models(models::ModelsArgs),

    /// Estimate the cost of a call.
    #[command(visible_alias = "e")]
    Estimate(estimate::EstimateArgs),

    /// Display a summary from a JSON report file.
    #[command(visible_alias = "r")]
    Report(report::ReportArgs),

    /// Evaluate budget policies against a JSON report file.
    Check(check::CheckArgs),

    /// Convert a JSON report to CSV or Prometheus text.
    Export(export::ExportArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error, including unknown models.
    Error = 1,
    /// A budget policy blocked.
    BudgetBlocked = 5,
}

impl Cli {
    /// Config path from `--config`, or the default location.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(GuardConfig::default_path)
    }

    /// Loads the configuration.
    ///
    /// An explicit `--config` path must exist; the default path may be
    /// missing.
    pub async fn load_config(&self) -> Result<GuardConfig> {
        if let Some(path) = &self.config {
            ensure_exists(path)?;
        }
        Ok(GuardConfig::load_from(&self.config_path()).await?)
    }
}

/// Report file given on the command line, or the default report path.
fn report_path(file: Option<&Path>) -> PathBuf {
    file.map_or_else(default_report_path, Path::to_path_buf)
}

fn ensure_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    Ok(())
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("costguard=debug,info")
    } else {
        EnvFilter::new("costguard=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Models(args) => models::run(args, &cli).await,
        Commands::Estimate(args) => estimate::run(args, &cli).await,
        Commands::Report(args) => report::run(args, &cli).await,
        Commands::Check(args) => check::run(args, &cli).await,
        Commands::Export(args) => export::run(args, &cli).await,
    };

    let code = match result {
        Ok(code) => code,
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {e}");
            }
            ExitCode::Error
        }
    };

    if code != ExitCode::Success {
        std::process::exit(code as i32);
    }
}
