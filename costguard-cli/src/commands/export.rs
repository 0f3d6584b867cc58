//! Export command - convert a JSON report to another format.

use std::path::PathBuf;

use anyhow::Result;
use clap::ValueEnum;
use costguard_core::CostTracker;
use costguard_store::{load_report, save_text, to_csv, to_json, to_prometheus};
use tracing::info;

use crate::{ensure_exists, report_path, Cli, ExitCode};

/// Export targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum ExportFormat {
    /// One row per record.
    #[default]
    Csv,
    /// Prometheus text exposition.
    Prometheus,
    /// Re-rendered JSON report.
    Json,
}

/// Arguments for the export command.
#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// JSON report to convert.
    ///
    /// Defaults to `report.json` in the costguard data directory.
    pub file: Option<PathBuf>,

    /// Target format.
    #[arg(long, value_enum, default_value = "csv")]
    pub to: ExportFormat,

    /// Metric name prefix for Prometheus output.
    #[arg(long)]
    pub prefix: Option<String>,

    /// Write to this file instead of stdout.
    #[arg(long, short = 'O', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Runs the export command.
pub async fn run(args: &ExportArgs, cli: &Cli) -> Result<ExitCode> {
    let file = report_path(args.file.as_deref());
    info!(file = %file.display(), to = ?args.to, "Exporting report");

    ensure_exists(&file)?;
    let report = load_report(&file).await?;

    let tracker = CostTracker::new();
    report.replay(&tracker)?;

    let rendered = match args.to {
        ExportFormat::Csv => to_csv(&tracker)?,
        ExportFormat::Prometheus => to_prometheus(&tracker, args.prefix.as_deref()),
        ExportFormat::Json => to_json(&tracker, cli.pretty)?,
    };

    match &args.output {
        Some(path) => {
            save_text(path, &rendered).await?;
            if !cli.quiet {
                eprintln!("Wrote {}", path.display());
            }
        }
        None if rendered.ends_with('\n') => print!("{rendered}"),
        None => println!("{rendered}"),
    }

    Ok(ExitCode::Success)
}
