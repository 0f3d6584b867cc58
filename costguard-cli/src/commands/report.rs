//! Report command - summarize an exported JSON report.

use std::path::PathBuf;

use anyhow::Result;
use costguard_store::load_report;
use tracing::info;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{ensure_exists, report_path, Cli, ExitCode, OutputFormat};

/// Arguments for the report command.
#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    /// JSON report written by `save_json_report`.
    ///
    /// Defaults to `report.json` in the costguard data directory.
    pub file: Option<PathBuf>,
}

/// Runs the report command.
pub async fn run(args: &ReportArgs, cli: &Cli) -> Result<ExitCode> {
    let file = report_path(args.file.as_deref());
    info!(file = %file.display(), "Reading report");

    ensure_exists(&file)?;
    let report = load_report(&file).await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_report(&report.summary));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_report(&report.summary)?);
        }
    }

    Ok(ExitCode::Success)
}
