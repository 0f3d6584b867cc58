//! Estimate command - price a hypothetical call.

use anyhow::Result;
use tracing::info;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the estimate command.
#[derive(clap::Args, Debug)]
pub struct EstimateArgs {
    /// Model identifier (dated ids resolve by prefix).
    pub model: String,

    /// Number of input tokens.
    #[arg(long = "input-tokens", short = 'i')]
    pub input_tokens: u64,

    /// Number of output tokens.
    #[arg(long = "output-tokens", short = 'o')]
    pub output_tokens: u64,
}

/// Runs the estimate command.
pub async fn run(args: &EstimateArgs, cli: &Cli) -> Result<ExitCode> {
    info!(model = %args.model, "Estimating cost");

    let table = cli.load_config().await?.build_pricing();
    let pricing = table.resolve(&args.model)?;
    let cost = pricing.calculate_cost(args.input_tokens, args.output_tokens);

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!(
                "{}",
                formatter.format_estimate(
                    &args.model,
                    pricing,
                    args.input_tokens,
                    args.output_tokens,
                    cost
                )
            );
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!(
                "{}",
                formatter.format_estimate(
                    &args.model,
                    pricing,
                    args.input_tokens,
                    args.output_tokens,
                    cost
                )?
            );
        }
    }

    Ok(ExitCode::Success)
}
