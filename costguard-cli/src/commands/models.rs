//! Models command - list priced models.

use anyhow::Result;
use costguard_core::Provider;
use tracing::info;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the models command.
#[derive(clap::Args, Debug, Default)]
pub struct ModelsArgs {
    /// Only list models from this provider (openai, anthropic, google).
    #[arg(long, short)]
    pub provider: Option<Provider>,
}

/// Runs the models command.
pub async fn run(args: &ModelsArgs, cli: &Cli) -> Result<ExitCode> {
    info!(provider = ?args.provider, "Listing models");

    let pricing = cli.load_config().await?.build_pricing();
    let models = pricing.list(args.provider);

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);

            println!("{}", formatter.format_models_header());
            for model in &models {
                println!("{}", formatter.format_model_line(model));
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_models(&models)?);
        }
    }

    Ok(ExitCode::Success)
}
