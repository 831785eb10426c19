use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trawl::app::AppContext;
use trawl::cli::{commands, Cli, Commands};
use trawl::domain::TerminationReason;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trawl=info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Collect(args) => {
            let ctx = AppContext::new()?;
            let report = commands::collect(&ctx, &args).await?;
            if report.termination == TerminationReason::Cancelled {
                return Ok(ExitCode::from(130));
            }
        }
        Commands::Login { headed } => {
            let ctx = AppContext::new()?;
            commands::login(&ctx, headed).await?;
        }
        Commands::Config => {
            commands::show_config()?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
