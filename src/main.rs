use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod cli;
mod config;
mod core;
mod fetcher;
mod http_client;
mod report;

use cli::{Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    // Load or create config
    let mut config = Config::load_or_create(cli.config_file)?;

    match cli.command {
        Some(Commands::Batch(args)) => {
            cli::commands::batch::run(args, &config).await?;
        }
        Some(Commands::Generate(args)) => {
            cli::commands::generate::run(args, &config).await?;
        }
        Some(Commands::Config(args)) => {
            cli::commands::config::run(args, &mut config)?;
        }
        None => {
            // Run the configured batch
            cli::commands::batch::run(Default::default(), &config).await?;
        }
    }

    Ok(())
}
