pub mod batch;
pub mod config;
pub mod generate;

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::api::HuggingFaceClient;
use crate::config::Config;
use crate::core::{Credential, GenerationResult};
use crate::report::OutputFormat;

/// Options shared by the commands that hit the network
#[derive(Args, Default)]
pub struct RunOptions {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Resolve relative output paths against this directory
    /// [default: batch.base_dir, or the current directory when unset]
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Read the bearer token from this file
    #[arg(long)]
    pub token_file: Option<PathBuf>,
}

/// Load the credential and build the API client. Nothing touches the
/// network if the token cannot be read.
pub fn connect(opts: &RunOptions, config: &Config) -> Result<HuggingFaceClient> {
    let token_path = match &opts.token_file {
        Some(path) => path.clone(),
        None => config.token_path()?,
    };
    let credential = Credential::load(&token_path)?;
    let client = HuggingFaceClient::from_config(config, credential)?;
    tracing::debug!("Using endpoint {}", client.endpoint());
    Ok(client)
}

/// Directory relative outputs resolve against; it must already exist
pub fn base_dir(opts: &RunOptions, config: &Config) -> Result<PathBuf> {
    let dir = opts.base_dir.clone().unwrap_or_else(|| config.base_dir());
    let meta = std::fs::metadata(&dir)
        .with_context(|| format!("Base directory {} is not accessible", dir.display()))?;
    if !meta.is_dir() {
        anyhow::bail!("Base directory {} is not a directory", dir.display());
    }
    Ok(dir)
}

/// Print end-of-run results for the json and quiet formats
pub fn print_results(format: OutputFormat, results: &[GenerationResult]) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(results)?);
        }
        OutputFormat::Quiet => {
            for result in results.iter().filter(|r| r.is_success()) {
                println!("{}", result.output.display());
            }
        }
        OutputFormat::Text => {
            for result in results.iter().filter(|r| !r.is_success()) {
                tracing::debug!("{}: {}", result.output.display(), result.outcome);
            }
        }
    }
    Ok(())
}
