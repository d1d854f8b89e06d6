use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::{base_dir, connect, print_results, RunOptions};
use crate::config::Config;
use crate::core::{GenerationResult, ImageRequest};
use crate::fetcher::{ImageFetcher, TokioSleeper};
use crate::report::ConsoleReporter;

#[derive(Args)]
pub struct GenerateArgs {
    /// The prompt describing the image to generate
    #[arg(required = true)]
    pub prompt: String,

    /// Where to write the image
    #[arg(short, long)]
    pub output: PathBuf,

    /// Network attempts before giving up (defaults to retry.attempts)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub retries: Option<u32>,

    #[command(flatten)]
    pub run: RunOptions,
}

pub async fn run(args: GenerateArgs, config: &Config) -> Result<GenerationResult> {
    let client = connect(&args.run, config)?;
    let base = base_dir(&args.run, config)?;
    let request = ImageRequest::new(args.prompt, args.output).resolve(&base);

    let policy = match args.retries {
        Some(retries) => config.retry_policy().with_attempts(retries),
        None => config.retry_policy(),
    };

    let fetcher = ImageFetcher::new(
        client,
        TokioSleeper,
        ConsoleReporter::new(args.run.format),
        policy,
    );

    let result = fetcher
        .generate(&request.prompt, &request.output, policy.attempts)
        .await;
    print_results(args.run.format, std::slice::from_ref(&result))?;

    if !result.is_success() {
        anyhow::bail!("Failed to generate {}: {}", result.output.display(), result.outcome);
    }

    Ok(result)
}
