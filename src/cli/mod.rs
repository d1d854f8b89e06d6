pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "fluxgen",
    version,
    about = "Generate website illustrations with a hosted text-to-image model",
    long_about = r#"Generate website illustrations with a hosted text-to-image model

Sends each prompt of the configured batch to the inference endpoint, one at a
time, and writes the returned image bytes to its output path.
Run without arguments to process the batch.

Relative output paths, including the built-in public/images/... batch, are
written under batch.base_dir or --base-dir. When neither is set they land
in the current directory, and missing parent directories are not created.

SETUP:
  Put your Hugging Face token in ~/.huggingface-token, or point to it:
    fluxgen config set api.token_file /path/to/token

EXAMPLES:
  Run the configured batch into a project directory:
    fluxgen --base-dir ~/projects/site
    fluxgen batch --format json

  Generate a single image:
    fluxgen generate "isometric city at night" -o public/images/city.jpg
    fluxgen g "watercolor fox" -o fox.jpg --retries 5

  Manage configuration:
    fluxgen config show
    fluxgen config set retry.attempts 5

OUTPUT FORMATS:
  --format text   Human-readable progress (default)
  --format json   JSON array of per-request results
  --format quiet  Only the paths that were written"#
)]
pub struct Cli {
    /// Use this config file instead of the default location
    #[arg(long = "config", global = true, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate every image of the configured batch (default)
    #[command(alias = "b")]
    Batch(commands::batch::BatchArgs),

    /// Generate a single image from a prompt
    #[command(
        alias = "g",
        after_help = r#"EXAMPLES:
  fluxgen generate "a red apple on a wooden table" -o apple.jpg
  fluxgen generate "panoramic mountain landscape" -o hero.jpg --retries 5"#
    )]
    Generate(commands::generate::GenerateArgs),

    /// View or modify configuration
    #[command(
        alias = "c",
        after_help = r#"AVAILABLE SETTINGS:
  api.endpoint               - Inference endpoint URL
  api.token_file             - File holding the bearer token
  retry.attempts             - Network attempts per image
  retry.loading_delay_secs   - Wait after a "model loading" reply
  retry.transport_delay_secs - Wait after a network error
  retry.timeout_secs         - Timeout of a single attempt
  batch.base_dir             - Directory relative outputs are written under
                               (unset: the current directory)
  batch.pacing_secs          - Pause after each generated image"#
    )]
    Config(commands::config::ConfigArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::OutputFormat;
    use clap::CommandFactory;

    #[test]
    fn no_subcommand_means_batch() {
        let cli = Cli::try_parse_from(["fluxgen"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn generate_args_parse() {
        let cli = Cli::try_parse_from([
            "fluxgen", "g", "a fox", "-o", "fox.jpg", "--retries", "5", "--format", "json",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Generate(args)) => {
                assert_eq!(args.prompt, "a fox");
                assert_eq!(args.output, PathBuf::from("fox.jpg"));
                assert_eq!(args.retries, Some(5));
                assert_eq!(args.run.format, OutputFormat::Json);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn generate_requires_output() {
        assert!(Cli::try_parse_from(["fluxgen", "generate", "a fox"]).is_err());
    }

    #[test]
    fn help_explains_where_outputs_land() {
        let mut cmd = Cli::command();
        assert!(cmd.render_long_help().to_string().contains("current directory"));

        let batch = cmd.find_subcommand_mut("batch").unwrap();
        let help = batch.render_long_help().to_string();
        assert!(help.contains("--base-dir"));
        assert!(help.contains("current directory"));
    }

    #[test]
    fn global_config_flag() {
        let cli = Cli::try_parse_from([
            "fluxgen",
            "batch",
            "--config",
            "/tmp/c.toml",
            "--format",
            "quiet",
        ])
        .unwrap();
        assert_eq!(cli.config_file, Some(PathBuf::from("/tmp/c.toml")));
        match cli.command {
            Some(Commands::Batch(args)) => assert_eq!(args.run.format, OutputFormat::Quiet),
            _ => panic!("expected batch"),
        }
    }
}
