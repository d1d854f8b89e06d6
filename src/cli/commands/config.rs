use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::config::Config;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: Option<ConfigCommand>,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show all configuration values and the batch
    Show,

    /// Get a specific configuration value
    Get {
        /// Config key (e.g., retry.attempts, api.endpoint)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Config key (e.g., retry.attempts, api.endpoint)
        key: String,
        /// Value to set
        value: String,
    },

    /// Show the config file path
    Path,

    /// Reset configuration to defaults
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

pub fn run(args: ConfigArgs, config: &mut Config) -> Result<()> {
    match args.command {
        Some(ConfigCommand::Show) | None => show_config(config),
        Some(ConfigCommand::Get { key }) => get_config(&key, config),
        Some(ConfigCommand::Set { key, value }) => set_config(&key, &value, config),
        Some(ConfigCommand::Path) => show_path(config),
        Some(ConfigCommand::Reset { force }) => reset_config(force, config),
    }
}

fn show_config(config: &Config) -> Result<()> {
    println!("{}", "Configuration".cyan().bold());
    println!("{}", "=".repeat(50));
    println!();

    println!("[{}]", "api".yellow());
    println!("  {} = {}", "endpoint".bold(), config.api.endpoint);
    println!(
        "  {} = {}",
        "token_file".bold(),
        config.get("api.token_file").unwrap_or_else(|| "(unknown)".dimmed().to_string())
    );
    println!();

    println!("[{}]", "retry".yellow());
    println!("  {} = {}", "attempts".bold(), config.retry.attempts);
    println!("  {} = {}", "loading_delay_secs".bold(), config.retry.loading_delay_secs);
    println!("  {} = {}", "transport_delay_secs".bold(), config.retry.transport_delay_secs);
    println!("  {} = {}", "timeout_secs".bold(), config.retry.timeout_secs);
    println!();

    println!("[{}]", "batch".yellow());
    match &config.batch.base_dir {
        Some(dir) => println!("  {} = {}", "base_dir".bold(), dir),
        None => println!(
            "  {} = {} {}",
            "base_dir".bold(),
            config.base_dir().display(),
            "(unset, outputs go under the current directory)".dimmed()
        ),
    }
    println!("  {} = {}", "pacing_secs".bold(), config.batch.pacing_secs);
    println!("  {}:", "requests".bold());
    for request in &config.batch.requests {
        println!("    {} {}", "-".dimmed(), request.output.display());
    }
    println!();

    println!("{}", format!("Config file: {}", config.config_path.display()).dimmed());

    Ok(())
}

fn get_config(key: &str, config: &Config) -> Result<()> {
    match config.get(key) {
        Some(value) => println!("{}", value),
        None => {
            eprintln!("{}: Unknown config key '{}'", "Error".red().bold(), key);
            eprintln!();
            eprintln!("Available keys:");
            for k in Config::keys() {
                eprintln!("  {}", k);
            }
        }
    }
    Ok(())
}

fn set_config(key: &str, value: &str, config: &mut Config) -> Result<()> {
    config.set(key, value)?;
    config.save()?;

    println!("{} Set {} = {}", "✓".green(), key.cyan(), value);
    Ok(())
}

fn show_path(config: &Config) -> Result<()> {
    println!("{}", config.config_path.display());
    Ok(())
}

fn reset_config(force: bool, config: &mut Config) -> Result<()> {
    if !force {
        eprintln!(
            "{}: This will reset all configuration, including the batch, to defaults. \
             Use --force to confirm.",
            "Warning".yellow().bold()
        );
        return Ok(());
    }

    let path = config.config_path.clone();
    *config = Config::default();
    config.config_path = path;
    config.save()?;

    println!("{} Configuration reset to defaults", "✓".green());
    Ok(())
}
