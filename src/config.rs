use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::{ImageRequest, RetryPolicy, DEFAULT_BATCH};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub batch: BatchConfig,

    #[serde(skip)]
    pub config_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Token file, defaults to `~/.huggingface-token`
    #[serde(default)]
    pub token_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    #[serde(default = "default_loading_delay")]
    pub loading_delay_secs: u64,
    #[serde(default = "default_transport_delay")]
    pub transport_delay_secs: u64,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Relative outputs are resolved against this directory
    #[serde(default)]
    pub base_dir: Option<String>,
    #[serde(default = "default_pacing")]
    pub pacing_secs: u64,
    #[serde(default = "default_requests")]
    pub requests: Vec<ImageRequest>,
}

// Default value functions
fn default_endpoint() -> String {
    "https://router.huggingface.co/models/black-forest-labs/FLUX.1-schnell".to_string()
}

fn default_attempts() -> u32 {
    3
}

fn default_loading_delay() -> u64 {
    20
}

fn default_transport_delay() -> u64 {
    10
}

fn default_timeout() -> u64 {
    60
}

fn default_pacing() -> u64 {
    5
}

fn default_requests() -> Vec<ImageRequest> {
    DEFAULT_BATCH.clone()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            token_file: None,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            loading_delay_secs: default_loading_delay(),
            transport_delay_secs: default_transport_delay(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            pacing_secs: default_pacing(),
            requests: default_requests(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            retry: RetryConfig::default(),
            batch: BatchConfig::default(),
            config_path: PathBuf::new(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "fluxgen", "fluxgen")
            .context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().to_path_buf())
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from `path` (or the default location), writing defaults if absent
    pub fn load_or_create(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path,
            None => Self::config_path()?,
        };

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let mut config = Config::default();
            config.config_path = config_path;
            config.save()?;
            Ok(config)
        }
    }

    /// Load config from an existing file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.config_path = path.to_path_buf();
        config.validate()?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.retry.attempts == 0 {
            anyhow::bail!("retry.attempts must be at least 1");
        }
        if let Some(req) = self.batch.requests.iter().find(|r| r.prompt.trim().is_empty()) {
            anyhow::bail!("Batch request for {} has an empty prompt", req.output.display());
        }
        Ok(())
    }

    /// Timings and attempt budget as a policy
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.retry.attempts,
            loading_delay: Duration::from_secs(self.retry.loading_delay_secs),
            transport_delay: Duration::from_secs(self.retry.transport_delay_secs),
            timeout: Duration::from_secs(self.retry.timeout_secs),
            pacing: Duration::from_secs(self.batch.pacing_secs),
        }
    }

    /// Path of the credential file
    pub fn token_path(&self) -> Result<PathBuf> {
        match &self.api.token_file {
            Some(path) => Ok(PathBuf::from(path)),
            None => {
                let dirs = BaseDirs::new().context("Failed to determine home directory")?;
                Ok(dirs.home_dir().join(".huggingface-token"))
            }
        }
    }

    /// Directory relative outputs are written under
    pub fn base_dir(&self) -> PathBuf {
        PathBuf::from(self.batch.base_dir.as_deref().unwrap_or("."))
    }

    /// Set a config value by key path (e.g., "retry.attempts", "api.endpoint")
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.endpoint" => self.api.endpoint = value.to_string(),
            "api.token_file" => self.api.token_file = Some(value.to_string()),
            "retry.attempts" => {
                let attempts: u32 = value.parse().context("Invalid number")?;
                if attempts == 0 {
                    anyhow::bail!("retry.attempts must be at least 1");
                }
                self.retry.attempts = attempts;
            }
            "retry.loading_delay_secs" => {
                self.retry.loading_delay_secs = value.parse().context("Invalid number")?;
            }
            "retry.transport_delay_secs" => {
                self.retry.transport_delay_secs = value.parse().context("Invalid number")?;
            }
            "retry.timeout_secs" => {
                self.retry.timeout_secs = value.parse().context("Invalid number")?;
            }
            "batch.base_dir" => self.batch.base_dir = Some(value.to_string()),
            "batch.pacing_secs" => {
                self.batch.pacing_secs = value.parse().context("Invalid number")?;
            }
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// Get a config value by key path
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "api.endpoint" => Some(self.api.endpoint.clone()),
            "api.token_file" => self
                .token_path()
                .ok()
                .map(|p| p.to_string_lossy().to_string()),
            "retry.attempts" => Some(self.retry.attempts.to_string()),
            "retry.loading_delay_secs" => Some(self.retry.loading_delay_secs.to_string()),
            "retry.transport_delay_secs" => Some(self.retry.transport_delay_secs.to_string()),
            "retry.timeout_secs" => Some(self.retry.timeout_secs.to_string()),
            "batch.base_dir" => Some(self.base_dir().to_string_lossy().to_string()),
            "batch.pacing_secs" => Some(self.batch.pacing_secs.to_string()),
            _ => None,
        }
    }

    /// Get all config keys
    pub fn keys() -> &'static [&'static str] {
        &[
            "api.endpoint",
            "api.token_file",
            "retry.attempts",
            "retry.loading_delay_secs",
            "retry.transport_delay_secs",
            "retry.timeout_secs",
            "batch.base_dir",
            "batch.pacing_secs",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_fetch_timings() {
        let policy = Config::default().retry_policy();
        assert_eq!(policy, RetryPolicy::default());
        assert_eq!(Config::default().batch.requests.len(), 4);
    }

    #[test]
    fn load_or_create_writes_defaults_then_reads_them_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let created = Config::load_or_create(Some(path.clone())).unwrap();
        assert!(path.exists());

        let loaded = Config::load_or_create(Some(path.clone())).unwrap();
        assert_eq!(loaded.config_path, path);
        assert_eq!(loaded.api.endpoint, created.api.endpoint);
        assert_eq!(loaded.batch.requests, created.batch.requests);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[retry]
attempts = 5

[[batch.requests]]
prompt = "a red kite"
output = "kite.jpg"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.retry.attempts, 5);
        assert_eq!(config.retry.loading_delay_secs, 20);
        assert_eq!(config.batch.pacing_secs, 5);
        assert_eq!(config.batch.requests, vec![ImageRequest::new("a red kite", "kite.jpg")]);
    }

    #[test]
    fn zero_attempts_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[retry]\nattempts = 0\n").unwrap();
        assert!(Config::load_from(&path).is_err());

        let mut config = Config::default();
        assert!(config.set("retry.attempts", "0").is_err());
        assert!(config.set("retry.attempts", "many").is_err());
        config.set("retry.attempts", "4").unwrap();
        assert_eq!(config.get("retry.attempts").as_deref(), Some("4"));
    }

    #[test]
    fn empty_batch_prompt_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[[batch.requests]]\nprompt = \"  \"\noutput = \"x.jpg\"\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn explicit_token_file_and_base_dir() {
        let mut config = Config::default();
        assert_eq!(config.base_dir(), PathBuf::from("."));

        config.set("api.token_file", "/etc/hf-token").unwrap();
        config.set("batch.base_dir", "/srv/site").unwrap();
        assert_eq!(config.token_path().unwrap(), PathBuf::from("/etc/hf-token"));
        assert_eq!(config.base_dir(), PathBuf::from("/srv/site"));
        assert!(config.set("api.key", "x").is_err());
        assert_eq!(config.get("api.key"), None);
    }
}
