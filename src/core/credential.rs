use std::fmt;
use std::path::Path;

use super::FetchError;

/// Bearer token for the inference endpoint, read once at startup
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Read the token from `path`, stripping surrounding whitespace
    pub fn load(path: &Path) -> Result<Self, FetchError> {
        let raw = std::fs::read_to_string(path).map_err(|e| FetchError::Credential {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let token = raw.trim();
        if token.is_empty() {
            return Err(FetchError::Credential {
                path: path.to_path_buf(),
                reason: "file is empty".to_string(),
            });
        }

        tracing::debug!("Loaded credential from {}", path.display());
        Ok(Self::new(token))
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(****)")
    }
}
