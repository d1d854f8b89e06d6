use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Could not read credential from {path}: {reason}")]
    Credential { path: PathBuf, reason: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Request failed: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_keeps_message() {
        let err = FetchError::Transport {
            message: "connection refused".into(),
            source: None,
        };
        assert_eq!(err.to_string(), "Request failed: connection refused");
    }

    #[test]
    fn credential_error_names_the_file() {
        let err = FetchError::Credential {
            path: PathBuf::from("/root/.huggingface-token"),
            reason: "No such file or directory".into(),
        };
        assert!(err.to_string().contains("/root/.huggingface-token"));
    }
}
