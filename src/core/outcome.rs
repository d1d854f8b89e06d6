use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Terminal state of a single request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    /// Image bytes were written to the output path
    Written { bytes: usize },
    /// Gave up, the output path was not touched
    Abandoned { reason: String },
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Written { bytes } => write!(f, "written ({} bytes)", bytes),
            Outcome::Abandoned { reason } => write!(f, "abandoned: {}", reason),
        }
    }
}

/// What happened to one request of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub output: PathBuf,
    /// Network attempts made
    pub attempts: u32,
    #[serde(flatten)]
    pub outcome: Outcome,
    pub finished_at: DateTime<Utc>,
}

impl GenerationResult {
    pub fn written(output: PathBuf, attempts: u32, bytes: usize) -> Self {
        Self {
            output,
            attempts,
            outcome: Outcome::Written { bytes },
            finished_at: Utc::now(),
        }
    }

    pub fn abandoned(output: PathBuf, attempts: u32, reason: impl Into<String>) -> Self {
        Self {
            output,
            attempts,
            outcome: Outcome::Abandoned {
                reason: reason.into(),
            },
            finished_at: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Written { .. })
    }
}
