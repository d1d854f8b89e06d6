use async_trait::async_trait;
use bytes::Bytes;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;

use crate::api::{ApiReply, InferenceApi};
use crate::core::{FetchError, GenerationResult, ImageRequest, RetryPolicy};
use crate::report::{FetchEvent, Reporter};

/// Blocking pause between attempts and requests
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Requests images one at a time and writes them to disk
pub struct ImageFetcher<A, S, R> {
    api: A,
    sleeper: S,
    reporter: R,
    policy: RetryPolicy,
}

impl<A, S, R> ImageFetcher<A, S, R>
where
    A: InferenceApi,
    S: Sleeper,
    R: Reporter,
{
    pub fn new(api: A, sleeper: S, reporter: R, policy: RetryPolicy) -> Self {
        Self {
            api,
            sleeper,
            reporter,
            policy,
        }
    }

    /// Generate one image, making at most `retries` network attempts.
    ///
    /// The output file is only touched once a 200 reply arrives. A 503 waits
    /// `loading_delay` and tries again, transport or write errors wait the
    /// shorter `transport_delay`, any other status gives up at once.
    pub async fn generate(&self, prompt: &str, output: &Path, retries: u32) -> GenerationResult {
        let attempts = retries.max(1);

        self.reporter.report(FetchEvent::Started {
            output: output.to_path_buf(),
            prompt: prompt.to_string(),
        });

        if prompt.trim().is_empty() {
            let err = FetchError::InvalidRequest("prompt is empty".to_string());
            tracing::warn!("Skipping {}: {}", output.display(), err);
            return GenerationResult::abandoned(output.to_path_buf(), 0, err.to_string());
        }

        let mut last_error = String::new();

        for attempt in 1..=attempts {
            let remaining = attempt < attempts;
            self.reporter
                .report(FetchEvent::AttemptStarted { attempt, attempts });

            match self.api.text_to_image(prompt).await {
                Ok(ApiReply::Image(payload)) => match write_atomic(output, payload.clone()).await {
                    Ok(()) => {
                        tracing::info!("Saved image to: {}", output.display());
                        self.reporter.report(FetchEvent::Saved {
                            output: output.to_path_buf(),
                            bytes: payload.len(),
                        });
                        return GenerationResult::written(
                            output.to_path_buf(),
                            attempt,
                            payload.len(),
                        );
                    }
                    Err(err) => {
                        tracing::warn!("Failed to write {}: {}", output.display(), err);
                        last_error = format!("failed to write {}: {}", output.display(), err);
                        self.reporter.report(FetchEvent::AttemptFailed {
                            attempt,
                            attempts,
                            error: last_error.clone(),
                        });
                        if remaining {
                            self.sleeper.sleep(self.policy.transport_delay).await;
                        }
                    }
                },
                Ok(ApiReply::ModelLoading {
                    body,
                    estimated_time,
                }) => {
                    tracing::debug!("503 body: {}", body);
                    last_error = format!("model still loading after {} attempts", attempts);
                    self.reporter.report(FetchEvent::ModelLoading {
                        attempt,
                        attempts,
                        estimated_time,
                    });
                    if remaining {
                        self.sleeper.sleep(self.policy.loading_delay).await;
                    }
                }
                Ok(ApiReply::Rejected { status, body }) => {
                    tracing::warn!("Request for {} rejected with {}", output.display(), status);
                    self.reporter.report(FetchEvent::Rejected {
                        status,
                        body: body.clone(),
                    });
                    return GenerationResult::abandoned(
                        output.to_path_buf(),
                        attempt,
                        format!("HTTP {}: {}", status, body),
                    );
                }
                Err(err) => {
                    tracing::warn!("Attempt {}/{} failed: {}", attempt, attempts, err);
                    last_error = err.to_string();
                    self.reporter.report(FetchEvent::AttemptFailed {
                        attempt,
                        attempts,
                        error: last_error.clone(),
                    });
                    if remaining {
                        self.sleeper.sleep(self.policy.transport_delay).await;
                    }
                }
            }
        }

        GenerationResult::abandoned(output.to_path_buf(), attempts, last_error)
    }

    /// Run every request in order. Failures never stop the batch.
    pub async fn run_batch(&self, requests: &[ImageRequest]) -> Vec<GenerationResult> {
        let mut results = Vec::with_capacity(requests.len());

        for request in requests {
            let result = self
                .generate(&request.prompt, &request.output, self.policy.attempts)
                .await;

            if result.is_success() {
                self.sleeper.sleep(self.policy.pacing).await;
            } else {
                self.reporter.report(FetchEvent::Failed {
                    output: request.output.clone(),
                });
            }
            results.push(result);
        }

        self.reporter.report(FetchEvent::Completed);
        results
    }
}

/// Write `payload` to a temp file next to `output`, then rename it into place.
/// A failed write leaves any existing file at `output` untouched.
async fn write_atomic(output: &Path, payload: Bytes) -> Result<(), FetchError> {
    let output = output.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&payload)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&output).map_err(|e| e.error)?;
        Ok::<(), FetchError>(())
    })
    .await
    .map_err(|e| FetchError::Io(std::io::Error::other(e)))?
}
