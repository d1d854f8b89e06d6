use anyhow::Result;
use clap::Args;

use super::{base_dir, connect, print_results, RunOptions};
use crate::config::Config;
use crate::core::{GenerationResult, ImageRequest};
use crate::fetcher::{ImageFetcher, TokioSleeper};
use crate::report::ConsoleReporter;

#[derive(Args, Default)]
pub struct BatchArgs {
    #[command(flatten)]
    pub run: RunOptions,
}

pub async fn run(args: BatchArgs, config: &Config) -> Result<Vec<GenerationResult>> {
    // Credential first: a missing token must stop the run before any request
    let client = connect(&args.run, config)?;
    let base = base_dir(&args.run, config)?;

    let requests: Vec<ImageRequest> = config
        .batch
        .requests
        .iter()
        .map(|r| r.resolve(&base))
        .collect();

    tracing::info!(
        "Generating {} image(s) under {}",
        requests.len(),
        base.display()
    );

    let fetcher = ImageFetcher::new(
        client,
        TokioSleeper,
        ConsoleReporter::new(args.run.format),
        config.retry_policy(),
    );

    let results = fetcher.run_batch(&requests).await;
    print_results(args.run.format, &results)?;

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::OutputFormat;
    use httpmock::prelude::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn test_config(endpoint: String, dir: &Path) -> Config {
        let mut config = Config::default();
        config.api.endpoint = endpoint;
        config.api.token_file = Some(dir.join("token").to_string_lossy().to_string());
        config.retry.loading_delay_secs = 0;
        config.retry.transport_delay_secs = 0;
        config.retry.timeout_secs = 5;
        config.batch.pacing_secs = 0;
        config.batch.base_dir = Some(dir.to_string_lossy().to_string());
        config.batch.requests = vec![
            ImageRequest::new("a blue whale", "whale.jpg"),
            ImageRequest::new("a broken prompt", "broken.jpg"),
            ImageRequest::new("a green turtle", "turtle.jpg"),
        ];
        config
    }

    fn quiet() -> BatchArgs {
        BatchArgs {
            run: RunOptions {
                format: OutputFormat::Quiet,
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn missing_credential_prevents_any_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).body("image");
            })
            .await;

        let dir = TempDir::new().unwrap();
        let config = test_config(server.url("/models/flux"), dir.path());

        let err = run(quiet(), &config).await.unwrap_err();

        assert!(err.to_string().contains("credential"));
        mock.assert_hits_async(0).await;
        assert!(!dir.path().join("whale.jpg").exists());
    }

    #[tokio::test]
    async fn batch_writes_successes_and_skips_failures() {
        let server = MockServer::start_async().await;
        let whale = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/models/flux")
                    .header("authorization", "Bearer hf_batch")
                    .json_body(serde_json::json!({ "inputs": "a blue whale" }));
                then.status(200).body("whale-bytes");
            })
            .await;
        let broken = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/models/flux")
                    .json_body(serde_json::json!({ "inputs": "a broken prompt" }));
                then.status(400).body(r#"{"error":"bad input"}"#);
            })
            .await;
        let turtle = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/models/flux")
                    .json_body(serde_json::json!({ "inputs": "a green turtle" }));
                then.status(200).body("turtle-bytes");
            })
            .await;

        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("token"), "hf_batch\n").unwrap();
        let config = test_config(server.url("/models/flux"), dir.path());

        let results = run(quiet(), &config).await.unwrap();

        whale.assert_hits_async(1).await;
        broken.assert_hits_async(1).await;
        turtle.assert_hits_async(1).await;

        let success: Vec<_> = results.iter().map(|r| r.is_success()).collect();
        assert_eq!(success, vec![true, false, true]);
        assert_eq!(std::fs::read(dir.path().join("whale.jpg")).unwrap(), b"whale-bytes");
        assert!(!dir.path().join("broken.jpg").exists());
        assert_eq!(std::fs::read(dir.path().join("turtle.jpg")).unwrap(), b"turtle-bytes");
    }

    #[tokio::test]
    async fn missing_base_dir_is_fatal() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("token"), "hf_batch").unwrap();
        let mut config = test_config("http://127.0.0.1:1/models/flux".to_string(), dir.path());
        config.batch.base_dir = Some(dir.path().join("nope").to_string_lossy().to_string());

        assert!(run(quiet(), &config).await.is_err());
    }
}
