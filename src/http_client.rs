use reqwest::Client;
use std::time::Duration;

use crate::core::FetchError;

/// HTTP client for one run; `timeout` bounds every single attempt
pub fn build(timeout: Duration) -> Result<Client, FetchError> {
    Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(1)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .user_agent(concat!("fluxgen/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| FetchError::Config(format!("Failed to create HTTP client: {}", e)))
}
