mod types;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

pub use types::*;

use crate::config::Config;
use crate::core::{Credential, FetchError};

/// A remote service turning a prompt into image bytes.
///
/// One call is one network attempt. Transport failures come back as
/// `Err`, every HTTP reply is classified into an [`ApiReply`].
#[async_trait]
pub trait InferenceApi: Send + Sync {
    async fn text_to_image(&self, prompt: &str) -> Result<ApiReply, FetchError>;
}

/// Hugging Face inference endpoint client
pub struct HuggingFaceClient {
    http: Client,
    endpoint: String,
    credential: Credential,
}

impl HuggingFaceClient {
    pub fn new(http: Client, endpoint: impl Into<String>, credential: Credential) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            credential,
        }
    }

    /// Create a client from config
    pub fn from_config(config: &Config, credential: Credential) -> Result<Self, FetchError> {
        let http = crate::http_client::build(config.retry_policy().timeout)?;
        Ok(Self::new(http, config.api.endpoint.clone(), credential))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl InferenceApi for HuggingFaceClient {
    async fn text_to_image(&self, prompt: &str) -> Result<ApiReply, FetchError> {
        tracing::debug!("Sending inference request to: {}", self.endpoint);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.credential.token())
            .json(&InferenceRequest { inputs: prompt })
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);

        match status {
            StatusCode::OK => {
                let payload = response.bytes().await?;
                tracing::debug!("Received {} bytes", payload.len());
                Ok(ApiReply::Image(payload))
            }
            StatusCode::SERVICE_UNAVAILABLE => {
                let body = response.text().await?;
                tracing::debug!("Response body: {}", body);
                Ok(ApiReply::model_loading(body))
            }
            _ => {
                let body = response.text().await?;
                tracing::debug!("Response body: {}", body);
                Ok(ApiReply::Rejected {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}
