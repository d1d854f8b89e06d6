use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Request body for the text-to-image endpoint
#[derive(Debug, Serialize)]
pub struct InferenceRequest<'a> {
    pub inputs: &'a str,
}

/// Error body returned while the model is cold, e.g.
/// `{"error": "Model ... is currently loading", "estimated_time": 20.0}`
#[derive(Debug, Deserialize)]
pub struct LoadingErrorBody {
    pub error: String,
    pub estimated_time: Option<f64>,
}

/// Classified reply of one attempt
#[derive(Debug)]
pub enum ApiReply {
    /// 200 with the raw image payload
    Image(Bytes),
    /// 503: model is still warming up
    ModelLoading {
        body: String,
        /// Server hint in seconds
        estimated_time: Option<f64>,
    },
    /// Any other status
    Rejected { status: u16, body: String },
}

impl ApiReply {
    pub fn model_loading(body: String) -> Self {
        let parsed = serde_json::from_str::<LoadingErrorBody>(&body).ok();
        if let Some(parsed) = &parsed {
            tracing::debug!("Model loading: {}", parsed.error);
        }
        let estimated_time = parsed.and_then(|b| b.estimated_time);
        ApiReply::ModelLoading {
            body,
            estimated_time,
        }
    }
}
