use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One prompt and where its image should land
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    /// Text prompt sent to the model
    pub prompt: String,
    /// Destination file, relative paths resolve against the batch base directory
    pub output: PathBuf,
}

impl ImageRequest {
    pub fn new(prompt: impl Into<String>, output: impl Into<PathBuf>) -> Self {
        Self {
            prompt: prompt.into(),
            output: output.into(),
        }
    }

    /// Resolve the output path against `base`; absolute outputs are kept as-is
    pub fn resolve(&self, base: &Path) -> Self {
        Self {
            prompt: self.prompt.clone(),
            output: base.join(&self.output),
        }
    }
}

/// Illustrations for the Mofin landing page
pub static DEFAULT_BATCH: Lazy<Vec<ImageRequest>> = Lazy::new(|| {
    vec![
        ImageRequest::new(
            "Modern minimalist financial dashboard illustration, clean geometric shapes, purple and pink gradient, futuristic AI analytics, floating charts and graphs, professional fintech aesthetic, vector art style, high quality, 16:9 aspect ratio",
            "public/images/hero-dashboard.jpg",
        ),
        ImageRequest::new(
            "Abstract representation of AI financial intelligence, glowing neural network patterns, purple and pink color scheme, data streams, digital finance concept, modern minimalist illustration, professional design, square format",
            "public/images/feature-ai.jpg",
        ),
        ImageRequest::new(
            "Secure bank vault with digital locks and encryption symbols, cybersecurity theme, purple blue gradient, shield icon, modern tech illustration, clean professional design, square format",
            "public/images/feature-security.jpg",
        ),
        ImageRequest::new(
            "Real-time financial synchronization concept, connected devices showing financial data, purple pink gradient, cloud sync visualization, modern fintech illustration, professional clean design, square format",
            "public/images/feature-sync.jpg",
        ),
    ]
});
