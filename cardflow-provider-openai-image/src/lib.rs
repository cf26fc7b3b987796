#![deny(missing_docs)]
//! `ImageBackend` over the OpenAI images-generation endpoint, requesting
//! a base64-encoded response (spec.md §6, §4.6 `toImage`).
//!
//! Grounded on `lingominer/flow/algo.py`'s `toImage`, which calls
//! `images.generate(model="dall-e-2", size="256x256",
//! response_format="b64_json")` and decodes the result locally instead
//! of following a hosted URL.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use cardflow_core::{BackendError, ImageBackend};
use serde::Serialize;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "dall-e-2";
const DEFAULT_SIZE: &str = "256x256";

#[derive(Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    response_format: &'a str,
}

/// Client for the OpenAI `/v1/images/generations` endpoint in
/// base64-response mode.
///
/// # Example
///
/// ```no_run
/// use cardflow_provider_openai_image::OpenAiImage;
///
/// let client = OpenAiImage::new("sk-...");
/// ```
pub struct OpenAiImage {
    api_key: String,
    model: String,
    size: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiImage {
    /// Create a new client with the given API key and sensible defaults
    /// (`dall-e-2`, `256x256`).
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            size: DEFAULT_SIZE.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Override the default model.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the requested image size (e.g. `"512x512"`).
    #[must_use]
    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    /// Override the API base URL (testing, proxies).
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn generations_url(&self) -> String {
        format!("{}/v1/images/generations", self.base_url)
    }
}

#[async_trait]
impl ImageBackend for OpenAiImage {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, BackendError> {
        let url = self.generations_url();
        let body = ImageRequest {
            model: &self.model,
            prompt,
            size: &self.size,
            response_format: "b64_json",
        };

        tracing::debug!(url = %url, model = %self.model, "sending image generation request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;
        if !status.is_success() {
            return Err(BackendError::RequestFailed(format!("HTTP {status}: {text}")));
        }

        let envelope: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| BackendError::InvalidResponse(format!("invalid JSON envelope: {e}")))?;
        let b64 = envelope
            .get("data")
            .and_then(|d| d.get(0))
            .and_then(|d| d.get("b64_json"))
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                BackendError::InvalidResponse("response had no data[0].b64_json".to_string())
            })?;

        BASE64
            .decode(b64)
            .map_err(|e| BackendError::InvalidResponse(format!("invalid base64 image data: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_and_size_are_set() {
        let client = OpenAiImage::new("test-key");
        assert_eq!(client.model, DEFAULT_MODEL);
        assert_eq!(client.size, DEFAULT_SIZE);
    }

    #[test]
    fn builder_overrides_model_and_size() {
        let client = OpenAiImage::new("test-key").model("gpt-image-1").size("512x512");
        assert_eq!(client.model, "gpt-image-1");
        assert_eq!(client.size, "512x512");
    }

    #[test]
    fn generations_url_includes_path() {
        let client = OpenAiImage::new("test-key").base_url("http://localhost:9999");
        assert_eq!(
            client.generations_url(),
            "http://localhost:9999/v1/images/generations"
        );
    }
}
