//! OpenAI-compatible chat-completions client, in JSON-object response mode.

use async_trait::async_trait;
use cardflow_core::{BackendError, CompletionBackend};
use serde::Serialize;

use crate::error::{map_http_status, map_reqwest_error};

/// Default OpenAI-compatible API base URL.
const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default completion model.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat<'a>,
}

/// Client for an OpenAI-compatible `/v1/chat/completions` endpoint,
/// configured for JSON-object mode (spec.md §4.6 `completion`).
///
/// # Example
///
/// ```no_run
/// use cardflow_provider_openai::OpenAiCompletion;
///
/// let client = OpenAiCompletion::new("sk-...")
///     .model("gpt-4o-mini")
///     .base_url("https://api.openai.com");
/// ```
pub struct OpenAiCompletion {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiCompletion {
    /// Create a new client with the given API key and sensible defaults.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
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

    /// Override the API base URL (testing, proxies, self-hosted gateways).
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionBackend for OpenAiCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, BackendError> {
        let url = self.completions_url();
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "system",
                content: prompt,
            }],
            response_format: ResponseFormat { kind: "json_object" },
        };

        tracing::debug!(url = %url, model = %self.model, "sending completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let text = response.text().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            return Err(map_http_status(status, &text));
        }

        let envelope: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| BackendError::InvalidResponse(format!("invalid JSON envelope: {e}")))?;
        envelope
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                BackendError::InvalidResponse(
                    "response had no choices[0].message.content".to_string(),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_is_set() {
        let client = OpenAiCompletion::new("test-key");
        assert_eq!(client.model, DEFAULT_MODEL);
    }

    #[test]
    fn builder_overrides_model() {
        let client = OpenAiCompletion::new("test-key").model("gpt-4o");
        assert_eq!(client.model, "gpt-4o");
    }

    #[test]
    fn builder_overrides_base_url() {
        let client = OpenAiCompletion::new("test-key").base_url("http://localhost:9999");
        assert_eq!(client.base_url, "http://localhost:9999");
    }

    #[test]
    fn completions_url_includes_path() {
        let client = OpenAiCompletion::new("test-key").base_url("http://localhost:9999");
        assert_eq!(
            client.completions_url(),
            "http://localhost:9999/v1/chat/completions"
        );
    }
}
