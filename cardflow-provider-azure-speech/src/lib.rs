#![deny(missing_docs)]
//! `SpeechBackend` over the Azure Cognitive Speech REST text-to-speech
//! endpoint (spec.md §6, §4.6 `toSpeech`).
//!
//! Grounded on `lingominer/services/azure_speech.py`'s use of the Azure
//! Speech SDK; this client talks to the equivalent plain REST endpoint
//! directly (`POST /cognitiveservices/v1`) rather than vendoring the SDK,
//! matching the rest of the workspace's "thin `reqwest` client per
//! backend" shape.

use async_trait::async_trait;
use cardflow_core::{BackendError, SpeechBackend};

const OUTPUT_FORMAT: &str = "audio-16khz-32kbitrate-mono-mp3";

/// Client for the Azure Cognitive Speech REST synthesis endpoint.
///
/// # Example
///
/// ```no_run
/// use cardflow_provider_azure_speech::AzureSpeech;
///
/// let client = AzureSpeech::new("subscription-key", "eastus");
/// ```
pub struct AzureSpeech {
    subscription_key: String,
    region: String,
    client: reqwest::Client,
}

impl AzureSpeech {
    /// Create a client for the given subscription key and region
    /// (e.g. `"eastus"`).
    #[must_use]
    pub fn new(subscription_key: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            subscription_key: subscription_key.into(),
            region: region.into(),
            client: reqwest::Client::new(),
        }
    }

    fn synthesis_url(&self) -> String {
        format!(
            "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
            self.region
        )
    }
}

fn escape_ssml_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn ssml(text: &str, voice: &str) -> String {
    format!(
        "<speak version='1.0' xml:lang='en-US'>\
         <voice name='{voice}'>{}</voice></speak>",
        escape_ssml_text(text)
    )
}

#[async_trait]
impl SpeechBackend for AzureSpeech {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, BackendError> {
        let url = self.synthesis_url();
        tracing::debug!(url = %url, voice = %voice, "sending speech synthesis request");

        let response = self
            .client
            .post(&url)
            .header("Ocp-Apim-Subscription-Key", &self.subscription_key)
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", OUTPUT_FORMAT)
            .body(ssml(text, voice))
            .send()
            .await
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::RequestFailed(format!("HTTP {status}: {body}")));
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}
