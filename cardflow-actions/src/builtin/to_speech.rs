//! `toSpeech` action handler (spec.md §4.6), grounded on
//! `lingominer/flow/algo.py`'s `toSpeech`: render the prompt as plain
//! narration text (no schema envelope), synthesize it, and upload the
//! resulting bytes under a fresh key.

use async_trait::async_trait;
use cardflow_core::{BlobStore, FieldKind, FieldValue, FlowError, SpeechBackend};
use std::collections::HashMap;
use std::sync::Arc;

use crate::handler::{ActionHandler, ActionRequest};
use crate::render::render_plain;

const BUCKET: &str = "cardflow";
const DEFAULT_VOICE: &str = "en-US-AvaMultilingualNeural";

/// Synthesizes speech for the rendered prompt and uploads it to the
/// blob store, producing a single audio output.
pub struct ToSpeechHandler {
    speech: Arc<dyn SpeechBackend>,
    blobs: Arc<dyn BlobStore>,
    voice: String,
}

impl ToSpeechHandler {
    /// Wrap a speech backend and blob store, using the default voice.
    pub fn new(speech: Arc<dyn SpeechBackend>, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            speech,
            blobs,
            voice: DEFAULT_VOICE.to_string(),
        }
    }

    /// Wrap a speech backend and blob store with an explicit voice.
    pub fn with_voice(speech: Arc<dyn SpeechBackend>, blobs: Arc<dyn BlobStore>, voice: impl Into<String>) -> Self {
        Self {
            speech,
            blobs,
            voice: voice.into(),
        }
    }
}

#[async_trait]
impl ActionHandler for ToSpeechHandler {
    fn requires_prompt(&self) -> bool {
        true
    }

    fn validate_outputs(&self, outputs: &[FieldKind]) -> Result<(), String> {
        if outputs == [FieldKind::Audio] {
            Ok(())
        } else {
            Err("toSpeech requires exactly one audio output".to_string())
        }
    }

    async fn execute(&self, request: ActionRequest<'_>) -> Result<HashMap<String, FieldValue>, FlowError> {
        let output = request
            .outputs
            .first()
            .filter(|o| o.kind.is_audio())
            .ok_or_else(|| FlowError::Render("toSpeech requires exactly one audio output".to_string()))?;
        let prompt = request
            .prompt
            .ok_or_else(|| FlowError::Render("toSpeech requires a prompt".to_string()))?;
        let text = render_plain(prompt, &request.inputs)?;
        tracing::debug!(text = %text, voice = %self.voice, "synthesizing speech");

        let bytes = self.speech.synthesize(&text, &self.voice).await?;
        let key = format!("{}.mp3", uuid::Uuid::new_v4());
        self.blobs.upload(BUCKET, &key, bytes).await?;

        Ok(HashMap::from([(output.name.clone(), FieldValue::audio(key))]))
    }
}
