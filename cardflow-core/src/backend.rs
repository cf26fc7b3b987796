//! The three injectable backend interfaces plus the blob store (spec.md §6).
//!
//! Implementations are process-wide, read-only after startup, and safe
//! for concurrent use — each holds its own connection pool, matching
//! `layer0::Orchestrator`'s contract for backend clients.

use crate::error::BackendError;
use async_trait::async_trait;

/// `Completion.call(prompt_text) -> json_string`.
///
/// The `completion` method (spec.md §4.2) renders a prompt and expects
/// the backend to return a JSON object as a string; parsing happens in
/// the handler, not here, so this trait stays provider-agnostic.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send a rendered prompt to the model in JSON-object response mode.
    async fn complete(&self, prompt: &str) -> Result<String, BackendError>;
}

/// `Speech.synthesize(text, voice) -> audio_bytes`.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Synthesize speech for `text` using `voice`, returning raw audio bytes.
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, BackendError>;
}

/// `Image.generate(prompt) -> image_bytes`.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Generate an image for `prompt`, returning raw image bytes.
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, BackendError>;
}

/// `upload(bucket, key, bytes)` / `download(bucket, key) -> bytes`.
///
/// Keys are opaque strings. Concurrent uploads never target the same key
/// in practice (callers mint fresh UUIDs), so implementations need not
/// serialize writes against each other — only against reads of the same key.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload `bytes` under `key` within `bucket`.
    async fn upload(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<(), BackendError>;

    /// Download the bytes stored under `key` within `bucket`.
    async fn download(&self, bucket: &str, key: &str) -> Result<Vec<u8>, BackendError>;
}
