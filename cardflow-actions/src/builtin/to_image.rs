//! `toImage` action handler (spec.md §4.6), grounded on
//! `lingominer/flow/algo.py`'s `toImage`: render the prompt as plain
//! text (no schema envelope), generate an image, and upload the
//! resulting bytes under a fresh key.

use async_trait::async_trait;
use cardflow_core::{BlobStore, FieldKind, FieldValue, FlowError, ImageBackend};
use std::collections::HashMap;
use std::sync::Arc;

use crate::handler::{ActionHandler, ActionRequest};
use crate::render::render_plain;

const BUCKET: &str = "cardflow";

/// Generates an image for the rendered prompt and uploads it to the
/// blob store, producing a single image output.
pub struct ToImageHandler {
    image: Arc<dyn ImageBackend>,
    blobs: Arc<dyn BlobStore>,
}

impl ToImageHandler {
    /// Wrap an image backend and blob store.
    pub fn new(image: Arc<dyn ImageBackend>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { image, blobs }
    }
}

#[async_trait]
impl ActionHandler for ToImageHandler {
    fn requires_prompt(&self) -> bool {
        true
    }

    fn validate_outputs(&self, outputs: &[FieldKind]) -> Result<(), String> {
        if outputs == [FieldKind::Image] {
            Ok(())
        } else {
            Err("toImage requires exactly one image output".to_string())
        }
    }

    async fn execute(&self, request: ActionRequest<'_>) -> Result<HashMap<String, FieldValue>, FlowError> {
        let output = request
            .outputs
            .first()
            .filter(|o| o.kind.is_image())
            .ok_or_else(|| FlowError::Render("toImage requires exactly one image output".to_string()))?;
        let prompt = request
            .prompt
            .ok_or_else(|| FlowError::Render("toImage requires a prompt".to_string()))?;
        let rendered = render_plain(prompt, &request.inputs)?;
        tracing::debug!(prompt = %rendered, "generating image");

        let bytes = self.image.generate(&rendered).await?;
        let key = format!("{}.png", uuid::Uuid::new_v4());
        self.blobs.upload(BUCKET, &key, bytes).await?;

        Ok(HashMap::from([(output.name.clone(), FieldValue::image(key))]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::OutputSpec;
    use cardflow_core::BackendError;

    struct StubImage;
    #[async_trait]
    impl ImageBackend for StubImage {
        async fn generate(&self, _prompt: &str) -> Result<Vec<u8>, BackendError> {
            Ok(vec![0xFF, 0xD8])
        }
    }

    struct StubBlobs;
    #[async_trait]
    impl BlobStore for StubBlobs {
        async fn upload(&self, _bucket: &str, _key: &str, _bytes: Vec<u8>) -> Result<(), BackendError> {
            Ok(())
        }
        async fn download(&self, _bucket: &str, _key: &str) -> Result<Vec<u8>, BackendError> {
            Err(BackendError::BlobStore("not stubbed".to_string()))
        }
    }

    #[tokio::test]
    async fn uploads_generated_image_and_returns_key() {
        let handler = ToImageHandler::new(Arc::new(StubImage), Arc::new(StubBlobs));
        let specs = vec![OutputSpec {
            name: "illustration".to_string(),
            kind: FieldKind::Image,
            description: "a picture of the scene".to_string(),
        }];
        let result = handler
            .execute(ActionRequest {
                prompt: Some("A {{animal}} in a meadow"),
                inputs: HashMap::from([("animal".to_string(), FieldValue::text("fox"))]),
                outputs: &specs,
            })
            .await
            .unwrap();
        let value = result.get("illustration").unwrap();
        assert_eq!(value.kind, FieldKind::Image);
        assert!(value.value.ends_with(".png"));
    }

    #[test]
    fn rejects_non_image_output_signature() {
        let handler = ToImageHandler::new(Arc::new(StubImage), Arc::new(StubBlobs));
        assert!(handler.validate_outputs(&[FieldKind::Text]).is_err());
        assert!(handler.validate_outputs(&[FieldKind::Image]).is_ok());
    }
}
