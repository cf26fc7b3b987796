//! `completion` action handler (spec.md §4.6), grounded on
//! `lingominer/flow/algo.py`'s `completion` function: render the prompt
//! with the schema envelope, send it to the completion backend in
//! JSON-object mode, and pick each declared output out of the parsed
//! response object.

use async_trait::async_trait;
use cardflow_core::{CompletionBackend, FieldKind, FieldValue, FlowError};
use std::collections::HashMap;
use std::sync::Arc;

use crate::handler::{ActionHandler, ActionRequest};
use crate::render::{render_completion_prompt, OutputSpec};

/// Dispatches a rendered prompt to an injected [`CompletionBackend`] and
/// maps the JSON response back onto the generation's declared text outputs.
pub struct CompletionHandler {
    backend: Arc<dyn CompletionBackend>,
}

impl CompletionHandler {
    /// Wrap a completion backend.
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl ActionHandler for CompletionHandler {
    fn requires_prompt(&self) -> bool {
        true
    }

    fn validate_outputs(&self, outputs: &[FieldKind]) -> Result<(), String> {
        if outputs.iter().all(|k| *k == FieldKind::Text) {
            Ok(())
        } else {
            Err("completion only produces text outputs".to_string())
        }
    }

    async fn execute(&self, request: ActionRequest<'_>) -> Result<HashMap<String, FieldValue>, FlowError> {
        let prompt = request
            .prompt
            .ok_or_else(|| FlowError::Render("completion requires a prompt".to_string()))?;
        let specs: Vec<OutputSpec> = request
            .outputs
            .iter()
            .map(|o| OutputSpec {
                name: o.name.clone(),
                kind: o.kind,
                description: o.description.clone(),
            })
            .collect();
        let rendered = render_completion_prompt(prompt, &request.inputs, &specs)?;

        let raw = self.backend.complete(&rendered).await?;
        tracing::debug!(response = %raw, "completion result");
        let parsed: serde_json::Value = serde_json::from_str(&raw)
            .map_err(|e| FlowError::Parse(format!("completion response was not valid JSON: {e}")))?;

        let mut values = HashMap::with_capacity(request.outputs.len());
        for output in request.outputs {
            let text = parsed
                .get(&output.name)
                .and_then(|v| v.as_str())
                .ok_or_else(|| {
                    FlowError::Parse(format!(
                        "completion response is missing declared output `{}`",
                        output.name
                    ))
                })?;
            values.insert(output.name.clone(), FieldValue::text(text));
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardflow_core::BackendError;

    struct StubBackend(String);

    #[async_trait]
    impl CompletionBackend for StubBackend {
        async fn complete(&self, _prompt: &str) -> Result<String, BackendError> {
            Ok(self.0.clone())
        }
    }

    fn outputs() -> Vec<OutputSpec> {
        vec![OutputSpec {
            name: "word".to_string(),
            kind: FieldKind::Text,
            description: "the target word".to_string(),
        }]
    }

    #[tokio::test]
    async fn maps_parsed_json_onto_declared_outputs() {
        let handler = CompletionHandler::new(Arc::new(StubBackend(
            r#"{"word": "Titan"}"#.to_string(),
        )));
        let specs = outputs();
        let result = handler
            .execute(ActionRequest {
                prompt: Some("Find the word in {{paragraph}}"),
                inputs: HashMap::from([(
                    "paragraph".to_string(),
                    FieldValue::text("The Titan moon..."),
                )]),
                outputs: &specs,
            })
            .await
            .unwrap();
        assert_eq!(result.get("word"), Some(&FieldValue::text("Titan")));
    }

    #[tokio::test]
    async fn missing_output_key_is_parse_error() {
        let handler = CompletionHandler::new(Arc::new(StubBackend("{}".to_string())));
        let specs = outputs();
        let err = handler
            .execute(ActionRequest {
                prompt: Some("Find the word"),
                inputs: HashMap::new(),
                outputs: &specs,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::Parse(_)));
    }

    #[tokio::test]
    async fn non_json_response_is_parse_error() {
        let handler = CompletionHandler::new(Arc::new(StubBackend("not json".to_string())));
        let specs = outputs();
        let err = handler
            .execute(ActionRequest {
                prompt: Some("Find the word"),
                inputs: HashMap::new(),
                outputs: &specs,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::Parse(_)));
    }
}
