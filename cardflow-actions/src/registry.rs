//! Action Registry (spec.md §4.2).
//!
//! Holds the method name → handler map. Grounded on
//! `neuron-hooks::HookRegistry`'s shape (an ordered/keyed collection of
//! `Arc<dyn Trait>` behind a small `add`/dispatch surface), adapted from
//! a pipeline to a single-dispatch-by-name lookup since generations
//! reference exactly one method each (spec.md §3 "Generation").

use cardflow_core::{
    BlobStore, CompletionBackend, FieldKind, FieldValue, FlowError, ImageBackend, MethodCatalog,
    SpeechBackend,
};
use std::collections::HashMap;
use std::sync::Arc;

use crate::builtin::{CompletionHandler, ToImageHandler, ToSpeechHandler};
use crate::handler::{ActionHandler, ActionRequest};
use crate::render::OutputSpec;

/// A registry of named action handlers.
///
/// Implements [`MethodCatalog`] so `cardflow-template` can validate
/// generations against registered methods and their output-kind
/// signatures without depending on this crate.
pub struct ActionRegistry {
    handlers: HashMap<String, Arc<dyn ActionHandler>>,
}

impl ActionRegistry {
    /// An empty registry with no handlers.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// The registry populated with the three built-in handlers
    /// (spec.md §4.6), wired to the given backends.
    pub fn with_defaults(
        completion: Arc<dyn CompletionBackend>,
        speech: Arc<dyn SpeechBackend>,
        image: Arc<dyn ImageBackend>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        let mut registry = Self::new();
        registry.register("completion", Arc::new(CompletionHandler::new(completion)));
        registry.register(
            "toSpeech",
            Arc::new(ToSpeechHandler::new(speech, blobs.clone())),
        );
        registry.register("toImage", Arc::new(ToImageHandler::new(image, blobs)));
        registry
    }

    /// Register (or replace) a handler under `name`.
    pub fn register(&mut self, name: impl Into<String>, handler: Arc<dyn ActionHandler>) {
        self.handlers.insert(name.into(), handler);
    }

    /// Look up a handler by method name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ActionHandler>> {
        self.handlers.get(name).cloned()
    }

    /// Dispatch a generation's execution to its registered handler.
    pub async fn dispatch(
        &self,
        method: &str,
        prompt: Option<&str>,
        inputs: HashMap<String, FieldValue>,
        outputs: &[OutputSpec],
    ) -> Result<HashMap<String, FieldValue>, FlowError> {
        let handler = self.get(method).ok_or_else(|| {
            FlowError::InvariantViolation(format!("method `{method}` is not registered"))
        })?;
        handler
            .execute(ActionRequest {
                prompt,
                inputs,
                outputs,
            })
            .await
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MethodCatalog for ActionRegistry {
    fn is_registered(&self, method: &str) -> bool {
        self.handlers.contains_key(method)
    }

    fn requires_prompt(&self, method: &str) -> bool {
        self.handlers
            .get(method)
            .map(|h| h.requires_prompt())
            .unwrap_or(true)
    }

    fn validate_outputs(&self, method: &str, outputs: &[FieldKind]) -> Result<(), String> {
        match self.handlers.get(method) {
            Some(handler) => handler.validate_outputs(outputs),
            None => Err(format!("method `{method}` is not registered")),
        }
    }
}
