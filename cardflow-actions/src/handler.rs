//! The Action Handler contract (spec.md §4.6).

use async_trait::async_trait;
use cardflow_core::{FieldKind, FieldValue, FlowError};
use std::collections::HashMap;

use crate::render::OutputSpec;

/// Everything a handler needs to execute one generation: its resolved
/// inputs, its declared outputs, and its (already input-validated, not
/// yet rendered) prompt template.
pub struct ActionRequest<'a> {
    /// The generation's prompt template, if its method consumes one.
    pub prompt: Option<&'a str>,
    /// Resolved input field values, keyed by declared input name.
    pub inputs: HashMap<String, FieldValue>,
    /// The generation's declared outputs.
    pub outputs: &'a [OutputSpec],
}

/// One registered action: knows whether it needs a rendered prompt,
/// what output-kind shapes it can produce, and how to execute.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// `true` if this handler's prompt must be present and non-empty.
    fn requires_prompt(&self) -> bool {
        true
    }

    /// Validate a candidate set of declared output kinds against this
    /// handler's signature (spec.md §4.2, §4.6).
    fn validate_outputs(&self, outputs: &[FieldKind]) -> Result<(), String>;

    /// Execute the action, producing one resolved value per declared
    /// output, keyed by output name.
    async fn execute(&self, request: ActionRequest<'_>) -> Result<HashMap<String, FieldValue>, FlowError>;
}
