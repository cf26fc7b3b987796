//! A node in a template's DAG (spec.md §3 "Generation").

use cardflow_core::{FieldId, GenerationId};

/// One step of a template: a method, an optional prompt, ordered input
/// field references, and the set of fields it produces.
#[derive(Debug, Clone)]
pub struct Generation {
    pub(crate) id: GenerationId,
    pub(crate) name: String,
    pub(crate) method: String,
    pub(crate) prompt: Option<String>,
    pub(crate) inputs: Vec<String>,
    pub(crate) outputs: Vec<FieldId>,
}

impl Generation {
    /// The generation's identifier.
    pub fn id(&self) -> &GenerationId {
        &self.id
    }

    /// The generation's name, unique within its template.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The action name this generation dispatches to.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The prompt template, if this method consumes one.
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    /// Ordered field-name inputs (order is preserved and observable, but
    /// prompt rendering resolves placeholders by name, so order only
    /// affects the persisted declaration — spec.md §4.1).
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    /// The fields this generation produces.
    pub fn outputs(&self) -> &[FieldId] {
        &self.outputs
    }
}
