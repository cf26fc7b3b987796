//! A named typed slot within one template (spec.md §3 "Field").

use cardflow_core::{FieldId, FieldKind, GenerationId};
use std::collections::BTreeSet;

/// A field belonging to exactly one template.
#[derive(Debug, Clone)]
pub struct Field {
    pub(crate) id: FieldId,
    pub(crate) name: String,
    pub(crate) kind: FieldKind,
    pub(crate) description: String,
    pub(crate) source: Option<GenerationId>,
    pub(crate) referenced_by: BTreeSet<GenerationId>,
}

impl Field {
    /// The field's identifier.
    pub fn id(&self) -> &FieldId {
        &self.id
    }

    /// The field's name, unique within its template.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field's value kind.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Human-readable description, embedded in rendered prompts.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The generation that produces this field, if any. Absent for
    /// admin-created fields with no generation yet.
    pub fn source(&self) -> Option<&GenerationId> {
        self.source.as_ref()
    }

    /// The generations that consume this field as an input.
    pub fn referenced_by(&self) -> &BTreeSet<GenerationId> {
        &self.referenced_by
    }

    /// `true` if any generation consumes this field — deletion must be
    /// refused in that case (spec.md §3 invariant, §8 invariant 5).
    pub fn is_referenced(&self) -> bool {
        !self.referenced_by.is_empty()
    }
}
