//! Persisted card shape (spec.md §6).
//!
//! `cardflow` never persists a `Card` itself — storage is an external
//! collaborator (spec.md §1 Non-goals) — but it defines the shape a
//! caller's storage layer round-trips through `serde`.

use cardflow_core::{CardId, FieldValue, TemplateId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The generated content of one card: every non-seed field the run
/// resolved, keyed by field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CardContent(pub HashMap<String, FieldValue>);

impl CardContent {
    /// Look up a resolved field by name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }
}

/// A completed run's result: the template it was generated from, and
/// the resolved content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique identifier for this card.
    pub id: CardId,
    /// The template this card was generated from.
    pub template_id: TemplateId,
    /// The resolved, non-seed field values.
    pub content: CardContent,
}
