//! The method-signature query surface the template editor validates
//! generations against, without depending on the concrete Action Registry
//! (spec.md §4.2: "the executor refuses a template whose any generation
//! references an unregistered method").
//!
//! `cardflow-actions::ActionRegistry` implements this trait;
//! `cardflow-template` depends only on the trait, keeping the two crates
//! from forming a cycle.

use crate::field::FieldKind;

/// Read-only view of which methods are registered and what output-kind
/// shape each one requires.
pub trait MethodCatalog: Send + Sync {
    /// `true` if `method` has a registered handler.
    fn is_registered(&self, method: &str) -> bool;

    /// `true` if this method's handler consumes a rendered prompt.
    fn requires_prompt(&self, method: &str) -> bool;

    /// Validate a candidate set of declared output kinds against this
    /// method's signature (e.g. `toSpeech` requires exactly one `Audio`
    /// output). `Err` carries a human-readable reason.
    fn validate_outputs(&self, method: &str, outputs: &[FieldKind]) -> Result<(), String>;
}
