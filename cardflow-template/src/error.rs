//! Errors raised by template editing operations (spec.md §7).

use thiserror::Error;

/// Errors from the Field Registry / Generation Catalog / Template editing
/// API (spec.md §4.1).
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// One or more referenced inputs/placeholders could not be resolved.
    #[error("validation error: missing {missing:?}")]
    Validation {
        /// The names that failed to resolve.
        missing: Vec<String>,
    },

    /// A delete was refused because the entity is still referenced.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The requested entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}
