//! # cardflow-core — protocol traits and shared types for the template engine
//!
//! This crate defines the boundary types shared by every other `cardflow`
//! crate: the field value model, the three injectable backend traits plus
//! the blob store, and the error taxonomy for a run.
//!
//! ## Design Principle
//!
//! Every trait here is operation-defined, not mechanism-defined.
//! [`CompletionBackend::complete`] means "turn this prompt into a JSON
//! response" — not "make an HTTP call to this provider." That's what
//! makes the engine indifferent to which LLM, TTS, or image backend is
//! wired in at runtime.
//!
//! ## Dependency Notes
//!
//! Completion responses are passed around as raw JSON strings rather than
//! a typed envelope — the completion handler in `cardflow-actions` is the
//! only place that needs to parse them, and different providers shape
//! their JSON-mode responses differently enough that a shared typed
//! wrapper would buy nothing.

#![deny(missing_docs)]

pub mod backend;
pub mod error;
pub mod field;
pub mod id;
pub mod method_catalog;

// Re-exports for convenience
pub use backend::{BlobStore, CompletionBackend, ImageBackend, SpeechBackend};
pub use error::{BackendError, FlowError};
pub use field::{FieldKind, FieldValue};
pub use id::{CardId, FieldId, GenerationId, TemplateId};
pub use method_catalog::MethodCatalog;
