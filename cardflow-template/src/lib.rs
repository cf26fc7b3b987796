//! Field Registry, Generation Catalog, and Template container
//! (spec.md §3, §4.1).
//!
//! A `Template` owns a set of [`Field`]s and [`Generation`]s and enforces
//! the editing invariants that keep the induced dependency graph valid:
//! name uniqueness, input resolvability, prompt-placeholder resolvability,
//! output-kind signatures (checked against a [`cardflow_core::MethodCatalog`]
//! so this crate never depends on the concrete Action Registry), and
//! acyclicity.

#![deny(missing_docs)]

mod error;
mod field;
mod generation;
mod placeholder;
mod template;

pub use error::TemplateError;
pub use field::Field;
pub use generation::Generation;
pub use placeholder::extract_placeholders;
pub use template::{NewField, Template};
