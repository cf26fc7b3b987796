//! Action Registry, Prompt Renderer, and built-in Action Handlers
//! (spec.md §4.2, §4.3, §4.6).
//!
//! [`ActionRegistry`] maps method names to [`ActionHandler`]s and
//! implements `cardflow_core::MethodCatalog` so the template editor can
//! validate generations against it without this crate depending back on
//! `cardflow-template`.

#![deny(missing_docs)]

mod builtin;
mod handler;
mod registry;
mod render;

pub use builtin::{CompletionHandler, ToImageHandler, ToSpeechHandler};
pub use handler::{ActionHandler, ActionRequest};
pub use registry::ActionRegistry;
pub use render::{render_completion_prompt, render_plain, OutputSpec};
