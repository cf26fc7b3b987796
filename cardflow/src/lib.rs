#![deny(missing_docs)]
//! # cardflow — umbrella crate
//!
//! A single import surface for the flashcard template and execution
//! engine. Re-exports the protocol crates unconditionally (`core`
//! feature) and concrete backend providers behind feature flags, plus
//! a `prelude` for the happy path and [`run_template`] as the one call
//! most callers need.

pub mod card;
pub mod config;
mod run;

pub use card::{Card, CardContent};
pub use config::Config;
pub use run::run_template;

pub use cardflow_actions;
pub use cardflow_context;
pub use cardflow_core;
pub use cardflow_executor;
pub use cardflow_template;

#[cfg(feature = "blob-memory")]
pub use cardflow_blob_memory;
#[cfg(feature = "provider-azure-speech")]
pub use cardflow_provider_azure_speech;
#[cfg(feature = "provider-openai")]
pub use cardflow_provider_openai;
#[cfg(feature = "provider-openai-image")]
pub use cardflow_provider_openai_image;

/// Happy-path imports for composing a `cardflow` pipeline.
pub mod prelude {
    pub use crate::{run_template, Card, CardContent, Config};
    pub use cardflow_actions::{ActionRegistry, ActionHandler};
    pub use cardflow_core::{
        BackendError, BlobStore, CompletionBackend, FieldKind, FieldValue, FlowError,
        ImageBackend, SpeechBackend,
    };
    pub use cardflow_executor::FlowExecutor;
    pub use cardflow_template::{NewField, Template};

    #[cfg(feature = "blob-memory")]
    pub use cardflow_blob_memory::MemoryBlobStore;

    #[cfg(feature = "provider-azure-speech")]
    pub use cardflow_provider_azure_speech::AzureSpeech;

    #[cfg(feature = "provider-openai")]
    pub use cardflow_provider_openai::OpenAiCompletion;

    #[cfg(feature = "provider-openai-image")]
    pub use cardflow_provider_openai_image::OpenAiImage;
}
