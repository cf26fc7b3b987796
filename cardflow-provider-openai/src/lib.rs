#![deny(missing_docs)]
//! `CompletionBackend` over an OpenAI-compatible chat-completions endpoint
//! in JSON-object response mode (spec.md §6, §4.6 `completion`).

mod client;
mod error;

pub use client::OpenAiCompletion;
