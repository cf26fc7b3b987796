//! # cardflow-context — the per-run single-assignment field store
//!
//! [`Context`] wires together the generations of one template run: every
//! generation output is a cell that starts unresolved, generations
//! `put` their outputs exactly once, and dependent generations `get`
//! their inputs, suspending until the producer runs (spec.md §4.4).

#![deny(missing_docs)]

mod cell;
mod context;

pub use cell::FieldState;
pub use context::Context;
