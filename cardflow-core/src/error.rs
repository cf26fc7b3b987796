//! Error types for each protocol boundary (spec.md §7).
//!
//! One enum per boundary, `#[non_exhaustive]` so new variants don't break
//! downstream matches, matching the style of the teacher's per-protocol
//! error enums.

use thiserror::Error;

/// Errors raised while a run is executing: rendering, parsing, the
/// context's single-assignment discipline, timeout, and cancellation.
/// Surfaced to the caller as the run's terminal error (spec.md §5, §7).
#[non_exhaustive]
#[derive(Debug, Error, Clone)]
pub enum FlowError {
    /// A prompt placeholder had no corresponding input value.
    #[error("render error: {0}")]
    Render(String),

    /// A completion response was not valid JSON, or was missing a
    /// declared output key.
    #[error("parse error: {0}")]
    Parse(String),

    /// `Context::put` was called twice for the same field. Indicates a
    /// template-validation bug — the field registry should have made
    /// this unreachable.
    #[error("double assign: {0}")]
    DoubleAssign(String),

    /// The run exceeded its configured wall-clock budget.
    #[error("run timed out")]
    Timeout,

    /// The run was cancelled (by timeout or a sibling task's failure)
    /// before this cell was ever resolved.
    #[error("run cancelled")]
    Cancelled,

    /// A backend call failed.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// A field was read or written that template validation should have
    /// made unreachable (an unknown name). Indicates an engine bug, not
    /// a user-facing error.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

/// Errors from the three injectable backend interfaces and the blob
/// store (spec.md §6).
#[non_exhaustive]
#[derive(Debug, Error, Clone)]
pub enum BackendError {
    /// The backend request failed (network, non-2xx status, etc).
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The backend returned a response this client could not understand.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The blob store could not service an upload/download.
    #[error("blob store error: {0}")]
    BlobStore(String),
}
