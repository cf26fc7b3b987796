//! Internal helpers for mapping HTTP/reqwest errors to `BackendError`.

use cardflow_core::BackendError;

/// Map a non-2xx response to a `BackendError`.
pub(crate) fn map_http_status(status: reqwest::StatusCode, body: &str) -> BackendError {
    BackendError::RequestFailed(format!("HTTP {status}: {body}"))
}

/// Map a [`reqwest::Error`] to a `BackendError`.
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        BackendError::RequestFailed("request timed out".to_string())
    } else {
        BackendError::RequestFailed(err.to_string())
    }
}
