//! The suspend-on-read single-assignment cell (spec.md §4.4, §9).
//!
//! Realised with a `Mutex<CellState>` guarding the resolved value plus a
//! `tokio::sync::Notify` to wake waiters — the cell only ever transitions
//! forward (`Unresolved` → `Resolved` or `Unresolved` → `Cancelled`), so a
//! single `notify_waiters()` call per transition is enough to release
//! every waiting `get`.

use cardflow_core::{FieldKind, FieldValue, FlowError};
use std::sync::Mutex;
use tokio::sync::Notify;

#[derive(Debug, Clone)]
enum CellState {
    Unresolved,
    Resolved(FieldValue),
    Cancelled,
}

/// One named slot in a [`crate::Context`]: a kind, and a value that is
/// assigned at most once and may be read any number of times, with reads
/// suspending until assignment (or cancellation) happens.
pub struct FieldState {
    kind: FieldKind,
    state: Mutex<CellState>,
    notify: Notify,
}

impl FieldState {
    /// Create an unresolved cell of the given kind.
    pub fn unresolved(kind: FieldKind) -> Self {
        Self {
            kind,
            state: Mutex::new(CellState::Unresolved),
            notify: Notify::new(),
        }
    }

    /// Create an already-resolved cell (used for seed fields).
    pub fn resolved(value: FieldValue) -> Self {
        Self {
            kind: value.kind,
            state: Mutex::new(CellState::Resolved(value)),
            notify: Notify::new(),
        }
    }

    /// The kind declared for this cell.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// `true` if this cell already holds a value.
    pub fn is_resolved(&self) -> bool {
        matches!(*self.state.lock().expect("cell lock"), CellState::Resolved(_))
    }

    /// Resolve the cell. Fails with [`FlowError::DoubleAssign`] if the
    /// cell was already resolved or cancelled.
    pub fn put(&self, value: FieldValue) -> Result<(), FlowError> {
        let mut guard = self.state.lock().expect("cell lock");
        match &*guard {
            CellState::Unresolved => {
                *guard = CellState::Resolved(value);
                drop(guard);
                self.notify.notify_waiters();
                Ok(())
            }
            CellState::Resolved(_) => Err(FlowError::DoubleAssign(
                "field already resolved".to_string(),
            )),
            CellState::Cancelled => Err(FlowError::DoubleAssign(
                "field already cancelled".to_string(),
            )),
        }
    }

    /// Mark the cell cancelled. A no-op if the cell already resolved —
    /// a task that finished before cancellation keeps its result
    /// (spec.md §7: "Backend errors ... fail the run" but completed
    /// sibling outputs are not retracted).
    pub fn cancel(&self) {
        let mut guard = self.state.lock().expect("cell lock");
        if let CellState::Unresolved = &*guard {
            *guard = CellState::Cancelled;
            drop(guard);
            self.notify.notify_waiters();
        }
    }

    /// Suspend until the cell is resolved or cancelled.
    pub async fn get(&self) -> Result<FieldValue, FlowError> {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            match &*self.state.lock().expect("cell lock") {
                CellState::Resolved(v) => return Ok(v.clone()),
                CellState::Cancelled => return Err(FlowError::Cancelled),
                CellState::Unresolved => {}
            }

            notified.await;
        }
    }

    /// Snapshot the cell without waiting. `None` if still unresolved.
    pub fn peek(&self) -> Option<FieldValue> {
        match &*self.state.lock().expect("cell lock") {
            CellState::Resolved(v) => Some(v.clone()),
            _ => None,
        }
    }
}
