//! The per-run Context: a keyed store of [`FieldState`] cells (spec.md §4.4).

use crate::cell::FieldState;
use cardflow_core::{FieldKind, FieldValue, FlowError};
use std::collections::{HashMap, HashSet};

/// Per-run map from field name to resolved/unresolved cell, plus the set
/// of names that were seeded at construction (and so are excluded from
/// [`Context::dump`] by default).
///
/// Constructed once per card creation and discarded after `dump` —
/// ephemeral, unlike the template it executes (spec.md §3 "Lifecycles").
pub struct Context {
    cells: HashMap<String, FieldState>,
    seed_names: HashSet<String>,
}

impl Context {
    /// Build a context seeded with the given `name -> text` values. All
    /// seeds are pre-resolved and marked `text` (spec.md §3, §8 "Seed
    /// round-trip").
    pub fn new(seeds: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut cells = HashMap::new();
        let mut seed_names = HashSet::new();
        for (name, value) in seeds {
            seed_names.insert(name.clone());
            cells.insert(name, FieldState::resolved(FieldValue::text(value)));
        }
        Self { cells, seed_names }
    }

    /// The reserved seed field names for this context.
    pub fn seed_names(&self) -> &HashSet<String> {
        &self.seed_names
    }

    /// Declare an unresolved cell for a generation output. Idempotent if
    /// the existing cell already has the same kind; fails if a
    /// differently-kinded cell of the same name already exists.
    pub fn declare(&mut self, name: &str, kind: FieldKind) -> Result<(), FlowError> {
        if let Some(existing) = self.cells.get(name) {
            if existing.kind() == kind {
                return Ok(());
            }
            return Err(FlowError::InvariantViolation(format!(
                "field {name} redeclared with a different kind"
            )));
        }
        self.cells.insert(name.to_string(), FieldState::unresolved(kind));
        Ok(())
    }

    /// Resolve a declared cell. Fails with [`FlowError::DoubleAssign`] if
    /// already resolved, and with [`FlowError::InvariantViolation`] if the
    /// name was never declared.
    pub fn put(&self, name: &str, value: FieldValue) -> Result<(), FlowError> {
        let cell = self
            .cells
            .get(name)
            .ok_or_else(|| FlowError::InvariantViolation(format!("field {name} not declared")))?;
        cell.put(value)
    }

    /// Suspend until `name` resolves (or the run is cancelled).
    pub async fn get(&self, name: &str) -> Result<FieldValue, FlowError> {
        let cell = self
            .cells
            .get(name)
            .ok_or_else(|| FlowError::InvariantViolation(format!("field {name} not declared")))?;
        cell.get().await
    }

    /// Cancel every cell that is still unresolved. Any suspended `get`
    /// on those cells returns [`FlowError::Cancelled`].
    pub fn cancel_all(&self) {
        for cell in self.cells.values() {
            cell.cancel();
        }
    }

    /// Snapshot every resolved cell. `exclude_seeds = true` (the
    /// default the Flow Executor uses) omits seed fields — this is the
    /// persisted card content (spec.md §3, §6).
    pub fn dump(&self, exclude_seeds: bool) -> HashMap<String, FieldValue> {
        self.cells
            .iter()
            .filter(|(name, _)| !exclude_seeds || !self.seed_names.contains(*name))
            .filter_map(|(name, cell)| cell.peek().map(|v| (name.clone(), v)))
            .collect()
    }
}
