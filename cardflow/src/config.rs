//! Run-time configuration for `run_template` (SPEC_FULL.md §4.9).

use serde::{Deserialize, Serialize};

fn default_seed_field_names() -> Vec<String> {
    vec!["paragraph".to_string(), "decorated_paragraph".to_string()]
}

/// Tunables for a single `run_template` call.
///
/// `seed_field_names` documents the conventional seed names new
/// templates are created with; it is informational here, not enforced —
/// a `Template`'s own `seed_field_names()` is the authoritative set for
/// that template instance, and `run_template` trusts whatever seed map
/// the caller supplies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Wall-clock budget for an entire run, past which every still-suspended
    /// generation is cancelled and the run fails with `FlowError::Timeout`.
    /// `None` means no timeout is applied.
    #[serde(default)]
    pub run_timeout_seconds: Option<u64>,

    /// Conventional seed field names for newly created templates.
    #[serde(default = "default_seed_field_names")]
    pub seed_field_names: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            run_timeout_seconds: None,
            seed_field_names: default_seed_field_names(),
        }
    }
}

impl Config {
    /// The configured timeout as a `Duration`, if any.
    #[must_use]
    pub fn run_timeout(&self) -> Option<std::time::Duration> {
        self.run_timeout_seconds.map(std::time::Duration::from_secs)
    }
}
