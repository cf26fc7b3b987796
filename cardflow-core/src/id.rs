//! Typed ID wrappers for templates, fields, and generations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Typed ID wrappers prevent mixing up template IDs, field IDs, etc.
/// These are just strings underneath — no UUID format is enforced here,
/// callers decide how IDs are minted (the facade crate uses `uuid`).
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new typed ID from anything that converts to String.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the inner string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

typed_id!(TemplateId, "Unique identifier for a template.");
typed_id!(FieldId, "Unique identifier for a field within a template.");
typed_id!(GenerationId, "Unique identifier for a generation within a template.");
typed_id!(CardId, "Unique identifier for a persisted card.");
