//! Field kinds and resolved field values shared across the engine.

use serde::{Deserialize, Serialize};

/// The type of value a field holds.
///
/// Immutable once a field has been referenced by a generation (the
/// field registry enforces this; this crate only defines the type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Plain text.
    Text,
    /// Opaque blob-store key pointing at synthesized audio.
    Audio,
    /// Opaque blob-store key pointing at a generated image.
    Image,
}

impl FieldKind {
    /// `true` if this kind is produced by exactly the `toSpeech` method.
    pub fn is_audio(&self) -> bool {
        matches!(self, FieldKind::Audio)
    }

    /// `true` if this kind is produced by exactly the `toImage` method.
    pub fn is_image(&self) -> bool {
        matches!(self, FieldKind::Image)
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FieldKind::Text => "text",
            FieldKind::Audio => "audio",
            FieldKind::Image => "image",
        };
        write!(f, "{s}")
    }
}

/// A resolved field value: its kind, plus the literal text or opaque
/// artifact key. This is the shape that `Context::get`/`dump` return,
/// and the shape persisted in a card's `content` column (spec.md §6).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    /// The field's kind.
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Literal text for `Text`, opaque artifact key for `Audio`/`Image`.
    pub value: String,
}

impl FieldValue {
    /// Construct a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            kind: FieldKind::Text,
            value: value.into(),
        }
    }

    /// Construct an audio value (an opaque blob-store key).
    pub fn audio(key: impl Into<String>) -> Self {
        Self {
            kind: FieldKind::Audio,
            value: key.into(),
        }
    }

    /// Construct an image value (an opaque blob-store key).
    pub fn image(key: impl Into<String>) -> Self {
        Self {
            kind: FieldKind::Image,
            value: key.into(),
        }
    }
}
