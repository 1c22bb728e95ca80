//! Suggestion types: immutable audit records of a proposed story mutation.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::diff::PatchOp;

/// How much of the story a suggestion covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionScope {
    /// Whole-story refinement.
    #[default]
    Full,
    /// Single named field.
    Field,
}

impl SuggestionScope {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            SuggestionScope::Full => "Full story",
            SuggestionScope::Field => "Single field",
        }
    }
}

impl std::str::FromStr for SuggestionScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(SuggestionScope::Full),
            "field" => Ok(SuggestionScope::Field),
            _ => Err(format!("Unknown scope: {}. Use full or field.", s)),
        }
    }
}

impl std::fmt::Display for SuggestionScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestionScope::Full => write!(f, "full"),
            SuggestionScope::Field => write!(f, "field"),
        }
    }
}

/// Provenance recorded with each suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionMetadata {
    /// When the suggestion was built.
    pub created_at: DateTime<Utc>,

    /// Model identifier that produced the after state.
    pub model: String,

    /// Generation temperature.
    pub temperature: f64,

    /// Whether retrieval augmentation was used.
    pub retrieval_used: bool,

    /// Caller-supplied extensions (session id, prompt version, ...).
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// A proposed mutation with frozen before/after snapshots and its diff.
///
/// Built by [`build`](super::build); read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Content-derived identifier, stable for a given (before, after) pair.
    pub id: String,

    /// Whole story or single field.
    pub scope: SuggestionScope,

    /// Field name, present iff `scope` is `field`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,

    /// Snapshot of the story before the change.
    pub before: Value,

    /// Snapshot of the story after the change.
    pub after: Value,

    /// Ordered patch operations from `before` to `after`.
    pub diff: Vec<PatchOp>,

    /// Provenance.
    pub metadata: SuggestionMetadata,
}

impl Suggestion {
    /// Whether the suggestion changes anything.
    pub fn has_changes(&self) -> bool {
        !self.diff.is_empty()
    }

    /// Whether `current` has moved away from the state this suggestion was
    /// built against.
    ///
    /// An unset (`null` or empty) `before` never counts as stale.
    pub fn is_stale_against(&self, current: &Value) -> bool {
        let has_before = match &self.before {
            Value::Null => false,
            Value::Object(map) => !map.is_empty(),
            _ => true,
        };
        has_before && &self.before != current
    }
}

/// Caller-supplied generation details for [`build`](super::build).
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionOptions {
    /// Model identifier.
    pub model: String,
    /// Generation temperature.
    pub temperature: f64,
    /// Whether retrieval augmentation was used.
    pub retrieval_used: bool,
    /// Extra metadata merged into the suggestion's metadata.
    pub meta: IndexMap<String, Value>,
}

impl Default for SuggestionOptions {
    fn default() -> Self {
        Self {
            model: "gpt-5".to_string(),
            temperature: 0.0,
            retrieval_used: false,
            meta: IndexMap::new(),
        }
    }
}

impl SuggestionOptions {
    /// Create options with default model and temperature.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set whether retrieval augmentation was used.
    pub fn with_retrieval(mut self, used: bool) -> Self {
        self.retrieval_used = used;
        self
    }

    /// Add a metadata extension.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }
}
