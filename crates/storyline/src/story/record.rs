//! The story record under revision.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Result;

/// A structured work item ("user story").
///
/// Fields the library does not know about are kept in [`Story::extra`] and
/// survive evaluation, quick fixes and suggestion round trips unchanged.
/// Known fields absent from the record stay `None` and are never written
/// back, so `from_value` followed by `to_value` reproduces the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Story {
    /// Short summary line.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub title: Option<String>,

    /// Narrative description ("As a ..., I want ..., so that ...").
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub description: Option<String>,

    /// Testable acceptance criteria, in display order.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub acceptance_criteria: Option<Vec<String>>,

    /// Effort estimate, expected to be on the effort scale.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub story_points: Option<i64>,

    /// Labels, semantically a set but kept in insertion order.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub tags: Option<Vec<String>>,

    /// Optional definition of done checklist.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub definition_of_done: Option<Vec<String>>,

    /// Pass-through fields (ids, attachments, tracker keys, ...).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Story {
    /// Create a story with a title and description.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
            ..Self::default()
        }
    }

    /// Set the acceptance criteria.
    pub fn with_acceptance_criteria<I, S>(mut self, criteria: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.acceptance_criteria = Some(criteria.into_iter().map(Into::into).collect());
        self
    }

    /// Set the story points.
    pub fn with_story_points(mut self, points: i64) -> Self {
        self.story_points = Some(points);
        self
    }

    /// Set the tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Set the definition of done.
    pub fn with_definition_of_done<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.definition_of_done = Some(items.into_iter().map(Into::into).collect());
        self
    }

    /// Attach a pass-through field.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Return a copy with one field replaced.
    pub fn with_field(&self, revision: FieldRevision) -> Self {
        let mut updated = self.clone();
        match revision {
            FieldRevision::Title(title) => updated.title = Some(title),
            FieldRevision::Description(description) => {
                updated.description = Some(description)
            }
            FieldRevision::AcceptanceCriteria(criteria) => {
                updated.acceptance_criteria = Some(criteria)
            }
        }
        updated
    }

    /// Convert to a JSON record.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Parse a JSON record into a story.
    ///
    /// Fails when a known field has the wrong type, including an explicit
    /// `null`; use the evaluator on the raw value first if the record came
    /// from an untrusted generator.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

// Missing keys fall back to `default`; a present key must hold a real value.
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// A single-field replacement, as produced by field-level refinement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldRevision {
    Title(String),
    Description(String),
    AcceptanceCriteria(Vec<String>),
}

impl FieldRevision {
    /// Record key of the field this revision replaces.
    pub fn field_name(&self) -> &'static str {
        match self {
            FieldRevision::Title(_) => "title",
            FieldRevision::Description(_) => "description",
            FieldRevision::AcceptanceCriteria(_) => "acceptance_criteria",
        }
    }
}
