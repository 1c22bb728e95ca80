//! Build suggestions from before/after pairs and merge them back.

use chrono::Utc;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::diff::diff;
use crate::error::{Result, ValidationError};
use crate::story::Story;

use super::suggestion::{Suggestion, SuggestionMetadata, SuggestionOptions, SuggestionScope};

/// Prefix of every suggestion id.
pub const SUGGESTION_ID_PREFIX: &str = "sugg_";

/// Hex digits of the digest kept in the id (48 bits).
const ID_HEX_DIGITS: usize = 12;

/// Metadata keys owned by the suggestion itself; extensions cannot shadow them.
const RESERVED_META_KEYS: [&str; 4] = ["created_at", "model", "temperature", "retrieval_used"];

/// Build a suggestion from two versions of a story.
///
/// Both snapshots are deep-copied, so later edits to the caller's values never
/// leak into the suggestion. Fails with [`ValidationError::MissingFieldName`]
/// when `scope` is [`SuggestionScope::Field`] and no field name is given.
pub fn build(
    before: &Value,
    after: &Value,
    scope: SuggestionScope,
    field_name: Option<&str>,
    options: &SuggestionOptions,
) -> Result<Suggestion> {
    let field_name = match scope {
        SuggestionScope::Field => match field_name.map(str::trim) {
            Some(name) if !name.is_empty() => Some(name.to_string()),
            _ => return Err(ValidationError::MissingFieldName.into()),
        },
        SuggestionScope::Full => None,
    };

    let before = before.clone();
    let after = after.clone();
    let diff = diff(&before, &after);
    let id = suggestion_id(&before, &after);

    let mut extensions = options.meta.clone();
    extensions.retain(|key, _| {
        let reserved = RESERVED_META_KEYS.contains(&key.as_str());
        if reserved {
            tracing::debug!(key = %key, "ignoring metadata extension that shadows a core key");
        }
        !reserved
    });

    tracing::debug!(id = %id, scope = %scope, ops = diff.len(), "built suggestion");

    Ok(Suggestion {
        id,
        scope,
        field_name,
        before,
        after,
        diff,
        metadata: SuggestionMetadata {
            created_at: Utc::now(),
            model: options.model.clone(),
            temperature: options.temperature,
            retrieval_used: options.retrieval_used,
            extensions,
        },
    })
}

/// Build a suggestion from two typed stories.
pub fn build_from_stories(
    before: &Story,
    after: &Story,
    scope: SuggestionScope,
    field_name: Option<&str>,
    options: &SuggestionOptions,
) -> Result<Suggestion> {
    build(&before.to_value()?, &after.to_value()?, scope, field_name, options)
}

/// Apply a suggestion to the current story and return the new story.
///
/// If `current` differs from the suggestion's `before` snapshot a warning is
/// logged and the suggestion is applied anyway; the last write wins. Neither
/// argument is modified.
pub fn apply(current: &Value, suggestion: &Suggestion) -> Result<Value> {
    if suggestion.is_stale_against(current) {
        tracing::warn!(
            suggestion = %suggestion.id,
            "current story differs from the suggestion's 'before' state; applying anyway"
        );
    }

    match &suggestion.after {
        Value::Object(_) => Ok(suggestion.after.clone()),
        other => Err(ValidationError::MalformedSuggestion {
            reason: format!("'after' must be a story object, found {}", kind_of(other)),
        }
        .into()),
    }
}

/// Apply a suggestion to a typed story.
pub fn apply_to_story(current: &Story, suggestion: &Suggestion) -> Result<Story> {
    let updated = apply(&current.to_value()?, suggestion)?;
    Story::from_value(updated)
}

/// Return the story as it was before the suggestion, for undo.
pub fn undo(suggestion: &Suggestion) -> Result<Value> {
    match &suggestion.before {
        Value::Object(_) => Ok(suggestion.before.clone()),
        other => Err(ValidationError::MalformedSuggestion {
            reason: format!("'before' must be a story object, found {}", kind_of(other)),
        }
        .into()),
    }
}

/// Derive the suggestion id for a (before, after) pair.
///
/// The id is the prefix plus the first 12 hex digits of SHA-256 over the
/// key-sorted serialization of both snapshots. Collisions are unlikely at
/// per-session volumes but not impossible.
pub fn suggestion_id(before: &Value, after: &Value) -> String {
    let mut canonical = String::new();
    canonical.push_str("{\"a\":");
    write_canonical(after, &mut canonical);
    canonical.push_str(",\"b\":");
    write_canonical(before, &mut canonical);
    canonical.push('}');

    let digest = format!("{:x}", Sha256::digest(canonical.as_bytes()));
    format!("{}{}", SUGGESTION_ID_PREFIX, &digest[..ID_HEX_DIGITS])
}

/// Compact JSON with object keys sorted at every depth.
fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
