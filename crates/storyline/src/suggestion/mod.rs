//! Suggestions: auditable, reversible change objects built from story revisions.
//!
//! A suggestion freezes the before and after states of a story together with
//! the structural diff between them, so a UI can render the change, apply it,
//! or undo it later.

mod manager;
mod suggestion;

pub use manager::{
    apply, apply_to_story, build, build_from_stories, suggestion_id, undo, SUGGESTION_ID_PREFIX,
};
pub use suggestion::{Suggestion, SuggestionMetadata, SuggestionOptions, SuggestionScope};
