//! Storyline: the deterministic core of an AI-assisted user story editor.
//!
//! A language model proposes stories and revisions; Storyline decides what
//! those proposals mean. Every change is captured as an identifiable
//! [`Suggestion`] with a structural diff, every story is linted into
//! [`Finding`]s with a weighted score, and every version is sized on a
//! Fibonacci effort scale with drift detection across edits.
//!
//! # Core Principles
//!
//! - **Lint, don't throw**: malformed stories become findings, not errors
//! - **Non-destructive**: inputs are never mutated; suggestions hold snapshots
//! - **Deterministic**: the same inputs always give the same ids, diffs and scores
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use storyline::{StoryPipeline, SuggestionOptions, SuggestionScope};
//!
//! let pipeline = StoryPipeline::new();
//! let generated = pipeline.generate(&json!({
//!     "title": "Reset password",
//!     "description": "As a user, I want to reset my password so that I can regain access.",
//!     "acceptance_criteria": ["Send a reset email within 5 minutes"],
//!     "story_points": 2,
//!     "tags": ["security"]
//! }));
//! println!("Score: {}", generated.report.score);
//!
//! let mut candidate = generated.story.clone();
//! candidate["title"] = json!("Reset a forgotten password");
//! let revision = pipeline
//!     .revise(
//!         &generated.story,
//!         &candidate,
//!         SuggestionScope::Field,
//!         Some("title"),
//!         &SuggestionOptions::new(),
//!         &generated.session,
//!     )
//!     .unwrap();
//! assert_eq!(revision.suggestion.diff.len(), 1);
//! ```

pub mod config;
pub mod diff;
pub mod error;
pub mod estimation;
pub mod evaluation;
pub mod story;
pub mod suggestion;

mod pipeline;

pub use crate::pipeline::{Generated, Revision, StoryPipeline};
pub use config::PipelineConfig;
pub use diff::{diff, PatchOp, PatchOpKind};
pub use error::{Result, StorylineError, ValidationError};
pub use estimation::{
    DriftAssessment, EffortPoints, EstimationResult, Estimator, EstimatorConfig, SessionMeta,
};
pub use evaluation::{
    apply_quick_fixes, EvaluationReport, Evaluator, EvaluatorConfig, Finding, Severity,
};
pub use story::{FieldRevision, Story};
pub use suggestion::{Suggestion, SuggestionOptions, SuggestionScope};
