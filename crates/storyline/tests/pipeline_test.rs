//! Integration tests for the Storyline pipeline.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use storyline::estimation::ADVISORY_MUST_SPLIT;
use storyline::evaluation::ids;
use storyline::suggestion::{apply, build, undo};
use storyline::{
    diff, Estimator, Evaluator, PatchOp, Severity, Story, StoryPipeline, SuggestionOptions,
    SuggestionScope,
};

fn reset_password() -> Value {
    json!({
        "title": "Reset password",
        "description": "As a user, I want to reset my password so that I can regain access.",
        "acceptance_criteria": [
            "Send a reset email within 5 minutes",
            "Reject expired links with an error message"
        ],
        "story_points": 3,
        "tags": ["security", "chatgpt", "ai-story-gen"],
        "definition_of_done": ["Code reviewed", "Tests pass"]
    })
}

// =============================================================================
// Evaluator Scenarios
// =============================================================================

#[test]
fn test_duplicate_criteria_are_collapsed() {
    let mut story = reset_password();
    story["acceptance_criteria"] = json!([
        "Send a reset email containing a one-time link",
        "Send a reset email containing a one-time link"
    ]);

    let report = Evaluator::new().evaluate(&story);

    let duplicates = report.finding(ids::AC_DUPLICATES).expect("duplicates finding");
    assert!(!duplicates.ok);
    assert_eq!(
        report.proposed_fix["acceptance_criteria"],
        json!(["Send a reset email containing a one-time link"])
    );
}

#[test]
fn test_required_tags_appended_after_normalized_tags() {
    let mut story = reset_password();
    story["tags"] = json!(["Security", "password reset"]);

    let report = Evaluator::new().evaluate(&story);

    let required = report.finding(ids::TAGS_REQUIRED).expect("required tags finding");
    assert!(!required.ok);
    assert_eq!(required.severity, Severity::Warn);
    assert_eq!(
        report.proposed_fix["tags"],
        json!(["security", "password-reset", "chatgpt", "ai-story-gen"])
    );
}

#[test]
fn test_out_of_range_points_only_warn() {
    let mut story = reset_password();
    story["story_points"] = json!(20);

    let report = Evaluator::new().evaluate(&story);

    let range = report.finding(ids::SP_RANGE).expect("range finding");
    assert!(!range.ok);
    assert_eq!(range.severity, Severity::Warn);
    assert!(report.ok);
}

#[test]
fn test_missing_everything_is_not_ready() {
    let report = Evaluator::new().evaluate(&json!({}));

    assert!(!report.ok);
    assert!(report.blocking().count() >= 5);
    assert!(report.score < 50);
}

// =============================================================================
// Estimator Scenarios
// =============================================================================

#[test]
fn test_oversized_uncertain_story_must_split() {
    let criteria: Vec<String> = (1..=20).map(|i| format!("Criterion {}", i)).collect();
    let story = Story::new(
        "Partner sync",
        "Integrate with an external partner API; endpoints TBD and blocked on credentials.",
    )
    .with_acceptance_criteria(criteria);

    let estimate = Estimator::new().estimate(&story);

    assert!(matches!(estimate.points.value(), 13 | 21));
    assert!(estimate.has_advisory(ADVISORY_MUST_SPLIT));
}

// =============================================================================
// Suggestion Scenarios
// =============================================================================

#[test]
fn test_field_suggestion_diff() {
    let suggestion = build(
        &json!({"title": "Old"}),
        &json!({"title": "New"}),
        SuggestionScope::Field,
        Some("title"),
        &SuggestionOptions::new(),
    )
    .unwrap();

    assert_eq!(
        suggestion.diff,
        vec![PatchOp::replace("/title", json!("Old"), json!("New"))]
    );
    assert_eq!(
        serde_json::to_value(&suggestion.diff).unwrap(),
        json!([{"op": "replace", "path": "/title", "before": "Old", "after": "New"}])
    );
    assert_eq!(suggestion.field_name.as_deref(), Some("title"));
}

#[test]
fn test_apply_then_undo_restores_story() {
    let before = reset_password();
    let mut after = before.clone();
    after["description"] = json!("As an account holder, I want a password reset link by email.");

    let suggestion = build(
        &before,
        &after,
        SuggestionScope::Full,
        None,
        &SuggestionOptions::new().with_model("gpt-5-mini"),
    )
    .unwrap();

    let applied = apply(&before, &suggestion).unwrap();
    assert_eq!(applied, after);
    assert_eq!(undo(&suggestion).unwrap(), before);
    assert_eq!(suggestion.metadata.model, "gpt-5-mini");
}

#[test]
fn test_diff_of_identical_stories_is_empty() {
    let story = reset_password();
    assert!(diff(&story, &story.clone()).is_empty());
}

// =============================================================================
// End-to-End Flow
// =============================================================================

#[test]
fn test_generate_revise_apply_flow() {
    let pipeline = StoryPipeline::new();

    let mut draft = reset_password();
    draft["title"] = json!("  Reset password  ");
    draft["tags"] = json!(["Security"]);
    let generated = pipeline.generate(&draft);

    assert_eq!(generated.story["title"], json!("Reset password"));
    assert_eq!(
        generated.story["tags"],
        json!(["security", "chatgpt", "ai-story-gen"])
    );
    let original = generated.estimate.points;

    // Small revision: one extra criterion.
    let mut small = generated.story.clone();
    small["acceptance_criteria"]
        .as_array_mut()
        .unwrap()
        .push(json!("Log every reset request"));
    let revision = pipeline
        .revise(
            &generated.story,
            &small,
            SuggestionScope::Field,
            Some("acceptance_criteria"),
            &SuggestionOptions::new(),
            &generated.session,
        )
        .unwrap();
    assert_eq!(revision.suggestion.diff.len(), 1);
    assert!(!revision.drift.is_signalled());
    let story = apply(&generated.story, &revision.suggestion).unwrap();

    // Large revision: drift against the original estimate, not the last one.
    let mut large = story.clone();
    large["acceptance_criteria"] =
        json!((1..=12).map(|i| format!("Show step {}", i)).collect::<Vec<_>>());
    let revision = pipeline
        .revise(
            &story,
            &large,
            SuggestionScope::Full,
            None,
            &SuggestionOptions::new(),
            &revision.session,
        )
        .unwrap();
    assert!(revision.drift.is_signalled());
    assert_eq!(revision.drift.original_points, original);
    assert_eq!(revision.session.original_points, Some(original));
}
