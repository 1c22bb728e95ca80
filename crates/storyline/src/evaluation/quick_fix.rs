//! Merge an evaluator's proposed fix back into a live story.

use serde_json::{Map, Value};

use crate::error::Result;
use crate::story::Story;

use super::finding::EvaluationReport;

/// Fields a quick fix may overwrite. Everything else is left untouched.
pub const QUICK_FIX_FIELDS: [&str; 5] = [
    "title",
    "description",
    "acceptance_criteria",
    "definition_of_done",
    "tags",
];

/// Copy the normalized allow-listed fields from `report.proposed_fix` into a
/// copy of `record`.
pub fn apply_quick_fixes(record: &Value, report: &EvaluationReport) -> Value {
    let mut out = match record {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };

    for key in QUICK_FIX_FIELDS {
        if let Some(value) = report.proposed_fix.get(key) {
            out.insert(key.to_string(), value.clone());
        }
    }

    Value::Object(out)
}

/// Typed variant of [`apply_quick_fixes`].
pub fn apply_quick_fixes_to_story(story: &Story, report: &EvaluationReport) -> Result<Story> {
    let fixed = apply_quick_fixes(&story.to_value()?, report);
    Story::from_value(fixed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::Evaluator;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_quick_fix_merges_allow_list_only() {
        let story = json!({
            "title": "  Reset password  ",
            "description": "As a user, I want to reset my password so that I can regain access.",
            "acceptance_criteria": [
                "Send a reset email containing a one-time link",
                "Send a reset email containing a one-time link"
            ],
            "story_points": 5,
            "tags": [" Security ", "password reset", "security"],
            "owner": "po@example.com"
        });

        let report = Evaluator::new().evaluate(&story);
        let fixed = apply_quick_fixes(&story, &report);

        assert_eq!(fixed["title"], json!("Reset password"));
        assert_eq!(fixed["acceptance_criteria"].as_array().unwrap().len(), 1);
        assert_eq!(
            fixed["tags"],
            json!(["security", "password-reset", "chatgpt", "ai-story-gen"])
        );
        assert_eq!(fixed["story_points"], json!(5));
        assert_eq!(fixed["owner"], json!("po@example.com"));
        assert!(fixed.get("definition_of_done").is_none());
    }

    #[test]
    fn test_quick_fix_ignores_foreign_keys_in_fix() {
        let story = json!({"title": "Keep", "story_points": 2});
        let mut report = Evaluator::new().evaluate(&story);
        report.proposed_fix["story_points"] = json!(99);

        let fixed = apply_quick_fixes(&story, &report);
        assert_eq!(fixed["story_points"], json!(2));
    }

    #[test]
    fn test_typed_quick_fix() {
        let story = Story::new(" Export report ", "As an analyst, I want a CSV export of results.")
            .with_acceptance_criteria(["Return a CSV file within 5 seconds."])
            .with_story_points(3)
            .with_tags(["Reporting"])
            .with_extra("epic", "EXP-1");

        let report = Evaluator::new().evaluate_story(&story).unwrap();
        let fixed = apply_quick_fixes_to_story(&story, &report).unwrap();

        assert_eq!(fixed.title.as_deref(), Some("Export report"));
        assert_eq!(
            fixed.acceptance_criteria,
            Some(vec!["Return a CSV file within 5 seconds".to_string()])
        );
        assert_eq!(
            fixed.tags,
            Some(vec![
                "reporting".to_string(),
                "chatgpt".to_string(),
                "ai-story-gen".to_string()
            ])
        );
        assert_eq!(fixed.extra.get("epic"), Some(&json!("EXP-1")));
    }
}
