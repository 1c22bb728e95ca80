//! Suggest command - capture a revision as an identifiable suggestion.

use std::path::PathBuf;

use colored::Colorize;
use storyline::suggestion::build;
use storyline::{Suggestion, SuggestionOptions, SuggestionScope};

use super::{read_json, write_json};

#[allow(clippy::too_many_arguments)]
pub fn run(
    before: PathBuf,
    after: PathBuf,
    scope: SuggestionScope,
    field: Option<String>,
    model: Option<String>,
    temperature: Option<f64>,
    retrieval: bool,
    output: Option<PathBuf>,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let old = read_json(&before)?;
    let new = read_json(&after)?;

    let mut options = SuggestionOptions::new().with_retrieval(retrieval);
    if let Some(model) = model {
        options = options.with_model(model);
    }
    if let Some(temperature) = temperature {
        options = options.with_temperature(temperature);
    }

    let suggestion = build(&old, &new, scope, field.as_deref(), &options)?;

    if !suggestion.has_changes() {
        eprintln!("{}", "Warning: the two stories are identical.".yellow());
    }

    write_json(&suggestion, output.as_ref())?;
    if let Some(path) = &output {
        eprintln!(
            "{} {} ({}) to {}",
            "Wrote".green(),
            suggestion.id.white().bold(),
            describe(&suggestion),
            path.display()
        );
    }

    Ok(())
}

fn describe(suggestion: &Suggestion) -> String {
    let target = match (&suggestion.scope, &suggestion.field_name) {
        (SuggestionScope::Field, Some(name)) => format!("{}: {}", suggestion.scope.label(), name),
        _ => suggestion.scope.label().to_string(),
    };
    format!("{}, {} change(s)", target, suggestion.diff.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::read_json;
    use serde_json::json;

    #[test]
    fn test_field_scope_needs_field_name() {
        let dir = tempfile::tempdir().unwrap();
        let before = dir.path().join("before.json");
        let after = dir.path().join("after.json");
        std::fs::write(&before, r#"{"title": "Old"}"#).unwrap();
        std::fs::write(&after, r#"{"title": "New"}"#).unwrap();

        let err = run(
            before,
            after,
            SuggestionScope::Field,
            None,
            None,
            None,
            false,
            None,
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("field_name is required"));
    }

    #[test]
    fn test_writes_suggestion() {
        let dir = tempfile::tempdir().unwrap();
        let before = dir.path().join("before.json");
        let after = dir.path().join("after.json");
        let output = dir.path().join("suggestion.json");
        std::fs::write(&before, r#"{"title": "Old"}"#).unwrap();
        std::fs::write(&after, r#"{"title": "New"}"#).unwrap();

        run(
            before,
            after,
            SuggestionScope::Field,
            Some("title".to_string()),
            Some("gpt-5-mini".to_string()),
            Some(0.2),
            true,
            Some(output.clone()),
            false,
        )
        .unwrap();

        let suggestion = read_json(&output).unwrap();
        assert_eq!(suggestion["scope"], json!("field"));
        assert_eq!(suggestion["field_name"], json!("title"));
        assert_eq!(suggestion["metadata"]["model"], json!("gpt-5-mini"));
        assert_eq!(suggestion["metadata"]["retrieval_used"], json!(true));
        assert_eq!(
            suggestion["diff"],
            json!([{"op": "replace", "path": "/title", "before": "Old", "after": "New"}])
        );
        assert!(suggestion["id"].as_str().unwrap().starts_with("sugg_"));
    }

    #[test]
    fn test_describe_names_scope() {
        let before = json!({"title": "Old", "tags": ["a"]});
        let after = json!({"title": "New", "tags": ["b"]});
        let options = SuggestionOptions::new();

        let full = build(&before, &after, SuggestionScope::Full, None, &options).unwrap();
        assert_eq!(describe(&full), "Full story, 2 change(s)");

        let field = build(&before, &after, SuggestionScope::Field, Some("title"), &options).unwrap();
        assert_eq!(describe(&field), "Single field: title, 2 change(s)");
    }
}
