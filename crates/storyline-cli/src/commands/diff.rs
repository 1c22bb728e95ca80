//! Diff command - show structural changes between two stories.

use std::path::PathBuf;

use colored::Colorize;
use serde_json::Value;
use storyline::{diff, PatchOp, PatchOpKind};

use super::read_json;

pub fn run(
    before: PathBuf,
    after: PathBuf,
    json_output: bool,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let old = read_json(&before)?;
    let new = read_json(&after)?;
    let ops = diff(&old, &new);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&ops)?);
        return Ok(());
    }

    if ops.is_empty() {
        println!("{}", "No changes.".yellow());
        return Ok(());
    }

    println!("{} {}", "Diff".cyan().bold(), tally(&ops).white().bold());
    println!();

    for op in &ops {
        let line = format_op(op);
        let line = match op.op {
            PatchOpKind::Add => line.green(),
            PatchOpKind::Remove => line.red(),
            PatchOpKind::Replace => line.yellow(),
        };
        println!("  {}", line);
    }

    Ok(())
}

/// One line per operation: marker, path, then the value(s) involved.
fn format_op(op: &PatchOp) -> String {
    let values = match op.op {
        PatchOpKind::Add => render(op.after.as_ref()),
        PatchOpKind::Remove => render(op.before.as_ref()),
        PatchOpKind::Replace => format!(
            "{} → {}",
            render(op.before.as_ref()),
            render(op.after.as_ref())
        ),
    };
    format!("{} {} {}", op.op.marker(), op.path, values)
}

/// Count of operations per kind, in Add/Remove/Replace order.
fn tally(ops: &[PatchOp]) -> String {
    [PatchOpKind::Add, PatchOpKind::Remove, PatchOpKind::Replace]
        .iter()
        .filter_map(|kind| {
            let count = ops.iter().filter(|op| op.op == *kind).count();
            (count > 0).then(|| format!("{} {}", kind.label(), count))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn render(value: Option<&Value>) -> String {
    value.map(Value::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_format_op_uses_markers() {
        let ops = diff(
            &json!({"title": "Old", "tags": ["a", "b"]}),
            &json!({"title": "New", "tags": ["a"], "story_points": 3}),
        );
        let lines: Vec<String> = ops.iter().map(format_op).collect();

        assert_eq!(
            lines,
            vec![
                "+ /story_points 3",
                r#"- /tags/1 "b""#,
                r#"~ /title "Old" → "New""#,
            ]
        );
        assert_eq!(tally(&ops), "Add 1, Remove 1, Replace 1");
    }

    #[test]
    fn test_run_reads_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let before = dir.path().join("before.json");
        let after = dir.path().join("after.json");
        std::fs::write(&before, r#"{"title": "Old"}"#).unwrap();
        std::fs::write(&after, r#"{"title": "New"}"#).unwrap();

        assert!(run(before.clone(), after.clone(), true, false).is_ok());
        assert!(run(before.clone(), before.clone(), false, false).is_ok());

        let missing = dir.path().join("missing.json");
        let err = run(before, missing, false, false).unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }
}
