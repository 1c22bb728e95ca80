//! Estimate command - size a story and check for drift.

use std::path::{Path, PathBuf};

use colored::Colorize;
use storyline::estimation::assess_drift;
use storyline::EffortPoints;

use super::{load_pipeline, read_json};

pub fn run(
    file: PathBuf,
    json_output: bool,
    original_points: Option<i64>,
    config: Option<&Path>,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let original = original_points.map(EffortPoints::try_from).transpose()?;

    let story = read_json(&file)?;
    let pipeline = load_pipeline(config)?;
    let estimate = pipeline.estimator().estimate_record(&story);
    let drift = original.map(|original| assess_drift(original, estimate.points));

    if json_output {
        let output = serde_json::json!({
            "estimate": estimate,
            "drift": drift,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} {} {}",
        "Estimate".cyan().bold(),
        file.display().to_string().white(),
        format!("{} points", estimate.points).white().bold()
    );
    println!("  {}", estimate.rationale.dimmed());

    for advisory in &estimate.advisories {
        println!("  {} {}", "⚠".yellow(), advisory);
    }

    if let Some(drift) = drift {
        println!();
        match &drift.signal {
            Some(signal) => println!("  {} {}", "Drift:".red().bold(), signal),
            None => println!(
                "  {} {} → {} ({} step(s))",
                "No drift:".green(),
                drift.original_points,
                drift.new_points,
                drift.step_change
            ),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_points_off_the_scale() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("story.json");
        std::fs::write(&input, r#"{"description": "Click button", "acceptance_criteria": []}"#)
            .unwrap();

        let err = run(input, true, Some(4), None, false).unwrap_err();
        assert!(err.to_string().contains("not on the effort scale"));
    }
}
