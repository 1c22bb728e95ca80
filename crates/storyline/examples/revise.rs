//! Example: Lint, size and revise a story file with Storyline.
//!
//! Usage:
//!   cargo run --example revise -- <story.json>
//!
//! The example generates a session from the story, then simulates a refined
//! acceptance-criteria list and prints the suggestion and drift assessment.

use std::env;
use std::fs;

use serde_json::{json, Value};
use storyline::{Severity, StoryPipeline, SuggestionOptions, SuggestionScope};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example revise -- <story.json>");
        std::process::exit(1);
    }

    let story: Value = serde_json::from_str(&fs::read_to_string(&args[1])?)?;
    let pipeline = StoryPipeline::new();

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Storyline: {}", args[1]);
    println!("{}", separator);

    let generated = pipeline.generate(&story);

    println!("\n## Quality");
    println!("  Ready: {}", generated.report.ok);
    println!("  Score: {}/100", generated.report.score);
    for finding in generated.report.findings.iter().filter(|f| !f.ok) {
        let marker = match finding.severity {
            Severity::Error => "✗",
            Severity::Warn => "⚠",
            Severity::Info => "ℹ",
        };
        println!("  {} [{}] {}", marker, finding.id, finding.message);
    }

    println!("\n## Estimate");
    println!("  Points: {}", generated.estimate.points);
    println!("  {}", generated.estimate.rationale);
    for advisory in &generated.estimate.advisories {
        println!("  → {}", advisory);
    }

    let mut candidate = generated.story.clone();
    if let Some(criteria) = candidate["acceptance_criteria"].as_array_mut() {
        criteria.push(json!("Log every failed attempt within 1 second"));
        criteria.push(json!("Return an error message when the service is unavailable"));
    }

    let revision = pipeline.revise(
        &generated.story,
        &candidate,
        SuggestionScope::Field,
        Some("acceptance_criteria"),
        &SuggestionOptions::new(),
        &generated.session,
    )?;

    println!("\n## Suggestion {}", revision.suggestion.id);
    for op in &revision.suggestion.diff {
        println!("  {} {}", op.op.marker(), op.path);
    }

    println!("\n## Drift");
    println!(
        "  {} → {} ({} steps)",
        revision.drift.original_points, revision.drift.new_points, revision.drift.step_change
    );
    if let Some(signal) = &revision.drift.signal {
        println!("  {}", signal);
    }

    Ok(())
}
