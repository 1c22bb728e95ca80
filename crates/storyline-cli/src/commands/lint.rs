//! Lint command - run the quality rules over a story.

use std::path::{Path, PathBuf};

use colored::Colorize;
use storyline::{apply_quick_fixes, EvaluationReport, Finding, Severity};

use super::{load_pipeline, read_json, write_json};

pub fn run(
    file: PathBuf,
    json_output: bool,
    fix: bool,
    output: Option<PathBuf>,
    config: Option<&Path>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let story = read_json(&file)?;
    let pipeline = load_pipeline(config)?;
    let report = pipeline.evaluator().evaluate(&story);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&file, &report, verbose);
    }

    if fix {
        let fixed = apply_quick_fixes(&story, &report);
        write_json(&fixed, output.as_ref())?;
        if let Some(path) = &output {
            eprintln!("{} {}", "Wrote fixed story to".green(), path.display());
        }
    }

    Ok(())
}

fn print_report(file: &Path, report: &EvaluationReport, verbose: bool) {
    let verdict = if report.ok {
        "READY".green().bold()
    } else {
        "NOT READY".red().bold()
    };
    println!(
        "{} {} {} (score {}/100)",
        "Lint".cyan().bold(),
        file.display().to_string().white(),
        verdict,
        report.score
    );
    println!();

    for finding in &report.findings {
        if finding.ok && !verbose {
            continue;
        }
        let marker = if finding.ok {
            "✓".green()
        } else {
            match finding.severity {
                Severity::Error => "✗".red(),
                Severity::Warn => "⚠".yellow(),
                Severity::Info => "ℹ".blue(),
            }
        };
        println!("  {} {}", marker, finding_line(finding));
    }

    let errors = report.blocking().count();
    let warnings = report.warnings().count();
    println!();
    println!(
        "{} error(s), {} warning(s)",
        errors.to_string().red().bold(),
        warnings.to_string().yellow().bold()
    );
}

/// Severity label, rule id and message of one finding.
fn finding_line(finding: &Finding) -> String {
    format!(
        "{:<7} {} {}",
        finding.severity.label(),
        finding.id,
        finding.message
    )
}
