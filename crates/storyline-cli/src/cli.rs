//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use storyline::SuggestionScope;

/// Storyline: lint, size and revise user stories
#[derive(Parser)]
#[command(name = "storyline")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (default: ./storyline.json if present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check a story against the quality rules
    Lint {
        /// Path to the story (JSON)
        #[arg(value_name = "STORY")]
        file: PathBuf,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,

        /// Write the story with quick fixes applied
        #[arg(long, requires = "output")]
        fix: bool,

        /// Output path for the fixed story
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Estimate story points
    Estimate {
        /// Path to the story (JSON)
        #[arg(value_name = "STORY")]
        file: PathBuf,

        /// Output the estimate as JSON
        #[arg(long)]
        json: bool,

        /// Points recorded when the story was first generated, for drift checks
        #[arg(long, value_name = "N")]
        original_points: Option<i64>,
    },

    /// Show structural changes between two stories
    Diff {
        /// Story before the change
        #[arg(value_name = "BEFORE")]
        before: PathBuf,

        /// Story after the change
        #[arg(value_name = "AFTER")]
        after: PathBuf,

        /// Output patch operations as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build a suggestion from two versions of a story
    Suggest {
        /// Story before the change
        #[arg(value_name = "BEFORE")]
        before: PathBuf,

        /// Story after the change
        #[arg(value_name = "AFTER")]
        after: PathBuf,

        /// Suggestion scope
        #[arg(long, default_value = "full")]
        scope: SuggestionScope,

        /// Field name (required with --scope field)
        #[arg(long)]
        field: Option<String>,

        /// Model recorded in the suggestion metadata
        #[arg(long)]
        model: Option<String>,

        /// Temperature recorded in the suggestion metadata
        #[arg(long, value_parser = parse_temperature)]
        temperature: Option<f64>,

        /// Mark the suggestion as retrieval-assisted
        #[arg(long)]
        retrieval: bool,

        /// Output path for the suggestion (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Apply a suggestion to a story, or undo it
    Apply {
        /// Current story
        #[arg(value_name = "STORY")]
        file: PathBuf,

        /// Suggestion file
        #[arg(value_name = "SUGGESTION")]
        suggestion: PathBuf,

        /// Output path for the updated story (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Restore the suggestion's 'before' state instead
        #[arg(long)]
        undo: bool,
    },

    /// Print the effective configuration as JSON
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Parse a sampling temperature, refusing values JSON cannot represent.
fn parse_temperature(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("Invalid temperature: {}", s))?;
    if !value.is_finite() {
        return Err(format!("Temperature must be a finite number, got {}", s));
    }
    Ok(value)
}
