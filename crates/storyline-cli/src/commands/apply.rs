//! Apply command - apply a suggestion to a story, or undo it.

use std::path::PathBuf;

use colored::Colorize;
use storyline::suggestion::{apply, undo};
use storyline::Suggestion;

use super::{read_json, write_json};

pub fn run(
    file: PathBuf,
    suggestion_file: PathBuf,
    output: Option<PathBuf>,
    undo_change: bool,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let current = read_json(&file)?;
    let suggestion: Suggestion = serde_json::from_value(read_json(&suggestion_file)?)
        .map_err(|e| format!("Invalid suggestion in {}: {}", suggestion_file.display(), e))?;

    let updated = if undo_change {
        undo(&suggestion)?
    } else {
        apply(&current, &suggestion)?
    };

    write_json(&updated, output.as_ref())?;
    if let Some(path) = &output {
        let action = if undo_change { "Undid" } else { "Applied" };
        eprintln!(
            "{} {} → {}",
            action.green(),
            suggestion.id.white().bold(),
            path.display()
        );
    }

    Ok(())
}
