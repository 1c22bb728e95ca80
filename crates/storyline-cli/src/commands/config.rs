//! Config command - print the configuration the other commands would use.

use std::path::{Path, PathBuf};

use storyline::StoryPipeline;

use super::{load_config, write_json};

pub fn run(
    output: Option<PathBuf>,
    config: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let effective = load_config(config)?;
    // Reject patterns that would fail later in lint or estimate.
    StoryPipeline::with_config(effective.clone())?;
    write_json(&effective, output.as_ref())
}
