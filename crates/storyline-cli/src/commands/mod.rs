//! CLI command implementations.

pub mod apply;
pub mod config;
pub mod diff;
pub mod estimate;
pub mod lint;
pub mod suggest;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use storyline::{PipelineConfig, StoryPipeline};

/// Load configuration from `--config`, or from the default sources.
pub fn load_config(config: Option<&Path>) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
    Ok(match config {
        Some(path) => PipelineConfig::load_from(path)?,
        None => PipelineConfig::load()?,
    })
}

/// Build the pipeline from `--config`, or from the default sources.
pub fn load_pipeline(config: Option<&Path>) -> Result<StoryPipeline, Box<dyn std::error::Error>> {
    Ok(StoryPipeline::with_config(load_config(config)?)?)
}

/// Read a JSON document from disk.
pub fn read_json(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("File not found: {}", path.display()).into());
    }
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| format!("Invalid JSON in {}: {}", path.display(), e).into())
}

/// Write pretty JSON to `output`, or to stdout when no path is given.
pub fn write_json<T: Serialize>(
    value: &T,
    output: Option<&PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => fs::write(path, content + "\n")?,
        None => println!("{}", content),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_json_errors() {
        let missing = read_json(Path::new("/nonexistent/story.json"));
        assert!(missing.unwrap_err().to_string().contains("File not found"));

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();
        let invalid = read_json(file.path());
        assert!(invalid.unwrap_err().to_string().contains("Invalid JSON"));
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("story.json");
        let story = serde_json::json!({"title": "Reset password"});

        write_json(&story, Some(&path)).unwrap();
        assert_eq!(read_json(&path).unwrap(), story);
    }
}
