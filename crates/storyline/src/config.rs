//! Layered configuration loading using figment.
//!
//! Sources, lowest to highest priority:
//! 1. Built-in defaults
//! 2. A JSON file (`storyline.json` in the working directory, or an explicit path)
//! 3. Environment variables (`STORYLINE_*` prefix, `__` as separator)
//!
//! `STORYLINE_EVALUATOR__LIMITS__MAX_STORY_POINTS=8` maps to
//! `evaluator.limits.max_story_points`.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Json, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::estimation::EstimatorConfig;
use crate::evaluation::EvaluatorConfig;

/// File picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "storyline.json";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "STORYLINE_";

/// Configuration for the whole pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub evaluator: EvaluatorConfig,
    #[serde(default)]
    pub estimator: EstimatorConfig,
}

impl PipelineConfig {
    /// Load from defaults, `storyline.json` (if present) and the environment.
    pub fn load() -> Result<Self> {
        Ok(Self::figment().extract()?)
    }

    /// Load using an explicit configuration file instead of `storyline.json`.
    ///
    /// A missing file is an error here, unlike the implicit lookup.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Json::file_exact(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        let config = figment.extract()?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Build the provider chain.
    ///
    /// Public so callers can add providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let local_path = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Json::file(local_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorylineError;
    use figment::Jail;

    #[test]
    fn test_defaults_without_files() {
        Jail::expect_with(|_jail| {
            let config = PipelineConfig::load().expect("defaults load");
            assert_eq!(config, PipelineConfig::default());
            assert_eq!(config.evaluator.limits.max_story_points, 13);
            assert_eq!(config.estimator.max_step_hints, 5);
            Ok(())
        });
    }

    #[test]
    fn test_local_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                r#"{
                    "evaluator": {
                        "limits": { "min_description_len": 40, "required_tags": ["team-a"] },
                        "weights": { "title.type": 9 }
                    },
                    "estimator": { "uncertainty_cues": ["vendor"] }
                }"#,
            )?;

            let config = PipelineConfig::load().expect("file loads");
            assert_eq!(config.evaluator.limits.min_description_len, 40);
            assert_eq!(config.evaluator.limits.max_title_len, 120);
            assert_eq!(config.evaluator.limits.required_tags, vec!["team-a"]);
            assert_eq!(config.evaluator.weights.weight("title.type"), 9);
            assert_eq!(config.evaluator.weights.weight("title.length"), 5);
            assert_eq!(config.estimator.uncertainty_cues, vec!["vendor"]);
            assert_eq!(config.estimator.step_cues.len(), 7);
            Ok(())
        });
    }

    #[test]
    fn test_env_beats_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                r#"{ "evaluator": { "limits": { "max_story_points": 21 } } }"#,
            )?;
            jail.set_env("STORYLINE_EVALUATOR__LIMITS__MAX_STORY_POINTS", "8");
            jail.set_env("STORYLINE_ESTIMATOR__MAX_STEP_HINTS", "2");

            let config = PipelineConfig::load().expect("env loads");
            assert_eq!(config.evaluator.limits.max_story_points, 8);
            assert_eq!(config.estimator.max_step_hints, 2);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_path() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.json", r#"{ "estimator": { "max_step_hints": 1 } }"#)?;

            let config = PipelineConfig::load_from("custom.json").expect("explicit file loads");
            assert_eq!(config.estimator.max_step_hints, 1);

            let missing = PipelineConfig::load_from("missing.json");
            assert!(matches!(missing, Err(StorylineError::Config(_))));
            Ok(())
        });
    }
}
