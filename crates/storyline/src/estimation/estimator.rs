//! Heuristic story point estimator.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::story::Story;

use super::scale::EffortPoints;

/// Advisory for stories of 13 points or more.
pub const ADVISORY_MUST_SPLIT: &str = "Too large for one sprint; must split";
/// Advisory for stories above 8 but below 13 points.
pub const ADVISORY_CONSIDER_SPLIT: &str = "Consider splitting: baseline > 8 points";
/// Advisory when unknowns are high.
pub const ADVISORY_CLARIFY_UNKNOWNS: &str = "Unknowns high: add clarifications / DoR checks";
/// Advisory for one-point stories.
pub const ADVISORY_BATCH: &str = "Very small: consider batching with adjacent work";

/// How much uncertainty the story text signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownLevel {
    Low,
    Med,
    High,
}

impl UnknownLevel {
    /// Complexity weight added for this level.
    pub fn weight(self) -> i64 {
        match self {
            UnknownLevel::Low => 0,
            UnknownLevel::Med => 1,
            UnknownLevel::High => 3,
        }
    }

    fn from_hits(hits: usize) -> Self {
        match hits {
            0 | 1 => UnknownLevel::Low,
            2 => UnknownLevel::Med,
            _ => UnknownLevel::High,
        }
    }
}

impl std::fmt::Display for UnknownLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnknownLevel::Low => write!(f, "low"),
            UnknownLevel::Med => write!(f, "med"),
            UnknownLevel::High => write!(f, "high"),
        }
    }
}

/// Duration and complexity sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimationComponents {
    pub duration: i64,
    pub complexity: i64,
}

/// Inputs to the complexity sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityBreakdown {
    pub steps: i64,
    pub unknowns: UnknownLevel,
}

/// Result of estimating a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimationResult {
    /// Estimated effort.
    pub points: EffortPoints,
    /// Duration and complexity sub-scores.
    pub components: EstimationComponents,
    /// Steps and unknowns behind the complexity score.
    pub complexity_breakdown: ComplexityBreakdown,
    /// Human-readable trace of the computation.
    pub rationale: String,
    /// Fixed warning strings.
    pub advisories: Vec<String>,
}

impl EstimationResult {
    /// Whether a given advisory was raised.
    pub fn has_advisory(&self, advisory: &str) -> bool {
        self.advisories.iter().any(|a| a == advisory)
    }
}

/// Cue lists driving the estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Version tag, logged when an estimator is built and shown by `storyline config`.
    pub version: String,
    /// Whole-word transition/imperative cues counted in the description.
    pub step_cues: Vec<String>,
    /// Substring cues signalling uncertainty; each counts once.
    pub uncertainty_cues: Vec<String>,
    /// Cap on step cues added to the step count.
    pub max_step_hints: usize,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        let steps = ["then", "and", "next", "verify", "click", "enter", "submit"];
        let unknowns = [
            "tbd",
            "unknown",
            "investigate",
            "spike",
            "blocked",
            "requires access",
            "integrate",
            "dependency",
            "external",
            "not defined",
            "new pattern",
        ];
        Self {
            version: "1".to_string(),
            step_cues: steps.iter().map(|s| s.to_string()).collect(),
            uncertainty_cues: unknowns.iter().map(|s| s.to_string()).collect(),
            max_step_hints: 5,
        }
    }
}

static DEFAULT_ESTIMATOR: Lazy<Estimator> =
    Lazy::new(|| Estimator::with_config(EstimatorConfig::default()).unwrap());

/// Scores stories onto the effort scale.
#[derive(Debug, Clone)]
pub struct Estimator {
    step_pattern: Option<Regex>,
    uncertainty_cues: Vec<String>,
    max_step_hints: usize,
}

impl Estimator {
    /// Create an estimator with the built-in cue lists.
    pub fn new() -> Self {
        DEFAULT_ESTIMATOR.clone()
    }

    /// Create an estimator from custom cue lists.
    pub fn with_config(config: EstimatorConfig) -> Result<Self> {
        tracing::debug!(version = %config.version, "building estimator");
        let cues: Vec<String> = config
            .step_cues
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(regex::escape)
            .collect();
        let step_pattern = if cues.is_empty() {
            None
        } else {
            let source = format!(r"\b({})\b", cues.join("|"));
            Some(RegexBuilder::new(&source).case_insensitive(true).build()?)
        };

        Ok(Self {
            step_pattern,
            uncertainty_cues: config
                .uncertainty_cues
                .iter()
                .map(|c| c.trim().to_lowercase())
                .filter(|c| !c.is_empty())
                .collect(),
            max_step_hints: config.max_step_hints,
        })
    }

    /// Estimate a story.
    ///
    /// `steps` is the number of criteria plus capped step cues in the
    /// description; unknowns grade the distinct uncertainty cues across
    /// description and criteria. Duration and complexity are summed and
    /// rounded up onto the effort scale.
    pub fn estimate(&self, story: &Story) -> EstimationResult {
        self.estimate_parts(
            story.description.as_deref().unwrap_or_default(),
            story.acceptance_criteria.as_deref().unwrap_or_default(),
        )
    }

    /// Estimate a raw JSON record.
    ///
    /// A non-string description counts as empty and non-string criteria are
    /// skipped, so any record shape gets an estimate.
    pub fn estimate_record(&self, record: &Value) -> EstimationResult {
        let description = record
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let criteria: Vec<String> = record
            .get("acceptance_criteria")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        self.estimate_parts(description, &criteria)
    }

    fn estimate_parts(&self, description: &str, acceptance_criteria: &[String]) -> EstimationResult {
        let criteria = acceptance_criteria.len() as i64;
        let steps = criteria + self.step_hints(description) as i64;
        let unknowns = self.classify_unknowns(description, acceptance_criteria);

        let duration = ((criteria as f64) * 0.8).round().max(1.0) as i64;
        let complexity = (((steps as f64) * 0.6).round() as i64 + unknowns.weight()).max(0);
        let points = EffortPoints::at_least(duration + complexity);

        let mut advisories = Vec::new();
        if points.value() >= 13 {
            advisories.push(ADVISORY_MUST_SPLIT.to_string());
        } else if points.value() > 8 {
            advisories.push(ADVISORY_CONSIDER_SPLIT.to_string());
        }
        if unknowns == UnknownLevel::High {
            advisories.push(ADVISORY_CLARIFY_UNKNOWNS.to_string());
        }
        if points == EffortPoints::MIN {
            advisories.push(ADVISORY_BATCH.to_string());
        }

        let rationale = format!(
            "Duration ≈ {}; Complexity ≈ {} (steps={}, unknowns={}). Estimate={}.",
            duration, complexity, steps, unknowns, points
        );

        tracing::debug!(points = %points, steps, unknowns = %unknowns, "estimated story");

        EstimationResult {
            points,
            components: EstimationComponents {
                duration,
                complexity,
            },
            complexity_breakdown: ComplexityBreakdown { steps, unknowns },
            rationale,
            advisories,
        }
    }

    fn step_hints(&self, description: &str) -> usize {
        self.step_pattern
            .as_ref()
            .map(|rx| rx.find_iter(description).count())
            .unwrap_or(0)
            .min(self.max_step_hints)
    }

    fn classify_unknowns(&self, description: &str, criteria: &[String]) -> UnknownLevel {
        let haystack = format!("{} {}", description, criteria.join(" ")).to_lowercase();
        let hits = self
            .uncertainty_cues
            .iter()
            .filter(|cue| haystack.contains(cue.as_str()))
            .count();
        UnknownLevel::from_hits(hits)
    }
}

impl Default for Estimator {
    fn default() -> Self {
        Self::new()
    }
}
