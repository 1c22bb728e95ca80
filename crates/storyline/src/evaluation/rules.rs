//! Evaluator configuration: thresholds, lexical rule lists and rule weights.
//!
//! Everything here is plain data with serde support so that rule tuning is a
//! configuration change. [`CompiledLexicon`] is the runtime form of a
//! [`Lexicon`].

use std::collections::HashSet;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StorylineError};

/// Stable rule identifiers.
pub mod ids {
    pub const TITLE_TYPE: &str = "title.type";
    pub const TITLE_LENGTH: &str = "title.length";
    pub const DESC_TYPE: &str = "desc.type";
    pub const DESC_LENGTH: &str = "desc.length";
    pub const AC_TYPE: &str = "ac.type";
    pub const AC_NON_EMPTY: &str = "ac.non_empty";
    pub const AC_DUPLICATES: &str = "ac.duplicates";
    pub const AC_VERB_RATIO: &str = "ac.starts_with_verb_ratio";
    pub const AC_VAGUE_RATIO: &str = "ac.vague_ratio";
    pub const AC_MEASURABLE_RATIO: &str = "ac.measurable_ratio";
    pub const DOD_TYPE: &str = "dod.type";
    pub const DOD_PRESENT: &str = "dod.present";
    pub const SP_TYPE: &str = "sp.type";
    pub const SP_RANGE: &str = "sp.range";
    pub const TAGS_TYPE: &str = "tags.type";
    pub const TAGS_REQUIRED: &str = "tags.required";
    pub const TAGS_NORMALIZED: &str = "tags.normalized";

    /// Rule id of the presence check for a required field.
    pub fn has_field(field: &str) -> String {
        format!("struct.has_{}", field)
    }
}

/// Fields every story must carry.
pub const REQUIRED_FIELDS: [&str; 5] = [
    "title",
    "description",
    "acceptance_criteria",
    "story_points",
    "tags",
];

/// Numeric thresholds and required tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationLimits {
    /// Minimum trimmed title length, in characters.
    pub min_title_len: usize,
    /// Maximum trimmed title length, in characters.
    pub max_title_len: usize,
    /// Minimum trimmed description length, in characters.
    pub min_description_len: usize,
    /// Lowest acceptable story points value.
    pub min_story_points: i64,
    /// Highest acceptable story points value (one sprint).
    pub max_story_points: i64,
    /// Minimum share of criteria starting with an action verb.
    pub verb_ratio: f64,
    /// Maximum share of criteria containing vague language.
    pub vague_ceiling: f64,
    /// Minimum share of criteria with measurable specifics.
    pub measurable_ratio: f64,
    /// Tags every story must carry, appended in this order when missing.
    pub required_tags: Vec<String>,
}

impl Default for EvaluationLimits {
    fn default() -> Self {
        Self {
            min_title_len: 3,
            max_title_len: 120,
            min_description_len: 20,
            min_story_points: 1,
            max_story_points: 13,
            verb_ratio: 0.5,
            vague_ceiling: 0.25,
            measurable_ratio: 1.0 / 3.0,
            required_tags: vec!["chatgpt".to_string(), "ai-story-gen".to_string()],
        }
    }
}

/// Lexical rule lists used by the acceptance-criteria checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    /// Version tag, logged when an evaluator is built and shown by `storyline config`.
    pub version: String,
    /// Accepted leading verbs (base form, lowercase).
    pub action_verbs: Vec<String>,
    /// Patterns flagging vague, untestable language.
    pub vague_patterns: Vec<String>,
    /// Patterns signalling measurable, specific criteria.
    pub measurable_patterns: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        let verbs = [
            "allow", "prevent", "display", "show", "hide", "return", "send", "log", "store",
            "validate", "reject", "accept", "apply", "calculate", "update", "create", "delete",
            "paginate", "mask", "encrypt", "truncate", "format",
        ];
        Self {
            version: "1".to_string(),
            action_verbs: verbs.iter().map(|v| v.to_string()).collect(),
            vague_patterns: vec![
                r"\b(maybe|should|could|might|ideally|nice to have)\b".to_string(),
                r"\b(etc\.?|and so on)\b".to_string(),
                r"\b(user-friendly|intuitive|fast|optimi[sz]e|robust|scalable)\b".to_string(),
            ],
            measurable_patterns: vec![
                r"\bwithin\s+\d+\s*(ms|s|sec|seconds|minutes|min|hours|days)\b".to_string(),
                r"\b(at\s+least|no\s+more\s+than|up\s+to|fewer\s+than|less\s+than)\s+\d+"
                    .to_string(),
                r"\b\d+\s*(errors|items|retries|attempts|characters|fields|records|results)\b"
                    .to_string(),
                r"\b(returns|displays|sends|logs|stores|validates|rejects|applies)\b".to_string(),
            ],
        }
    }
}

/// Score weight per rule id. Rules missing from the table weigh nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleWeights(IndexMap<String, u32>);

impl RuleWeights {
    /// Weight of a rule.
    pub fn weight(&self, id: &str) -> u32 {
        self.0.get(id).copied().unwrap_or(0)
    }

    /// Override the weight of a rule.
    pub fn with_weight(mut self, id: impl Into<String>, weight: u32) -> Self {
        self.0.insert(id.into(), weight);
        self
    }
}

impl Default for RuleWeights {
    fn default() -> Self {
        let mut table = IndexMap::new();
        for field in REQUIRED_FIELDS {
            let weight = if matches!(field, "title" | "acceptance_criteria") { 10 } else { 6 };
            table.insert(ids::has_field(field), weight);
        }
        for (id, weight) in [
            (ids::TITLE_TYPE, 6),
            (ids::TITLE_LENGTH, 5),
            (ids::DESC_TYPE, 6),
            (ids::DESC_LENGTH, 5),
            (ids::AC_TYPE, 10),
            (ids::AC_NON_EMPTY, 8),
            (ids::AC_DUPLICATES, 3),
            (ids::AC_VERB_RATIO, 6),
            (ids::AC_VAGUE_RATIO, 5),
            (ids::AC_MEASURABLE_RATIO, 4),
            (ids::DOD_TYPE, 3),
            (ids::DOD_PRESENT, 3),
            (ids::SP_TYPE, 6),
            (ids::SP_RANGE, 4),
            (ids::TAGS_TYPE, 5),
        ] {
            table.insert(id.to_string(), weight);
        }
        Self(table)
    }
}

/// Full evaluator configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    pub limits: EvaluationLimits,
    pub lexicon: Lexicon,
    pub weights: RuleWeights,
}

/// Compiled, case-insensitive form of a [`Lexicon`].
#[derive(Debug, Clone)]
pub struct CompiledLexicon {
    verbs: HashSet<String>,
    vague: Vec<Regex>,
    measurable: Vec<Regex>,
}

pub(crate) static DEFAULT_LEXICON: Lazy<CompiledLexicon> =
    Lazy::new(|| CompiledLexicon::compile(&Lexicon::default()).unwrap());

impl CompiledLexicon {
    /// Compile every pattern of a lexicon.
    pub fn compile(lexicon: &Lexicon) -> Result<Self> {
        Ok(Self {
            verbs: lexicon.action_verbs.iter().map(|v| v.trim().to_lowercase()).collect(),
            vague: compile_all(&lexicon.vague_patterns)?,
            measurable: compile_all(&lexicon.measurable_patterns)?,
        })
    }

    /// Whether the first word is an accepted action verb.
    ///
    /// Trailing `s` is stripped so "Displays" matches "display".
    pub fn starts_with_verb(&self, text: &str) -> bool {
        text.split_whitespace()
            .next()
            .map(|word| word.to_lowercase())
            .is_some_and(|word| self.verbs.contains(word.trim_end_matches('s')))
    }

    /// Whether the text contains vague language.
    pub fn is_vague(&self, text: &str) -> bool {
        self.vague.iter().any(|rx| rx.is_match(text))
    }

    /// Whether the text contains measurable specifics.
    pub fn is_measurable(&self, text: &str) -> bool {
        self.measurable.iter().any(|rx| rx.is_match(text))
    }
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .map_err(StorylineError::from)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = RuleWeights::default();
        assert_eq!(weights.weight("struct.has_title"), 10);
        assert_eq!(weights.weight("struct.has_tags"), 6);
        assert_eq!(weights.weight(ids::AC_TYPE), 10);
        assert_eq!(weights.weight(ids::TAGS_REQUIRED), 0);
        assert_eq!(weights.weight("no.such.rule"), 0);

        let tuned = weights.with_weight(ids::SP_RANGE, 9);
        assert_eq!(tuned.weight(ids::SP_RANGE), 9);
    }

    #[test]
    fn test_verb_detection() {
        let lex = &*DEFAULT_LEXICON;
        assert!(lex.starts_with_verb("Display a success message"));
        assert!(lex.starts_with_verb("Sends a reset email"));
        assert!(lex.starts_with_verb("  validates input"));
        assert!(!lex.starts_with_verb("The page loads"));
        assert!(!lex.starts_with_verb(""));
    }

    #[test]
    fn test_vague_and_measurable() {
        let lex = &*DEFAULT_LEXICON;
        assert!(lex.is_vague("The page should be FAST"));
        assert!(lex.is_vague("Support PDF, DOCX, etc."));
        assert!(!lex.is_vague("Display a success message within 2 seconds"));

        assert!(lex.is_measurable("Display a success message within 2 seconds"));
        assert!(lex.is_measurable("Lock the account after at least 5 attempts"));
        assert!(lex.is_measurable("Show 20 results per page"));
        assert!(!lex.is_measurable("Make it nice"));
    }

    #[test]
    fn test_bad_pattern_is_an_error() {
        let lexicon = Lexicon {
            vague_patterns: vec!["(unclosed".to_string()],
            ..Lexicon::default()
        };
        assert!(CompiledLexicon::compile(&lexicon).is_err());
    }

    #[test]
    fn test_partial_config_deserializes() {
        let config: EvaluatorConfig =
            serde_json::from_str(r#"{"limits": {"max_story_points": 8}}"#).unwrap();
        assert_eq!(config.limits.max_story_points, 8);
        assert_eq!(config.limits.min_title_len, 3);
        assert_eq!(config.lexicon, Lexicon::default());
    }
}
