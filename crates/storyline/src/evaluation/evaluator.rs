//! Quality evaluator: lints a story and proposes a normalized fix.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::story::Story;

use super::finding::{EvaluationReport, Finding, Severity};
use super::rules::{
    ids, CompiledLexicon, EvaluationLimits, EvaluatorConfig, RuleWeights, DEFAULT_LEXICON,
    REQUIRED_FIELDS,
};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Runs the fixed rule battery over a story.
///
/// Never fails on story content: missing fields, wrong types and quality
/// problems all become findings. The evaluator holds only immutable
/// configuration and can be shared across threads.
#[derive(Debug, Clone)]
pub struct Evaluator {
    limits: EvaluationLimits,
    weights: RuleWeights,
    lexicon: CompiledLexicon,
}

impl Evaluator {
    /// Create an evaluator with the built-in configuration.
    pub fn new() -> Self {
        Self {
            limits: EvaluationLimits::default(),
            weights: RuleWeights::default(),
            lexicon: DEFAULT_LEXICON.clone(),
        }
    }

    /// Create an evaluator from a custom configuration.
    pub fn with_config(config: EvaluatorConfig) -> Result<Self> {
        tracing::debug!(lexicon = %config.lexicon.version, "building evaluator");
        Ok(Self {
            lexicon: CompiledLexicon::compile(&config.lexicon)?,
            limits: config.limits,
            weights: config.weights,
        })
    }

    /// Evaluate a typed story.
    pub fn evaluate_story(&self, story: &Story) -> Result<EvaluationReport> {
        Ok(self.evaluate(&story.to_value()?))
    }

    /// Evaluate a raw story record of any shape.
    ///
    /// Rules run in a fixed order: structure, title, description, acceptance
    /// criteria, definition of done, story points, tags. A rule whose type
    /// check fails skips its content checks, and skipped checks count neither
    /// for nor against the score.
    pub fn evaluate(&self, record: &Value) -> EvaluationReport {
        let empty = Map::new();
        let fields = record.as_object().unwrap_or(&empty);

        let mut card = Scorecard::new(&self.weights);
        let mut fixed = fields.clone();

        self.check_structure(fields, &mut card);
        self.check_title(fields, &mut card, &mut fixed);
        self.check_description(fields, &mut card, &mut fixed);
        self.check_acceptance_criteria(fields, &mut card, &mut fixed);
        self.check_definition_of_done(fields, &mut card, &mut fixed);
        self.check_story_points(fields, &mut card);
        self.check_tags(fields, &mut card, &mut fixed);

        let ok = card
            .findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .all(|f| f.ok);
        let score = card.score();

        tracing::debug!(ok, score, findings = card.findings.len(), "evaluated story");

        EvaluationReport {
            ok,
            score,
            findings: card.findings,
            proposed_fix: Value::Object(fixed),
        }
    }

    fn check_structure(&self, fields: &Map<String, Value>, card: &mut Scorecard) {
        for field in REQUIRED_FIELDS {
            let present = fields.contains_key(field);
            let message = if present {
                format!("Present: {}", field)
            } else {
                format!("Missing: {}", field)
            };
            card.record(Finding::check(ids::has_field(field), present, Severity::Error, message));
        }
    }

    fn check_title(
        &self,
        fields: &Map<String, Value>,
        card: &mut Scorecard,
        fixed: &mut Map<String, Value>,
    ) {
        let title = fields.get("title").and_then(Value::as_str);
        card.record(Finding::new(
            ids::TITLE_TYPE,
            title.is_some(),
            Severity::Error,
            "Title must be a string.",
        ));

        if let Some(title) = title {
            let trimmed = title.trim();
            let len = trimmed.chars().count();
            let (min, max) = (self.limits.min_title_len, self.limits.max_title_len);
            card.record(Finding::check(
                ids::TITLE_LENGTH,
                (min..=max).contains(&len),
                Severity::Warn,
                format!("Title length {} (expected {}..{}).", len, min, max),
            ));
            fixed.insert("title".to_string(), Value::from(trimmed));
        }
    }

    fn check_description(
        &self,
        fields: &Map<String, Value>,
        card: &mut Scorecard,
        fixed: &mut Map<String, Value>,
    ) {
        let description = fields.get("description").and_then(Value::as_str);
        card.record(Finding::new(
            ids::DESC_TYPE,
            description.is_some(),
            Severity::Error,
            "Description must be a string.",
        ));

        if let Some(description) = description {
            let trimmed = description.trim();
            let len = trimmed.chars().count();
            let min = self.limits.min_description_len;
            card.record(Finding::check(
                ids::DESC_LENGTH,
                len >= min,
                Severity::Warn,
                format!("Description length {} (expected >= {}).", len, min),
            ));
            fixed.insert("description".to_string(), Value::from(trimmed));
        }
    }

    fn check_acceptance_criteria(
        &self,
        fields: &Map<String, Value>,
        card: &mut Scorecard,
        fixed: &mut Map<String, Value>,
    ) {
        let criteria = fields
            .get("acceptance_criteria")
            .and_then(Value::as_array)
            .and_then(|items| string_items(items));
        card.record(Finding::new(
            ids::AC_TYPE,
            criteria.is_some(),
            Severity::Error,
            "Acceptance criteria must be a list of strings.",
        ));
        let Some(criteria) = criteria else {
            return;
        };

        let trimmed: Vec<&str> = criteria
            .iter()
            .filter(|c| !c.trim().is_empty())
            .map(|c| c.trim().trim_end_matches('.'))
            .collect();
        card.record(Finding::check(
            ids::AC_NON_EMPTY,
            !trimmed.is_empty(),
            Severity::Error,
            "At least one acceptance criterion required.",
        ));

        let unique = dedupe_criteria(&trimmed);
        let removed = trimmed.len() - unique.len();
        let message = if removed > 0 {
            format!("Removed {} duplicate AC.", removed)
        } else {
            "No duplicate AC.".to_string()
        };
        card.record(Finding::check(ids::AC_DUPLICATES, removed == 0, Severity::Warn, message));

        let n = unique.len();
        let verbs = unique.iter().filter(|c| self.lexicon.starts_with_verb(c)).count();
        let vague = unique.iter().filter(|c| self.lexicon.is_vague(c)).count();
        let measurable = unique.iter().filter(|c| self.lexicon.is_measurable(c)).count();

        card.record(Finding::check(
            ids::AC_VERB_RATIO,
            verbs >= required_count(n, self.limits.verb_ratio),
            Severity::Warn,
            format!("{}/{} AC start with an actionable verb.", verbs, n),
        ));
        card.record(Finding::check(
            ids::AC_VAGUE_RATIO,
            vague == 0 || vague <= allowed_count(n, self.limits.vague_ceiling),
            Severity::Warn,
            format!("{}/{} AC contain vague terms (aim for 0).", vague, n),
        ));
        card.record(Finding::check(
            ids::AC_MEASURABLE_RATIO,
            measurable >= required_count(n, self.limits.measurable_ratio),
            Severity::Warn,
            format!("{}/{} AC show measurable specifics.", measurable, n),
        ));

        let normalized = unique.into_iter().map(Value::from).collect();
        fixed.insert("acceptance_criteria".to_string(), Value::Array(normalized));
    }

    fn check_definition_of_done(
        &self,
        fields: &Map<String, Value>,
        card: &mut Scorecard,
        fixed: &mut Map<String, Value>,
    ) {
        match fields.get("definition_of_done") {
            None | Some(Value::Null) => {
                card.record(Finding::new(
                    ids::DOD_PRESENT,
                    false,
                    Severity::Warn,
                    "Definition of Done missing (recommended).",
                ));
            }
            Some(Value::Array(items)) => {
                let well_formed = string_items(items)
                    .filter(|entries| !entries.is_empty())
                    .filter(|entries| entries.iter().all(|e| !e.trim().is_empty()));
                card.record(Finding::check(
                    ids::DOD_TYPE,
                    well_formed.is_some(),
                    Severity::Warn,
                    "Definition of Done should be a non-empty list of strings.",
                ));
                if let Some(entries) = well_formed {
                    let normalized = entries
                        .iter()
                        .map(|e| Value::from(e.trim().trim_end_matches('.')))
                        .collect();
                    fixed.insert("definition_of_done".to_string(), Value::Array(normalized));
                }
            }
            Some(_) => {
                card.record(Finding::new(
                    ids::DOD_TYPE,
                    false,
                    Severity::Warn,
                    "Definition of Done should be a list of strings.",
                ));
            }
        }
    }

    fn check_story_points(&self, fields: &Map<String, Value>, card: &mut Scorecard) {
        let points = match fields.get("story_points") {
            Some(Value::Number(n)) if n.is_i64() || n.is_u64() => Some(n.as_i64()),
            _ => None,
        };
        card.record(Finding::new(
            ids::SP_TYPE,
            points.is_some(),
            Severity::Error,
            "Story points must be an integer.",
        ));

        if let Some(points) = points {
            let (min, max) = (self.limits.min_story_points, self.limits.max_story_points);
            let in_range = points.is_some_and(|p| (min..=max).contains(&p));
            card.record(Finding::check(
                ids::SP_RANGE,
                in_range,
                Severity::Warn,
                format!("Story points should be between {} and {}.", min, max),
            ));
        }
    }

    fn check_tags(
        &self,
        fields: &Map<String, Value>,
        card: &mut Scorecard,
        fixed: &mut Map<String, Value>,
    ) {
        let tags = fields
            .get("tags")
            .and_then(Value::as_array)
            .and_then(|items| string_items(items));
        card.record(Finding::new(
            ids::TAGS_TYPE,
            tags.is_some(),
            Severity::Error,
            "Tags must be a list of strings.",
        ));
        let Some(tags) = tags else {
            return;
        };

        let mut normalized: Vec<String> = Vec::new();
        for tag in tags.iter().filter_map(|t| normalize_tag(t)) {
            if !normalized.contains(&tag) {
                normalized.push(tag);
            }
        }

        let mut missing: Vec<String> = Vec::new();
        for required in self.limits.required_tags.iter().filter_map(|t| normalize_tag(t)) {
            if !normalized.contains(&required) && !missing.contains(&required) {
                missing.push(required);
            }
        }

        if missing.is_empty() {
            card.note(Finding::check(
                ids::TAGS_REQUIRED,
                true,
                Severity::Warn,
                "All required tags present.",
            ));
        } else {
            card.note(Finding::check(
                ids::TAGS_REQUIRED,
                false,
                Severity::Warn,
                format!(
                    "Missing required tags (auto-added in quick-fix): {}",
                    missing.join(", ")
                ),
            ));
            normalized.extend(missing);
        }

        let unchanged = normalized.iter().map(String::as_str).eq(tags.iter().copied());
        let message = if unchanged {
            "Tags look good.".to_string()
        } else {
            format!("Normalized/deduped tags: {}", normalized.join(", "))
        };
        card.note(Finding::new(ids::TAGS_NORMALIZED, unchanged, Severity::Info, message));

        let normalized = normalized.into_iter().map(Value::from).collect();
        fixed.insert("tags".to_string(), Value::Array(normalized));
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Findings plus the running weighted score.
struct Scorecard<'w> {
    weights: &'w RuleWeights,
    findings: Vec<Finding>,
    earned: u32,
    possible: u32,
}

impl<'w> Scorecard<'w> {
    fn new(weights: &'w RuleWeights) -> Self {
        Self {
            weights,
            findings: Vec::new(),
            earned: 0,
            possible: 0,
        }
    }

    /// Record a scored finding.
    fn record(&mut self, finding: Finding) {
        let weight = self.weights.weight(&finding.id);
        self.possible += weight;
        if finding.ok {
            self.earned += weight;
        }
        self.findings.push(finding);
    }

    /// Record a finding that does not affect the score.
    fn note(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    fn score(&self) -> u8 {
        if self.possible == 0 {
            return 0;
        }
        (f64::from(self.earned) * 100.0 / f64::from(self.possible)).round() as u8
    }
}

/// All items as strings, or `None` if any item is not a string.
fn string_items(items: &[Value]) -> Option<Vec<&str>> {
    items.iter().map(Value::as_str).collect()
}

/// Deduplicate case- and whitespace-insensitively, keeping first occurrences.
fn dedupe_criteria<'a>(criteria: &[&'a str]) -> Vec<&'a str> {
    let mut seen = std::collections::HashSet::new();
    criteria
        .iter()
        .copied()
        .filter(|c| seen.insert(WHITESPACE.replace_all(&c.to_lowercase(), " ").into_owned()))
        .collect()
}

/// Trim, lowercase and hyphenate internal whitespace; blank tags vanish.
fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(WHITESPACE.replace_all(&trimmed.to_lowercase(), "-").into_owned())
}

/// Matches needed to meet `ratio` over `n` items; always at least one.
fn required_count(n: usize, ratio: f64) -> usize {
    ((n as f64 * ratio).floor() as usize).max(1)
}

/// Matches tolerated under a `ceiling` ratio over `n` items.
fn allowed_count(n: usize, ceiling: f64) -> usize {
    (n as f64 * ceiling).floor() as usize
}
