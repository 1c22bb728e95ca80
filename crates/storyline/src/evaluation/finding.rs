//! Finding and report types produced by the evaluator.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Severity level of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational only.
    Info,
    /// Quality issue; never blocks readiness.
    Warn,
    /// Structural defect; blocks readiness when the check fails.
    Error,
}

impl Severity {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warn => "Warning",
            Severity::Error => "Error",
        }
    }
}

/// Outcome of one evaluator rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Stable rule identifier (e.g. `ac.duplicates`).
    pub id: String,
    /// Whether the check passed.
    pub ok: bool,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
}

impl Finding {
    /// Create a finding with an explicit severity.
    pub fn new(id: impl Into<String>, ok: bool, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ok,
            severity,
            message: message.into(),
        }
    }

    /// Create a finding that is `info` when it passes and `failing` otherwise.
    pub fn check(
        id: impl Into<String>,
        ok: bool,
        failing: Severity,
        message: impl Into<String>,
    ) -> Self {
        let severity = if ok { Severity::Info } else { failing };
        Self::new(id, ok, severity, message)
    }

    /// Whether this finding blocks readiness.
    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Error && !self.ok
    }
}

/// Result of evaluating a story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// True when every error-severity finding passed.
    pub ok: bool,
    /// Weighted score, 0-100.
    pub score: u8,
    /// Findings in rule order.
    pub findings: Vec<Finding>,
    /// Normalized copy of the story; always computed.
    pub proposed_fix: Value,
}

impl EvaluationReport {
    /// Look up a finding by rule id.
    pub fn finding(&self, id: &str) -> Option<&Finding> {
        self.findings.iter().find(|f| f.id == id)
    }

    /// Failing error-severity findings.
    pub fn blocking(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_blocking())
    }

    /// Failing warn-severity findings.
    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warn && !f.ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_check_severity() {
        let pass = Finding::check("title.length", true, Severity::Warn, "Title length 14");
        let fail = Finding::check("title.length", false, Severity::Warn, "Title length 1");
        assert_eq!(pass.severity, Severity::Info);
        assert_eq!(fail.severity, Severity::Warn);
        assert!(!fail.is_blocking());
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Severity::Warn).unwrap(), json!("warn"));
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
    }

    #[test]
    fn test_report_queries() {
        let report = EvaluationReport {
            ok: false,
            score: 40,
            findings: vec![
                Finding::new("title.type", false, Severity::Error, "Title must be a string."),
                Finding::check("desc.length", false, Severity::Warn, "Description length 3"),
                Finding::check("tags.normalized", true, Severity::Info, "Tags look good."),
            ],
            proposed_fix: json!({}),
        };

        assert_eq!(report.blocking().count(), 1);
        assert_eq!(report.warnings().count(), 1);
        assert!(report.finding("tags.normalized").unwrap().ok);
        assert!(report.finding("sp.range").is_none());
    }
}
