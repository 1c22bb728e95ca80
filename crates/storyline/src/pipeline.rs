//! End-to-end flow: generate, then revise with drift tracking.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::estimation::{DriftAssessment, EstimationResult, Estimator, SessionMeta};
use crate::evaluation::{apply_quick_fixes, EvaluationReport, Evaluator};
use crate::story::{FieldRevision, Story};
use crate::suggestion::{build, Suggestion, SuggestionOptions, SuggestionScope};

/// Output of [`StoryPipeline::generate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generated {
    /// The candidate with quick fixes merged in.
    pub story: Value,
    /// Report on the raw candidate.
    pub report: EvaluationReport,
    /// Estimate of the fixed story.
    pub estimate: EstimationResult,
    /// Session state seeded from the estimate.
    pub session: SessionMeta,
}

/// Output of [`StoryPipeline::revise`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Revision {
    /// Proposed change, not yet applied.
    pub suggestion: Suggestion,
    /// Report on the candidate.
    pub report: EvaluationReport,
    /// Estimate of the candidate.
    pub estimate: EstimationResult,
    /// Drift of the candidate's estimate from the session's original.
    pub drift: DriftAssessment,
    /// Session state to carry into the next revision.
    pub session: SessionMeta,
}

/// Evaluator and estimator wired together.
#[derive(Debug, Clone, Default)]
pub struct StoryPipeline {
    evaluator: Evaluator,
    estimator: Estimator,
}

impl StoryPipeline {
    /// Create a pipeline with built-in rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pipeline from loaded configuration.
    pub fn with_config(config: PipelineConfig) -> Result<Self> {
        Ok(Self {
            evaluator: Evaluator::with_config(config.evaluator)?,
            estimator: Estimator::with_config(config.estimator)?,
        })
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn estimator(&self) -> &Estimator {
        &self.estimator
    }

    /// Validate a freshly generated story, normalize it and size it.
    pub fn generate(&self, candidate: &Value) -> Generated {
        let report = self.evaluator.evaluate(candidate);
        let story = apply_quick_fixes(candidate, &report);
        let estimate = self.estimator.estimate_record(&story);
        let session = SessionMeta::on_generated(estimate.clone());

        Generated {
            story,
            report,
            estimate,
            session,
        }
    }

    /// Turn a refined candidate into a suggestion against `current`, and
    /// check it for quality and effort drift.
    pub fn revise(
        &self,
        current: &Value,
        candidate: &Value,
        scope: SuggestionScope,
        field_name: Option<&str>,
        options: &SuggestionOptions,
        session: &SessionMeta,
    ) -> Result<Revision> {
        let suggestion = build(current, candidate, scope, field_name, options)?;
        let report = self.evaluator.evaluate(candidate);
        let estimate = self.estimator.estimate_record(candidate);
        let (session, drift) = session.on_revised(estimate.clone());

        if drift.is_signalled() {
            tracing::info!(
                suggestion = %suggestion.id,
                step_change = drift.step_change,
                "revision crossed the drift threshold"
            );
        }

        Ok(Revision {
            suggestion,
            report,
            estimate,
            drift,
            session,
        })
    }

    /// Field-scoped [`revise`](Self::revise) for a typed story: the
    /// candidate is `current` with one field replaced.
    pub fn revise_field(
        &self,
        current: &Story,
        revision: FieldRevision,
        options: &SuggestionOptions,
        session: &SessionMeta,
    ) -> Result<Revision> {
        let field_name = revision.field_name();
        let candidate = current.with_field(revision);
        self.revise(
            &current.to_value()?,
            &candidate.to_value()?,
            SuggestionScope::Field,
            Some(field_name),
            options,
            session,
        )
    }
}
