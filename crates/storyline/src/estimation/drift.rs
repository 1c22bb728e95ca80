//! Scope drift between an original estimate and a re-estimate.

use serde::{Deserialize, Serialize};

use super::estimator::EstimationResult;
use super::scale::EffortPoints;

/// Scale distance at which a change counts as drift.
pub const MAJOR_STEP_CHANGE: usize = 2;

/// Outcome of comparing two estimates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftAssessment {
    pub original_points: EffortPoints,
    pub new_points: EffortPoints,
    /// Distance between the two values on the effort scale.
    pub step_change: usize,
    pub is_major: bool,
    /// Human-readable drift message, present only when drift is signalled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<String>,
}

impl DriftAssessment {
    pub fn is_signalled(&self) -> bool {
        self.signal.is_some()
    }
}

/// Compare a fresh estimate against the original one.
///
/// Drift is signalled when the new value is 13 or more, or when it moved
/// at least two positions on the scale.
pub fn assess_drift(original: EffortPoints, new: EffortPoints) -> DriftAssessment {
    let step_change = original.steps_to(new);
    let is_major = step_change >= MAJOR_STEP_CHANGE;

    let signal = if new.value() >= 13 {
        Some(format!(
            "Estimate is {} (too large for one sprint; must split).",
            new
        ))
    } else if is_major {
        Some(format!(
            "Scope changed: estimate moved from {} to {}. Consider splitting or clarifying.",
            original, new
        ))
    } else {
        None
    };

    DriftAssessment {
        original_points: original,
        new_points: new,
        step_change,
        is_major,
        signal,
    }
}

/// Caller-owned estimation state for one editing session.
///
/// `original_points` is recorded once, at generation time, and is never
/// moved by revisions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_points: Option<EffortPoints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_estimate: Option<EstimationResult>,
}

impl SessionMeta {
    /// Start a session from the first estimate.
    pub fn on_generated(estimate: EstimationResult) -> Self {
        Self {
            original_points: Some(estimate.points),
            last_estimate: Some(estimate),
        }
    }

    /// Record a re-estimate after an edit.
    ///
    /// A session with no original yet adopts this estimate as the original
    /// and reports no drift.
    pub fn on_revised(&self, estimate: EstimationResult) -> (SessionMeta, DriftAssessment) {
        let original = self.original_points.unwrap_or(estimate.points);
        let assessment = assess_drift(original, estimate.points);

        if let Some(message) = &assessment.signal {
            tracing::info!(
                original = %original,
                new = %estimate.points,
                "{}",
                message
            );
        }

        let next = SessionMeta {
            original_points: Some(original),
            last_estimate: Some(estimate),
        };
        (next, assessment)
    }
}
