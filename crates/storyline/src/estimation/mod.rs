//! Effort estimation and scope drift detection.

mod drift;
mod estimator;
mod scale;

pub use drift::{assess_drift, DriftAssessment, SessionMeta, MAJOR_STEP_CHANGE};
pub use estimator::{
    ComplexityBreakdown, EstimationComponents, EstimationResult, Estimator, EstimatorConfig,
    UnknownLevel, ADVISORY_BATCH, ADVISORY_CLARIFY_UNKNOWNS, ADVISORY_CONSIDER_SPLIT,
    ADVISORY_MUST_SPLIT,
};
pub use scale::{EffortPoints, EFFORT_SCALE};
