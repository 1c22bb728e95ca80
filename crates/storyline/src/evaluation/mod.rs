//! Quality evaluator for story records.
//!
//! The evaluator follows a "lint, don't throw" contract: every defect in a
//! story, including missing fields and wrong types, becomes a [`Finding`].
//! Readiness is `ok`, computed over error-severity findings only.

mod evaluator;
mod finding;
mod quick_fix;
mod rules;

pub use evaluator::Evaluator;
pub use finding::{EvaluationReport, Finding, Severity};
pub use quick_fix::{apply_quick_fixes, apply_quick_fixes_to_story, QUICK_FIX_FIELDS};
pub use rules::{
    ids, CompiledLexicon, EvaluationLimits, EvaluatorConfig, Lexicon, RuleWeights,
    REQUIRED_FIELDS,
};
