//! Error types for the Storyline library.

use thiserror::Error;

/// Contract violations raised by the suggestion manager.
///
/// These indicate a caller bug rather than a data-quality problem, so they are
/// kept apart from anything the evaluator reports as a finding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A field-scoped suggestion was requested without naming the field.
    #[error("field_name is required when scope is 'field'")]
    MissingFieldName,

    /// A suggestion snapshot is not a well-formed record.
    #[error("Malformed suggestion: {reason}")]
    MalformedSuggestion { reason: String },
}

/// Main error type for Storyline operations.
#[derive(Debug, Error)]
pub enum StorylineError {
    /// Suggestion manager contract violation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Story points value that is not on the effort scale.
    #[error("Story points {0} are not on the effort scale (1, 2, 3, 5, 8, 13, 21)")]
    InvalidPoints(i64),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error in a lexicon pattern.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Configuration extraction error.
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl From<figment::Error> for StorylineError {
    fn from(err: figment::Error) -> Self {
        StorylineError::Config(Box::new(err))
    }
}

/// Result type alias for Storyline operations.
pub type Result<T> = std::result::Result<T, StorylineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(
            ValidationError::MissingFieldName.to_string(),
            "field_name is required when scope is 'field'"
        );

        let err = ValidationError::MalformedSuggestion {
            reason: "'after' is not an object".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed suggestion: 'after' is not an object");
    }

    #[test]
    fn test_validation_error_converts() {
        let err: StorylineError = ValidationError::MissingFieldName.into();
        assert!(matches!(
            err,
            StorylineError::Validation(ValidationError::MissingFieldName)
        ));
    }
}
