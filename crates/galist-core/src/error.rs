//! Exercise lifecycle error types.
//!
//! These cover caller mistakes (unknown template keys, wrong call order,
//! malformed template definitions). Grading never produces one of these;
//! it degrades to a failed [`ValidationResult`](crate::model::ValidationResult)
//! instead.

use thiserror::Error;

/// Errors surfaced by the template registry and the exercise manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExerciseError {
    /// No template is registered under the requested key.
    #[error("exercise template \"{0}\" not found")]
    TemplateNotFound(String),

    /// A submission arrived before any exercise was loaded.
    #[error("no exercise loaded")]
    NoExerciseLoaded,

    /// A template violates the registry contract.
    #[error("invalid template \"{key}\": {reason}")]
    InvalidTemplate { key: String, reason: String },
}

impl ExerciseError {
    /// Returns `true` if the error comes from calling the manager out of order.
    pub fn is_sequencing(&self) -> bool {
        matches!(self, ExerciseError::NoExerciseLoaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            ExerciseError::TemplateNotFound("nope".into()).to_string(),
            "exercise template \"nope\" not found"
        );
        assert_eq!(ExerciseError::NoExerciseLoaded.to_string(), "no exercise loaded");
        assert!(ExerciseError::NoExerciseLoaded.is_sequencing());
        assert!(!ExerciseError::TemplateNotFound("x".into()).is_sequencing());
    }
}
