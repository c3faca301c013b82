//! Error types for fact extraction and comparison.

use factdiff_models::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The pipeline stage a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Extracting facts from the reference context.
    ExtractContext,
    /// Extracting facts from the answer.
    ExtractAnswer,
    /// Comparing the two fact lists.
    Compare,
}

impl Stage {
    /// Stable lowercase name, used in logs and score metadata.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::ExtractContext => "extract_context",
            Stage::ExtractAnswer => "extract_answer",
            Stage::Compare => "compare",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The comparison completion could not be decoded into the three fact buckets.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// No JSON object anywhere in the completion.
    #[error("no JSON object found in comparison output")]
    NoJsonFound,

    /// Something that looked like JSON failed to parse.
    #[error("malformed JSON in comparison output: {0}")]
    Malformed(#[source] serde_json::Error),

    /// Top-level JSON value was not an object.
    #[error("expected a JSON object, got {found}")]
    NotAnObject {
        /// JSON type that was found.
        found: &'static str,
    },

    /// A required key was absent.
    #[error("missing required key '{0}'")]
    MissingKey(&'static str),

    /// A required key held something other than an array.
    #[error("key '{key}' must be an array of strings, got {found}")]
    WrongType {
        /// The key.
        key: &'static str,
        /// JSON type that was found.
        found: &'static str,
    },

    /// An array element was not a string.
    #[error("key '{key}' element {index} must be a string, got {found}")]
    NonStringElement {
        /// The key.
        key: &'static str,
        /// Position in the array.
        index: usize,
        /// JSON type that was found.
        found: &'static str,
    },

    /// A key outside the three known buckets was present.
    #[error("unexpected key '{0}'")]
    UnexpectedKey(String),
}

/// Errors raised by the comparison pipeline.
#[derive(Debug, Error)]
pub enum FactError {
    /// The generation backend failed.
    #[error("generation failed during {stage}: {source}")]
    Generation {
        /// Which stage called the backend.
        stage: Stage,
        /// The backend error.
        #[source]
        source: ModelError,
    },

    /// The comparison output was unusable.
    #[error("invalid comparison output: {0}")]
    Validation(#[from] ValidationError),
}

impl FactError {
    /// Create a generation error for a stage.
    pub fn generation(stage: Stage, source: ModelError) -> Self {
        Self::Generation { stage, source }
    }

    /// The stage the error is attributed to.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            FactError::Generation { stage, .. } => *stage,
            FactError::Validation(_) => Stage::Compare,
        }
    }

    /// Coarse failure kind.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            FactError::Generation { .. } => FailureKind::Generation,
            FactError::Validation(_) => FailureKind::Validation,
        }
    }
}

/// Coarse classification of a pipeline failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The backend call failed.
    Generation,
    /// The backend answered but the output could not be decoded.
    Validation,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Generation => f.write_str("generation"),
            FailureKind::Validation => f.write_str("validation"),
        }
    }
}

/// Result type for fact operations.
pub type FactResult<T> = Result<T, FactError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_error_display() {
        let err = FactError::generation(Stage::ExtractAnswer, ModelError::api("overloaded"));
        assert_eq!(
            err.to_string(),
            "generation failed during extract_answer: API error: overloaded"
        );
        assert_eq!(err.stage(), Stage::ExtractAnswer);
        assert_eq!(err.kind(), FailureKind::Generation);
    }

    #[test]
    fn test_validation_error_is_compare_stage() {
        let err: FactError = ValidationError::MissingKey("facts_in_both").into();
        assert_eq!(err.stage(), Stage::Compare);
        assert_eq!(err.kind(), FailureKind::Validation);
        assert!(err.to_string().contains("facts_in_both"));
    }
}
