//! Root error type for factdiff.
//!
//! Each crate carries its own error enum for the failures it owns
//! (`ModelError` for backends, `FactError` for the comparison pipeline,
//! `EvalError` for harness plumbing). This one covers what is shared:
//! identifiers, configuration, and serialization.

use thiserror::Error;

/// The main error type for factdiff configuration and shared plumbing.
#[derive(Error, Debug)]
pub enum FactDiffError {
    /// A model identifier could not be parsed.
    #[error("Invalid model identifier '{identifier}': {reason}")]
    InvalidModelId {
        /// The rejected identifier.
        identifier: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML error.
    #[error("YAML error: {0}")]
    Yaml(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FactDiffError {
    /// Create an invalid model identifier error.
    pub fn invalid_model_id(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidModelId {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

/// Result type alias using [`FactDiffError`].
pub type Result<T> = std::result::Result<T, FactDiffError>;
