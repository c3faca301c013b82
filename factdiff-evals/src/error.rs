//! Evaluation errors.
//!
//! Scoring a single sample never fails (failures become null scores); these
//! errors cover harness plumbing such as loading datasets and setting up runs.

use thiserror::Error;

/// Errors that can occur during evaluation.
#[derive(Debug, Error)]
pub enum EvalError {
    /// Dataset loading error.
    #[error("Failed to load dataset: {0}")]
    DatasetLoad(String),

    /// Task setup or execution error.
    #[error("Task execution failed: {0}")]
    TaskFailed(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error.
    #[error("YAML error: {0}")]
    Yaml(String),

    /// Other error.
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl EvalError {
    /// Create a dataset load error.
    pub fn dataset_load(msg: impl Into<String>) -> Self {
        Self::DatasetLoad(msg.into())
    }

    /// Create a task failed error.
    pub fn task_failed(msg: impl Into<String>) -> Self {
        Self::TaskFailed(msg.into())
    }
}

impl From<serde_yaml::Error> for EvalError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err.to_string())
    }
}

/// Result type for evaluation operations.
pub type EvalResult<T> = Result<T, EvalError>;
