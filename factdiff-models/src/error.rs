//! Errors raised by generation backends.

use std::time::Duration;
use thiserror::Error;

/// A failed generation call.
///
/// The OpenAI backend maps response statuses onto these variants; the mock
/// backends surface queued errors as [`ModelError::Api`].
#[derive(Debug, Error)]
pub enum ModelError {
    /// Non-2xx response whose body was not a structured API error.
    #[error("HTTP {status}: {body}")]
    Http {
        /// Status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Structured error reported by the backend.
    #[error("API error: {message}")]
    Api {
        /// Message from the error body.
        message: String,
        /// Provider error code, when the body carried one.
        code: Option<String>,
    },

    /// The request did not finish in time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// 429 from the backend.
    #[error("rate limited (retry-after: {retry_after:?})")]
    RateLimited {
        /// Value of the `retry-after` header.
        retry_after: Option<Duration>,
    },

    /// 401 from the backend.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// 404 from the backend, usually an unknown model name.
    #[error("model not found: {0}")]
    NotFound(String),

    /// A 2xx response that could not be turned into a completion.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The model refused to answer.
    #[error("content filtered: {0}")]
    ContentFiltered(String),

    /// The backend could not be reached.
    #[error("connection error: {0}")]
    Connection(String),

    /// Bad identifier, missing credentials or an unusable base URL.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Any other transport failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ModelError {
    /// Structured API error without a code.
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
            code: None,
        }
    }

    /// Rate-limit error.
    pub fn rate_limited(retry_after: Option<Duration>) -> Self {
        Self::RateLimited { retry_after }
    }

    /// Unstructured HTTP failure.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Authentication failure.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    /// Unusable response.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// Configuration failure.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            ModelError::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            ModelError::http(status.as_u16(), err.to_string())
        } else {
            ModelError::Other(err.into())
        }
    }
}

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display() {
        assert_eq!(
            ModelError::http(502, "bad gateway").to_string(),
            "HTTP 502: bad gateway"
        );
        assert_eq!(ModelError::api("overloaded").to_string(), "API error: overloaded");
        assert_eq!(
            ModelError::rate_limited(Some(Duration::from_secs(3))).to_string(),
            "rate limited (retry-after: Some(3s))"
        );
    }

    #[test]
    fn test_anyhow_is_transparent() {
        let err = ModelError::from(anyhow::anyhow!("socket closed"));
        assert_eq!(err.to_string(), "socket closed");
    }
}
