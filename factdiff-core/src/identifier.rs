//! Identifiers: model selection and run tracking.
//!
//! Model selection is an explicit value. A [`ModelId`] is parsed once from a
//! configuration string such as `"openai/gpt-4"` and then handed to whatever
//! builds the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::FactDiffError;

/// Provider assumed when an identifier carries no provider prefix.
pub const DEFAULT_PROVIDER: &str = "openai";

/// A model identifier of the form `provider/name` (or `provider:name`).
///
/// # Example
///
/// ```rust
/// use factdiff_core::ModelId;
///
/// let id: ModelId = "anthropic:claude-3-5-sonnet".parse().unwrap();
/// assert_eq!(id.provider(), "anthropic");
/// assert_eq!(id.name(), "claude-3-5-sonnet");
/// assert_eq!(id.to_string(), "anthropic/claude-3-5-sonnet");
///
/// let bare: ModelId = "gpt-4".parse().unwrap();
/// assert_eq!(bare.provider(), "openai");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModelId {
    provider: String,
    name: String,
}

impl ModelId {
    /// Create from explicit parts.
    pub fn new(provider: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            name: name.into(),
        }
    }

    /// Provider / system name (`openai`, `mock`, ...).
    #[must_use]
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Model name within the provider.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for ModelId {
    type Err = FactDiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(FactDiffError::invalid_model_id(s, "identifier is empty"));
        }

        // Split on whichever separator appears first; model names may
        // themselves contain '/' (e.g. openrouter paths).
        let split_at = s.find(|c: char| c == ':' || c == '/');
        let (provider, name) = match split_at {
            Some(idx) => (&s[..idx], &s[idx + 1..]),
            None => (DEFAULT_PROVIDER, s),
        };

        if provider.is_empty() {
            return Err(FactDiffError::invalid_model_id(s, "empty provider"));
        }
        if name.is_empty() {
            return Err(FactDiffError::invalid_model_id(s, "empty model name"));
        }

        Ok(Self::new(provider.to_lowercase(), name))
    }
}

impl TryFrom<String> for ModelId {
    type Error = FactDiffError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ModelId> for String {
    fn from(id: ModelId) -> Self {
        id.to_string()
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.name)
    }
}

/// Generate a unique run ID.
///
/// Returns a UUID v4 string prefixed with "run_".
#[must_use]
pub fn generate_run_id() -> String {
    format!("run_{}", Uuid::new_v4().simple())
}

/// Get the current UTC timestamp.
#[must_use]
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Type-safe wrapper for an evaluation run ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Create a new run ID.
    #[must_use]
    pub fn new() -> Self {
        Self(generate_run_id())
    }

    /// Get the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("openai/gpt-4", "openai", "gpt-4")]
    #[case("openai:gpt-4o-mini", "openai", "gpt-4o-mini")]
    #[case("gpt-4", "openai", "gpt-4")]
    #[case("OpenAI/gpt-4", "openai", "gpt-4")]
    #[case("openrouter/meta-llama/llama-3-70b", "openrouter", "meta-llama/llama-3-70b")]
    #[case("mock:judge", "mock", "judge")]
    fn test_parse_model_id(#[case] input: &str, #[case] provider: &str, #[case] name: &str) {
        let id: ModelId = input.parse().unwrap();
        assert_eq!(id.provider(), provider);
        assert_eq!(id.name(), name);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("openai/")]
    #[case(":gpt-4")]
    fn test_parse_model_id_rejects(#[case] input: &str) {
        assert!(input.parse::<ModelId>().is_err());
    }

    #[test]
    fn test_model_id_serde() {
        let id = ModelId::new("openai", "gpt-4");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"openai/gpt-4\"");

        let parsed: ModelId = serde_json::from_str("\"mock:stub\"").unwrap();
        assert_eq!(parsed, ModelId::new("mock", "stub"));

        assert!(serde_json::from_str::<ModelId>("\"\"").is_err());
    }

    #[test]
    fn test_run_id() {
        let a = RunId::new();
        let b = RunId::new();
        assert!(a.as_str().starts_with("run_"));
        assert_ne!(a, b);
    }
}
