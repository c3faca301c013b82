//! Model settings and configuration.
//!
//! This module provides the `ModelSettings` type for configuring generation
//! calls: temperature, token limits, and the per-request timeout handed to
//! the backend.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for model generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Maximum tokens to generate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,

    /// Sampling temperature (0.0 to 2.0 typically).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Top-p (nucleus) sampling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    /// Stop sequences.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,

    /// Random seed for reproducibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Request timeout, enforced by the backend.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "option_duration_serde"
    )]
    pub timeout: Option<Duration>,
}

impl ModelSettings {
    /// Create new empty settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max tokens.
    #[must_use]
    pub fn max_tokens(mut self, tokens: u64) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    /// Set temperature.
    #[must_use]
    pub fn temperature(mut self, temp: f64) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Set top-p.
    #[must_use]
    pub fn top_p(mut self, p: f64) -> Self {
        self.top_p = Some(p);
        self
    }

    /// Add a stop sequence.
    #[must_use]
    pub fn add_stop(mut self, sequence: impl Into<String>) -> Self {
        self.stop.get_or_insert_with(Vec::new).push(sequence.into());
        self
    }

    /// Set seed.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set timeout in seconds.
    #[must_use]
    pub fn timeout_secs(self, secs: u64) -> Self {
        self.timeout(Duration::from_secs(secs))
    }

    /// Merge with another settings, preferring values from `other`.
    #[must_use]
    pub fn merge(&self, other: &ModelSettings) -> ModelSettings {
        ModelSettings {
            max_tokens: other.max_tokens.or(self.max_tokens),
            temperature: other.temperature.or(self.temperature),
            top_p: other.top_p.or(self.top_p),
            stop: other.stop.clone().or_else(|| self.stop.clone()),
            seed: other.seed.or(self.seed),
            timeout: other.timeout.or(self.timeout),
        }
    }

    /// Check if all settings are None.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.max_tokens.is_none()
            && self.temperature.is_none()
            && self.top_p.is_none()
            && self.stop.is_none()
            && self.seed.is_none()
            && self.timeout.is_none()
    }
}

/// Serde helper for optional Duration (seconds as f64).
mod option_duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => d.as_secs_f64().serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt: Option<f64> = Option::deserialize(deserializer)?;
        Ok(opt.map(Duration::from_secs_f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_settings_new() {
        assert!(ModelSettings::new().is_empty());
    }

    #[test]
    fn test_model_settings_builder() {
        let settings = ModelSettings::new()
            .max_tokens(1000)
            .temperature(0.0)
            .seed(42)
            .add_stop("</facts>");

        assert_eq!(settings.max_tokens, Some(1000));
        assert_eq!(settings.temperature, Some(0.0));
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.stop, Some(vec!["</facts>".to_string()]));
        assert!(!settings.is_empty());
    }

    #[test]
    fn test_model_settings_merge() {
        let base = ModelSettings::new().max_tokens(1000).temperature(0.5);
        let overrides = ModelSettings::new().temperature(0.0).timeout_secs(30);

        let merged = base.merge(&overrides);

        assert_eq!(merged.max_tokens, Some(1000));
        assert_eq!(merged.temperature, Some(0.0));
        assert_eq!(merged.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_deserialize_partial() {
        let settings: ModelSettings =
            serde_json::from_str(r#"{"temperature": 0.2, "timeout": 12.5}"#).unwrap();
        assert_eq!(settings.temperature, Some(0.2));
        assert_eq!(settings.timeout, Some(Duration::from_millis(12_500)));
        assert!(settings.max_tokens.is_none());
    }
}
