//! Score records.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// The value part of a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreValue {
    /// Nothing could be scored.
    Null,
    /// A single number.
    Number(f64),
    /// A label such as `"C"` / `"I"`, or a compact formatted summary.
    Text(String),
    /// Named numbers.
    Map(IndexMap<String, f64>),
}

impl ScoreValue {
    /// Whether this is [`ScoreValue::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, ScoreValue::Null)
    }

    /// The text, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ScoreValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a named number in a map value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<f64> {
        match self {
            ScoreValue::Map(map) => map.get(key).copied(),
            _ => None,
        }
    }
}

impl fmt::Display for ScoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreValue::Null => f.write_str("null"),
            ScoreValue::Number(n) => write!(f, "{n:.2}"),
            ScoreValue::Text(s) => f.write_str(s),
            ScoreValue::Map(map) => {
                let parts: Vec<String> = map.iter().map(|(k, v)| format!("{k}={v:.2}")).collect();
                f.write_str(&parts.join(", "))
            }
        }
    }
}

/// The outcome of scoring one sample.
///
/// Built once with the `with_*` methods and read through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    value: ScoreValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    explanation: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    metadata: IndexMap<String, JsonValue>,
}

impl Score {
    /// Create a score with `value`.
    pub fn new(value: ScoreValue) -> Self {
        Self {
            value,
            answer: None,
            explanation: None,
            metadata: IndexMap::new(),
        }
    }

    /// A null score carrying an explanation.
    pub fn null(explanation: impl Into<String>) -> Self {
        Self::new(ScoreValue::Null).with_explanation(explanation)
    }

    /// Echo the evaluated answer.
    #[must_use]
    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = Some(answer.into());
        self
    }

    /// Set the explanation.
    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Add a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The value.
    #[must_use]
    pub fn value(&self) -> &ScoreValue {
        &self.value
    }

    /// The echoed answer.
    #[must_use]
    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    /// The explanation.
    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// All metadata.
    #[must_use]
    pub fn metadata(&self) -> &IndexMap<String, JsonValue> {
        &self.metadata
    }

    /// A numeric metadata entry; `None` when absent, null, or not a number.
    #[must_use]
    pub fn metadata_number(&self, key: &str) -> Option<f64> {
        self.metadata.get(key).and_then(JsonValue::as_f64)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_metadata_number() {
        let score = Score::new(ScoreValue::Text("C".into()))
            .with_metadata("groundedness", 66.5)
            .with_metadata("thoroughness", JsonValue::Null)
            .with_metadata("note", "x");

        assert_eq!(score.metadata_number("groundedness"), Some(66.5));
        assert_eq!(score.metadata_number("thoroughness"), None);
        assert_eq!(score.metadata_number("note"), None);
        assert_eq!(score.metadata_number("missing"), None);
    }

    #[test]
    fn test_value_serialization() {
        let mut map = IndexMap::new();
        map.insert("groundedness".to_string(), 100.0);
        map.insert("thoroughness".to_string(), 50.0);

        let score = Score::new(ScoreValue::Map(map)).with_answer("a");
        let value = serde_json::to_value(&score).unwrap();
        assert_eq!(
            value,
            json!({
                "value": {"groundedness": 100.0, "thoroughness": 50.0},
                "answer": "a"
            })
        );
        assert_eq!(score.value().get("thoroughness"), Some(50.0));
    }

    #[test]
    fn test_null_roundtrip() {
        let score = Score::null("comparison failed");
        let json = serde_json::to_string(&score).unwrap();
        let back: Score = serde_json::from_str(&json).unwrap();
        assert!(back.value().is_null());
        assert_eq!(back.explanation(), Some("comparison failed"));
    }

    #[test]
    fn test_display() {
        assert_eq!(ScoreValue::Number(0.5).to_string(), "0.50");
        assert_eq!(ScoreValue::Text("G:100.0 : T:50.0".into()).to_string(), "G:100.0 : T:50.0");
    }
}
