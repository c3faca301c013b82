//! Evaluation samples and targets.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Reference text(s) a sample is scored against.
///
/// Deserializes from either a single string or a list of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TargetRepr", into = "TargetRepr")]
pub struct Target(Vec<String>);

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TargetRepr {
    One(String),
    Many(Vec<String>),
}

impl From<TargetRepr> for Target {
    fn from(repr: TargetRepr) -> Self {
        match repr {
            TargetRepr::One(s) => Target(vec![s]),
            TargetRepr::Many(v) => Target(v),
        }
    }
}

impl From<Target> for TargetRepr {
    fn from(target: Target) -> Self {
        let mut items = target.0;
        if items.len() == 1 {
            TargetRepr::One(items.remove(0))
        } else {
            TargetRepr::Many(items)
        }
    }
}

impl Target {
    /// A single reference text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(vec![text.into()])
    }

    /// Several reference texts.
    pub fn many<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(texts.into_iter().map(Into::into).collect())
    }

    /// All reference texts joined with newlines.
    #[must_use]
    pub fn text(&self) -> String {
        self.0.join("\n")
    }

    /// The first reference text, if any.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// The reference texts.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Whether there is no reference text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Target {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Target {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// One input/target pair to evaluate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Sample identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Input handed to the model under test.
    pub input: String,
    /// Reference text(s).
    #[serde(default)]
    pub target: Target,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Extra metadata carried into results.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub metadata: IndexMap<String, JsonValue>,
}

impl Sample {
    /// Create a sample.
    pub fn new(input: impl Into<String>, target: impl Into<Target>) -> Self {
        Self {
            id: None,
            input: input.into(),
            target: target.into(),
            description: None,
            metadata: IndexMap::new(),
        }
    }

    /// Set the ID.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Identifier, or a 1-based positional fallback.
    #[must_use]
    pub fn display_id(&self, index: usize) -> String {
        self.id.clone().unwrap_or_else(|| (index + 1).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_target_from_string_or_list() {
        let one: Target = serde_json::from_str(r#""The sun is a star.""#).unwrap();
        assert_eq!(one.first(), Some("The sun is a star."));

        let many: Target = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(many.text(), "a\nb");
        assert_eq!(many.first(), Some("a"));
    }

    #[test]
    fn test_target_serializes_single_as_string() {
        let json = serde_json::to_string(&Target::new("x")).unwrap();
        assert_eq!(json, r#""x""#);
        let json = serde_json::to_string(&Target::many(["x", "y"])).unwrap();
        assert_eq!(json, r#"["x","y"]"#);
    }

    #[test]
    fn test_sample_builder() {
        let sample = Sample::new("How old is the sun?", "About 4.6 billion years.")
            .with_id("case1")
            .with_description("Very basic question.")
            .with_metadata("difficulty", "easy");

        assert_eq!(sample.display_id(0), "case1");
        assert_eq!(sample.target.text(), "About 4.6 billion years.");
        assert_eq!(sample.metadata["difficulty"], "easy");
    }

    #[test]
    fn test_display_id_fallback() {
        assert_eq!(Sample::new("q", "a").display_id(4), "5");
    }
}
