//! Model output types.
//!
//! A [`ModelOutput`] is what a generation backend returns for one prompt and
//! what an evaluation task records as the system-under-test's answer. The
//! completion text lives in the first [`Choice`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural end of response.
    Stop,
    /// Maximum tokens reached.
    Length,
    /// Content was filtered.
    ContentFilter,
    /// Anything the backend reported that we do not model.
    Other,
}

impl FinishReason {
    /// Map a provider finish reason string.
    #[must_use]
    pub fn from_provider(reason: &str) -> Self {
        match reason {
            "stop" | "end_turn" | "stop_sequence" => Self::Stop,
            "length" | "max_tokens" => Self::Length,
            "content_filter" => Self::ContentFilter,
            _ => Self::Other,
        }
    }
}

/// The assistant message carried by a choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantMessage {
    /// Message text.
    pub content: String,
}

/// One completion choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// The generated message.
    pub message: AssistantMessage,
    /// Why generation stopped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
}

impl Choice {
    /// Create a choice holding `text`.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            message: AssistantMessage {
                content: text.into(),
            },
            finish_reason: Some(FinishReason::Stop),
        }
    }
}

/// Token usage for one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Input/prompt tokens.
    pub input_tokens: u64,
    /// Output/completion tokens.
    pub output_tokens: u64,
}

impl Usage {
    /// Create new usage.
    #[must_use]
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Total tokens.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Output of one generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelOutput {
    /// Name of the model that produced the output.
    pub model: String,
    /// Completion choices, usually exactly one.
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Token usage, if the backend reported it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    /// When the output was received.
    pub timestamp: DateTime<Utc>,
}

impl ModelOutput {
    /// Create an output with no choices.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            choices: Vec::new(),
            usage: None,
            timestamp: Utc::now(),
        }
    }

    /// Create an output with a single text choice.
    pub fn from_text(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(model).with_choice(Choice::text(text))
    }

    /// Add a choice.
    #[must_use]
    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    /// Set usage.
    #[must_use]
    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Text of the first choice, if there is one.
    #[must_use]
    pub fn first_choice_text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }

    /// The completion string: first choice text, or empty.
    #[must_use]
    pub fn completion(&self) -> &str {
        self.first_choice_text().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_first_choice() {
        let output = ModelOutput::new("gpt-4")
            .with_choice(Choice::text("first"))
            .with_choice(Choice::text("second"));
        assert_eq!(output.completion(), "first");
    }

    #[test]
    fn test_completion_empty() {
        let output = ModelOutput::new("gpt-4");
        assert_eq!(output.first_choice_text(), None);
        assert_eq!(output.completion(), "");
    }

    #[test]
    fn test_finish_reason_mapping() {
        assert_eq!(FinishReason::from_provider("stop"), FinishReason::Stop);
        assert_eq!(FinishReason::from_provider("length"), FinishReason::Length);
        assert_eq!(FinishReason::from_provider("tool_calls"), FinishReason::Other);
    }

    #[test]
    fn test_usage_total() {
        assert_eq!(Usage::new(120, 30).total(), 150);
    }

    #[test]
    fn test_serialize_shape() {
        let output = ModelOutput::from_text("gpt-4", "hello");
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["choices"][0]["message"]["content"], "hello");
        assert_eq!(value["choices"][0]["finish_reason"], "stop");
        assert!(value.get("usage").is_none());
    }
}
