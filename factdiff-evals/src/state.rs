//! Task state and answer resolution.

use factdiff_core::ModelOutput;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a resolved answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOrigin {
    /// The first completion choice.
    Choice,
    /// The plain input text.
    Input,
}

impl fmt::Display for AnswerOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerOrigin::Choice => f.write_str("choice"),
            AnswerOrigin::Input => f.write_str("input"),
        }
    }
}

/// An answer text together with its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAnswer<'a> {
    /// The answer text.
    pub text: &'a str,
    /// Which location it came from.
    pub origin: AnswerOrigin,
}

/// Something that can supply the answer under evaluation.
///
/// The structured choice wins when present; otherwise the plain text is used.
pub trait AnswerSource {
    /// Text of the first structured completion choice, if any.
    fn structured_choice(&self) -> Option<&str>;

    /// Plain-text fallback.
    fn plain_text(&self) -> &str;

    /// Resolve the answer, recording its origin.
    fn resolve(&self) -> ResolvedAnswer<'_> {
        match self.structured_choice() {
            Some(text) => ResolvedAnswer {
                text,
                origin: AnswerOrigin::Choice,
            },
            None => ResolvedAnswer {
                text: self.plain_text(),
                origin: AnswerOrigin::Input,
            },
        }
    }

    /// Resolve the answer text.
    fn resolve_answer(&self) -> &str {
        self.resolve().text
    }
}

/// State of one sample after the model under test has run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskState {
    /// Sample identifier.
    pub sample_id: String,
    /// Input text given to the model.
    pub input: String,
    /// Model output; `None` if generation did not happen or failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<ModelOutput>,
}

impl TaskState {
    /// Create a state with no output yet.
    pub fn new(sample_id: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            sample_id: sample_id.into(),
            input: input.into(),
            output: None,
        }
    }

    /// Attach model output.
    #[must_use]
    pub fn with_output(mut self, output: ModelOutput) -> Self {
        self.output = Some(output);
        self
    }
}

impl AnswerSource for TaskState {
    fn structured_choice(&self) -> Option<&str> {
        self.output.as_ref().and_then(ModelOutput::first_choice_text)
    }

    fn plain_text(&self) -> &str {
        &self.input
    }
}
