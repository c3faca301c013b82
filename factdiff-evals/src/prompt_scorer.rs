//! PASS/FAIL grading against the first target.

use crate::metrics::{Accuracy, BoxedMetric, MetadataMean};
use crate::sample::Target;
use crate::score::{Score, ScoreValue};
use crate::scorer::Scorer;
use crate::state::{AnswerSource, TaskState};
use async_trait::async_trait;
use factdiff_core::ModelSettings;
use factdiff_facts::prompts::grade_prompt;
use factdiff_models::BoxedModel;
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

/// Asks a grader model whether the answer fulfils the target.
///
/// The value is `"C"` when the completion contains `PASS` and `"I"`
/// otherwise; the completion itself is echoed as the answer.
#[derive(Clone)]
pub struct PromptScorer {
    grader: BoxedModel,
    settings: ModelSettings,
}

impl fmt::Debug for PromptScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptScorer")
            .field("grader", &self.grader.identifier().to_string())
            .field("settings", &self.settings)
            .finish()
    }
}

impl PromptScorer {
    /// Create a scorer using `grader`.
    pub fn new(grader: BoxedModel) -> Self {
        Self {
            grader,
            settings: ModelSettings::default(),
        }
    }

    /// Set the grader settings.
    #[must_use]
    pub fn with_settings(mut self, settings: ModelSettings) -> Self {
        self.settings = settings;
        self
    }
}

#[async_trait]
impl Scorer for PromptScorer {
    fn name(&self) -> &str {
        "prompt_scorer"
    }

    async fn score(&self, state: &TaskState, target: &Target) -> Score {
        let answer = state.resolve_answer();
        let prompt = grade_prompt(answer, target.first().unwrap_or_default());

        match self.grader.generate(&prompt, &self.settings).await {
            Ok(output) => {
                let verdict = output.completion();
                let passed = verdict.contains("PASS");
                tracing::debug!(sample_id = %state.sample_id, passed, "graded");
                Score::new(ScoreValue::Text(if passed { "C" } else { "I" }.to_string()))
                    .with_answer(verdict)
                    .with_metadata("pass", u8::from(passed))
            }
            Err(err) => {
                tracing::warn!(sample_id = %state.sample_id, error = %err, "grader failed");
                Score::null(format!("grader failed: {err}"))
                    .with_metadata("pass", JsonValue::Null)
                    .with_metadata("error", err.to_string())
            }
        }
    }

    fn metrics(&self) -> Vec<BoxedMetric> {
        vec![Arc::new(Accuracy), Arc::new(MetadataMean::pass_rate())]
    }
}
