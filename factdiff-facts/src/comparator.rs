//! Fact-set comparison.

use crate::decode::decode_comparison;
use crate::error::{FactError, Stage};
use crate::extractor::FactList;
use crate::prompts::{compare_prompt, render, EXPLANATION_FORMAT};
use factdiff_core::ModelSettings;
use factdiff_models::BoxedModel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three fact buckets produced by the comparator.
///
/// Uniqueness and the partition of the input facts are the model's judgement;
/// nothing here enforces them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Facts present in both the context and the answer.
    pub facts_in_both: Vec<String>,
    /// Facts present only in the answer.
    pub facts_only_in_answer: Vec<String>,
    /// Facts present only in the context.
    pub facts_only_in_context: Vec<String>,
}

impl ComparisonResult {
    /// Bucket sizes as `(both, answer_only, context_only)`.
    #[must_use]
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.facts_in_both.len(),
            self.facts_only_in_answer.len(),
            self.facts_only_in_context.len(),
        )
    }

    /// Human-readable dump of the three buckets, one fact per line.
    #[must_use]
    pub fn explanation(&self) -> String {
        render(
            EXPLANATION_FORMAT,
            &[
                ("facts_in_both", self.facts_in_both.join("\n").as_str()),
                ("facts_only_in_answer", self.facts_only_in_answer.join("\n").as_str()),
                ("facts_only_in_context", self.facts_only_in_context.join("\n").as_str()),
            ],
        )
    }
}

/// Buckets two extracted fact lists with a single generation call.
#[derive(Clone)]
pub struct FactComparator {
    model: BoxedModel,
    settings: ModelSettings,
}

impl fmt::Debug for FactComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactComparator")
            .field("model", &self.model.identifier().to_string())
            .field("settings", &self.settings)
            .finish()
    }
}

impl FactComparator {
    /// Create a comparator backed by `model`.
    pub fn new(model: BoxedModel) -> Self {
        Self {
            model,
            settings: ModelSettings::default(),
        }
    }

    /// Set generation settings.
    #[must_use]
    pub fn with_settings(mut self, settings: ModelSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The backing model.
    #[must_use]
    pub fn model(&self) -> &BoxedModel {
        &self.model
    }

    /// The generation settings.
    #[must_use]
    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    /// Compare a context fact list against an answer fact list.
    ///
    /// A backend failure is [`FactError::Generation`]; an unusable completion
    /// is [`FactError::Validation`]. Neither is retried.
    pub async fn compare(
        &self,
        context_facts: &FactList,
        answer_facts: &FactList,
    ) -> Result<ComparisonResult, FactError> {
        let prompt = compare_prompt(context_facts.as_str(), answer_facts.as_str());
        let output = self
            .model
            .generate(&prompt, &self.settings)
            .await
            .map_err(|e| FactError::generation(Stage::Compare, e))?;

        let result = decode_comparison(output.completion())?;
        tracing::debug!(
            both = result.facts_in_both.len(),
            answer_only = result.facts_only_in_answer.len(),
            context_only = result.facts_only_in_context.len(),
            "decoded comparison"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use factdiff_models::MockModel;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_compare_decodes_result() {
        let model = MockModel::new("grader").with_text_response(
            r#"{"facts_in_both": ["x"], "facts_only_in_answer": ["y"], "facts_only_in_context": []}"#,
        );
        let comparator = FactComparator::new(Arc::new(model.clone()));

        let result = comparator
            .compare(&FactList::new("- x"), &FactList::new("- x\n- y"))
            .await
            .unwrap();

        assert_eq!(result.counts(), (1, 1, 0));
        let prompt = &model.recorded_prompts()[0];
        assert!(prompt.contains("<context>\n- x\n</context>"));
        assert!(prompt.contains("<answer>\n- x\n- y\n</answer>"));
    }

    #[tokio::test]
    async fn test_compare_validation_failure() {
        let model = MockModel::new("grader").with_text_response("The facts mostly agree.");
        let comparator = FactComparator::new(Arc::new(model));

        let err = comparator
            .compare(&FactList::new("a"), &FactList::new("b"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FactError::Validation(ValidationError::NoJsonFound)
        ));
    }

    #[tokio::test]
    async fn test_compare_generation_failure() {
        let model = MockModel::new("grader").with_error("503 upstream");
        let comparator = FactComparator::new(Arc::new(model));

        let err = comparator
            .compare(&FactList::new("a"), &FactList::new("b"))
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Stage::Compare);
        assert!(matches!(err, FactError::Generation { .. }));
    }

    #[test]
    fn test_explanation_layout() {
        let result = ComparisonResult {
            facts_in_both: vec!["a".into(), "b".into()],
            facts_only_in_answer: vec!["c".into()],
            facts_only_in_context: vec![],
        };
        assert_eq!(
            result.explanation(),
            "\nFacts in Both:\na\nb\n\nFacts only in Answer:\nc\n\nFacts only in Context:\n\n"
        );
    }
}
