//! Scorers and the fact-comparison scoring adapter.
//!
//! A [`Scorer`] turns one [`TaskState`] and its [`Target`] into a [`Score`].
//! Scoring never fails: anything that goes wrong is reported inside the
//! score, so a batch always yields one record per sample.

use crate::metrics::{BoxedMetric, MetadataMean, MetadataStderr};
use crate::sample::Target;
use crate::score::{Score, ScoreValue};
use crate::state::{AnswerSource, TaskState};
use async_trait::async_trait;
use factdiff_core::ModelSettings;
use factdiff_facts::{ComparisonBundle, ComparisonPipeline, PipelineFailure, PipelineOutcome};
use factdiff_models::BoxedModel;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Core trait for scorers.
#[async_trait]
pub trait Scorer: Send + Sync {
    /// Scorer name.
    fn name(&self) -> &str;

    /// Score one sample.
    async fn score(&self, state: &TaskState, target: &Target) -> Score;

    /// Aggregate metrics that apply to this scorer's records.
    fn metrics(&self) -> Vec<BoxedMetric> {
        Vec::new()
    }
}

/// Shared scorer handle.
pub type BoxedScorer = Arc<dyn Scorer>;

/// How [`FactScorer`] renders the score value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormat {
    /// `{"groundedness": g, "thoroughness": t}`.
    #[default]
    Mapping,
    /// `"G:<g> : T:<t>"`, one decimal.
    Compact,
}

/// Scores an answer against its reference with groundedness and thoroughness.
///
/// The reference (target text) is the context; the answer is the first
/// completion choice, or the input when there is none.
#[derive(Debug, Clone)]
pub struct FactScorer {
    pipeline: ComparisonPipeline,
    value_format: ValueFormat,
}

impl FactScorer {
    /// Create from a pipeline.
    pub fn new(pipeline: ComparisonPipeline) -> Self {
        Self {
            pipeline,
            value_format: ValueFormat::default(),
        }
    }

    /// Create from a single model that extracts and grades.
    pub fn from_model(model: BoxedModel) -> Self {
        Self::new(ComparisonPipeline::new(model))
    }

    /// Create from a model plus settings.
    pub fn from_model_with_settings(model: BoxedModel, settings: ModelSettings) -> Self {
        Self::new(ComparisonPipeline::builder(model).settings(settings).build())
    }

    /// Set the value format.
    #[must_use]
    pub fn with_value_format(mut self, format: ValueFormat) -> Self {
        self.value_format = format;
        self
    }

    /// The underlying pipeline.
    #[must_use]
    pub fn pipeline(&self) -> &ComparisonPipeline {
        &self.pipeline
    }

    fn scored(&self, bundle: &ComparisonBundle, answer: &str) -> Score {
        let metrics = bundle.metrics;
        let value = match self.value_format {
            ValueFormat::Mapping => {
                let mut map = IndexMap::new();
                map.insert("groundedness".to_string(), metrics.groundedness);
                map.insert("thoroughness".to_string(), metrics.thoroughness);
                ScoreValue::Map(map)
            }
            ValueFormat::Compact => ScoreValue::Text(format!(
                "G:{:.1} : T:{:.1}",
                metrics.groundedness, metrics.thoroughness
            )),
        };

        Score::new(value)
            .with_answer(answer)
            .with_explanation(format!("{}\nModel Output: {answer}", bundle.explanation()))
            .with_metadata("groundedness", metrics.groundedness)
            .with_metadata("thoroughness", metrics.thoroughness)
            .with_metadata("context_list", bundle.context_list.as_str())
            .with_metadata("answer_list", bundle.answer_list.as_str())
    }

    fn failed(failure: &PipelineFailure, answer: &str) -> Score {
        Score::null(format!("{failure}\nModel Output: {answer}"))
            .with_answer(answer)
            .with_metadata("groundedness", JsonValue::Null)
            .with_metadata("thoroughness", JsonValue::Null)
            .with_metadata("error", failure.error.as_str())
            .with_metadata("stage", failure.stage.as_str())
            .with_metadata("kind", failure.kind.to_string())
    }
}

#[async_trait]
impl Scorer for FactScorer {
    fn name(&self) -> &str {
        "fact_scorer"
    }

    async fn score(&self, state: &TaskState, target: &Target) -> Score {
        let resolved = state.resolve();
        let reference = target.text();

        let score = match self.pipeline.run(&reference, resolved.text).await {
            PipelineOutcome::Scored(bundle) => self.scored(&bundle, resolved.text),
            PipelineOutcome::Failed(failure) => {
                tracing::warn!(
                    sample_id = %state.sample_id,
                    stage = %failure.stage,
                    "sample produced no metrics"
                );
                Self::failed(&failure, resolved.text)
            }
        };
        score.with_metadata("answer_source", resolved.origin.to_string())
    }

    fn metrics(&self) -> Vec<BoxedMetric> {
        vec![
            Arc::new(MetadataMean::groundedness()),
            Arc::new(MetadataStderr::new("groundedness_stderr", "groundedness")),
            Arc::new(MetadataMean::thoroughness()),
            Arc::new(MetadataStderr::new("thoroughness_stderr", "thoroughness")),
        ]
    }
}
