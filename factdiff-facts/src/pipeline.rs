//! The comparison pipeline: extract twice, compare once, compute metrics.
//!
//! [`ComparisonPipeline::try_run`] returns the first error it meets.
//! [`ComparisonPipeline::run`] is the boundary form: it never fails, and a
//! failure anywhere yields a [`PipelineOutcome::Failed`] with no metrics.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use factdiff_facts::ComparisonPipeline;
//! use factdiff_models::FunctionModel;
//!
//! # tokio_test::block_on(async {
//! let model = FunctionModel::new(|prompt, _| {
//!     if prompt.contains("comparing facts") {
//!         Ok(r#"{"facts_in_both": ["The Sun is a star."],
//!                "facts_only_in_answer": [],
//!                "facts_only_in_context": []}"#.to_string())
//!     } else {
//!         Ok("The Sun is a star.".to_string())
//!     }
//! });
//!
//! let pipeline = ComparisonPipeline::new(Arc::new(model));
//! let outcome = pipeline.run("The sun is a star.", "The Sun is a star.").await;
//! assert_eq!(outcome.groundedness(), Some(100.0));
//! # });
//! ```

use crate::comparator::{ComparisonResult, FactComparator};
use crate::error::{FactError, FailureKind, Stage};
use crate::extractor::{FactExtractor, FactList};
use crate::metrics::FactMetrics;
use factdiff_core::ModelSettings;
use factdiff_models::BoxedModel;
use futures::future::try_join;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::Instrument;

/// Everything one successful pipeline run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonBundle {
    /// Raw facts extracted from the context.
    pub context_list: FactList,
    /// Raw facts extracted from the answer.
    pub answer_list: FactList,
    /// The three fact buckets.
    pub comparison: ComparisonResult,
    /// Metrics derived from the buckets.
    pub metrics: FactMetrics,
}

impl ComparisonBundle {
    /// Human-readable dump of the fact buckets.
    #[must_use]
    pub fn explanation(&self) -> String {
        self.comparison.explanation()
    }
}

/// Why a pipeline run produced no metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineFailure {
    /// Stage that failed.
    pub stage: Stage,
    /// Backend failure or unusable output.
    pub kind: FailureKind,
    /// Rendered error message.
    pub error: String,
}

impl From<&FactError> for PipelineFailure {
    fn from(err: &FactError) -> Self {
        Self {
            stage: err.stage(),
            kind: err.kind(),
            error: err.to_string(),
        }
    }
}

impl fmt::Display for PipelineFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error during {}: {}", self.kind, self.stage, self.error)
    }
}

/// Result of [`ComparisonPipeline::run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PipelineOutcome {
    /// All stages succeeded.
    Scored(ComparisonBundle),
    /// Some stage failed; nothing was scored.
    Failed(PipelineFailure),
}

impl PipelineOutcome {
    /// Whether the run produced metrics.
    #[must_use]
    pub fn is_scored(&self) -> bool {
        matches!(self, PipelineOutcome::Scored(_))
    }

    /// The bundle, if scored.
    #[must_use]
    pub fn bundle(&self) -> Option<&ComparisonBundle> {
        match self {
            PipelineOutcome::Scored(bundle) => Some(bundle),
            PipelineOutcome::Failed(_) => None,
        }
    }

    /// The failure, if any.
    #[must_use]
    pub fn failure(&self) -> Option<&PipelineFailure> {
        match self {
            PipelineOutcome::Scored(_) => None,
            PipelineOutcome::Failed(failure) => Some(failure),
        }
    }

    /// Metrics, if scored.
    #[must_use]
    pub fn metrics(&self) -> Option<FactMetrics> {
        self.bundle().map(|b| b.metrics)
    }

    /// Groundedness, if scored.
    #[must_use]
    pub fn groundedness(&self) -> Option<f64> {
        self.metrics().map(|m| m.groundedness)
    }

    /// Thoroughness, if scored.
    #[must_use]
    pub fn thoroughness(&self) -> Option<f64> {
        self.metrics().map(|m| m.thoroughness)
    }

    /// Raw context facts, if scored.
    #[must_use]
    pub fn context_list(&self) -> Option<&FactList> {
        self.bundle().map(|b| &b.context_list)
    }

    /// Raw answer facts, if scored.
    #[must_use]
    pub fn answer_list(&self) -> Option<&FactList> {
        self.bundle().map(|b| &b.answer_list)
    }

    /// The fact buckets, if scored.
    #[must_use]
    pub fn comparison(&self) -> Option<&ComparisonResult> {
        self.bundle().map(|b| &b.comparison)
    }

    /// Fact buckets on success, the error line on failure.
    #[must_use]
    pub fn explanation(&self) -> String {
        match self {
            PipelineOutcome::Scored(bundle) => bundle.explanation(),
            PipelineOutcome::Failed(failure) => failure.to_string(),
        }
    }
}

/// Orchestrates two extractions and one comparison.
///
/// The same model may extract and grade, or a separate grader can be set
/// through [`ComparisonPipeline::builder`].
#[derive(Debug, Clone)]
pub struct ComparisonPipeline {
    extractor: FactExtractor,
    comparator: FactComparator,
}

impl ComparisonPipeline {
    /// Create a pipeline where `model` both extracts and grades.
    pub fn new(model: BoxedModel) -> Self {
        Self::builder(model).build()
    }

    /// Start a builder with `fact_model` as the extraction model.
    pub fn builder(fact_model: BoxedModel) -> ComparisonPipelineBuilder {
        ComparisonPipelineBuilder::new(fact_model)
    }

    /// Assemble from explicit components.
    pub fn from_parts(extractor: FactExtractor, comparator: FactComparator) -> Self {
        Self {
            extractor,
            comparator,
        }
    }

    /// The extractor.
    #[must_use]
    pub fn extractor(&self) -> &FactExtractor {
        &self.extractor
    }

    /// The comparator.
    #[must_use]
    pub fn comparator(&self) -> &FactComparator {
        &self.comparator
    }

    /// Run all stages, returning the first error.
    ///
    /// The two extractions run concurrently; the comparison starts only after
    /// both have finished.
    pub async fn try_run(&self, context: &str, answer: &str) -> Result<ComparisonBundle, FactError> {
        let span = tracing::debug_span!(
            "comparison_pipeline",
            context_len = context.len(),
            answer_len = answer.len()
        );

        async move {
            let extract_context = async {
                self.extractor
                    .extract(context)
                    .await
                    .map_err(|e| FactError::generation(Stage::ExtractContext, e))
            };
            let extract_answer = async {
                self.extractor
                    .extract(answer)
                    .await
                    .map_err(|e| FactError::generation(Stage::ExtractAnswer, e))
            };

            let (context_list, answer_list) = try_join(extract_context, extract_answer).await?;
            tracing::debug!("extracted context and answer facts");

            let comparison = self.comparator.compare(&context_list, &answer_list).await?;
            let metrics = FactMetrics::calculate(&comparison);
            tracing::debug!(
                groundedness = metrics.groundedness,
                thoroughness = metrics.thoroughness,
                "comparison scored"
            );

            Ok(ComparisonBundle {
                context_list,
                answer_list,
                comparison,
                metrics,
            })
        }
        .instrument(span)
        .await
    }

    /// Run all stages, converting any failure into [`PipelineOutcome::Failed`].
    pub async fn run(&self, context: &str, answer: &str) -> PipelineOutcome {
        match self.try_run(context, answer).await {
            Ok(bundle) => PipelineOutcome::Scored(bundle),
            Err(err) => {
                tracing::warn!(stage = %err.stage(), kind = %err.kind(), error = %err, "comparison failed");
                PipelineOutcome::Failed(PipelineFailure::from(&err))
            }
        }
    }
}

/// Builder for [`ComparisonPipeline`].
#[derive(Clone)]
pub struct ComparisonPipelineBuilder {
    fact_model: BoxedModel,
    grader_model: Option<BoxedModel>,
    settings: ModelSettings,
    grader_settings: Option<ModelSettings>,
}

impl fmt::Debug for ComparisonPipelineBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparisonPipelineBuilder")
            .field("fact_model", &self.fact_model.identifier().to_string())
            .field(
                "grader_model",
                &self.grader_model.as_ref().map(|m| m.identifier().to_string()),
            )
            .field("settings", &self.settings)
            .field("grader_settings", &self.grader_settings)
            .finish()
    }
}

impl ComparisonPipelineBuilder {
    /// Create a builder with `fact_model` as the extraction model.
    pub fn new(fact_model: BoxedModel) -> Self {
        Self {
            fact_model,
            grader_model: None,
            settings: ModelSettings::default(),
            grader_settings: None,
        }
    }

    /// Use a separate model for the comparison call.
    #[must_use]
    pub fn grader(mut self, model: BoxedModel) -> Self {
        self.grader_model = Some(model);
        self
    }

    /// Settings for every call.
    #[must_use]
    pub fn settings(mut self, settings: ModelSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Settings overrides for the comparison call only.
    #[must_use]
    pub fn grader_settings(mut self, settings: ModelSettings) -> Self {
        self.grader_settings = Some(settings);
        self
    }

    /// Build the pipeline.
    #[must_use]
    pub fn build(self) -> ComparisonPipeline {
        let grader_settings = match &self.grader_settings {
            Some(overrides) => self.settings.merge(overrides),
            None => self.settings.clone(),
        };
        let grader_model = self
            .grader_model
            .unwrap_or_else(|| self.fact_model.clone());

        ComparisonPipeline {
            extractor: FactExtractor::new(self.fact_model).with_settings(self.settings),
            comparator: FactComparator::new(grader_model).with_settings(grader_settings),
        }
    }
}
