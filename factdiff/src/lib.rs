//! # factdiff
//!
//! Fact-level scoring of LLM answers against reference texts.
//!
//! An answer and its reference are each decomposed into atomic facts by a
//! language model, the facts are bucketed into shared / answer-only /
//! reference-only, and two percentages come out:
//!
//! - **groundedness**: how much of the answer is supported by the reference
//! - **thoroughness**: how much of the reference the answer covers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use factdiff::prelude::*;
//!
//! let pipeline = ComparisonPipeline::new(infer_model("openai:gpt-4o")?);
//! let outcome = pipeline
//!     .run(
//!         "The sun is approximately 4.6 billion years old. It's a mid-sized star.",
//!         "The Sun is a medium-sized star. It's about 4.6 billion years old.",
//!     )
//!     .await;
//!
//! if let Some(metrics) = outcome.metrics() {
//!     println!("{metrics}");
//! }
//! ```
//!
//! ## Crates
//!
//! - [`core`]: settings, identifiers, completion types
//! - [`models`]: the `Model` trait and backends
//! - [`facts`]: extraction, comparison, metrics, the pipeline
//! - [`evals`]: samples, scorers, aggregate metrics, the batch runner

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;

// ============================================================================
// Crate Re-exports
// ============================================================================

/// Core types, settings, and error handling.
pub use factdiff_core as core;

/// Model trait and backends.
pub use factdiff_models as models;

/// Fact extraction, comparison, and metrics.
pub use factdiff_facts as facts;

/// Evaluation harness.
pub use factdiff_evals as evals;

// ============================================================================
// Flat Re-exports
// ============================================================================

pub use config::{EvalConfig, ResolvedModels};

pub use factdiff_core::{FactDiffError, ModelId, ModelOutput, ModelSettings, RunId};

pub use factdiff_models::{
    build_model, infer_model, BoxedModel, FunctionModel, MockModel, Model, ModelError,
};
#[cfg(feature = "openai")]
#[cfg_attr(docsrs, doc(cfg(feature = "openai")))]
pub use factdiff_models::OpenAIChatModel;

pub use factdiff_facts::{
    decode_comparison, ComparisonBundle, ComparisonPipeline, ComparisonResult, FactComparator,
    FactError, FactExtractor, FactList, FactMetrics, PipelineFailure, PipelineOutcome, Stage,
    ValidationError,
};

pub use factdiff_evals::{
    Accuracy, AnswerSource, CalibrationCase, CalibrationRow, CalibrationSummary, Calibrator,
    Dataset, EvalError, EvalOptions, EvalReport, EvalRunner, FactScorer, MetadataMean,
    MetadataStderr, Metric, PromptScorer, Sample, SampleResult, Score, ScoreValue, Scorer,
    Target, Task, TaskState, ValueFormat,
};

/// Prelude for common imports.
///
/// ```rust
/// use factdiff::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::EvalConfig;
    pub use crate::{
        infer_model, BoxedModel, ComparisonPipeline, Dataset, EvalOptions, EvalRunner,
        FactMetrics, FactScorer, Model, ModelSettings, PipelineOutcome, PromptScorer, Sample,
        Score, Scorer, Target, Task, TaskState,
    };
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use crate::{FunctionModel, MockModel};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[test]
    fn test_version() {
        assert!(!crate::VERSION.is_empty());
    }

    #[test]
    fn test_bundled_calibration_cases_parse() {
        let cases =
            crate::evals::cases_from_yaml_str(include_str!("../../demos/calibration_cases.yaml"))
                .unwrap();
        assert_eq!(cases.len(), 13);
        assert_eq!(cases[7].expected, FactMetrics::new(100.0, 50.0));
    }

    #[tokio::test]
    async fn test_end_to_end_with_stub_backend() {
        let backend = FunctionModel::new(|prompt, _| {
            if prompt.contains("You will be comparing facts") {
                Ok("Here is the comparison:\n```json\n{\"facts_in_both\": [\"Paris is in France.\"], \
                    \"facts_only_in_answer\": [], \
                    \"facts_only_in_context\": [\"Paris is known for the Eiffel Tower.\"]}\n```"
                    .to_string())
            } else {
                Ok("<facts>\nParis is in France.\n</facts>".to_string())
            }
        });
        let model_under_test = MockModel::new("under-test")
            .with_text_response("The city of Paris is in France.");

        let dataset = Dataset::builder()
            .sample(Sample::new(
                "Where is Paris?",
                "Paris is a city in France. It is known for the Eiffel Tower.",
            ))
            .build();
        let task = Task::new("paris", dataset, FactScorer::from_model(Arc::new(backend)));

        let report = EvalRunner::new(Arc::new(model_under_test))
            .run(&task)
            .await
            .unwrap();

        assert_eq!(report.metric("groundedness"), Some(100.0));
        assert_eq!(report.metric("thoroughness"), Some(50.0));
        assert_eq!(
            report.samples[0].output.as_deref(),
            Some("The city of Paris is in France.")
        );
    }
}
