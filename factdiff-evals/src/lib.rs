//! # factdiff-evals
//!
//! Evaluation harness around the fact comparison pipeline.
//!
//! ## Core Concepts
//!
//! - **[`Sample`] / [`Dataset`]**: inputs with reference targets
//! - **[`TaskState`]**: a sample after the model under test has answered
//! - **[`Scorer`]**: turns a state and target into a [`Score`]
//! - **[`Metric`]**: reduces a batch of scores to one number
//! - **[`EvalRunner`]**: runs a [`Task`] and collects an [`EvalReport`]
//! - **[`Calibrator`]**: checks the pipeline against hand-labelled cases
//!
//! ## Scorers
//!
//! - **[`FactScorer`]**: groundedness and thoroughness of the answer
//!   against the target
//! - **[`PromptScorer`]**: PASS/FAIL grading by a model
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use factdiff_evals::{Dataset, EvalRunner, FactScorer, Sample, Task};
//! use factdiff_models::infer_model;
//!
//! let grader = infer_model("openai:gpt-4o")?;
//! let dataset = Dataset::builder()
//!     .sample(Sample::new("How old is the sun?", "The sun is about 4.6 billion years old."))
//!     .build();
//! let task = Task::new("sun", dataset, FactScorer::from_model(grader.clone()));
//!
//! let report = EvalRunner::new(grader).run(&task).await?;
//! println!("{report}");
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod calibration;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod prompt_scorer;
pub mod report;
pub mod runner;
pub mod sample;
pub mod score;
pub mod scorer;
pub mod state;

// Re-exports
pub use calibration::{
    cases_from_json_str, cases_from_yaml_str, load_cases, CalibrationCase, CalibrationRow,
    CalibrationSummary, Calibrator,
};
pub use dataset::{Dataset, DatasetBuilder};
pub use error::{EvalError, EvalResult};
pub use metrics::{Accuracy, BoxedMetric, MetadataMean, MetadataStderr, Metric};
pub use prompt_scorer::PromptScorer;
pub use report::{EvalReport, SampleResult};
pub use runner::{EvalOptions, EvalRunner, Task};
pub use sample::{Sample, Target};
pub use score::{Score, ScoreValue};
pub use scorer::{BoxedScorer, FactScorer, Scorer, ValueFormat};
pub use state::{AnswerOrigin, AnswerSource, ResolvedAnswer, TaskState};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        Dataset, EvalOptions, EvalReport, EvalRunner, FactScorer, Metric, PromptScorer, Sample,
        Score, ScoreValue, Scorer, Target, Task, TaskState,
    };
}
