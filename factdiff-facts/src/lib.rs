//! # factdiff-facts
//!
//! Fact-level comparison of an answer against a reference text.
//!
//! Both texts are decomposed into atomic facts by a language model, the two
//! fact lists are bucketed into shared / answer-only / context-only by a
//! second call, and two percentages are derived:
//!
//! - **groundedness**: share of the answer's facts found in the context
//! - **thoroughness**: share of the context's facts found in the answer
//!
//! ## Components
//!
//! - [`FactExtractor`]: text to raw fact list
//! - [`FactComparator`]: two fact lists to a [`ComparisonResult`], via
//!   [`decode_comparison`]
//! - [`FactMetrics`]: the metric calculator
//! - [`ComparisonPipeline`]: runs the above and captures failures

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod comparator;
pub mod decode;
pub mod error;
pub mod extractor;
pub mod metrics;
pub mod pipeline;
pub mod prompts;

pub use comparator::{ComparisonResult, FactComparator};
pub use decode::{decode_comparison, FACTS_IN_BOTH, FACTS_ONLY_IN_ANSWER, FACTS_ONLY_IN_CONTEXT};
pub use error::{FactError, FactResult, FailureKind, Stage, ValidationError};
pub use extractor::{FactExtractor, FactList};
pub use metrics::FactMetrics;
pub use pipeline::{
    ComparisonBundle, ComparisonPipeline, ComparisonPipelineBuilder, PipelineFailure,
    PipelineOutcome,
};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        ComparisonBundle, ComparisonPipeline, ComparisonResult, FactError, FactMetrics,
        PipelineOutcome, Stage,
    };
}
