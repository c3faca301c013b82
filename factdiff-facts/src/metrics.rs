//! Groundedness and thoroughness.
//!
//! Both metrics are percentages in `[0, 100]` computed from bucket sizes:
//!
//! - groundedness = both / (both + answer_only) × 100
//! - thoroughness = both / (both + context_only) × 100
//!
//! A zero denominator yields `0`, never NaN. Values are full precision;
//! round with [`FactMetrics::rounded`] only when presenting or asserting.

use crate::comparator::ComparisonResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two fact-level metrics for one comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FactMetrics {
    /// Share of answer facts supported by the context (precision).
    pub groundedness: f64,
    /// Share of context facts covered by the answer (recall).
    pub thoroughness: f64,
}

impl FactMetrics {
    /// Create from explicit values.
    #[must_use]
    pub fn new(groundedness: f64, thoroughness: f64) -> Self {
        Self {
            groundedness,
            thoroughness,
        }
    }

    /// Compute from bucket sizes.
    #[must_use]
    pub fn from_counts(both: usize, answer_only: usize, context_only: usize) -> Self {
        Self {
            groundedness: percentage(both, both + answer_only),
            thoroughness: percentage(both, both + context_only),
        }
    }

    /// Compute from a comparison result.
    #[must_use]
    pub fn calculate(result: &ComparisonResult) -> Self {
        let (both, answer_only, context_only) = result.counts();
        Self::from_counts(both, answer_only, context_only)
    }

    /// Both values rounded to the nearest integer.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            groundedness: self.groundedness.round(),
            thoroughness: self.thoroughness.round(),
        }
    }

    /// Whether both values are within `tolerance` of `other`'s.
    #[must_use]
    pub fn approx_eq(&self, other: &FactMetrics, tolerance: f64) -> bool {
        (self.groundedness - other.groundedness).abs() <= tolerance
            && (self.thoroughness - other.thoroughness).abs() <= tolerance
    }
}

impl fmt::Display for FactMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "groundedness {:.1}, thoroughness {:.1}",
            self.groundedness, self.thoroughness
        )
    }
}

fn percentage(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}
