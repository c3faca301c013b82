//! Aggregate metrics over score records.
//!
//! A metric reduces a batch of [`Score`]s to one number. Records that carry
//! nothing scoreable (a null metadata entry, a missing key) are skipped, and
//! a batch with nothing scoreable reduces to `None` rather than `0` or NaN.

use crate::score::Score;
use std::fmt;
use std::sync::Arc;

/// A reducer over score records.
pub trait Metric: Send + Sync {
    /// Name used as the key in reports.
    fn name(&self) -> &str;

    /// Reduce the records; `None` when none of them is scoreable.
    fn compute(&self, scores: &[Score]) -> Option<f64>;
}

/// Shared metric handle.
pub type BoxedMetric = Arc<dyn Metric>;

impl fmt::Debug for dyn Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Metric({})", self.name())
    }
}

/// Mean of a numeric metadata entry.
#[derive(Debug, Clone)]
pub struct MetadataMean {
    name: String,
    key: String,
}

impl MetadataMean {
    /// Average `key` and report it as `name`.
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
        }
    }

    /// Mean groundedness.
    pub fn groundedness() -> Self {
        Self::new("groundedness", "groundedness")
    }

    /// Mean thoroughness.
    pub fn thoroughness() -> Self {
        Self::new("thoroughness", "thoroughness")
    }

    /// Share of records whose `pass` entry is 1.
    pub fn pass_rate() -> Self {
        Self::new("pass_rate", "pass")
    }
}

impl Metric for MetadataMean {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, scores: &[Score]) -> Option<f64> {
        mean(&values(scores, &self.key))
    }
}

/// Standard error of the mean of a numeric metadata entry.
///
/// Uses the sample standard deviation; needs at least two values.
#[derive(Debug, Clone)]
pub struct MetadataStderr {
    name: String,
    key: String,
}

impl MetadataStderr {
    /// Standard error of `key`, reported as `name`.
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
        }
    }
}

impl Metric for MetadataStderr {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, scores: &[Score]) -> Option<f64> {
        let values = values(scores, &self.key);
        let n = values.len();
        if n < 2 {
            return None;
        }
        let mean = mean(&values)?;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        Some(variance.sqrt() / (n as f64).sqrt())
    }
}

/// Share of `"C"` among `"C"`/`"I"` text values.
#[derive(Debug, Clone, Copy, Default)]
pub struct Accuracy;

impl Metric for Accuracy {
    fn name(&self) -> &str {
        "accuracy"
    }

    fn compute(&self, scores: &[Score]) -> Option<f64> {
        let graded: Vec<bool> = scores
            .iter()
            .filter_map(|s| match s.value().as_text() {
                Some("C") => Some(true),
                Some("I") => Some(false),
                _ => None,
            })
            .collect();
        if graded.is_empty() {
            return None;
        }
        let correct = graded.iter().filter(|c| **c).count();
        Some(correct as f64 / graded.len() as f64)
    }
}

fn values(scores: &[Score], key: &str) -> Vec<f64> {
    scores.iter().filter_map(|s| s.metadata_number(key)).collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::ScoreValue;
    use rstest::rstest;
    use serde_json::Value as JsonValue;

    fn fact_score(g: Option<f64>, t: Option<f64>) -> Score {
        let to_json = |v: Option<f64>| v.map_or(JsonValue::Null, JsonValue::from);
        Score::new(ScoreValue::Null)
            .with_metadata("groundedness", to_json(g))
            .with_metadata("thoroughness", to_json(t))
    }

    #[test]
    fn test_mean_skips_null_records() {
        let scores = vec![
            fact_score(Some(100.0), Some(50.0)),
            fact_score(None, None),
            fact_score(Some(50.0), Some(100.0)),
        ];
        assert_eq!(MetadataMean::groundedness().compute(&scores), Some(75.0));
        assert_eq!(MetadataMean::thoroughness().compute(&scores), Some(75.0));
    }

    #[rstest]
    #[case::empty(vec![])]
    #[case::all_failed(vec![fact_score(None, None), fact_score(None, None)])]
    fn test_mean_of_nothing_is_none(#[case] scores: Vec<Score>) {
        assert_eq!(MetadataMean::groundedness().compute(&scores), None);
    }

    #[test]
    fn test_stderr() {
        let scores = vec![
            fact_score(Some(0.0), None),
            fact_score(Some(100.0), None),
        ];
        let stderr = MetadataStderr::new("groundedness_stderr", "groundedness")
            .compute(&scores)
            .unwrap();
        // sample std-dev of {0, 100} is 70.71; divided by sqrt(2)
        assert!((stderr - 50.0).abs() < 1e-9);

        assert_eq!(
            MetadataStderr::new("s", "groundedness").compute(&scores[..1]),
            None
        );
    }

    #[test]
    fn test_accuracy_ignores_non_graded() {
        let scores = vec![
            Score::new(ScoreValue::Text("C".into())),
            Score::new(ScoreValue::Text("I".into())),
            Score::new(ScoreValue::Text("C".into())),
            Score::null("grader failed"),
        ];
        let accuracy = Accuracy.compute(&scores).unwrap();
        assert!((accuracy - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(Accuracy.compute(&scores[3..]), None);
    }

    #[test]
    fn test_pass_rate() {
        let scores = vec![
            Score::new(ScoreValue::Text("C".into())).with_metadata("pass", 1),
            Score::new(ScoreValue::Text("I".into())).with_metadata("pass", 0),
        ];
        assert_eq!(MetadataMean::pass_rate().compute(&scores), Some(0.5));
    }
}
