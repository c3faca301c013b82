//! Evaluation reports.

use crate::score::Score;
use chrono::{DateTime, Utc};
use factdiff_core::RunId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Result for a single sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleResult {
    /// Sample identifier.
    pub sample_id: String,
    /// Input text.
    pub input: String,
    /// Completion of the model under test, if generation succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// The score record.
    pub score: Score,
    /// Time spent solving and scoring.
    #[serde(with = "duration_serde")]
    pub duration: Duration,
}

impl SampleResult {
    /// Whether the score is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.score.value().is_null()
    }
}

impl fmt::Display for SampleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.is_null() { "⚠️" } else { "✅" };
        write!(
            f,
            "{} {} → {} ({:?})",
            status, self.sample_id, self.score, self.duration
        )
    }
}

/// Full report of one evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    /// Run identifier.
    pub run_id: RunId,
    /// Task name.
    pub task: String,
    /// Model under test.
    pub model: String,
    /// Per-sample results, in dataset order.
    pub samples: Vec<SampleResult>,
    /// Aggregate metrics; `None` when nothing was scoreable.
    pub metrics: IndexMap<String, Option<f64>>,
    /// Start time.
    pub started_at: DateTime<Utc>,
    /// Completion time.
    pub completed_at: DateTime<Utc>,
}

impl EvalReport {
    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the report has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of samples with a null score.
    #[must_use]
    pub fn null_count(&self) -> usize {
        self.samples.iter().filter(|s| s.is_null()).count()
    }

    /// All score records, in dataset order.
    #[must_use]
    pub fn scores(&self) -> Vec<Score> {
        self.samples.iter().map(|s| s.score.clone()).collect()
    }

    /// An aggregate metric by name.
    #[must_use]
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied().flatten()
    }

    /// Wall-clock duration of the run.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        (self.completed_at - self.started_at)
            .to_std()
            .unwrap_or_default()
    }

    /// Render as text.
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str("\n\u{1F4CA} Evaluation Report\n");
        output.push_str("═══════════════════\n\n");
        output.push_str(&format!("Task: {}\n", self.task));
        output.push_str(&format!("Model: {}\n", self.model));
        output.push_str(&format!("Run: {}\n\n", self.run_id));

        output.push_str(&format!("Samples: {}\n", self.len()));
        let nulls = self.null_count();
        if nulls > 0 {
            output.push_str(&format!("⚠️ Unscored: {nulls}\n"));
        }

        if !self.metrics.is_empty() {
            output.push_str("\n\u{1F4C8} Metrics:\n");
            for (name, value) in &self.metrics {
                match value {
                    Some(v) => output.push_str(&format!("  {name}: {v:.2}\n")),
                    None => output.push_str(&format!("  {name}: n/a\n")),
                }
            }
        }

        output.push_str(&format!("\n⏱️ Duration: {:?}\n", self.elapsed()));

        output
    }

    /// Render as JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for EvalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

/// Serde helper for Duration.
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Ok(Duration::from_secs_f64(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::ScoreValue;
    use factdiff_core::now_utc;

    fn report() -> EvalReport {
        let now = now_utc();
        let mut metrics = IndexMap::new();
        metrics.insert("groundedness".to_string(), Some(75.0));
        metrics.insert("groundedness_stderr".to_string(), None);

        EvalReport {
            run_id: RunId::new(),
            task: "sun-facts".into(),
            model: "mock/mock".into(),
            samples: vec![
                SampleResult {
                    sample_id: "1".into(),
                    input: "q".into(),
                    output: Some("a".into()),
                    score: Score::new(ScoreValue::Number(1.0)),
                    duration: Duration::from_millis(500),
                },
                SampleResult {
                    sample_id: "2".into(),
                    input: "q".into(),
                    output: None,
                    score: Score::null("timed out"),
                    duration: Duration::from_millis(250),
                },
            ],
            metrics,
            started_at: now,
            completed_at: now,
        }
    }

    #[test]
    fn test_counts_and_metric_lookup() {
        let report = report();
        assert_eq!(report.len(), 2);
        assert_eq!(report.null_count(), 1);
        assert_eq!(report.metric("groundedness"), Some(75.0));
        assert_eq!(report.metric("groundedness_stderr"), None);
        assert_eq!(report.metric("missing"), None);
    }

    #[test]
    fn test_text_rendering() {
        let text = report().to_text();
        assert!(text.contains("Task: sun-facts"));
        assert!(text.contains("groundedness: 75.00"));
        assert!(text.contains("groundedness_stderr: n/a"));
        assert!(text.contains("Unscored: 1"));
    }

    #[test]
    fn test_json_roundtrip() {
        let report = report();
        let json = report.to_json().unwrap();
        let back: EvalReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.samples, report.samples);
        assert_eq!(back.metrics, report.metrics);
    }
}
