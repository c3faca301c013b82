//! Calibration against hand-labelled cases.
//!
//! Each case pairs a context and an answer with the metrics a careful human
//! would assign. [`Calibrator::run`] scores every case through the pipeline
//! and reports expected vs observed side by side. Observed values are
//! rounded to whole percentages before comparison.

use crate::error::{EvalError, EvalResult};
use factdiff_facts::{ComparisonPipeline, ComparisonResult, FactMetrics, PipelineOutcome};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A hand-labelled comparison case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationCase {
    /// Case name.
    pub name: String,
    /// Reference text.
    pub context: String,
    /// Text being judged.
    pub answer: String,
    /// Expected metrics.
    pub expected: FactMetrics,
    /// What the case exercises.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CalibrationCase {
    /// Create a case.
    pub fn new(
        name: impl Into<String>,
        context: impl Into<String>,
        answer: impl Into<String>,
        expected: FactMetrics,
    ) -> Self {
        Self {
            name: name.into(),
            context: context.into(),
            answer: answer.into(),
            expected,
            description: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Parse a YAML list of cases.
pub fn cases_from_yaml_str(content: &str) -> EvalResult<Vec<CalibrationCase>> {
    Ok(serde_yaml::from_str(content)?)
}

/// Parse a JSON list of cases.
pub fn cases_from_json_str(content: &str) -> EvalResult<Vec<CalibrationCase>> {
    Ok(serde_json::from_str(content)?)
}

/// Load cases from a `.json`, `.yaml` or `.yml` file.
pub fn load_cases(path: impl AsRef<Path>) -> EvalResult<Vec<CalibrationCase>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => cases_from_json_str(&content),
        Some("yaml" | "yml") => cases_from_yaml_str(&content),
        _ => Err(EvalError::dataset_load(format!(
            "unsupported calibration file: {}",
            path.display()
        ))),
    }
}

/// Outcome of one calibration case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRow {
    /// Case name.
    pub name: String,
    /// Expected metrics.
    pub expected: FactMetrics,
    /// Observed metrics, rounded; `None` if the pipeline failed.
    pub observed: Option<FactMetrics>,
    /// Raw context facts.
    pub context_list: Option<String>,
    /// Raw answer facts.
    pub answer_list: Option<String>,
    /// The fact buckets.
    pub comparison: Option<ComparisonResult>,
    /// Pipeline failure, if any.
    pub error: Option<String>,
    /// Allowed difference per metric.
    pub tolerance: f64,
}

impl CalibrationRow {
    fn from_outcome(case: &CalibrationCase, outcome: PipelineOutcome, tolerance: f64) -> Self {
        Self {
            name: case.name.clone(),
            expected: case.expected,
            observed: outcome.metrics().map(|m| m.rounded()),
            context_list: outcome.context_list().map(|l| l.as_str().to_string()),
            answer_list: outcome.answer_list().map(|l| l.as_str().to_string()),
            comparison: outcome.comparison().cloned(),
            error: outcome.failure().map(ToString::to_string),
            tolerance,
        }
    }

    /// Whether both observed metrics are within tolerance of the expected ones.
    #[must_use]
    pub fn within_tolerance(&self) -> bool {
        self.observed
            .is_some_and(|observed| observed.approx_eq(&self.expected, self.tolerance))
    }
}

impl fmt::Display for CalibrationRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.within_tolerance() { "PASS" } else { "FAIL" };
        writeln!(f, "{}: {status}", self.name)?;
        writeln!(
            f,
            "  Expected: G {:.0} / T {:.0}",
            self.expected.groundedness, self.expected.thoroughness
        )?;
        match (&self.observed, &self.error) {
            (Some(observed), _) => writeln!(
                f,
                "  Observed: G {:.0} / T {:.0}",
                observed.groundedness, observed.thoroughness
            ),
            (None, Some(error)) => writeln!(f, "  Error: {error}"),
            (None, None) => writeln!(f, "  Observed: none"),
        }
    }
}

/// Pass/fail tally over calibration rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationSummary {
    /// Total cases.
    pub total: usize,
    /// Cases within tolerance.
    pub passed: usize,
    /// Cases outside tolerance or failed.
    pub failed: usize,
}

impl CalibrationSummary {
    /// Tally `rows`.
    #[must_use]
    pub fn from_rows(rows: &[CalibrationRow]) -> Self {
        let passed = rows.iter().filter(|r| r.within_tolerance()).count();
        Self {
            total: rows.len(),
            passed,
            failed: rows.len() - passed,
        }
    }
}

impl fmt::Display for CalibrationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total Cases: {}\nPassed: {}\nFailed: {}",
            self.total, self.passed, self.failed
        )
    }
}

/// Runs calibration cases through a pipeline.
#[derive(Debug, Clone)]
pub struct Calibrator {
    pipeline: ComparisonPipeline,
    tolerance: f64,
}

impl Calibrator {
    /// Create a calibrator; rounded metrics must match exactly by default.
    pub fn new(pipeline: ComparisonPipeline) -> Self {
        Self {
            pipeline,
            tolerance: 0.5,
        }
    }

    /// Set the allowed difference per metric, in percentage points.
    #[must_use]
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Score every case concurrently, returning rows in case order.
    pub async fn run(&self, cases: &[CalibrationCase]) -> Vec<CalibrationRow> {
        let futures = cases.iter().map(|case| async move {
            let outcome = self.pipeline.run(&case.context, &case.answer).await;
            let row = CalibrationRow::from_outcome(case, outcome, self.tolerance);
            tracing::debug!(case = %row.name, passed = row.within_tolerance(), "calibration case");
            row
        });
        futures::future::join_all(futures).await
    }
}
