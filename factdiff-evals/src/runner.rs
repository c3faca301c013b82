//! Batch evaluation runner.
//!
//! For each sample the model under test is asked for an answer, then the
//! task's scorer scores it. Samples run concurrently up to
//! [`EvalOptions::concurrency`]; results keep dataset order.

use crate::dataset::Dataset;
use crate::error::{EvalError, EvalResult};
use crate::report::{EvalReport, SampleResult};
use crate::sample::Sample;
use crate::score::Score;
use crate::scorer::{BoxedScorer, Scorer};
use crate::state::TaskState;
use factdiff_core::{now_utc, ModelSettings, RunId};
use factdiff_models::BoxedModel;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::Instrument;

/// A dataset paired with how to prompt for and score it.
#[derive(Clone)]
pub struct Task {
    /// Task name.
    pub name: String,
    /// Samples to evaluate.
    pub dataset: Dataset,
    /// Text placed before each input.
    pub system_message: Option<String>,
    /// Scorer applied to every sample.
    pub scorer: BoxedScorer,
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("samples", &self.dataset.len())
            .field("system_message", &self.system_message)
            .field("scorer", &self.scorer.name())
            .finish()
    }
}

impl Task {
    /// Create a task.
    pub fn new(name: impl Into<String>, dataset: Dataset, scorer: impl Scorer + 'static) -> Self {
        Self {
            name: name.into(),
            dataset,
            system_message: None,
            scorer: Arc::new(scorer),
        }
    }

    /// Set the system message.
    #[must_use]
    pub fn with_system_message(mut self, message: impl Into<String>) -> Self {
        self.system_message = Some(message.into());
        self
    }

    fn prompt_for(&self, sample: &Sample) -> String {
        match &self.system_message {
            Some(system) => format!("{system}\n\n{}", sample.input),
            None => sample.input.clone(),
        }
    }
}

/// Options for running evaluations.
#[derive(Debug, Clone)]
pub struct EvalOptions {
    /// Maximum concurrent samples.
    pub concurrency: usize,
    /// Timeout per sample, covering generation and scoring.
    pub timeout: Option<Duration>,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            timeout: None,
        }
    }
}

impl EvalOptions {
    /// Create new options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set concurrency.
    #[must_use]
    pub fn concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    /// Set timeout per sample.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Runs tasks against a model under test.
#[derive(Clone)]
pub struct EvalRunner {
    model: BoxedModel,
    options: EvalOptions,
    settings: ModelSettings,
}

impl fmt::Debug for EvalRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvalRunner")
            .field("model", &self.model.identifier().to_string())
            .field("options", &self.options)
            .field("settings", &self.settings)
            .finish()
    }
}

impl EvalRunner {
    /// Create a runner for `model`.
    pub fn new(model: BoxedModel) -> Self {
        Self {
            model,
            options: EvalOptions::default(),
            settings: ModelSettings::default(),
        }
    }

    /// Set options.
    #[must_use]
    pub fn options(mut self, options: EvalOptions) -> Self {
        self.options = options;
        self
    }

    /// Set generation settings for the model under test.
    #[must_use]
    pub fn settings(mut self, settings: ModelSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Run every sample of `task` and aggregate the scores.
    pub async fn run(&self, task: &Task) -> EvalResult<EvalReport> {
        if task.dataset.is_empty() {
            return Err(EvalError::task_failed(format!(
                "task '{}' has no samples",
                task.name
            )));
        }

        let run_id = RunId::new();
        let model = self.model.identifier().to_string();
        let started_at = now_utc();
        tracing::info!(
            run_id = %run_id,
            task = %task.name,
            model = %model,
            samples = task.dataset.len(),
            concurrency = self.options.concurrency,
            "starting evaluation run"
        );

        let semaphore = Arc::new(Semaphore::new(self.options.concurrency.max(1)));
        let futures: Vec<_> = task
            .dataset
            .samples
            .iter()
            .enumerate()
            .map(|(idx, sample)| {
                let sem = semaphore.clone();
                async move {
                    let _permit = sem.acquire().await.ok();
                    self.run_sample(idx, sample, task).await
                }
            })
            .collect();
        let samples = futures::future::join_all(futures).await;

        let scores: Vec<Score> = samples.iter().map(|s| s.score.clone()).collect();
        let metrics: IndexMap<String, Option<f64>> = task
            .scorer
            .metrics()
            .iter()
            .map(|metric| (metric.name().to_string(), metric.compute(&scores)))
            .collect();

        let report = EvalReport {
            run_id,
            task: task.name.clone(),
            model,
            samples,
            metrics,
            started_at,
            completed_at: now_utc(),
        };
        tracing::info!(
            run_id = %report.run_id,
            samples = report.len(),
            unscored = report.null_count(),
            "evaluation run complete"
        );
        Ok(report)
    }

    async fn run_sample(&self, idx: usize, sample: &Sample, task: &Task) -> SampleResult {
        let sample_id = sample.display_id(idx);
        let span = tracing::info_span!("eval_sample", sample_id = %sample_id);
        let start = Instant::now();

        let work = async {
            let state = self.solve(&sample_id, sample, task).await;
            let score = task.scorer.score(&state, &sample.target).await;
            let output = state.output.map(|o| o.completion().to_string());
            (output, score)
        };

        let (output, score) = match self.options.timeout {
            Some(limit) => match timeout(limit, work).instrument(span).await {
                Ok(done) => done,
                Err(_) => {
                    tracing::warn!(sample_id = %sample_id, "sample timed out");
                    (
                        None,
                        Score::null(format!("Sample exceeded timeout of {limit:?}")),
                    )
                }
            },
            None => work.instrument(span).await,
        };

        SampleResult {
            sample_id,
            input: sample.input.clone(),
            output,
            score,
            duration: start.elapsed(),
        }
    }

    async fn solve(&self, sample_id: &str, sample: &Sample, task: &Task) -> TaskState {
        let state = TaskState::new(sample_id, sample.input.clone());
        match self.model.generate(&task.prompt_for(sample), &self.settings).await {
            Ok(output) => state.with_output(output),
            Err(err) => {
                tracing::warn!(sample_id, error = %err, "generation failed, scoring the input");
                state
            }
        }
    }
}
