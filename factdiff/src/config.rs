//! Evaluation configuration.
//!
//! An [`EvalConfig`] names the models and knobs of a scoring run. It is
//! plain data; models are only resolved (and credentials read) when
//! [`EvalConfig::build_models`] is called.
//!
//! ```yaml
//! model: openai:gpt-4o
//! grader_model: openai:gpt-4o-mini
//! settings:
//!   temperature: 0.0
//! concurrency: 8
//! timeout_seconds: 120
//! value_format: compact
//! ```

use factdiff_core::{FactDiffError, ModelId, ModelSettings, Result};
use factdiff_evals::{EvalOptions, FactScorer, ValueFormat};
use factdiff_facts::ComparisonPipeline;
use factdiff_models::{build_model, BoxedModel};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for a fact-scoring run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Model that extracts facts (and grades, unless `grader_model` is set).
    pub model: String,
    /// Separate model for the comparison call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grader_model: Option<String>,
    /// Generation settings for every call.
    pub settings: ModelSettings,
    /// Maximum concurrent samples.
    pub concurrency: usize,
    /// Per-sample timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
    /// How fact scores render their value.
    pub value_format: ValueFormat,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            model: "openai:gpt-4o".to_string(),
            grader_model: None,
            settings: ModelSettings::default(),
            concurrency: 4,
            timeout_seconds: None,
            value_format: ValueFormat::default(),
        }
    }
}

/// The models an [`EvalConfig`] resolves to.
#[derive(Clone)]
pub struct ResolvedModels {
    /// Extraction model.
    pub fact_model: BoxedModel,
    /// Comparison model.
    pub grader_model: BoxedModel,
}

impl std::fmt::Debug for ResolvedModels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedModels")
            .field("fact_model", &self.fact_model.identifier().to_string())
            .field("grader_model", &self.grader_model.identifier().to_string())
            .finish()
    }
}

impl EvalConfig {
    /// Configuration with `model` and defaults elsewhere.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Parse YAML.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(content).map_err(|e| FactDiffError::Yaml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse JSON.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("yaml" | "yml") => Self::from_yaml_str(&content),
            _ => Err(FactDiffError::configuration(format!(
                "unsupported config format: {}",
                path.display()
            ))),
        }
    }

    /// Check identifiers and limits.
    pub fn validate(&self) -> Result<()> {
        self.model.parse::<ModelId>()?;
        if let Some(grader) = &self.grader_model {
            grader.parse::<ModelId>()?;
        }
        if self.concurrency == 0 {
            return Err(FactDiffError::configuration("concurrency must be at least 1"));
        }
        if self.timeout_seconds == Some(0) {
            return Err(FactDiffError::configuration("timeout_seconds must be positive"));
        }
        Ok(())
    }

    /// Resolve the extraction and grader models.
    pub fn build_models(&self) -> Result<ResolvedModels> {
        let fact_model = resolve(&self.model)?;
        let grader_model = match &self.grader_model {
            Some(grader) => resolve(grader)?,
            None => fact_model.clone(),
        };
        tracing::debug!(
            fact_model = %fact_model.identifier(),
            grader_model = %grader_model.identifier(),
            "resolved models"
        );
        Ok(ResolvedModels {
            fact_model,
            grader_model,
        })
    }

    /// Build a pipeline from already-resolved models.
    #[must_use]
    pub fn pipeline_with(&self, models: &ResolvedModels) -> ComparisonPipeline {
        ComparisonPipeline::builder(models.fact_model.clone())
            .grader(models.grader_model.clone())
            .settings(self.settings.clone())
            .build()
    }

    /// Resolve models and build a pipeline.
    pub fn pipeline(&self) -> Result<ComparisonPipeline> {
        Ok(self.pipeline_with(&self.build_models()?))
    }

    /// Resolve models and build a fact scorer.
    pub fn fact_scorer(&self) -> Result<FactScorer> {
        Ok(FactScorer::new(self.pipeline()?).with_value_format(self.value_format))
    }

    /// Runner options.
    #[must_use]
    pub fn eval_options(&self) -> EvalOptions {
        let options = EvalOptions::new().concurrency(self.concurrency);
        match self.timeout_seconds {
            Some(secs) => options.timeout(Duration::from_secs(secs)),
            None => options,
        }
    }
}

fn resolve(identifier: &str) -> Result<BoxedModel> {
    let id: ModelId = identifier.parse()?;
    build_model(&id).map_err(|e| FactDiffError::configuration(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_yaml_with_defaults() {
        let config = EvalConfig::from_yaml_str(
            r#"
model: mock:facts
settings:
  temperature: 0.0
  max_tokens: 512
value_format: compact
"#,
        )
        .unwrap();

        assert_eq!(config.model, "mock:facts");
        assert_eq!(config.grader_model, None);
        assert_eq!(config.settings.temperature, Some(0.0));
        assert_eq!(config.settings.max_tokens, Some(512));
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.value_format, ValueFormat::Compact);
    }

    #[test]
    fn test_json() {
        let config = EvalConfig::from_json_str(
            r#"{"model": "mock:facts", "grader_model": "mock:judge", "concurrency": 2, "timeout_seconds": 30}"#,
        )
        .unwrap();

        let options = config.eval_options();
        assert_eq!(options.concurrency, 2);
        assert_eq!(options.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_validation_errors() {
        assert!(matches!(
            EvalConfig::from_json_str(r#"{"model": "mock:x", "concurrency": 0}"#),
            Err(FactDiffError::Configuration(_))
        ));
        assert!(matches!(
            EvalConfig::from_yaml_str("model: 'openai/'"),
            Err(FactDiffError::InvalidModelId { .. })
        ));
        assert!(matches!(
            EvalConfig::from_yaml_str("model: [1, 2]"),
            Err(FactDiffError::Yaml(_))
        ));
    }

    #[test]
    fn test_build_models_with_separate_grader() {
        let config = EvalConfig {
            grader_model: Some("mock:judge".into()),
            ..EvalConfig::new("mock:facts")
        };
        let models = config.build_models().unwrap();
        assert_eq!(models.fact_model.name(), "facts");
        assert_eq!(models.grader_model.name(), "judge");

        let pipeline = config.pipeline_with(&models);
        assert_eq!(pipeline.extractor().model().name(), "facts");
        assert_eq!(pipeline.comparator().model().name(), "judge");
    }

    #[test]
    fn test_grader_defaults_to_fact_model() {
        let models = EvalConfig::new("mock:facts").build_models().unwrap();
        assert_eq!(models.grader_model.name(), "facts");
    }

    #[test]
    fn test_unknown_provider_is_configuration_error() {
        let err = EvalConfig::new("nonesuch:model").fact_scorer().unwrap_err();
        assert!(matches!(err, FactDiffError::Configuration(ref m) if m.contains("nonesuch")));
    }

    #[test]
    fn test_from_file_dispatches_on_extension() {
        let path = std::env::temp_dir().join("factdiff-config-test.yml");
        std::fs::write(&path, "model: mock:facts\nconcurrency: 3\n").unwrap();
        let config = EvalConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.concurrency, 3);
    }
}
