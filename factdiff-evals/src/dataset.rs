//! Sample datasets.
//!
//! Files may hold either a full dataset object or a bare list of samples:
//!
//! ```yaml
//! name: sun-facts
//! samples:
//!   - id: case1
//!     input: The Sun is a medium-sized star.
//!     target: The sun is a mid-sized star.
//! ```

use crate::error::{EvalError, EvalResult};
use crate::sample::Sample;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A named collection of samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Dataset name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Samples.
    #[serde(default)]
    pub samples: Vec<Sample>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DatasetRepr {
    Full(Dataset),
    Bare(Vec<Sample>),
}

impl From<DatasetRepr> for Dataset {
    fn from(repr: DatasetRepr) -> Self {
        match repr {
            DatasetRepr::Full(dataset) => dataset,
            DatasetRepr::Bare(samples) => Dataset {
                samples,
                ..Dataset::default()
            },
        }
    }
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a builder.
    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::default()
    }

    /// Set the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a sample.
    #[must_use]
    pub fn sample(mut self, sample: Sample) -> Self {
        self.samples.push(sample);
        self
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether there are no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples whose ID is in `ids`.
    #[must_use]
    pub fn filter_by_id(&self, ids: &[&str]) -> Self {
        Self {
            name: self.name.clone(),
            description: self.description.clone(),
            samples: self
                .samples
                .iter()
                .filter(|s| s.id.as_deref().is_some_and(|id| ids.contains(&id)))
                .cloned()
                .collect(),
        }
    }

    /// The first `n` samples.
    #[must_use]
    pub fn take(&self, n: usize) -> Self {
        Self {
            name: self.name.clone(),
            description: self.description.clone(),
            samples: self.samples.iter().take(n).cloned().collect(),
        }
    }

    /// Parse JSON.
    pub fn from_json_str(content: &str) -> EvalResult<Self> {
        let repr: DatasetRepr = serde_json::from_str(content)?;
        Ok(repr.into())
    }

    /// Parse YAML.
    pub fn from_yaml_str(content: &str) -> EvalResult<Self> {
        let repr: DatasetRepr = serde_yaml::from_str(content)?;
        Ok(repr.into())
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn from_file(path: impl AsRef<Path>) -> EvalResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut dataset = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content)?,
            Some("yaml" | "yml") => Self::from_yaml_str(&content)?,
            _ => {
                return Err(EvalError::dataset_load(format!(
                    "unsupported dataset format: {}",
                    path.display()
                )))
            }
        };
        if dataset.name.is_none() {
            dataset.name = path.file_stem().map(|s| s.to_string_lossy().into_owned());
        }
        tracing::debug!(path = %path.display(), samples = dataset.len(), "loaded dataset");
        Ok(dataset)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> EvalResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builder for [`Dataset`].
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    dataset: Dataset,
}

impl DatasetBuilder {
    /// Set the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.dataset.name = Some(name.into());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.dataset.description = Some(desc.into());
        self
    }

    /// Add a sample.
    #[must_use]
    pub fn sample(mut self, sample: Sample) -> Self {
        self.dataset.samples.push(sample);
        self
    }

    /// Add several samples.
    #[must_use]
    pub fn samples(mut self, samples: impl IntoIterator<Item = Sample>) -> Self {
        self.dataset.samples.extend(samples);
        self
    }

    /// Build the dataset.
    #[must_use]
    pub fn build(self) -> Dataset {
        self.dataset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const YAML: &str = r#"
name: sun-facts
description: Basic astronomy
samples:
  - id: case1
    input: The Sun is a medium-sized star.
    target: The sun is a mid-sized star.
  - id: case2
    input: The Sun is made of cheese.
    target:
      - The Sun is mostly hydrogen.
      - The Sun is mostly helium.
"#;

    #[test]
    fn test_from_yaml_object() {
        let dataset = Dataset::from_yaml_str(YAML).unwrap();
        assert_eq!(dataset.name.as_deref(), Some("sun-facts"));
        assert_eq!(dataset.len(), 2);
        assert_eq!(
            dataset.samples[1].target.text(),
            "The Sun is mostly hydrogen.\nThe Sun is mostly helium."
        );
    }

    #[test]
    fn test_from_json_bare_list() {
        let dataset = Dataset::from_json_str(
            r#"[{"input": "q1", "target": "a1"}, {"id": "x", "input": "q2", "target": "a2"}]"#,
        )
        .unwrap();
        assert_eq!(dataset.name, None);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.samples[0].display_id(0), "1");
        assert_eq!(dataset.samples[1].display_id(1), "x");
    }

    #[test]
    fn test_filter_and_take() {
        let dataset = Dataset::from_yaml_str(YAML).unwrap();
        let filtered = dataset.filter_by_id(&["case2", "missing"]);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.samples[0].input, "The Sun is made of cheese.");

        assert_eq!(dataset.take(1).len(), 1);
        assert_eq!(dataset.take(10).len(), 2);
    }

    #[test]
    fn test_builder_and_json_roundtrip() {
        let dataset = Dataset::builder()
            .name("tiny")
            .sample(Sample::new("q", "a").with_id("s1"))
            .build();
        let json = dataset.to_json_string().unwrap();
        let back = Dataset::from_json_str(&json).unwrap();
        assert_eq!(back, dataset);
    }

    #[test]
    fn test_invalid_input_is_error() {
        assert!(Dataset::from_json_str("{not json").is_err());
        assert!(matches!(
            Dataset::from_yaml_str("samples: 3"),
            Err(EvalError::Yaml(_))
        ));
    }

    #[test]
    fn test_from_file_rejects_unknown_extension() {
        let path = std::env::temp_dir().join("factdiff-dataset-test.txt");
        std::fs::write(&path, "[]").unwrap();
        let err = Dataset::from_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, EvalError::DatasetLoad(_)));
    }

    #[test]
    fn test_from_file_names_dataset_after_file() {
        let path = std::env::temp_dir().join("factdiff-sun-facts.json");
        std::fs::write(&path, r#"[{"input": "q", "target": "a"}]"#).unwrap();
        let dataset = Dataset::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(dataset.name.as_deref(), Some("factdiff-sun-facts"));
        assert_eq!(dataset.len(), 1);
    }
}
