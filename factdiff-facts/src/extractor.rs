//! Fact extraction: one text in, one raw fact list out.

use crate::prompts::fact_prompt;
use factdiff_core::ModelSettings;
use factdiff_models::{BoxedModel, ModelError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw fact-list text produced by one extraction call.
///
/// The completion is kept verbatim (including any `<facts>` tags) and handed
/// to the comparator as-is; individual facts are never split out here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactList(String);

impl FactList {
    /// Wrap raw extraction text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The raw text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap into the raw text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for FactList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turns free text into a list of atomic facts with a single generation call.
#[derive(Clone)]
pub struct FactExtractor {
    model: BoxedModel,
    settings: ModelSettings,
}

impl fmt::Debug for FactExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactExtractor")
            .field("model", &self.model.identifier().to_string())
            .field("settings", &self.settings)
            .finish()
    }
}

impl FactExtractor {
    /// Create an extractor backed by `model`.
    pub fn new(model: BoxedModel) -> Self {
        Self {
            model,
            settings: ModelSettings::default(),
        }
    }

    /// Set generation settings.
    #[must_use]
    pub fn with_settings(mut self, settings: ModelSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The backing model.
    #[must_use]
    pub fn model(&self) -> &BoxedModel {
        &self.model
    }

    /// The generation settings.
    #[must_use]
    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    /// Extract facts from `text`.
    ///
    /// Empty input is allowed; whatever the model returns is the fact list.
    /// Backend errors propagate unchanged and are not retried.
    pub async fn extract(&self, text: &str) -> Result<FactList, ModelError> {
        let output = self
            .model
            .generate(&fact_prompt(text), &self.settings)
            .await?;
        Ok(FactList::new(output.completion()))
    }
}
