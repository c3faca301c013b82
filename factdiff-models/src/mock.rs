//! Mock and function-based models for testing.
//!
//! This module provides testing utilities:
//!
//! - [`MockModel`]: A simple mock with pre-configured responses
//! - [`FunctionModel`]: A flexible model controlled by a custom function
//!
//! # Examples
//!
//! ## MockModel for simple response sequences
//!
//! ```rust
//! use factdiff_models::MockModel;
//!
//! let model = MockModel::new("test")
//!     .with_text_response("First response")
//!     .with_text_response("Second response");
//! ```
//!
//! ## FunctionModel for prompt-dependent behavior
//!
//! ```rust
//! use factdiff_models::FunctionModel;
//!
//! let model = FunctionModel::new(|prompt, _settings| {
//!     Ok(format!("Received {} characters", prompt.len()))
//! });
//! ```

use crate::error::ModelError;
use crate::model::Model;
use async_trait::async_trait;
use factdiff_core::{ModelOutput, ModelSettings};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// MockModel - Simple pre-configured mock
// ============================================================================

/// A mock model for testing with pre-configured responses.
///
/// Responses (or errors) are queued and returned in order. Once the queue is
/// empty every call returns `"Mock response"`.
///
/// # Example
///
/// ```rust
/// use factdiff_models::MockModel;
///
/// let model = MockModel::new("test-model")
///     .with_text_response("Hello!")
///     .with_text_response("How can I help?");
/// ```
#[derive(Debug, Clone)]
pub struct MockModel {
    name: String,
    responses: Arc<Mutex<VecDeque<Result<String, String>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
}

impl MockModel {
    /// Create a new mock model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            responses: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// Add a text response.
    #[must_use]
    pub fn with_text_response(self, text: impl Into<String>) -> Self {
        self.responses.lock().push_back(Ok(text.into()));
        self
    }

    /// Queue an error; the call that reaches it fails with an API error.
    #[must_use]
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.responses.lock().push_back(Err(message.into()));
        self
    }

    /// Sleep before answering each call.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get recorded prompts.
    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl Model for MockModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn system(&self) -> &str {
        "mock"
    }

    async fn generate(
        &self,
        prompt: &str,
        _settings: &ModelSettings,
    ) -> Result<ModelOutput, ModelError> {
        self.prompts.lock().push(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.responses.lock().pop_front();
        match next {
            Some(Ok(text)) => Ok(ModelOutput::from_text(&self.name, text)),
            Some(Err(message)) => Err(ModelError::api(message)),
            None => Ok(ModelOutput::from_text(&self.name, "Mock response")),
        }
    }
}

// ============================================================================
// FunctionModel - Dynamic function-based model
// ============================================================================

/// Type alias for function model callback.
///
/// The function receives the prompt and settings and returns the completion
/// text or an error.
pub type FunctionDef =
    Box<dyn Fn(&str, &ModelSettings) -> Result<String, ModelError> + Send + Sync>;

/// A model controlled by a local function.
///
/// More flexible than [`MockModel`]: the function sees each prompt, so a
/// single stub can answer both the extraction and comparison stages.
///
/// # Example
///
/// ```rust
/// use factdiff_models::{FunctionModel, ModelError};
///
/// let model = FunctionModel::new(|prompt, _settings| {
///     if prompt.is_empty() {
///         Err(ModelError::api("empty prompt"))
///     } else {
///         Ok("- one fact".to_string())
///     }
/// })
/// .with_name("stub");
/// ```
#[derive(Clone)]
pub struct FunctionModel {
    name: String,
    function: Arc<FunctionDef>,
}

impl std::fmt::Debug for FunctionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionModel")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl FunctionModel {
    /// Create a new FunctionModel with a response function.
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(&str, &ModelSettings) -> Result<String, ModelError> + Send + Sync + 'static,
    {
        Self {
            name: "function-model".to_string(),
            function: Arc::new(Box::new(function)),
        }
    }

    /// Set a custom model name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[async_trait]
impl Model for FunctionModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn system(&self) -> &str {
        "function"
    }

    async fn generate(
        &self,
        prompt: &str,
        settings: &ModelSettings,
    ) -> Result<ModelOutput, ModelError> {
        let text = (self.function)(prompt, settings)?;
        Ok(ModelOutput::from_text(&self.name, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_model_sequence() {
        let model = MockModel::new("test")
            .with_text_response("one")
            .with_error("overloaded")
            .with_text_response("two");
        let settings = ModelSettings::new();

        let first = model.generate("a", &settings).await.unwrap();
        assert_eq!(first.completion(), "one");

        let second = model.generate("b", &settings).await;
        assert!(matches!(second, Err(ModelError::Api { .. })));

        let third = model.generate("c", &settings).await.unwrap();
        assert_eq!(third.completion(), "two");

        let fallback = model.generate("d", &settings).await.unwrap();
        assert_eq!(fallback.completion(), "Mock response");

        assert_eq!(model.recorded_prompts(), vec!["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn test_mock_model_identifier() {
        let model = MockModel::new("judge");
        assert_eq!(model.identifier().to_string(), "mock/judge");
    }

    #[tokio::test]
    async fn test_function_model_sees_prompt() {
        let model = FunctionModel::new(|prompt, _| Ok(prompt.to_uppercase())).with_name("upper");
        let output = model
            .generate("hello", &ModelSettings::new())
            .await
            .unwrap();
        assert_eq!(output.completion(), "HELLO");
        assert_eq!(output.model, "upper");
    }

    #[tokio::test]
    async fn test_function_model_error() {
        let model = FunctionModel::new(|_, _| Err(ModelError::Timeout(Duration::from_secs(1))));
        let result = model.generate("x", &ModelSettings::new()).await;
        assert!(matches!(result, Err(ModelError::Timeout(_))));
    }
}
