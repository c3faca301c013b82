//! Core model trait.
//!
//! Every generation backend implements [`Model`]: one prompt string in, one
//! [`ModelOutput`] out. The comparison pipeline and the evaluation runner only
//! ever see `dyn Model`, so backends stay swappable and test doubles are
//! ordinary implementations.

use crate::error::ModelError;
use async_trait::async_trait;
use factdiff_core::{ModelId, ModelOutput, ModelSettings};
use std::sync::Arc;

/// Core trait for all generation backends.
#[async_trait]
pub trait Model: Send + Sync {
    /// Get the model name (e.g., "gpt-4o").
    fn name(&self) -> &str;

    /// Get the provider/system name (e.g., "openai").
    fn system(&self) -> &str;

    /// Get the full model identifier.
    fn identifier(&self) -> ModelId {
        ModelId::new(self.system(), self.name())
    }

    /// Generate a completion for a single user prompt.
    async fn generate(
        &self,
        prompt: &str,
        settings: &ModelSettings,
    ) -> Result<ModelOutput, ModelError>;
}

/// Boxed model for dynamic dispatch.
pub type BoxedModel = Arc<dyn Model>;

