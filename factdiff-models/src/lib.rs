//! # factdiff-models
//!
//! Generation backends for factdiff.
//!
//! This crate provides the [`Model`] trait that the comparison pipeline and
//! evaluation runner call into, plus:
//!
//! - [`OpenAIChatModel`]: OpenAI (and compatible) chat completions
//! - [`MockModel`] / [`FunctionModel`]: deterministic test doubles
//!
//! ## Example
//!
//! ```rust,ignore
//! use factdiff_models::{infer_model, Model};
//! use factdiff_core::ModelSettings;
//!
//! let model = infer_model("openai/gpt-4o-mini")?;
//! let output = model.generate("Say hello", &ModelSettings::new()).await?;
//! println!("{}", output.completion());
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod mock;
pub mod model;
#[cfg(feature = "openai")]
pub mod openai;

pub use error::{ModelError, ModelResult};
pub use mock::{FunctionDef, FunctionModel, MockModel};
pub use model::{BoxedModel, Model};
#[cfg(feature = "openai")]
pub use openai::OpenAIChatModel;

use factdiff_core::ModelId;
use std::sync::Arc;

/// Build a model from an identifier string such as `"openai/gpt-4o"`.
///
/// Bare names default to OpenAI. The `mock` provider yields a [`MockModel`]
/// that answers `"Mock response"`.
pub fn infer_model(identifier: &str) -> ModelResult<BoxedModel> {
    let id: ModelId = identifier
        .parse()
        .map_err(|e: factdiff_core::FactDiffError| ModelError::configuration(e.to_string()))?;
    build_model(&id)
}

/// Build a model from an already-parsed identifier.
pub fn build_model(id: &ModelId) -> ModelResult<BoxedModel> {
    tracing::debug!(model = %id, "building model");
    match id.provider() {
        #[cfg(feature = "openai")]
        "openai" => Ok(Arc::new(OpenAIChatModel::from_env(id.name())?)),
        "mock" => Ok(Arc::new(MockModel::new(id.name()))),
        other => Err(ModelError::configuration(format!(
            "Unknown or disabled provider '{other}' for model '{id}'"
        ))),
    }
}
