//! # factdiff-core
//!
//! Core types, settings, and error handling shared by the factdiff crates.
//!
//! - **Output**: [`ModelOutput`] / [`Choice`], the completion shape a generation
//!   backend returns and an evaluation task records
//! - **Settings**: [`ModelSettings`] generation parameters
//! - **Identifiers**: [`ModelId`] model selection and [`RunId`] run tracking
//! - **Errors**: the [`FactDiffError`] root error
//!
//! ## Example
//!
//! ```rust
//! use factdiff_core::{ModelId, ModelOutput, ModelSettings};
//!
//! let model: ModelId = "openai/gpt-4".parse().unwrap();
//! assert_eq!(model.provider(), "openai");
//!
//! let settings = ModelSettings::new().temperature(0.0).max_tokens(1024);
//! assert_eq!(settings.temperature, Some(0.0));
//!
//! let output = ModelOutput::from_text("gpt-4", "The sun is a star.");
//! assert_eq!(output.completion(), "The sun is a star.");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod errors;
pub mod identifier;
pub mod output;
pub mod settings;

pub use errors::{FactDiffError, Result};
pub use identifier::{generate_run_id, now_utc, ModelId, RunId};
pub use output::{AssistantMessage, Choice, FinishReason, ModelOutput, Usage};
pub use settings::ModelSettings;

/// Prelude module for common imports.
pub mod prelude {
    pub use crate::errors::{FactDiffError, Result};
    pub use crate::identifier::{ModelId, RunId};
    pub use crate::output::{Choice, FinishReason, ModelOutput, Usage};
    pub use crate::settings::ModelSettings;
}
