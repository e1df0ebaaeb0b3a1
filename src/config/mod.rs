//! Per-repository labeler configuration.
//!
//! This module owns the file format and its parse errors. Turning a parsed
//! [`LabelerConfig`] into something that can be evaluated is the job of
//! [`crate::rules`].

pub mod error;
pub mod model;

pub use error::ConfigError;
pub use model::{LabelMatcher, LabelerConfig, SUPPORTED_VERSION, Threshold};

/// Where the labeler looks for its configuration inside a repository.
pub const DEFAULT_CONFIG_PATH: &str = ".github/labeler.yml";
