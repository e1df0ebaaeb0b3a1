//! Configuration error types.

use thiserror::Error;

/// A labeler configuration that cannot be applied.
///
/// Any of these fails the whole event: rules are never partially applied.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file is not valid YAML (or JSON), or has the wrong shape.
    #[error("failed to parse labeler config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The configuration declares a version other than the supported one.
    #[error("unsupported labeler config version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// A matcher has an empty label name.
    #[error("matcher #{index} has an empty label name")]
    EmptyLabel { index: usize },

    /// A regular expression failed to compile.
    #[error("invalid {field} pattern {pattern:?} for label {label:?}: {source}")]
    InvalidPattern {
        label: String,
        field: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A size threshold is not a non-negative integer.
    #[error("invalid {field} threshold {value:?} for label {label:?}")]
    InvalidThreshold {
        label: String,
        field: &'static str,
        value: String,
    },

    /// The mergeable condition is neither "True" nor "False".
    #[error("invalid mergeable value {value:?} for label {label:?} (expected \"True\" or \"False\")")]
    InvalidMergeable { label: String, value: String },
}
