//! Labeler configuration model.
//!
//! This mirrors the per-repository `.github/labeler.yml` file:
//!
//! ```yaml
//! version: 1
//! labels:
//!   - label: WIP
//!     title: "^WIP:.*"
//!   - label: S
//!     size-below: 10
//! ```
//!
//! The model is deliberately loose (strings and options). Validation and
//! regex compilation happen in [`crate::rules::RuleSet::compile`].

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ConfigError;

/// The only configuration version this labeler understands.
pub const SUPPORTED_VERSION: u32 = 1;

/// A parsed labeler configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelerConfig {
    /// Configuration format version. Missing parses as 0 and is rejected.
    #[serde(default)]
    pub version: u32,

    /// The matchers, in file order.
    #[serde(rename = "labels", default)]
    pub matchers: Vec<LabelMatcher>,
}

impl LabelerConfig {
    /// Creates a version 1 configuration with the given matchers.
    pub fn new(matchers: Vec<LabelMatcher>) -> Self {
        LabelerConfig {
            version: SUPPORTED_VERSION,
            matchers,
        }
    }

    /// Parses a configuration from YAML. JSON is accepted too, being valid YAML.
    ///
    /// Only the shape is checked here; see [`crate::rules::RuleSet::compile`]
    /// for semantic validation.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }
}

/// A named rule tying a label to zero or more conditions.
///
/// Every field other than `label` is a condition. A field that is absent, an
/// empty string, or an empty list is unspecified and imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LabelMatcher {
    /// The label this matcher governs.
    pub label: String,

    /// Regular expression searched for in the PR title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Regular expression searched for in the head branch name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    /// `"True"` or `"False"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mergeable: Option<String>,

    /// The diff size must be strictly below this.
    #[serde(default, alias = "size_below", skip_serializing_if = "Option::is_none")]
    pub size_below: Option<Threshold>,

    /// The diff size must be strictly above this.
    #[serde(default, alias = "size_above", skip_serializing_if = "Option::is_none")]
    pub size_above: Option<Threshold>,

    /// At least one changed file must match at least one of these.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
}

impl LabelMatcher {
    /// Creates a matcher for `label` with no conditions.
    pub fn new(label: impl Into<String>) -> Self {
        LabelMatcher {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn title(mut self, pattern: impl Into<String>) -> Self {
        self.title = Some(pattern.into());
        self
    }

    pub fn branch(mut self, pattern: impl Into<String>) -> Self {
        self.branch = Some(pattern.into());
        self
    }

    pub fn mergeable(mut self, value: impl Into<String>) -> Self {
        self.mergeable = Some(value.into());
        self
    }

    pub fn size_below(mut self, threshold: impl Into<Threshold>) -> Self {
        self.size_below = Some(threshold.into());
        self
    }

    pub fn size_above(mut self, threshold: impl Into<Threshold>) -> Self {
        self.size_above = Some(threshold.into());
        self
    }

    pub fn files<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = patterns.into_iter().map(Into::into).collect();
        self
    }
}

/// A size threshold as written in the config file.
///
/// Thresholds may be YAML integers (`size-below: 10`) or strings
/// (`size-below: "10"`); strings are parsed when the rules are compiled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Threshold {
    Number(u64),
    Text(String),
}

impl Threshold {
    /// Returns true if the threshold was written as an empty string.
    pub fn is_blank(&self) -> bool {
        matches!(self, Threshold::Text(s) if s.trim().is_empty())
    }

    /// Returns the numeric value, or `None` if the text is not a non-negative integer.
    pub fn value(&self) -> Option<u64> {
        match self {
            Threshold::Number(n) => Some(*n),
            Threshold::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::Number(n) => write!(f, "{}", n),
            Threshold::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for Threshold {
    fn from(n: u64) -> Self {
        Threshold::Number(n)
    }
}

impl From<&str> for Threshold {
    fn from(s: &str) -> Self {
        Threshold::Text(s.to_string())
    }
}

impl From<String> for Threshold {
    fn from(s: String) -> Self {
        Threshold::Text(s)
    }
}
