//! The rule engine.
//!
//! A [`LabelerConfig`] is compiled once per event into a [`RuleSet`]: every
//! specified field of every matcher becomes one [`Condition`] variant, with
//! regular expressions and thresholds already parsed. Evaluation is then a
//! pure fold over data:
//!
//! - a matcher holds iff it has at least one condition and *all* of them hold;
//! - a label is produced iff *any* of its matchers holds.
//!
//! A matcher with no conditions never holds. This is not vacuous truth: an
//! empty rule must not label every pull request.

use regex::Regex;
use tracing::debug;

use crate::config::{ConfigError, LabelMatcher, LabelerConfig, SUPPORTED_VERSION, Threshold};
use crate::types::{LabelSet, PullRequestAttributes};


/// One condition over pull request attributes.
#[derive(Debug, Clone)]
pub enum Condition {
    /// The title contains a match for the pattern.
    Title(Regex),
    /// The head branch name contains a match for the pattern.
    Branch(Regex),
    /// The PR's mergeable flag equals this value.
    Mergeable(bool),
    /// The diff size is strictly below this value.
    SizeBelow(u64),
    /// The diff size is strictly above this value.
    SizeAbove(u64),
    /// At least one changed file matches at least one pattern.
    Files(Vec<Regex>),
}

impl Condition {
    /// Returns whether this condition holds for the given attributes.
    pub fn holds(&self, attrs: &PullRequestAttributes) -> bool {
        match self {
            Condition::Title(re) => re.is_match(&attrs.title),
            Condition::Branch(re) => re.is_match(&attrs.branch_name),
            Condition::Mergeable(expected) => attrs.mergeable == *expected,
            Condition::SizeBelow(n) => attrs.diff_size < *n,
            Condition::SizeAbove(n) => attrs.diff_size > *n,
            Condition::Files(patterns) => attrs
                .changed_files
                .iter()
                .any(|path| patterns.iter().any(|re| re.is_match(path))),
        }
    }

    /// The config field this condition came from, for logging.
    pub fn field(&self) -> &'static str {
        match self {
            Condition::Title(_) => "title",
            Condition::Branch(_) => "branch",
            Condition::Mergeable(_) => "mergeable",
            Condition::SizeBelow(_) => "size-below",
            Condition::SizeAbove(_) => "size-above",
            Condition::Files(_) => "files",
        }
    }
}

/// A matcher with its conditions compiled.
#[derive(Debug, Clone)]
pub struct CompiledMatcher {
    pub label: String,
    pub conditions: Vec<Condition>,
}

impl CompiledMatcher {
    /// Compiles a matcher, keeping only the fields it actually specifies.
    pub fn compile(index: usize, matcher: &LabelMatcher) -> Result<Self, ConfigError> {
        let label = matcher.label.trim();
        if label.is_empty() {
            return Err(ConfigError::EmptyLabel { index });
        }

        let mut conditions = Vec::new();

        if let Some(pattern) = specified(&matcher.title) {
            conditions.push(Condition::Title(compile_pattern(label, "title", pattern)?));
        }

        if let Some(pattern) = specified(&matcher.branch) {
            conditions.push(Condition::Branch(compile_pattern(label, "branch", pattern)?));
        }

        if let Some(value) = specified(&matcher.mergeable) {
            let expected = match value {
                "True" => true,
                "False" => false,
                other => {
                    return Err(ConfigError::InvalidMergeable {
                        label: label.to_string(),
                        value: other.to_string(),
                    });
                }
            };
            conditions.push(Condition::Mergeable(expected));
        }

        if let Some(n) = parse_threshold(label, "size-below", matcher.size_below.as_ref())? {
            conditions.push(Condition::SizeBelow(n));
        }

        if let Some(n) = parse_threshold(label, "size-above", matcher.size_above.as_ref())? {
            conditions.push(Condition::SizeAbove(n));
        }

        let file_patterns = matcher
            .files
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| compile_pattern(label, "files", p))
            .collect::<Result<Vec<_>, _>>()?;
        if !file_patterns.is_empty() {
            conditions.push(Condition::Files(file_patterns));
        }

        Ok(CompiledMatcher {
            label: label.to_string(),
            conditions,
        })
    }

    /// Returns whether every condition holds. A matcher without conditions
    /// never matches.
    pub fn matches(&self, attrs: &PullRequestAttributes) -> bool {
        !self.conditions.is_empty() && self.conditions.iter().all(|c| c.holds(attrs))
    }

    pub fn has_file_condition(&self) -> bool {
        self.conditions
            .iter()
            .any(|c| matches!(c, Condition::Files(_)))
    }
}

/// A compiled, validated configuration.
#[derive(Debug, Clone)]
pub struct RuleSet {
    matchers: Vec<CompiledMatcher>,
    managed: LabelSet,
}

impl RuleSet {
    /// Validates and compiles a configuration.
    ///
    /// Fails on the first problem found; a configuration is either applied
    /// completely or not at all.
    pub fn compile(config: &LabelerConfig) -> Result<Self, ConfigError> {
        if config.version != SUPPORTED_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                expected: SUPPORTED_VERSION,
            });
        }

        let matchers = config
            .matchers
            .iter()
            .enumerate()
            .map(|(index, m)| CompiledMatcher::compile(index, m))
            .collect::<Result<Vec<_>, _>>()?;

        let managed = matchers.iter().map(|m| m.label.clone()).collect();

        Ok(RuleSet { matchers, managed })
    }

    /// Evaluates all matchers and returns the labels that should be present.
    pub fn evaluate(&self, attrs: &PullRequestAttributes) -> LabelSet {
        self.matchers
            .iter()
            .filter(|m| m.matches(attrs))
            .inspect(|m| {
                let fields: Vec<_> = m.conditions.iter().map(Condition::field).collect();
                debug!(pr = %attrs.number, label = %m.label, fields = ?fields, "Matcher holds");
            })
            .map(|m| m.label.clone())
            .collect()
    }

    /// Every label named by some matcher, matching or not.
    pub fn managed_labels(&self) -> &LabelSet {
        &self.managed
    }

    /// Returns true if evaluating needs the list of changed files.
    pub fn needs_changed_files(&self) -> bool {
        self.matchers.iter().any(CompiledMatcher::has_file_condition)
    }
}

/// Compiles `config` and evaluates it against `attrs` in one step.
pub fn evaluate(
    config: &LabelerConfig,
    attrs: &PullRequestAttributes,
) -> Result<LabelSet, ConfigError> {
    Ok(RuleSet::compile(config)?.evaluate(attrs))
}

/// The distinct label names across all matchers of `config`.
///
/// Unlike [`RuleSet::managed_labels`] this does not validate the config.
pub fn managed_labels(config: &LabelerConfig) -> LabelSet {
    config
        .matchers
        .iter()
        .map(|m| m.label.trim())
        .filter(|l| !l.is_empty())
        .collect()
}

fn specified(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

fn compile_pattern(label: &str, field: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
        label: label.to_string(),
        field,
        pattern: pattern.to_string(),
        source,
    })
}

fn parse_threshold(
    label: &str,
    field: &'static str,
    threshold: Option<&Threshold>,
) -> Result<Option<u64>, ConfigError> {
    match threshold {
        None => Ok(None),
        Some(t) if t.is_blank() => Ok(None),
        Some(t) => t.value().map(Some).ok_or_else(|| ConfigError::InvalidThreshold {
            label: label.to_string(),
            field,
            value: t.to_string(),
        }),
    }
}
