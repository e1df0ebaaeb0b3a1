//! GitHub API error types.
//!
//! API failures are categorized so that operators (and a redelivering
//! webhook sender) can tell a blip from a problem that needs a human:
//!
//! - **Transient**: 5xx, rate limits, network failures
//! - **Permanent**: most 4xx (missing config file, bad token, no access)
//!
//! The labeler itself never retries. The category is logged with each
//! backend failure and picks the webhook response: 503 for transient,
//! 502 for permanent.

use std::fmt;
use thiserror::Error;

use crate::config::ConfigError;
use crate::labeler::BackendError;

/// The kind of GitHub API error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitHubErrorKind {
    /// Likely to succeed if the delivery is retried later.
    Transient,

    /// Requires human intervention.
    Permanent,
}

impl GitHubErrorKind {
    pub fn is_transient(&self) -> bool {
        matches!(self, GitHubErrorKind::Transient)
    }
}

/// A categorized GitHub API error.
#[derive(Debug, Error)]
pub struct GitHubApiError {
    pub kind: GitHubErrorKind,

    /// The HTTP status code, if the request got a response.
    pub status_code: Option<u16>,

    pub message: String,

    #[source]
    pub source: Option<octocrab::Error>,
}

impl fmt::Display for GitHubApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "GitHub API error (HTTP {}): {}", code, self.message),
            None => write!(f, "GitHub API error: {}", self.message),
        }
    }
}

impl GitHubApiError {
    /// Creates a permanent error without an octocrab source.
    pub fn permanent_without_source(message: impl Into<String>) -> Self {
        Self {
            kind: GitHubErrorKind::Permanent,
            status_code: None,
            message: message.into(),
            source: None,
        }
    }

    /// Categorizes an octocrab error by status code, falling back to the
    /// message for failures that never got a response.
    pub fn from_octocrab(err: octocrab::Error) -> Self {
        let status_code = match &err {
            octocrab::Error::GitHub { source, .. } => Some(source.status_code.as_u16()),
            _ => None,
        };
        let message = err.to_string();
        let kind = categorize(status_code, &message);

        Self {
            kind,
            status_code,
            message,
            source: Some(err),
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }
}

fn categorize(status_code: Option<u16>, message: &str) -> GitHubErrorKind {
    match status_code {
        Some(429) => GitHubErrorKind::Transient,
        Some(403) if is_rate_limit_error(message) => GitHubErrorKind::Transient,
        Some(code) if (500..600).contains(&code) => GitHubErrorKind::Transient,
        Some(_) => GitHubErrorKind::Permanent,
        None if is_network_error(message) => GitHubErrorKind::Transient,
        None => GitHubErrorKind::Permanent,
    }
}

/// Checks if an error message indicates a rate limit.
fn is_rate_limit_error(message: &str) -> bool {
    let message_lower = message.to_lowercase();
    message_lower.contains("rate limit")
        || message_lower.contains("api rate")
        || message_lower.contains("secondary rate")
        || message_lower.contains("abuse detection")
}

/// Checks if an error message indicates a network-level error.
fn is_network_error(message: &str) -> bool {
    let message_lower = message.to_lowercase();
    message_lower.contains("timeout")
        || message_lower.contains("connection")
        || message_lower.contains("network")
        || message_lower.contains("dns")
        || message_lower.contains("timed out")
}

/// Errors from [`OctocrabClient`](super::OctocrabClient) as a labeler backend.
#[derive(Debug, Error)]
pub enum GitHubBackendError {
    /// The API call itself failed.
    #[error(transparent)]
    Api(#[from] GitHubApiError),

    /// The config path exists but is not a readable text file.
    #[error("{path} is not a usable labeler config file: {reason}")]
    ConfigContent { path: String, reason: String },

    /// The config file was read but could not be parsed.
    #[error("{path}: {source}")]
    Config {
        path: String,
        #[source]
        source: ConfigError,
    },
}

impl BackendError for GitHubBackendError {
    fn is_config_error(&self) -> bool {
        matches!(
            self,
            GitHubBackendError::ConfigContent { .. } | GitHubBackendError::Config { .. }
        )
    }

    fn is_transient(&self) -> bool {
        match self {
            GitHubBackendError::Api(e) => e.is_transient(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorizes_by_status_code() {
        assert_eq!(categorize(Some(502), ""), GitHubErrorKind::Transient);
        assert_eq!(categorize(Some(429), ""), GitHubErrorKind::Transient);
        assert_eq!(
            categorize(Some(403), "API rate limit exceeded for installation"),
            GitHubErrorKind::Transient
        );
        assert_eq!(
            categorize(Some(403), "Resource not accessible by integration"),
            GitHubErrorKind::Permanent
        );
        assert_eq!(categorize(Some(404), "Not Found"), GitHubErrorKind::Permanent);
        assert_eq!(categorize(Some(422), ""), GitHubErrorKind::Permanent);
    }

    #[test]
    fn categorizes_responseless_failures_by_message() {
        assert_eq!(
            categorize(None, "error sending request: connection reset"),
            GitHubErrorKind::Transient
        );
        assert_eq!(categorize(None, "operation timed out"), GitHubErrorKind::Transient);
        assert_eq!(
            categorize(None, "failed to deserialize response"),
            GitHubErrorKind::Permanent
        );
    }

    #[test]
    fn rate_limit_detection() {
        assert!(is_rate_limit_error("API rate limit exceeded"));
        assert!(is_rate_limit_error("You have exceeded a secondary rate limit"));
        assert!(is_rate_limit_error("abuse detection mechanism"));
        assert!(!is_rate_limit_error("Permission denied"));
    }

    #[test]
    fn display_includes_status() {
        let err = GitHubApiError {
            kind: GitHubErrorKind::Permanent,
            status_code: Some(404),
            message: "Not Found".to_string(),
            source: None,
        };
        assert_eq!(err.to_string(), "GitHub API error (HTTP 404): Not Found");
        assert!(!err.is_transient());
    }

    #[test]
    fn backend_error_reports_api_kind() {
        let rate_limited = GitHubBackendError::Api(GitHubApiError {
            kind: categorize(Some(429), "API rate limit exceeded"),
            status_code: Some(429),
            message: "API rate limit exceeded".to_string(),
            source: None,
        });
        assert!(rate_limited.is_transient());

        let not_found = GitHubBackendError::Api(GitHubApiError {
            kind: categorize(Some(404), "Not Found"),
            status_code: Some(404),
            message: "Not Found".to_string(),
            source: None,
        });
        assert!(!not_found.is_transient());

        let config = GitHubBackendError::ConfigContent {
            path: ".github/labeler.yml".to_string(),
            reason: "is a directory".to_string(),
        };
        assert!(!config.is_transient());
    }

    #[test]
    fn only_config_problems_are_config_errors() {
        let api = GitHubBackendError::Api(GitHubApiError::permanent_without_source("boom"));
        assert!(!api.is_config_error());

        let content = GitHubBackendError::ConfigContent {
            path: ".github/labeler.yml".to_string(),
            reason: "is a directory".to_string(),
        };
        assert!(content.is_config_error());

        let parsed = GitHubBackendError::Config {
            path: ".github/labeler.yml".to_string(),
            source: ConfigError::UnsupportedVersion {
                found: 2,
                expected: 1,
            },
        };
        assert!(parsed.is_config_error());
    }
}
