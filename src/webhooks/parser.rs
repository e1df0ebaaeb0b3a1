//! Pull request payload parser.
//!
//! Turns the raw JSON body of a `pull_request` webhook into a
//! [`PullRequestEvent`].
//!
//! # Parsing Strategy
//!
//! 1. Read only the `action` field; irrelevant actions return `Ok(None)`
//!    without looking at the rest of the payload
//! 2. Deserialize the fields the rules need
//! 3. Optional fields default instead of failing (`mergeable: null` while
//!    GitHub computes it, missing `additions`/`deletions`, no file list)
//! 4. Missing required structure (`pull_request`, `repository`, numbers)
//!    returns `Err`

use serde::Deserialize;
use thiserror::Error;

use crate::types::{PrNumber, PullRequestAttributes, RepoId};

use super::events::{PrAction, PullRequestEvent};

/// Error type for payload parsing failures.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON deserialization failed (includes missing required fields).
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Parses a `pull_request` webhook payload.
///
/// # Returns
///
/// * `Ok(Some(event))` - A relevant action, with attributes extracted
/// * `Ok(None)` - An action the labeler ignores (not an error)
/// * `Err(e)` - Malformed payload or missing required fields
///
/// # Examples
///
/// ```
/// use pr_labeler::webhooks::parse_pull_request;
///
/// let payload = br#"{
///     "action": "opened",
///     "pull_request": {
///         "number": 42,
///         "title": "WIP: add labeler",
///         "head": { "ref": "feature/labeler" },
///         "mergeable": null,
///         "additions": 7,
///         "deletions": 2
///     },
///     "repository": {
///         "owner": { "login": "octocat" },
///         "name": "hello-world"
///     }
/// }"#;
///
/// let event = parse_pull_request(payload).unwrap().expect("relevant action");
/// assert_eq!(event.attributes.title, "WIP: add labeler");
/// assert_eq!(event.attributes.diff_size, 9);
/// assert!(!event.attributes.mergeable);
/// ```
pub fn parse_pull_request(payload: &[u8]) -> Result<Option<PullRequestEvent>, ParseError> {
    let RawAction { action } = serde_json::from_slice(payload)?;

    let Some(action) = PrAction::from_webhook(&action) else {
        return Ok(None);
    };

    let raw: RawPullRequestPayload = serde_json::from_slice(payload)?;
    let pr = raw.pull_request;

    let has_file_list = pr.files.is_some();
    let changed_files = pr
        .files
        .unwrap_or_default()
        .into_iter()
        .map(|f| f.filename)
        .collect();

    let diff_size = pr
        .additions
        .unwrap_or(0)
        .saturating_add(pr.deletions.unwrap_or(0));

    Ok(Some(PullRequestEvent {
        action,
        attributes: PullRequestAttributes {
            repo: RepoId::new(raw.repository.owner.login, raw.repository.name),
            number: PrNumber(pr.number),
            title: pr.title.unwrap_or_default(),
            branch_name: pr.head.ref_name,
            mergeable: pr.mergeable.unwrap_or(false),
            changed_files,
            diff_size,
        },
        has_file_list,
    }))
}

// ============================================================================
// Raw payload structures for deserialization
//
// These match GitHub's webhook JSON structure; unknown fields are ignored.
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawAction {
    action: String,
}

#[derive(Debug, Deserialize)]
struct RawPullRequestPayload {
    pull_request: RawPullRequest,
    repository: RawRepository,
}

#[derive(Debug, Deserialize)]
struct RawPullRequest {
    number: u64,
    title: Option<String>,
    head: RawRef,
    mergeable: Option<bool>,
    additions: Option<u64>,
    deletions: Option<u64>,
    /// Not part of GitHub's payload; present in enriched or replayed events.
    files: Option<Vec<RawFile>>,
}

#[derive(Debug, Deserialize)]
struct RawRef {
    #[serde(rename = "ref")]
    ref_name: String,
}

#[derive(Debug, Deserialize)]
struct RawFile {
    filename: String,
}

#[derive(Debug, Deserialize)]
struct RawRepository {
    owner: RawOwner,
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawOwner {
    login: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn payload(action: &str, pull_request: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&serde_json::json!({
            "action": action,
            "number": 1,
            "pull_request": pull_request,
            "repository": {
                "owner": { "login": "srvaroa" },
                "name": "labeler"
            }
        }))
        .unwrap()
    }

    #[test]
    fn parse_opened_pull_request() {
        let body = payload(
            "opened",
            serde_json::json!({
                "number": 1,
                "title": "WIP: Update README.md",
                "head": { "ref": "srvaroa-patch-1", "sha": "a".repeat(40) },
                "base": { "ref": "master" },
                "mergeable": true,
                "additions": 3,
                "deletions": 1
            }),
        );

        let event = parse_pull_request(&body).unwrap().expect("should parse");

        assert_eq!(event.action, PrAction::Opened);
        assert!(!event.has_file_list);

        let attrs = event.attributes;
        assert_eq!(attrs.repo, RepoId::new("srvaroa", "labeler"));
        assert_eq!(attrs.number, PrNumber(1));
        assert_eq!(attrs.title, "WIP: Update README.md");
        assert_eq!(attrs.branch_name, "srvaroa-patch-1");
        assert!(attrs.mergeable);
        assert_eq!(attrs.diff_size, 4);
        assert!(attrs.changed_files.is_empty());
    }

    #[test]
    fn optional_fields_default() {
        let body = payload(
            "synchronize",
            serde_json::json!({
                "number": 7,
                "head": { "ref": "branch" },
                "mergeable": null
            }),
        );

        let attrs = parse_pull_request(&body).unwrap().unwrap().attributes;

        assert_eq!(attrs.title, "");
        assert!(!attrs.mergeable);
        assert_eq!(attrs.diff_size, 0);
        assert!(attrs.changed_files.is_empty());
    }

    #[test]
    fn embedded_file_list_is_used() {
        let body = payload(
            "edited",
            serde_json::json!({
                "number": 2,
                "head": { "ref": "b" },
                "files": [
                    { "filename": "pkg/labeler_test.go", "status": "modified" },
                    { "filename": "README.md" }
                ]
            }),
        );

        let event = parse_pull_request(&body).unwrap().unwrap();

        assert!(event.has_file_list);
        assert_eq!(
            event.attributes.changed_files,
            BTreeSet::from(["README.md".to_string(), "pkg/labeler_test.go".to_string()])
        );
    }

    #[test]
    fn diff_size_saturates() {
        let body = payload(
            "opened",
            serde_json::json!({
                "number": 3,
                "head": { "ref": "b" },
                "additions": u64::MAX,
                "deletions": 10
            }),
        );

        let attrs = parse_pull_request(&body).unwrap().unwrap().attributes;
        assert_eq!(attrs.diff_size, u64::MAX);
    }

    #[test]
    fn irrelevant_actions_return_none() {
        for action in ["closed", "labeled", "assigned", "review_requested", "locked"] {
            let body = payload(
                action,
                serde_json::json!({ "number": 1, "head": { "ref": "b" } }),
            );
            assert!(
                parse_pull_request(&body).unwrap().is_none(),
                "action '{}' should return None",
                action
            );
        }
    }

    #[test]
    fn irrelevant_action_does_not_require_full_payload() {
        let body = br#"{ "action": "closed" }"#;
        assert!(parse_pull_request(body).unwrap().is_none());
    }

    #[test]
    fn malformed_json_returns_error() {
        let result = parse_pull_request(b"not valid json");
        assert!(matches!(result, Err(ParseError::JsonError(_))));
    }

    #[test]
    fn missing_repository_returns_error() {
        let body = br#"{
            "action": "opened",
            "pull_request": { "number": 1, "head": { "ref": "b" } }
        }"#;
        assert!(parse_pull_request(body).is_err());
    }

    #[test]
    fn missing_head_returns_error() {
        let body = payload("opened", serde_json::json!({ "number": 1 }));
        assert!(parse_pull_request(&body).is_err());
    }
}
