//! Typed pull request webhook events.
//!
//! The labeler only reacts to the `pull_request` event, and only to the
//! actions that can change what the rules see: a PR appearing (`opened`,
//! `reopened`), its title or base changing (`edited`), or new commits
//! (`synchronize`). Everything else is ignored.

use crate::types::PullRequestAttributes;

/// Value of the `X-GitHub-Event` header for pull request events.
pub const PULL_REQUEST_EVENT: &str = "pull_request";

/// A pull request action the labeler reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrAction {
    /// PR was opened.
    Opened,
    /// PR was reopened.
    Reopened,
    /// PR title, body, or base branch was edited.
    Edited,
    /// New commits were pushed to the PR head.
    Synchronize,
}

impl PrAction {
    /// Maps a webhook `action` string to a relevant action.
    ///
    /// Returns `None` for actions the labeler ignores (`closed`, `labeled`,
    /// `assigned`, ...).
    pub fn from_webhook(action: &str) -> Option<Self> {
        match action {
            "opened" => Some(PrAction::Opened),
            "reopened" => Some(PrAction::Reopened),
            "edited" => Some(PrAction::Edited),
            "synchronize" => Some(PrAction::Synchronize),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrAction::Opened => "opened",
            PrAction::Reopened => "reopened",
            PrAction::Edited => "edited",
            PrAction::Synchronize => "synchronize",
        }
    }
}

/// A relevant pull request event, normalized for the rule engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEvent {
    /// The action that triggered this event.
    pub action: PrAction,

    /// The attributes the rules are evaluated against.
    pub attributes: PullRequestAttributes,

    /// Whether the payload itself listed the changed files.
    ///
    /// GitHub's own deliveries never do, so the file list is fetched
    /// separately when a rule needs it.
    pub has_file_list: bool,
}
