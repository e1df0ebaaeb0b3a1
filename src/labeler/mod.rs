//! Event orchestration.
//!
//! [`Labeler::handle_event`] runs one webhook delivery start to finish:
//!
//! ```text
//! event kind ─► parse payload ─► fetch config ─► compile rules
//!     │              │                               │
//!  (other)     (irrelevant                  (files needed and
//!     │          action)                    not in payload)
//!     ▼              ▼                               ▼
//!  Ignored        Ignored                   list changed files
//!                                                    │
//!        replace ◄─ (differs) ─ reconcile ◄─ current labels ◄─ evaluate
//! ```
//!
//! The first failure aborts the event and is returned to the caller. No call
//! is retried here, and no partial label update is ever made: the final set
//! is written in a single replace.

mod backend;


pub use backend::{BackendError, LabelerBackend};

use std::fmt;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ConfigError;
use crate::reconcile::reconcile;
use crate::rules::RuleSet;
use crate::types::{LabelSet, RepoId};
use crate::webhooks::{PULL_REQUEST_EVENT, ParseError, PullRequestEvent, parse_pull_request};

/// What handling an event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelOutcome {
    /// Not a `pull_request` event, or an action the labeler ignores.
    Ignored,

    /// The computed labels equal the current ones; nothing was written.
    Unchanged { labels: LabelSet },

    /// The labels were replaced.
    Replaced {
        previous: LabelSet,
        labels: LabelSet,
    },
}

/// The backend call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendOperation {
    FetchConfig,
    ListChangedFiles,
    GetLabels,
    ReplaceLabels,
}

impl fmt::Display for BackendOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BackendOperation::FetchConfig => "fetch labeler config",
            BackendOperation::ListChangedFiles => "list changed files",
            BackendOperation::GetLabels => "get current labels",
            BackendOperation::ReplaceLabels => "replace labels",
        };
        f.write_str(s)
    }
}

/// Errors from handling a single event.
#[derive(Debug, Error)]
pub enum LabelerError<E: BackendError> {
    /// The delivery body is not a well-formed pull request event.
    #[error("malformed pull_request payload: {0}")]
    Parse(#[from] ParseError),

    /// The repository's configuration was rejected; no labels were changed.
    #[error("invalid labeler config for {repo}: {source}")]
    Config {
        repo: RepoId,
        #[source]
        source: ConfigError,
    },

    /// A backend call failed.
    #[error("failed to {operation} for {repo}: {source}")]
    Backend {
        operation: BackendOperation,
        repo: RepoId,
        #[source]
        source: E,
    },
}

impl<E: BackendError> LabelerError<E> {
    /// Returns true if the event failed because of the repository's labeler
    /// configuration rather than a transport or API problem.
    pub fn is_config_error(&self) -> bool {
        match self {
            LabelerError::Parse(_) => false,
            LabelerError::Config { .. } => true,
            LabelerError::Backend { source, .. } => source.is_config_error(),
        }
    }

    /// Returns true if a backend call failed in a way that may succeed on
    /// redelivery.
    pub fn is_transient(&self) -> bool {
        match self {
            LabelerError::Backend { source, .. } => source.is_transient(),
            _ => false,
        }
    }
}

/// Applies each repository's label rules to its pull requests.
///
/// Holds no per-event state; one instance can serve concurrent deliveries.
#[derive(Debug)]
pub struct Labeler<B> {
    backend: B,
}

impl<B: LabelerBackend> Labeler<B> {
    pub fn new(backend: B) -> Self {
        Labeler { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Handles one webhook delivery.
    ///
    /// `event_kind` is the `X-GitHub-Event` header value and `payload` the
    /// raw request body. Events other than `pull_request`, and pull request
    /// actions that cannot affect labels, return [`LabelOutcome::Ignored`]
    /// without touching the backend.
    pub async fn handle_event(
        &self,
        event_kind: &str,
        payload: &[u8],
    ) -> Result<LabelOutcome, LabelerError<B::Error>> {
        if event_kind != PULL_REQUEST_EVENT {
            debug!(event_kind, "Ignoring non-pull_request event");
            return Ok(LabelOutcome::Ignored);
        }

        let Some(event) = parse_pull_request(payload)? else {
            debug!("Ignoring pull_request action that cannot affect labels");
            return Ok(LabelOutcome::Ignored);
        };

        self.label_pull_request(event).await
    }

    /// Computes and applies the labels for an already-parsed event.
    pub async fn label_pull_request(
        &self,
        event: PullRequestEvent,
    ) -> Result<LabelOutcome, LabelerError<B::Error>> {
        let PullRequestEvent {
            action,
            mut attributes,
            has_file_list,
        } = event;
        let repo = attributes.repo.clone();
        let pr = attributes.number;

        let backend_error = |operation: BackendOperation| {
            let repo = repo.clone();
            move |source: B::Error| {
                warn!(
                    repo = %repo,
                    pr = %pr,
                    transient = source.is_transient(),
                    error = %source,
                    "Failed to {}",
                    operation
                );
                LabelerError::Backend {
                    operation,
                    repo,
                    source,
                }
            }
        };

        let config = self
            .backend
            .fetch_repo_config(&repo)
            .await
            .map_err(backend_error(BackendOperation::FetchConfig))?;

        let rules = RuleSet::compile(&config).map_err(|source| {
            warn!(repo = %repo, error = %source, "Rejecting labeler config");
            LabelerError::Config {
                repo: repo.clone(),
                source,
            }
        })?;

        if !has_file_list && rules.needs_changed_files() {
            attributes.changed_files = self
                .backend
                .list_changed_files(&repo, pr)
                .await
                .map_err(backend_error(BackendOperation::ListChangedFiles))?;
        }

        let desired = rules.evaluate(&attributes);

        let current = self
            .backend
            .get_current_labels(&repo, pr)
            .await
            .map_err(backend_error(BackendOperation::GetLabels))?;

        let labels = reconcile(&desired, &current, rules.managed_labels());

        if labels == current {
            debug!(
                repo = %repo,
                pr = %pr,
                action = action.as_str(),
                labels = %labels,
                "Labels already up to date"
            );
            return Ok(LabelOutcome::Unchanged { labels });
        }

        self.backend
            .replace_labels(&repo, pr, &labels)
            .await
            .map_err(backend_error(BackendOperation::ReplaceLabels))?;

        info!(
            repo = %repo,
            pr = %pr,
            action = action.as_str(),
            previous = %current,
            labels = %labels,
            "Replaced labels"
        );

        Ok(LabelOutcome::Replaced {
            previous: current,
            labels,
        })
    }
}
