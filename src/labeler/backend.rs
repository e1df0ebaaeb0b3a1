//! The collaborator interface between the labeler and GitHub.
//!
//! The orchestrator only needs four capabilities from the outside world,
//! and depends on them through [`LabelerBackend`] so that tests can supply
//! an in-memory implementation.
//!
//! # Example (mock for testing)
//!
//! ```ignore
//! struct FixedBackend {
//!     config: LabelerConfig,
//!     labels: Mutex<LabelSet>,
//! }
//!
//! impl LabelerBackend for FixedBackend {
//!     type Error = MockError;
//!
//!     async fn fetch_repo_config(&self, _repo: &RepoId) -> Result<LabelerConfig, MockError> {
//!         Ok(self.config.clone())
//!     }
//!     // ...
//! }
//! ```

use std::collections::BTreeSet;
use std::future::Future;

use crate::config::LabelerConfig;
use crate::types::{LabelSet, PrNumber, RepoId};

/// Errors produced by a [`LabelerBackend`].
///
/// The HTTP layer needs to tell a broken configuration file (the
/// repository owner's problem) apart from a failed API call, and a failure
/// worth redelivering apart from one that will fail again.
pub trait BackendError: std::error::Error + Send + Sync + 'static {
    /// Returns true if the repository's labeler configuration could be read
    /// but not understood.
    fn is_config_error(&self) -> bool {
        false
    }

    /// Returns true if the same call is likely to succeed later (rate
    /// limits, 5xx, network failures).
    fn is_transient(&self) -> bool {
        false
    }
}

/// Access to repository configuration and pull request labels.
pub trait LabelerBackend {
    /// The error type returned by this backend.
    type Error: BackendError;

    /// Fetches and parses the labeler configuration of `repo`.
    fn fetch_repo_config(
        &self,
        repo: &RepoId,
    ) -> impl Future<Output = Result<LabelerConfig, Self::Error>> + Send;

    /// Returns the labels currently on the pull request.
    fn get_current_labels(
        &self,
        repo: &RepoId,
        pr: PrNumber,
    ) -> impl Future<Output = Result<LabelSet, Self::Error>> + Send;

    /// Replaces the pull request's labels with exactly `labels`.
    fn replace_labels(
        &self,
        repo: &RepoId,
        pr: PrNumber,
        labels: &LabelSet,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Lists the paths changed by the pull request.
    ///
    /// Only called when the payload carried no file list and some rule has a
    /// `files` condition.
    fn list_changed_files(
        &self,
        repo: &RepoId,
        pr: PrNumber,
    ) -> impl Future<Output = Result<BTreeSet<String>, Self::Error>> + Send;
}
