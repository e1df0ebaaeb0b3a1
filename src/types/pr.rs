//! Pull request attributes as seen by the rule engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::ids::{PrNumber, RepoId};

/// The fixed attribute bundle extracted from a pull request event.
///
/// Constructed fresh for every event and read-only during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestAttributes {
    /// The repository the PR belongs to.
    pub repo: RepoId,

    /// The PR number.
    pub number: PrNumber,

    /// The PR title.
    pub title: String,

    /// The head (source) branch name.
    pub branch_name: String,

    /// Whether GitHub reports the PR as mergeable.
    ///
    /// GitHub sends `null` while mergeability is still being computed; that
    /// is treated as not mergeable.
    pub mergeable: bool,

    /// Paths of the files changed by the PR.
    pub changed_files: BTreeSet<String>,

    /// Lines added plus lines deleted.
    pub diff_size: u64,
}

impl PullRequestAttributes {
    /// Creates attributes with empty title/branch/files, not mergeable, and a
    /// zero diff size. Intended as a starting point for struct update syntax.
    pub fn new(repo: RepoId, number: PrNumber) -> Self {
        PullRequestAttributes {
            repo,
            number,
            title: String::new(),
            branch_name: String::new(),
            mergeable: false,
            changed_files: BTreeSet::new(),
            diff_size: 0,
        }
    }
}
