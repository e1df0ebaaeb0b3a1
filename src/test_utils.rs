//! Shared test fixtures and arbitrary generators for property-based testing.

use std::collections::BTreeSet;
use std::sync::Mutex;

use proptest::prelude::*;
use thiserror::Error;

use crate::config::LabelerConfig;
use crate::labeler::{BackendError, BackendOperation, LabelerBackend};
use crate::types::{LabelSet, PrNumber, PullRequestAttributes, RepoId};

/// Attributes for `octocat/hello-world#1` with the given title, everything
/// else empty or zero.
pub fn attrs_with_title(title: &str) -> PullRequestAttributes {
    PullRequestAttributes {
        title: title.to_string(),
        ..PullRequestAttributes::new(RepoId::new("octocat", "hello-world"), PrNumber(1))
    }
}

pub fn labels(names: &[&str]) -> LabelSet {
    names.iter().copied().collect()
}

pub fn arb_label() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9/_-]{0,11}".prop_map(String::from)
}

pub fn arb_label_set() -> impl Strategy<Value = LabelSet> {
    prop::collection::btree_set(arb_label(), 0..8).prop_map(|s| s.into_iter().collect())
}

pub fn arb_attributes() -> impl Strategy<Value = PullRequestAttributes> {
    (
        "[ -~]{0,40}",
        "[a-z][a-z0-9/-]{0,30}",
        any::<bool>(),
        prop::collection::btree_set("[a-z]{1,8}(/[a-z_]{1,8}){0,3}\\.[a-z]{1,3}", 0..6),
        0u64..5000,
    )
        .prop_map(|(title, branch_name, mergeable, changed_files, diff_size)| {
            PullRequestAttributes {
                title,
                branch_name,
                mergeable,
                changed_files,
                diff_size,
                ..PullRequestAttributes::new(RepoId::new("octocat", "hello-world"), PrNumber(1))
            }
        })
}

// ─── Mock backend ─────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
#[error("mock backend failure during {operation}")]
pub struct MockError {
    pub operation: BackendOperation,
    pub transient: bool,
}

impl MockError {
    pub fn permanent(operation: BackendOperation) -> Self {
        MockError {
            operation,
            transient: false,
        }
    }
}

impl BackendError for MockError {
    fn is_transient(&self) -> bool {
        self.transient
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchConfig(RepoId),
    ListChangedFiles(PrNumber),
    GetLabels(PrNumber),
    Replace(PrNumber, LabelSet),
}

/// In-memory backend that records every call in order.
#[derive(Debug, Default)]
pub struct MockBackend {
    config: LabelerConfig,
    current: LabelSet,
    files: BTreeSet<String>,
    fail_on: Option<BackendOperation>,
    transient_failures: bool,
    calls: Mutex<Vec<Call>>,
}

impl MockBackend {
    pub fn new(config: LabelerConfig, current: &[&str]) -> Self {
        MockBackend {
            config,
            current: labels(current),
            ..Default::default()
        }
    }

    pub fn with_files(mut self, files: &[&str]) -> Self {
        self.files = files.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn failing_on(mut self, operation: BackendOperation) -> Self {
        self.fail_on = Some(operation);
        self
    }

    /// Makes the injected failure report itself as transient.
    pub fn transiently(mut self) -> Self {
        self.transient_failures = true;
        self
    }

    fn record(&self, call: Call, operation: BackendOperation) -> Result<(), MockError> {
        self.calls.lock().unwrap().push(call);
        match self.fail_on {
            Some(op) if op == operation => Err(MockError {
                operation: op,
                transient: self.transient_failures,
            }),
            _ => Ok(()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn replaced(&self) -> Vec<LabelSet> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Replace(_, labels) => Some(labels),
                _ => None,
            })
            .collect()
    }
}

impl LabelerBackend for MockBackend {
    type Error = MockError;

    async fn fetch_repo_config(&self, repo: &RepoId) -> Result<LabelerConfig, MockError> {
        self.record(Call::FetchConfig(repo.clone()), BackendOperation::FetchConfig)?;
        Ok(self.config.clone())
    }

    async fn get_current_labels(
        &self,
        _repo: &RepoId,
        pr: PrNumber,
    ) -> Result<LabelSet, MockError> {
        self.record(Call::GetLabels(pr), BackendOperation::GetLabels)?;
        Ok(self.current.clone())
    }

    async fn replace_labels(
        &self,
        _repo: &RepoId,
        pr: PrNumber,
        labels: &LabelSet,
    ) -> Result<(), MockError> {
        self.record(
            Call::Replace(pr, labels.clone()),
            BackendOperation::ReplaceLabels,
        )
    }

    async fn list_changed_files(
        &self,
        _repo: &RepoId,
        pr: PrNumber,
    ) -> Result<BTreeSet<String>, MockError> {
        self.record(Call::ListChangedFiles(pr), BackendOperation::ListChangedFiles)?;
        Ok(self.files.clone())
    }
}
