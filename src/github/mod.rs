//! GitHub API backend.
//!
//! [`OctocrabClient`] implements [`LabelerBackend`](crate::labeler::LabelerBackend)
//! on top of octocrab: it reads each repository's labeler config through the
//! contents API and reads/replaces issue labels. Failures are categorized as
//! transient or permanent but never retried here.

mod backend;
mod client;
mod error;

pub use client::OctocrabClient;
pub use error::{GitHubApiError, GitHubBackendError, GitHubErrorKind};
