//! PR Labeler - A GitHub bot that labels pull requests from declarative
//! per-repository rules.
//!
//! Each repository keeps a `.github/labeler.yml` naming labels and the
//! conditions (title, branch, mergeability, diff size, changed files) under
//! which they apply. On every relevant `pull_request` webhook the labeler
//! evaluates those rules and reconciles the PR's labels, leaving labels the
//! rules do not mention untouched.

pub mod config;
pub mod github;
pub mod labeler;
pub mod reconcile;
pub mod rules;
pub mod server;
pub mod types;
pub mod webhooks;

#[cfg(test)]
mod test_utils;
