//! Octocrab client wrapper.
//!
//! One client serves every repository the app is installed on; the target
//! repository is passed per call.

use octocrab::Octocrab;

use crate::config::DEFAULT_CONFIG_PATH;

/// A GitHub API client used as the labeler's backend.
#[derive(Clone)]
pub struct OctocrabClient {
    client: Octocrab,

    /// Repository-relative path of the labeler config file.
    config_path: String,
}

impl OctocrabClient {
    /// Wraps a pre-configured Octocrab instance.
    ///
    /// Use this for GitHub App installation tokens or a custom base URL.
    pub fn new(client: Octocrab) -> Self {
        Self {
            client,
            config_path: DEFAULT_CONFIG_PATH.to_string(),
        }
    }

    /// Creates a client authenticated with a personal or installation token.
    pub fn from_token(token: impl Into<String>) -> Result<Self, octocrab::Error> {
        let client = Octocrab::builder().personal_token(token.into()).build()?;
        Ok(Self::new(client))
    }

    /// Reads the labeler config from `path` instead of `.github/labeler.yml`.
    pub fn with_config_path(mut self, path: impl Into<String>) -> Self {
        self.config_path = path.into();
        self
    }

    pub fn config_path(&self) -> &str {
        &self.config_path
    }

    pub fn inner(&self) -> &Octocrab {
        &self.client
    }
}

impl std::fmt::Debug for OctocrabClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OctocrabClient")
            .field("config_path", &self.config_path)
            .finish_non_exhaustive()
    }
}
