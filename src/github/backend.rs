//! `LabelerBackend` implementation against the GitHub REST API.
//!
//! Calls used:
//! - `GET /repos/{owner}/{repo}/contents/{path}` for the labeler config
//! - `GET /repos/{owner}/{repo}/issues/{n}/labels` (paged)
//! - `PUT /repos/{owner}/{repo}/issues/{n}/labels`
//! - `GET /repos/{owner}/{repo}/pulls/{n}/files` (paged)

use std::collections::BTreeSet;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;

use crate::config::LabelerConfig;
use crate::labeler::LabelerBackend;
use crate::types::{LabelSet, PrNumber, RepoId};

use super::client::OctocrabClient;
use super::error::{GitHubApiError, GitHubBackendError};

const PER_PAGE: u8 = 100;

impl LabelerBackend for OctocrabClient {
    type Error = GitHubBackendError;

    async fn fetch_repo_config(&self, repo: &RepoId) -> Result<LabelerConfig, Self::Error> {
        let path = self.config_path();
        let url = format!(
            "/repos/{}/{}/contents/{}",
            repo.owner,
            repo.repo,
            path.trim_start_matches('/')
        );

        let content: RawContent = self
            .inner()
            .get(&url, None::<&()>)
            .await
            .map_err(GitHubApiError::from_octocrab)?;

        let text = decode_content(&content).map_err(|reason| GitHubBackendError::ConfigContent {
            path: path.to_string(),
            reason,
        })?;

        tracing::debug!(repo = %repo, path, bytes = text.len(), "Fetched labeler config");

        LabelerConfig::from_yaml_str(&text).map_err(|source| GitHubBackendError::Config {
            path: path.to_string(),
            source,
        })
    }

    async fn get_current_labels(
        &self,
        repo: &RepoId,
        pr: PrNumber,
    ) -> Result<LabelSet, Self::Error> {
        let mut page = 1u32;
        let mut labels = LabelSet::new();

        loop {
            let result = self
                .inner()
                .issues(&repo.owner, &repo.repo)
                .list_labels_for_issue(pr.0)
                .per_page(PER_PAGE)
                .page(page)
                .send()
                .await
                .map_err(GitHubApiError::from_octocrab)?;

            let items = result.items;
            let is_last_page = items.len() < usize::from(PER_PAGE);
            labels.extend(items.into_iter().map(|label| label.name));

            if is_last_page {
                break;
            }
            page += 1;
        }

        Ok(labels)
    }

    async fn replace_labels(
        &self,
        repo: &RepoId,
        pr: PrNumber,
        labels: &LabelSet,
    ) -> Result<(), Self::Error> {
        self.inner()
            .issues(&repo.owner, &repo.repo)
            .replace_all_labels(pr.0, &labels.to_vec())
            .await
            .map_err(GitHubApiError::from_octocrab)?;
        Ok(())
    }

    async fn list_changed_files(
        &self,
        repo: &RepoId,
        pr: PrNumber,
    ) -> Result<BTreeSet<String>, Self::Error> {
        let mut page = 1u32;
        let mut files = BTreeSet::new();

        loop {
            let url = format!(
                "/repos/{}/{}/pulls/{}/files?per_page={}&page={}",
                repo.owner, repo.repo, pr.0, PER_PAGE, page
            );
            let entries: Vec<RawDiffEntry> = self
                .inner()
                .get(&url, None::<&()>)
                .await
                .map_err(GitHubApiError::from_octocrab)?;

            let is_last_page = entries.len() < usize::from(PER_PAGE);
            files.extend(entries.into_iter().map(|e| e.filename));

            if is_last_page {
                break;
            }
            page += 1;
        }

        Ok(files)
    }
}

/// Response of the repository contents endpoint for a single file.
#[derive(Debug, Deserialize)]
struct RawContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDiffEntry {
    filename: String,
}

/// Extracts the text of a file from a contents API response.
///
/// GitHub wraps base64 content at 60 columns, so whitespace is stripped
/// before decoding.
fn decode_content(raw: &RawContent) -> Result<String, String> {
    if raw.kind != "file" {
        return Err(format!("expected a file, found {}", raw.kind));
    }

    let content = raw.content.as_deref().unwrap_or_default();
    match raw.encoding.as_deref() {
        Some("base64") => {
            let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
            let bytes = BASE64
                .decode(compact)
                .map_err(|e| format!("invalid base64 content: {}", e))?;
            String::from_utf8(bytes).map_err(|e| format!("content is not UTF-8: {}", e))
        }
        Some("") | Some("utf-8") | None => Ok(content.to_string()),
        Some(other) => Err(format!("unsupported content encoding {:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(kind: &str, encoding: Option<&str>, content: &str) -> RawContent {
        RawContent {
            kind: kind.to_string(),
            encoding: encoding.map(String::from),
            content: Some(content.to_string()),
        }
    }

    #[test]
    fn decodes_wrapped_base64() {
        let yaml = "version: 1\nlabels:\n  - label: WIP\n    title: \"^WIP:.*\"\n";
        let encoded = BASE64.encode(yaml);
        let (head, tail) = encoded.split_at(20);
        let wrapped = format!("{}\n{}\n", head, tail);

        let text = decode_content(&raw("file", Some("base64"), &wrapped)).unwrap();

        assert_eq!(text, yaml);
        let config = LabelerConfig::from_yaml_str(&text).unwrap();
        assert_eq!(config.matchers[0].label, "WIP");
    }

    #[test]
    fn rejects_directories_and_symlinks() {
        assert!(decode_content(&raw("dir", None, "")).is_err());
        assert!(decode_content(&raw("symlink", None, "")).is_err());
    }

    #[test]
    fn rejects_bad_base64() {
        let err = decode_content(&raw("file", Some("base64"), "!!!not base64")).unwrap_err();
        assert!(err.contains("base64"), "{}", err);
    }

    #[test]
    fn rejects_unknown_encoding() {
        assert!(decode_content(&raw("file", Some("none"), "")).is_err());
    }

    #[test]
    fn parses_contents_response() {
        let json = r#"{
            "type": "file",
            "encoding": "base64",
            "size": 16,
            "name": "labeler.yml",
            "path": ".github/labeler.yml",
            "content": "dmVyc2lvbjogMQpsYWJlbHM6IFtdCg==\n",
            "sha": "3d21ec53a331a6f037a91c368710b99387d012c1"
        }"#;
        let content: RawContent = serde_json::from_str(json).unwrap();

        assert_eq!(decode_content(&content).unwrap(), "version: 1\nlabels: []\n");
    }
}
