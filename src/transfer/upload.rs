// src/transfer/upload.rs
// =============================================================================
// Commit local bytes to the repository as a new or updated file.
//
// The local file is read as raw bytes and base64-encoded byte for byte.
// There is no text decoding step anywhere on this path.
// =============================================================================

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use super::codec;
use super::ContentTransfer;
use crate::error::{FetchError, Result};
use crate::github::{ContentsApi, PutRequest, RepoRef};

/// Confirmation of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub path: String,
    /// Blob sha of the new file contents
    pub blob_sha: Option<String>,
    pub commit_sha: String,
    pub commit_url: Option<String>,
    /// false when an existing file was replaced
    pub created: bool,
}

impl<A: ContentsApi> ContentTransfer<A> {
    /// Encodes `bytes` and commits them to `target_path` on `repo.branch`.
    pub async fn upload(&self, repo: &RepoRef, target_path: &str, bytes: &[u8], message: &str) -> Result<UploadResult> {
        let target = target_path.trim_matches('/');
        if target.is_empty() {
            return Err(FetchError::encoding(target_path, "upload target path is empty"));
        }

        let existing = self.existing_sha(repo, target).await?;
        let request = PutRequest {
            message: message.to_string(),
            content: codec::encode(bytes),
            branch: repo.branch.clone(),
            sha: existing.clone(),
        };

        let response = self.api.put_file(repo, target, &request).await?;
        let (path, blob_sha) = match response.content {
            Some(content) => (content.path, content.sha),
            None => (target.to_string(), None),
        };

        info!(
            "{} {} ({} bytes) in commit {}",
            if existing.is_some() { "updated" } else { "created" },
            path,
            bytes.len(),
            response.commit.sha
        );

        Ok(UploadResult {
            path,
            blob_sha,
            commit_sha: response.commit.sha,
            commit_url: response.commit.html_url,
            created: existing.is_none(),
        })
    }

    /// Reads a local file and uploads it.
    ///
    /// `target_path` defaults to the local file's name and `message` to
    /// "Upload {target}".
    pub async fn upload_file(
        &self,
        repo: &RepoRef,
        local: &Path,
        target_path: Option<&str>,
        message: Option<&str>,
    ) -> Result<UploadResult> {
        let bytes = tokio::fs::read(local)
            .await
            .map_err(|e| FetchError::local_io(local, e))?;

        let target = match target_path {
            Some(target) => target.to_string(),
            None => local
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string)
                .ok_or_else(|| {
                    FetchError::local_io(
                        local,
                        std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no UTF-8 file name"),
                    )
                })?,
        };
        let message = message
            .map(str::to_string)
            .unwrap_or_else(|| format!("Upload {}", target));

        self.upload(repo, &target, &bytes, &message).await
    }

    // The contents API needs the current blob sha to replace a file
    async fn existing_sha(&self, repo: &RepoRef, path: &str) -> Result<Option<String>> {
        match self.api.get_file(repo, path).await {
            Ok(blob) => Ok(blob.sha),
            Err(FetchError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
