// src/github/api.rs
// =============================================================================
// The seam between the engine and the remote hosting API.
//
// The tree builder and the content transfer code only ever talk to this
// trait. GitHubClient implements it over HTTP; tests implement it in memory.
// =============================================================================

use std::sync::Arc;

use async_trait::async_trait;

use super::repo::RepoRef;
use super::types::{ContentItem, FileBlob, PutRequest, PutResponse};
use crate::error::Result;

#[async_trait]
pub trait ContentsApi: Send + Sync {
    /// List one directory, all pages concatenated in listing order.
    ///
    /// An empty `path` lists the repository root.
    async fn list_dir(&self, repo: &RepoRef, path: &str) -> Result<Vec<ContentItem>>;

    /// Fetch one file's metadata and base64 payload.
    async fn get_file(&self, repo: &RepoRef, path: &str) -> Result<FileBlob>;

    /// Create or update one file.
    async fn put_file(&self, repo: &RepoRef, path: &str, request: &PutRequest) -> Result<PutResponse>;

    /// Fetch raw bytes from a download link.
    async fn get_raw(&self, url: &str) -> Result<Vec<u8>>;
}

#[async_trait]
impl<T: ContentsApi + ?Sized> ContentsApi for Arc<T> {
    async fn list_dir(&self, repo: &RepoRef, path: &str) -> Result<Vec<ContentItem>> {
        (**self).list_dir(repo, path).await
    }

    async fn get_file(&self, repo: &RepoRef, path: &str) -> Result<FileBlob> {
        (**self).get_file(repo, path).await
    }

    async fn put_file(&self, repo: &RepoRef, path: &str, request: &PutRequest) -> Result<PutResponse> {
        (**self).put_file(repo, path, request).await
    }

    async fn get_raw(&self, url: &str) -> Result<Vec<u8>> {
        (**self).get_raw(url).await
    }
}
