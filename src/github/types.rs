// src/github/types.rs
// =============================================================================
// Wire types for the contents endpoint.
//
// GET /repos/{owner}/{repo}/contents/{path} answers with a JSON array for a
// directory and a JSON object for a file, so the response is modelled as an
// untagged enum. PUT on the same URL creates or updates one file.
// =============================================================================

use serde::{Deserialize, Serialize};

/// The `type` field of a contents item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    File,
    Dir,
    Symlink,
    Submodule,
}

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Raw download link; null for directories and submodules
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub size: u64,
}

/// A single file as returned by the contents endpoint.
///
/// For files larger than the inline limit the API still answers, but with
/// `encoding: "none"` and an empty `content`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileBlob {
    pub path: String,
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub size: u64,
}

/// Either shape the contents endpoint can return.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ContentsResponse {
    Listing(Vec<ContentItem>),
    File(FileBlob),
}

/// Body of the create-or-update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PutRequest {
    pub message: String,
    /// Base64 of the raw file bytes
    pub content: String,
    pub branch: String,
    /// Blob sha of the file being replaced; omitted when creating
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PutResponse {
    #[serde(default)]
    pub content: Option<PutContent>,
    pub commit: CommitInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PutContent {
    pub path: String,
    #[serde(default)]
    pub sha: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitInfo {
    pub sha: String,
    #[serde(default)]
    pub html_url: Option<String>,
}
