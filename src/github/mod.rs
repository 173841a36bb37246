// src/github/mod.rs
// =============================================================================
// This module talks to the remote hosting API.
//
// Contents:
// - repo: the (owner, repo, branch) selection and its parser
// - types: JSON shapes of the contents endpoint
// - api: the ContentsApi trait the rest of the crate depends on
// - client: the reqwest-backed implementation of ContentsApi
// =============================================================================

mod api;
mod client;
mod repo;
mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use api::ContentsApi;
pub use client::{ClientConfig, GitHubClient, DEFAULT_API_BASE, DEFAULT_TIMEOUT};
pub use repo::{RepoParseError, RepoRef};
pub use types::{
    CommitInfo, ContentItem, ContentsResponse, FileBlob, ItemKind, PutContent, PutRequest,
    PutResponse,
};
