// src/lib.rs
// =============================================================================
// repo-porter: browse a GitHub repository through its contents API.
//
// Modules:
// - github: the remote API seam (ContentsApi) and its HTTP client
// - tree: concurrent reconstruction of the directory hierarchy
// - transfer: fetching, downloading and uploading single files
// - error: the shared error taxonomy
//
// TreeBuilder and ContentTransfer share nothing but an Arc of the API client.
// =============================================================================

pub mod error;
pub mod github;
pub mod transfer;
pub mod tree;

pub use error::{ErrorKind, FetchError, Result};
pub use github::{ClientConfig, ContentsApi, GitHubClient, RepoRef};
pub use transfer::{ContentTransfer, DownloadSource, FetchStatus, FileContent, UploadResult};
pub use tree::{BuildOptions, ExclusionPolicy, FailurePolicy, TreeBuilder, TreeEntry, TreeSession, TreeSnapshot};
