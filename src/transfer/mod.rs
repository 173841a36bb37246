// src/transfer/mod.rs
// =============================================================================
// Moving single files in and out of the repository.
//
// Submodules:
// - codec: base64 transport encoding
// - content: FileContent, the status-tagged result of a fetch
// - fetch: fetch_content / fetch_entry, never fail outright
// - upload: upload / upload_file, fail on any remote or local error
// - download: save fetched bytes (or a download link) to disk
// =============================================================================

use std::sync::Arc;

use crate::github::ContentsApi;

pub mod codec;
mod content;
mod download;
mod fetch;
mod upload;

pub use content::{FetchFailure, FetchStatus, FileContent};
pub use download::{file_name_for, DownloadSource, DEFAULT_FILE_NAME};
pub use upload::UploadResult;

/// Request/response facade for file contents. Holds no state besides the API handle.
pub struct ContentTransfer<A> {
    api: Arc<A>,
}

impl<A: ContentsApi> ContentTransfer<A> {
    pub fn new(api: Arc<A>) -> Self {
        ContentTransfer { api }
    }
}
