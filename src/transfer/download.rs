// src/transfer/download.rs
// =============================================================================
// Save a file locally.
//
// If the bytes were already fetched, they are written as-is with no further
// remote I/O. If inline fetching failed but a download link is known, the raw
// bytes are pulled from that link instead.
// =============================================================================

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use log::info;

use super::content::FileContent;
use super::ContentTransfer;
use crate::error::{FetchError, Result};
use crate::github::ContentsApi;

/// Name used when the originating path has no usable last segment.
pub const DEFAULT_FILE_NAME: &str = "file.txt";

/// What to save.
#[derive(Debug, Clone, Copy)]
pub enum DownloadSource<'a> {
    Content(&'a FileContent),
    /// A bare download link and the repository path it belongs to
    Link { url: &'a str, path: &'a str },
}

// Last non-empty path segment, or the default name
//
// Example:
//   "docs/readme.md" -> "readme.md"
//   ""               -> "file.txt"
pub fn file_name_for(path: &str) -> &str {
    match path.rsplit(['/', '\\']).find(|s| !s.is_empty()) {
        Some(".") | Some("..") | None => DEFAULT_FILE_NAME,
        Some(name) => name,
    }
}

impl<A: ContentsApi> ContentTransfer<A> {
    /// Writes the file into `dest_dir` and returns the written path.
    ///
    /// `suggested_name` overrides the name derived from the repository path;
    /// only its last segment is used so it cannot escape `dest_dir`.
    pub async fn download(
        &self,
        source: DownloadSource<'_>,
        dest_dir: &Path,
        suggested_name: Option<&str>,
    ) -> Result<PathBuf> {
        let (path, bytes): (&str, Cow<'_, [u8]>) = match source {
            DownloadSource::Content(content) if content.is_ok() => {
                (content.path.as_str(), Cow::Borrowed(content.bytes()))
            }
            DownloadSource::Content(content) => match content.download_ref.as_deref() {
                Some(url) => (content.path.as_str(), Cow::Owned(self.api.get_raw(url).await?)),
                None => {
                    return Err(FetchError::NotFound {
                        path: content.path.clone(),
                    })
                }
            },
            DownloadSource::Link { url, path } => (path, Cow::Owned(self.api.get_raw(url).await?)),
        };

        let name = file_name_for(suggested_name.unwrap_or(path));
        tokio::fs::create_dir_all(dest_dir)
            .await
            .map_err(|e| FetchError::local_io(dest_dir, e))?;

        let target = dest_dir.join(name);
        tokio::fs::write(&target, &bytes)
            .await
            .map_err(|e| FetchError::local_io(&target, e))?;

        info!("saved {} ({} bytes) to {}", path, bytes.len(), target.display());
        Ok(target)
    }
}
