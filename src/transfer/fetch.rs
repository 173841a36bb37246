// src/transfer/fetch.rs
// =============================================================================
// Lazy retrieval of one file's bytes.
//
// fetch_content never returns an error. Whatever goes wrong (network, auth,
// missing path, payload too large to be inlined, broken base64) ends up in a
// FileContent with status Failed, together with the best download link we
// know about so the caller can fall back to it.
// =============================================================================

use log::{debug, warn};

use super::codec;
use super::content::FileContent;
use super::ContentTransfer;
use crate::error::{FetchError, Result};
use crate::github::{ContentsApi, FileBlob, RepoRef};
use crate::tree::TreeEntry;

impl<A: ContentsApi> ContentTransfer<A> {
    /// Fetches and decodes the file at `path`.
    ///
    /// `known_ref` is the download link from the tree, if the caller has
    /// one; it is preserved on failure even when the request never reached
    /// the server.
    pub async fn fetch_content(&self, repo: &RepoRef, path: &str, known_ref: Option<&str>) -> FileContent {
        let path = path.trim_matches('/');
        let known_ref = known_ref.map(str::to_string);

        let blob = match self.api.get_file(repo, path).await {
            Ok(blob) => blob,
            Err(e) => {
                warn!("could not fetch {}: {}", path, e);
                return FileContent::failed(path, &e, known_ref);
            }
        };

        let link = known_ref.or_else(|| blob.download_url.clone());
        match decode_blob(path, &blob) {
            Ok(bytes) => {
                debug!("fetched {} ({} bytes)", path, bytes.len());
                FileContent::ok(path, bytes, link)
            }
            Err(e) => {
                warn!("could not decode {}: {}", path, e);
                FileContent::failed(path, &e, link)
            }
        }
    }

    /// Fetches a file picked from a tree, passing its download link along.
    pub async fn fetch_entry(&self, repo: &RepoRef, entry: &TreeEntry) -> FileContent {
        self.fetch_content(repo, &entry.path, entry.download_ref()).await
    }
}

fn decode_blob(path: &str, blob: &FileBlob) -> Result<Vec<u8>> {
    match blob.encoding.as_deref() {
        Some("base64") => {
            codec::decode(blob.content.as_deref().unwrap_or("")).map_err(|e| FetchError::encoding(path, e))
        }
        // Files over the inline limit come back with encoding "none" and no body
        Some("none") => Err(FetchError::encoding(
            path,
            format!("no inline payload ({} bytes), too large for inline retrieval", blob.size),
        )),
        // Symlinks and submodules answer without any file payload
        None => Err(FetchError::encoding(path, "response carries no file payload (not a regular file?)")),
        Some(other) => Err(FetchError::encoding(path, format!("unsupported encoding '{}'", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::github::fake::{raw_url, FakeApi};
    use crate::transfer::FetchStatus;
    use std::sync::Arc;

    fn repo() -> RepoRef {
        RepoRef::new("octocat", "hello", "main")
    }

    fn transfer(api: FakeApi) -> ContentTransfer<FakeApi> {
        ContentTransfer::new(Arc::new(api))
    }

    #[tokio::test]
    async fn test_fetch_decodes_binary_payload() {
        let bytes: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        let t = transfer(FakeApi::new().with_file("img/logo.png", &bytes));

        let content = t.fetch_content(&repo(), "img/logo.png", None).await;
        assert_eq!(content.status, FetchStatus::Ok);
        assert_eq!(content.bytes(), bytes.as_slice());
        assert_eq!(content.download_ref.as_deref(), Some(raw_url("img/logo.png").as_str()));
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_known_ref() {
        let t = transfer(FakeApi::new().with_failure("src/a.txt", ErrorKind::NetworkFailure));

        let content = t
            .fetch_content(&repo(), "src/a.txt", Some("https://raw.example.com/src/a.txt"))
            .await;
        assert_eq!(content.status, FetchStatus::Failed);
        assert_eq!(content.fallback_link(), Some("https://raw.example.com/src/a.txt"));
        assert_eq!(content.failure.unwrap().kind, ErrorKind::NetworkFailure);
    }

    #[tokio::test]
    async fn test_missing_file_without_ref() {
        let t = transfer(FakeApi::new());
        let content = t.fetch_content(&repo(), "nope.txt", None).await;
        assert_eq!(content.status, FetchStatus::Failed);
        assert_eq!(content.fallback_link(), None);
        assert_eq!(content.failure.unwrap().kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_oversized_file_falls_back_to_link() {
        let blob = FileBlob {
            path: "data/big.csv".to_string(),
            sha: Some("abc".to_string()),
            content: Some(String::new()),
            encoding: Some("none".to_string()),
            download_url: Some(raw_url("data/big.csv")),
            size: 5_000_000,
        };
        let t = transfer(FakeApi::new().with_blob(blob));

        let content = t.fetch_content(&repo(), "data/big.csv", None).await;
        assert_eq!(content.status, FetchStatus::Failed);
        assert_eq!(content.failure.as_ref().unwrap().kind, ErrorKind::EncodingFailure);
        assert_eq!(content.fallback_link(), Some(raw_url("data/big.csv").as_str()));
    }

    #[tokio::test]
    async fn test_blob_without_encoding_is_not_reported_as_oversized() {
        let blob = FileBlob {
            path: "link-to-readme".to_string(),
            download_url: Some(raw_url("link-to-readme")),
            size: 9,
            ..FileBlob::default()
        };
        let t = transfer(FakeApi::new().with_blob(blob));

        let content = t.fetch_content(&repo(), "link-to-readme", None).await;
        assert_eq!(content.status, FetchStatus::Failed);
        let failure = content.failure.as_ref().unwrap();
        assert_eq!(failure.kind, ErrorKind::EncodingFailure);
        assert!(failure.message.contains("no file payload"), "{}", failure.message);
        assert!(!failure.message.contains("too large"), "{}", failure.message);
        assert_eq!(content.fallback_link(), Some(raw_url("link-to-readme").as_str()));
    }

    #[tokio::test]
    async fn test_corrupt_base64_is_a_failed_fetch() {
        let blob = FileBlob {
            path: "x.txt".to_string(),
            content: Some("%%%".to_string()),
            encoding: Some("base64".to_string()),
            ..FileBlob::default()
        };
        let t = transfer(FakeApi::new().with_blob(blob));
        let content = t.fetch_content(&repo(), "x.txt", None).await;
        assert_eq!(content.status, FetchStatus::Failed);
    }

    #[tokio::test]
    async fn test_fetch_entry_uses_tree_ref() {
        let t = transfer(FakeApi::new().with_failure("docs/a.md", ErrorKind::RateLimited));
        let entry = TreeEntry::file("a.md", "docs/a.md", Some("https://cdn/a.md".to_string()));

        let content = t.fetch_entry(&repo(), &entry).await;
        assert_eq!(content.fallback_link(), Some("https://cdn/a.md"));
        assert_eq!(content.failure.unwrap().kind, ErrorKind::RateLimited);
    }

    #[tokio::test]
    async fn test_empty_file() {
        let t = transfer(FakeApi::new().with_file("empty", b""));
        let content = t.fetch_content(&repo(), "empty", None).await;
        assert!(content.is_ok());
        assert!(content.bytes().is_empty());
    }
}
