// In-memory ContentsApi used by the unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{CommitInfo, ContentItem, ContentsApi, FileBlob, ItemKind, PutContent, PutRequest, PutResponse, RepoRef};
use crate::error::{ErrorKind, FetchError, Result};
use crate::transfer::codec;

pub(crate) fn raw_url(path: &str) -> String {
    format!("https://raw.example.com/{}", path)
}

pub(crate) fn dir(path: &str) -> ContentItem {
    ContentItem {
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        path: path.to_string(),
        kind: ItemKind::Dir,
        download_url: None,
        sha: None,
        size: 0,
    }
}

pub(crate) fn file(path: &str) -> ContentItem {
    ContentItem {
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        path: path.to_string(),
        kind: ItemKind::File,
        download_url: Some(raw_url(path)),
        sha: Some(format!("sha-{}", path)),
        size: 1,
    }
}

pub(crate) fn error_for(kind: ErrorKind, path: &str) -> FetchError {
    match kind {
        ErrorKind::NetworkFailure => FetchError::Network {
            url: raw_url(path),
            status: Some(502),
            message: "HTTP 502 Bad Gateway".to_string(),
        },
        ErrorKind::AuthFailure => FetchError::Auth {
            url: raw_url(path),
            status: 401,
        },
        ErrorKind::NotFound => FetchError::NotFound {
            path: path.to_string(),
        },
        ErrorKind::RateLimited => FetchError::RateLimited {
            url: raw_url(path),
            reset_at: None,
        },
        ErrorKind::EncodingFailure => FetchError::encoding(path, "bad payload"),
        ErrorKind::LocalIoFailure => FetchError::local_io(
            path,
            std::io::Error::new(std::io::ErrorKind::Other, "disk on fire"),
        ),
    }
}

#[derive(Default)]
pub(crate) struct FakeApi {
    dirs: HashMap<String, Vec<ContentItem>>,
    files: Mutex<HashMap<String, FileBlob>>,
    raw: HashMap<String, Vec<u8>>,
    failures: HashMap<String, ErrorKind>,
    put_failures: HashMap<String, ErrorKind>,
    delays: HashMap<String, Duration>,
    pub puts: Mutex<Vec<(String, PutRequest)>>,
    pub list_calls: AtomicUsize,
    pub raw_calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        FakeApi::default()
    }

    pub fn with_dir(mut self, path: &str, items: Vec<ContentItem>) -> Self {
        self.dirs.insert(path.to_string(), items);
        self
    }

    /// Stores `bytes` the way the API serves them: base64 wrapped at 60 columns.
    pub fn with_file(self, path: &str, bytes: &[u8]) -> Self {
        let encoded = codec::encode(bytes);
        let wrapped: Vec<String> = encoded
            .as_bytes()
            .chunks(60)
            .map(|c| String::from_utf8_lossy(c).into_owned())
            .collect();
        let blob = FileBlob {
            path: path.to_string(),
            sha: Some(format!("sha-{}", path)),
            content: Some(format!("{}\n", wrapped.join("\n"))),
            encoding: Some("base64".to_string()),
            download_url: Some(raw_url(path)),
            size: bytes.len() as u64,
        };
        self.with_blob(blob)
    }

    pub fn with_blob(self, blob: FileBlob) -> Self {
        self.files.lock().unwrap().insert(blob.path.clone(), blob);
        self
    }

    pub fn with_raw(mut self, url: &str, bytes: &[u8]) -> Self {
        self.raw.insert(url.to_string(), bytes.to_vec());
        self
    }

    pub fn with_failure(mut self, path: &str, kind: ErrorKind) -> Self {
        self.failures.insert(path.to_string(), kind);
        self
    }

    pub fn with_put_failure(mut self, path: &str, kind: ErrorKind) -> Self {
        self.put_failures.insert(path.to_string(), kind);
        self
    }

    pub fn with_delay(mut self, path: &str, millis: u64) -> Self {
        self.delays.insert(path.to_string(), Duration::from_millis(millis));
        self
    }

    async fn simulate(&self, path: &str) -> Result<()> {
        if let Some(delay) = self.delays.get(path) {
            tokio::time::sleep(*delay).await;
        }
        match self.failures.get(path) {
            Some(kind) => Err(error_for(*kind, path)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ContentsApi for FakeApi {
    async fn list_dir(&self, _repo: &RepoRef, path: &str) -> Result<Vec<ContentItem>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let outcome = self.simulate(path).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome?;

        self.dirs
            .get(path)
            .cloned()
            .ok_or_else(|| error_for(ErrorKind::NotFound, path))
    }

    async fn get_file(&self, _repo: &RepoRef, path: &str) -> Result<FileBlob> {
        self.simulate(path).await?;
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| error_for(ErrorKind::NotFound, path))
    }

    async fn put_file(&self, _repo: &RepoRef, path: &str, request: &PutRequest) -> Result<PutResponse> {
        if let Some(kind) = self.put_failures.get(path) {
            return Err(error_for(*kind, path));
        }

        let mut puts = self.puts.lock().unwrap();
        puts.push((path.to_string(), request.clone()));
        let n = puts.len();

        Ok(PutResponse {
            content: Some(PutContent {
                path: path.to_string(),
                sha: Some(format!("blob-{}", n)),
            }),
            commit: CommitInfo {
                sha: format!("commit-{}", n),
                html_url: Some(format!("https://example.com/commit/{}", n)),
            },
        })
    }

    async fn get_raw(&self, url: &str) -> Result<Vec<u8>> {
        self.raw_calls.fetch_add(1, Ordering::SeqCst);
        self.raw
            .get(url)
            .cloned()
            .ok_or_else(|| error_for(ErrorKind::NotFound, url))
    }
}
