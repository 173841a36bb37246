// src/transfer/content.rs
// =============================================================================
// The decoded payload of one file, as handed to the presentation layer.
//
// A FileContent always exists, even when fetching failed: in that case it
// carries the failure and, when known, a direct download link the caller can
// offer instead of inline viewing.
// =============================================================================

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::download::file_name_for;
use crate::error::{ErrorKind, FetchError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    Ok,
    Failed,
}

/// Why a fetch failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchFailure {
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub path: String,
    pub status: FetchStatus,
    /// Raw decoded bytes; empty when the fetch failed
    bytes: Vec<u8>,
    pub download_ref: Option<String>,
    pub failure: Option<FetchFailure>,
}

impl FileContent {
    pub fn ok(path: impl Into<String>, bytes: Vec<u8>, download_ref: Option<String>) -> Self {
        FileContent {
            path: path.into(),
            status: FetchStatus::Ok,
            bytes,
            download_ref,
            failure: None,
        }
    }

    pub fn failed(path: impl Into<String>, error: &FetchError, download_ref: Option<String>) -> Self {
        FileContent {
            path: path.into(),
            status: FetchStatus::Failed,
            bytes: Vec::new(),
            download_ref,
            failure: Some(FetchFailure {
                kind: error.kind(),
                message: error.to_string(),
            }),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == FetchStatus::Ok
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The payload as text, if it is valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }

    /// The payload as text with invalid sequences replaced. For display only.
    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Heuristic: NUL bytes or invalid UTF-8 mean "don't print this".
    pub fn is_binary(&self) -> bool {
        self.bytes.contains(&0) || self.text().is_none()
    }

    /// The direct link to offer when inline viewing failed.
    pub fn fallback_link(&self) -> Option<&str> {
        match self.status {
            FetchStatus::Failed => self.download_ref.as_deref(),
            FetchStatus::Ok => None,
        }
    }

    /// Local file name derived from the last path segment.
    pub fn file_name(&self) -> &str {
        file_name_for(&self.path)
    }
}
