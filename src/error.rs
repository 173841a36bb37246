// src/error.rs
// =============================================================================
// Error taxonomy shared by the tree builder and the content transfer code.
//
// Every failure the engine can report falls into one of six kinds:
// - NetworkFailure: transport errors, timeouts, unexpected HTTP statuses
// - AuthFailure: the token was missing, wrong, or lacks access
// - NotFound: the path (or repository, or branch) does not exist
// - RateLimited: the API refused the request because of its rate limit
// - EncodingFailure: a payload could not be parsed or decoded
// - LocalIoFailure: reading or writing a local file failed
// =============================================================================

use std::path::PathBuf;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, FetchError>;

/// Coarse classification of a [`FetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NetworkFailure,
    AuthFailure,
    NotFound,
    RateLimited,
    EncodingFailure,
    LocalIoFailure,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ErrorKind::NetworkFailure => "network failure",
            ErrorKind::AuthFailure => "authentication failure",
            ErrorKind::NotFound => "not found",
            ErrorKind::RateLimited => "rate limited",
            ErrorKind::EncodingFailure => "encoding failure",
            ErrorKind::LocalIoFailure => "local I/O failure",
        };
        f.write_str(label)
    }
}

/// Errors raised while talking to the remote API or the local disk.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport error, timeout, or an HTTP status with no better category.
    #[error("request to {url} failed: {message}")]
    Network {
        url: String,
        status: Option<u16>,
        message: String,
    },

    /// HTTP 401, or 403 without rate limit exhaustion.
    #[error("authentication failed for {url} (HTTP {status})")]
    Auth { url: String, status: u16 },

    #[error("not found: {path}")]
    NotFound { path: String },

    /// HTTP 429, or 403 with `x-ratelimit-remaining: 0`.
    #[error("rate limited by the remote API while requesting {url}")]
    RateLimited { url: String, reset_at: Option<u64> },

    #[error("could not decode payload for {path}: {message}")]
    Encoding { path: String, message: String },

    #[error("I/O error at {}: {source}", .path.display())]
    LocalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Network { .. } => ErrorKind::NetworkFailure,
            FetchError::Auth { .. } => ErrorKind::AuthFailure,
            FetchError::NotFound { .. } => ErrorKind::NotFound,
            FetchError::RateLimited { .. } => ErrorKind::RateLimited,
            FetchError::Encoding { .. } => ErrorKind::EncodingFailure,
            FetchError::LocalIo { .. } => ErrorKind::LocalIoFailure,
        }
    }

    /// Create an I/O error with path context.
    pub fn local_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FetchError::LocalIo {
            path: path.into(),
            source,
        }
    }

    pub fn encoding(path: impl Into<String>, message: impl std::fmt::Display) -> Self {
        FetchError::Encoding {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Classifies a non-success HTTP response.
    ///
    /// `path` is the repository path the request was about, used for
    /// `NotFound`; `rate_remaining` and `rate_reset` come from the
    /// `x-ratelimit-*` response headers when present.
    pub fn from_status(
        url: &str,
        path: &str,
        status: StatusCode,
        rate_remaining: Option<u64>,
        rate_reset: Option<u64>,
    ) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => FetchError::Auth {
                url: url.to_string(),
                status: status.as_u16(),
            },
            StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimited {
                url: url.to_string(),
                reset_at: rate_reset,
            },
            StatusCode::FORBIDDEN if rate_remaining == Some(0) => FetchError::RateLimited {
                url: url.to_string(),
                reset_at: rate_reset,
            },
            StatusCode::FORBIDDEN => FetchError::Auth {
                url: url.to_string(),
                status: status.as_u16(),
            },
            StatusCode::NOT_FOUND => FetchError::NotFound {
                path: path.to_string(),
            },
            other => FetchError::Network {
                url: url.to_string(),
                status: Some(other.as_u16()),
                message: format!("HTTP {}", other),
            },
        }
    }

    /// Classifies a transport-level reqwest error.
    pub fn from_transport(url: &str, error: reqwest::Error) -> Self {
        let message = if error.is_timeout() {
            "request timed out".to_string()
        } else if error.is_connect() {
            format!("connection failed: {}", error)
        } else if error.is_decode() {
            return FetchError::encoding(url, error);
        } else {
            error.to_string()
        };

        FetchError::Network {
            url: url.to_string(),
            status: error.status().map(|s| s.as_u16()),
            message,
        }
    }
}
