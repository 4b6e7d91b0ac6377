//! Centralized error types for attachShell.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::attachment::AttachmentId;

/// All errors produced by the attachShell library.
#[derive(Error, Debug)]
pub enum AttachError {
    /// The request never produced an HTTP response (connection refused,
    /// DNS failure, timeout, ...).
    #[error("Request to '{url}' failed: {source}")]
    Transport {
        url: String,
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status.
    #[error("Backend returned {status} for '{url}'")]
    Http { url: String, status: u16 },

    /// The response body could not be decoded.
    #[error("Invalid response from '{url}': {reason}")]
    Decode { url: String, reason: String },

    /// The configured base URL (or a URL derived from it) is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The backend refused to delete an attachment.
    #[error("Failed to delete attachment {id} (status {status})")]
    DeleteFailed { id: AttachmentId, status: u16 },

    /// An operation needed a displayed record but none is resolved.
    #[error("No attachment is currently displayed")]
    NoCurrentRecord,

    /// I/O error with the associated file path.
    #[error("I/O error writing '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias for `Result<T, AttachError>`.
pub type Result<T> = std::result::Result<T, AttachError>;

impl AttachError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a `Transport` variant, keeping the URL that failed.
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.into(),
            source,
        }
    }

    /// `true` for failures that should be shown as the generic error banner
    /// rather than an inline message.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Http { .. } | Self::Decode { .. })
    }
}
