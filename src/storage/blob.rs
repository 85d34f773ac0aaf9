//! `BlobStore` trait and `StorageError`.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

// ---------------------------------------------------------------------------
// StorageError
// ---------------------------------------------------------------------------

/// Errors that can occur while writing a blob.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store refused the credentials (or lack of them).
    #[error("storage access denied (HTTP {status})")]
    Unauthorized { status: u16 },

    /// The bucket or project is over quota.
    #[error("storage quota exceeded")]
    QuotaExceeded,

    /// Any other non-success status.
    #[error("storage rejected the upload (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// The store could not be reached.
    #[error("storage request failed: {0}")]
    Transport(String),

    /// The store answered with something that is not upload metadata.
    #[error("unexpected storage response: {0}")]
    InvalidResponse(String),

    /// Local filesystem failure.
    #[error("storage I/O failed for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<reqwest::Error> for StorageError {
    fn from(e: reqwest::Error) -> Self {
        StorageError::Transport(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// BlobStore trait
// ---------------------------------------------------------------------------

/// Async, object-safe blob store.
///
/// `key` is unique per upload; implementations never overwrite silently
/// on the caller's behalf but also do not check for collisions.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `bytes` under `key` and return a publicly resolvable URL.
    async fn write(
        &self,
        key: &str,
        bytes: &[u8],
        content_type: Option<&str>,
    ) -> Result<String, StorageError>;
}

// Compile-time assertion: Box<dyn BlobStore> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn BlobStore>) {}
};
