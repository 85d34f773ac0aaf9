//! `DocumentStore` trait and `PersistenceError`.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

/// A schema-light document body: field name → JSON value.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// A document as read back, with its database-assigned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub fields: Document,
}

// ---------------------------------------------------------------------------
// PersistenceError
// ---------------------------------------------------------------------------

/// Errors that can occur while writing or reading records.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The database refused the credentials (or security rules denied it).
    #[error("database access denied (HTTP {status})")]
    PermissionDenied { status: u16 },

    /// Any other non-success status.
    #[error("database rejected the request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// The database could not be reached.
    #[error("database request failed: {0}")]
    Transport(String),

    /// The database answered with something unexpected.
    #[error("unexpected database response: {0}")]
    InvalidResponse(String),

    /// A record could not be turned into a document.
    #[error("record could not be encoded: {0}")]
    Encode(String),

    /// Local filesystem failure.
    #[error("database I/O failed for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<reqwest::Error> for PersistenceError {
    fn from(e: reqwest::Error) -> Self {
        PersistenceError::Transport(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// DocumentStore trait
// ---------------------------------------------------------------------------

/// Async, object-safe document database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Write `document` into `collection` and return the generated id.
    async fn add(&self, collection: &str, document: Document) -> Result<String, PersistenceError>;

    /// Every document in `collection`, in whatever order the database
    /// delivers them.
    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, PersistenceError>;
}

// Compile-time assertion: Box<dyn DocumentStore> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn DocumentStore>) {}
};
