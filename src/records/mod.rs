//! Generation records: the data model, the document database seam, and the
//! ordered in-memory history.
//!
//! This module provides:
//! * [`GenerationRecord`] / [`NewRecord`]: a persisted result and the same
//!   result before the database assigned its id.
//! * [`DocumentStore`]: async capability trait over a schema-light
//!   collection: add a document, list all documents.
//! * [`Firestore`]: Cloud Firestore REST implementation.
//! * [`LocalDocumentStore`]: single JSON file implementation.
//! * [`RecordStore`]: typed `persist` / `list_all` over a [`DocumentStore`].
//! * [`HistoryCache`]: newest-first snapshot of every record, replaced
//!   wholesale on each refresh.
//! * [`PersistenceError`]: every way a database read or write can fail.

pub mod document;
pub mod firestore;
pub mod history;
pub mod local;
pub mod record;
pub mod store;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use document::{Document, DocumentStore, PersistenceError, StoredDocument};
pub use firestore::Firestore;
pub use history::HistoryCache;
pub use local::LocalDocumentStore;
pub use record::{GenerationRecord, NewRecord};
pub use store::RecordStore;

use std::sync::Arc;

use crate::config::{DatabaseConfig, DatabaseProvider};

/// Build the document store selected by `config.provider`.
pub fn from_config(config: &DatabaseConfig) -> Arc<dyn DocumentStore> {
    match config.provider {
        DatabaseProvider::Firestore => Arc::new(Firestore::from_config(config)),
        DatabaseProvider::Local => Arc::new(LocalDocumentStore::new(&config.local_file)),
    }
}
