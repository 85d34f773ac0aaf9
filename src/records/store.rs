//! Typed record access over a [`DocumentStore`].

use std::sync::Arc;

use crate::records::document::{Document, DocumentStore, PersistenceError};
use crate::records::record::{GenerationRecord, NewRecord};

/// Persists and lists [`GenerationRecord`]s in one collection.
///
/// Cheap to clone (`Arc` clone).
#[derive(Clone)]
pub struct RecordStore {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl RecordStore {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Write `record` and return the id the database assigned.
    pub async fn persist(&self, record: &NewRecord) -> Result<String, PersistenceError> {
        let document = match serde_json::to_value(record) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(other) => {
                return Err(PersistenceError::Encode(format!(
                    "expected an object, got {other}"
                )))
            }
            Err(e) => return Err(PersistenceError::Encode(e.to_string())),
        };

        let id = self.store.add(&self.collection, document).await?;
        log::debug!("records: persisted {} as {id}", record.file_name);
        Ok(id)
    }

    /// Every record in the collection, unordered.
    ///
    /// Documents that do not decode as a record are skipped with a warning;
    /// one foreign document must not hide the rest of the history.
    pub async fn list_all(&self) -> Result<Vec<GenerationRecord>, PersistenceError> {
        let documents = self.store.list(&self.collection).await?;
        let total = documents.len();

        let records: Vec<GenerationRecord> = documents
            .into_iter()
            .filter_map(|doc| match decode(doc.fields) {
                Ok(record) => Some(record.into_record(doc.id)),
                Err(e) => {
                    log::warn!("records: skipping document {}: {e}", doc.id);
                    None
                }
            })
            .collect();

        log::debug!("records: listed {}/{total} documents", records.len());
        Ok(records)
    }
}

fn decode(fields: Document) -> Result<NewRecord, serde_json::Error> {
    serde_json::from_value(serde_json::Value::Object(fields))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
