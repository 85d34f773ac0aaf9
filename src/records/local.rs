//! JSON-file document store for running without a cloud database.
//!
//! The whole database is one file shaped `{collection: [{id, fields}, ...]}`.
//! Writes are serialised by an async mutex and land through a temp file plus
//! rename, so a crash mid-write leaves the previous contents intact.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::records::document::{Document, DocumentStore, PersistenceError, StoredDocument};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Collections(BTreeMap<String, Vec<Entry>>);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    id: String,
    fields: Document,
}

pub struct LocalDocumentStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl LocalDocumentStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> Result<Collections, PersistenceError> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Collections::default()),
            Err(source) => {
                return Err(PersistenceError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Collections::default());
        }
        serde_json::from_slice(&content).map_err(|e| {
            PersistenceError::InvalidResponse(format!("{} is corrupt: {e}", self.path.display()))
        })
    }

    async fn write_all(&self, collections: &Collections) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_error(parent))?;
        }

        let json = serde_json::to_vec_pretty(collections)
            .map_err(|e| PersistenceError::Encode(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await.map_err(io_error(&tmp))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_error(&self.path))?;
        Ok(())
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> PersistenceError {
    let path = path.to_path_buf();
    move |source| PersistenceError::Io { path, source }
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn add(&self, collection: &str, document: Document) -> Result<String, PersistenceError> {
        let _guard = self.write_lock.lock().await;

        let mut collections = self.read_all().await?;
        let id = Uuid::new_v4().simple().to_string();
        collections
            .0
            .entry(collection.to_string())
            .or_default()
            .push(Entry {
                id: id.clone(),
                fields: document,
            });
        self.write_all(&collections).await?;

        log::debug!("records: stored {collection}/{id} in {}", self.path.display());
        Ok(id)
    }

    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, PersistenceError> {
        // Readers wait for an in-flight write so they never see a half-applied add.
        let _guard = self.write_lock.lock().await;

        let mut collections = self.read_all().await?;
        let entries = collections.0.remove(collection).unwrap_or_default();
        Ok(entries
            .into_iter()
            .map(|e| StoredDocument {
                id: e.id,
                fields: e.fields,
            })
            .collect())
    }
}
