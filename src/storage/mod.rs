//! Blob storage for uploaded originals.
//!
//! This module provides:
//! * [`BlobStore`]: async capability trait: write bytes under a key, get a
//!   public URL back.
//! * [`FirebaseStorage`]: Firebase Storage REST implementation.
//! * [`LocalBlobStore`]: filesystem implementation returning `file://` URLs.
//! * [`BlobUploader`]: derives a per-call unique key and uploads a
//!   [`SelectedFile`](crate::file::SelectedFile).
//! * [`StorageError`]: every way a write can fail.
//!
//! Nothing here retries. A failed upload surfaces immediately.

pub mod blob;
pub mod firebase;
pub mod local;
pub mod uploader;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use blob::{BlobStore, StorageError};
pub use firebase::FirebaseStorage;
pub use local::LocalBlobStore;
pub use uploader::BlobUploader;

use std::sync::Arc;

use crate::config::{StorageConfig, StorageProvider};

/// Build the blob store selected by `config.provider`.
pub fn from_config(config: &StorageConfig) -> Arc<dyn BlobStore> {
    match config.provider {
        StorageProvider::Firebase => Arc::new(FirebaseStorage::from_config(config)),
        StorageProvider::Local => Arc::new(LocalBlobStore::new(&config.local_dir)),
    }
}
