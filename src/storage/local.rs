//! Filesystem blob store.
//!
//! Keys map to paths under a root directory; the returned URL is the
//! `file://` URL of the written file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::Url;

use crate::storage::blob::{BlobStore, StorageError};

pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn write(
        &self,
        key: &str,
        bytes: &[u8],
        _content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        let path = self.root.join(key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(io_error(parent))?;
        }
        tokio::fs::write(&path, bytes).await.map_err(io_error(&path))?;

        let absolute = tokio::fs::canonicalize(&path)
            .await
            .map_err(io_error(&path))?;
        let url = Url::from_file_path(&absolute).map_err(|_| {
            StorageError::InvalidResponse(format!("{} is not a valid file URL", absolute.display()))
        })?;

        log::debug!("storage: wrote {} bytes to {}", bytes.len(), absolute.display());
        Ok(url.into())
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError {
    let path = path.to_path_buf();
    move |source| StorageError::Io { path, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn writes_under_root_and_returns_file_url() {
        let dir = tempdir().expect("temp dir");
        let store = LocalBlobStore::new(dir.path());

        let url = store
            .write("documents/1_doc.pdf", b"%PDF", Some("application/pdf"))
            .await
            .expect("write");

        let written = dir.path().join("documents").join("1_doc.pdf");
        assert_eq!(std::fs::read(&written).expect("read back"), b"%PDF");
        assert!(url.starts_with("file://"));
        assert!(url.ends_with("/documents/1_doc.pdf"));
    }

    #[tokio::test]
    async fn root_that_is_a_file_is_io_error() {
        let dir = tempdir().expect("temp dir");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a dir").expect("write");
        let store = LocalBlobStore::new(&blocker);

        let err = store.write("documents/1_doc.pdf", b"x", None).await.unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }
}
