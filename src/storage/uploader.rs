//! Uploads a selected file under a fresh key.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::clock::Clock;
use crate::file::SelectedFile;
use crate::storage::blob::{BlobStore, StorageError};

/// Writes user documents to a [`BlobStore`].
///
/// Keys are `{prefix}/{unix_millis}_{file_name}`. The millisecond part is
/// kept strictly increasing within one uploader, so uploading two files with
/// the same name in the same millisecond still yields two keys.
pub struct BlobUploader {
    store: Arc<dyn BlobStore>,
    prefix: String,
    clock: Arc<dyn Clock>,
    last_millis: Mutex<i64>,
}

impl BlobUploader {
    pub fn new(store: Arc<dyn BlobStore>, prefix: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            prefix: prefix.into().trim_matches('/').to_string(),
            clock,
            last_millis: Mutex::new(0),
        }
    }

    /// Upload `file` and return its public URL. Failures are returned as-is;
    /// nothing is retried.
    pub async fn upload(&self, file: &SelectedFile) -> Result<String, StorageError> {
        let key = self.next_key(file.name());
        log::debug!(
            "storage: uploading {} ({} bytes) as {key}",
            file.name(),
            file.size_bytes()
        );

        let url = self
            .store
            .write(&key, file.bytes(), file.content_type())
            .await?;

        log::info!("storage: uploaded {} to {url}", file.name());
        Ok(url)
    }

    fn next_key(&self, file_name: &str) -> String {
        let now = self.clock.now().timestamp_millis();
        let millis = {
            let mut last = self.last_millis.lock();
            let millis = now.max(*last + 1);
            *last = millis;
            millis
        };

        // Path separators in a display name would create phantom folders.
        let name: String = file_name
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();

        if self.prefix.is_empty() {
            format!("{millis}_{name}")
        } else {
            format!("{}/{millis}_{name}", self.prefix)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    /// Records every key and answers with a URL derived from it.
    #[derive(Default)]
    struct RecordingStore {
        keys: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl BlobStore for RecordingStore {
        async fn write(
            &self,
            key: &str,
            _bytes: &[u8],
            _content_type: Option<&str>,
        ) -> Result<String, StorageError> {
            self.keys.lock().push(key.to_string());
            Ok(format!("https://blobs.test/{key}"))
        }
    }

    struct DenyingStore;

    #[async_trait]
    impl BlobStore for DenyingStore {
        async fn write(
            &self,
            _key: &str,
            _bytes: &[u8],
            _content_type: Option<&str>,
        ) -> Result<String, StorageError> {
            Err(StorageError::Unauthorized { status: 403 })
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn fixed_clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(
            Utc.timestamp_millis_opt(1_760_000_000_000).unwrap(),
        ))
    }

    fn pdf(name: &str) -> SelectedFile {
        SelectedFile::new(name, Some("application/pdf"), b"%PDF".to_vec())
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn key_combines_prefix_timestamp_and_name() {
        let store = Arc::new(RecordingStore::default());
        let uploader = BlobUploader::new(store.clone(), "documents", fixed_clock());

        let url = uploader.upload(&pdf("doc.pdf")).await.expect("upload");

        assert_eq!(url, "https://blobs.test/documents/1760000000000_doc.pdf");
        assert_eq!(
            store.keys.lock().clone(),
            vec!["documents/1760000000000_doc.pdf".to_string()]
        );
    }

    #[tokio::test]
    async fn same_name_same_millisecond_gets_distinct_keys() {
        let store = Arc::new(RecordingStore::default());
        let uploader = BlobUploader::new(store.clone(), "documents", fixed_clock());

        let first = uploader.upload(&pdf("doc.pdf")).await.expect("first");
        let second = uploader.upload(&pdf("doc.pdf")).await.expect("second");

        assert_ne!(first, second);
        assert_eq!(
            store.keys.lock().clone(),
            vec![
                "documents/1760000000000_doc.pdf".to_string(),
                "documents/1760000000001_doc.pdf".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn empty_prefix_and_separators_in_name() {
        let store = Arc::new(RecordingStore::default());
        let uploader = BlobUploader::new(store.clone(), "/", fixed_clock());

        uploader.upload(&pdf("a/b\\c.pdf")).await.expect("upload");

        assert_eq!(
            store.keys.lock().clone(),
            vec!["1760000000000_a_b_c.pdf".to_string()]
        );
    }

    #[tokio::test]
    async fn store_failure_is_returned_unchanged() {
        let uploader = BlobUploader::new(Arc::new(DenyingStore), "documents", fixed_clock());

        let err = uploader.upload(&pdf("doc.pdf")).await.unwrap_err();
        assert!(matches!(err, StorageError::Unauthorized { status: 403 }));
    }
}
