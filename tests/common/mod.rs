//! In-memory fakes for driving the orchestrator without any network.
//!
//! Every fake appends to a shared call log so tests can assert which
//! services were touched and in what order.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;

use doc_to_podcast::backend::{DocumentProcessor, ProcessedDocument, ProcessingError};
use doc_to_podcast::clock::Clock;
use doc_to_podcast::file::{FileValidator, SelectedFile};
use doc_to_podcast::records::{
    Document, DocumentStore, HistoryCache, PersistenceError, RecordStore, StoredDocument,
};
use doc_to_podcast::storage::{BlobStore, BlobUploader, StorageError};
use doc_to_podcast::Orchestrator;

pub type CallLog = Arc<Mutex<Vec<String>>>;

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Starts at 2026-10-16T09:30:00Z and advances one second per reading.
pub struct SteppingClock {
    next: AtomicI64,
}

impl Default for SteppingClock {
    fn default() -> Self {
        let start = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();
        Self {
            next: AtomicI64::new(start.timestamp_millis()),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let millis = self.next.fetch_add(1_000, Ordering::SeqCst);
        Utc.timestamp_millis_opt(millis).unwrap()
    }
}

// ---------------------------------------------------------------------------
// Blob store
// ---------------------------------------------------------------------------

pub struct FakeBlobs {
    log: CallLog,
    pub fail: AtomicBool,
    pub written: Mutex<Vec<String>>,
}

#[async_trait]
impl BlobStore for FakeBlobs {
    async fn write(&self, key: &str, _: &[u8], _: Option<&str>) -> Result<String, StorageError> {
        self.log.lock().push(format!("upload {key}"));
        if self.fail.load(Ordering::SeqCst) {
            return Err(StorageError::Unauthorized { status: 403 });
        }
        let url = format!("https://blobs.test/{key}");
        self.written.lock().push(url.clone());
        Ok(url)
    }
}

// ---------------------------------------------------------------------------
// Processor
// ---------------------------------------------------------------------------

pub enum Reply {
    Ok(ProcessedDocument),
    Timeout,
    Server(u16, Option<&'static str>),
    Shape(&'static str),
}

pub struct FakeProcessor {
    log: CallLog,
    pub reply: Mutex<Reply>,
    /// Bytes of every file received.
    pub received: Mutex<Vec<Vec<u8>>>,
}

#[async_trait]
impl DocumentProcessor for FakeProcessor {
    async fn process(&self, file: &SelectedFile) -> Result<ProcessedDocument, ProcessingError> {
        self.log.lock().push(format!("process {}", file.name()));
        self.received.lock().push(file.bytes().to_vec());
        // Yield like a real network call would.
        tokio::time::sleep(Duration::from_millis(1)).await;

        match &*self.reply.lock() {
            Reply::Ok(doc) => Ok(doc.clone()),
            Reply::Timeout => Err(ProcessingError::Timeout),
            Reply::Server(status, detail) => Err(ProcessingError::Server {
                status: *status,
                detail: detail.map(str::to_string),
            }),
            Reply::Shape(msg) => Err(ProcessingError::ResponseShape(msg.to_string())),
        }
    }
}

pub fn processed(summary: &str) -> ProcessedDocument {
    ProcessedDocument {
        backend_id: "abc".into(),
        summary: summary.into(),
        podcast_script: "P".into(),
        audio_path: "https://x/a.mp3".into(),
        message: Some("Podcast generated successfully!".into()),
    }
}

// ---------------------------------------------------------------------------
// Document store
// ---------------------------------------------------------------------------

pub struct FakeDocs {
    log: CallLog,
    pub fail_add: AtomicBool,
    pub fail_list: AtomicBool,
    pub docs: Mutex<Vec<StoredDocument>>,
}

#[async_trait]
impl DocumentStore for FakeDocs {
    async fn add(&self, collection: &str, document: Document) -> Result<String, PersistenceError> {
        self.log.lock().push(format!("persist {collection}"));
        if self.fail_add.load(Ordering::SeqCst) {
            return Err(PersistenceError::Transport("connection reset".into()));
        }
        let mut docs = self.docs.lock();
        let id = format!("rec-{}", docs.len() + 1);
        docs.push(StoredDocument {
            id: id.clone(),
            fields: document,
        });
        Ok(id)
    }

    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, PersistenceError> {
        self.log.lock().push(format!("list {collection}"));
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(PersistenceError::PermissionDenied { status: 403 });
        }
        // Deliver in reverse insertion order; sorting is the client's job.
        Ok(self.docs.lock().iter().rev().cloned().collect())
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub log: CallLog,
    pub blobs: Arc<FakeBlobs>,
    pub processor: Arc<FakeProcessor>,
    pub docs: Arc<FakeDocs>,
    pub orchestrator: Orchestrator,
}

impl Harness {
    pub fn new() -> Self {
        let log: CallLog = Arc::default();
        let blobs = Arc::new(FakeBlobs {
            log: Arc::clone(&log),
            fail: AtomicBool::new(false),
            written: Mutex::default(),
        });
        let processor = Arc::new(FakeProcessor {
            log: Arc::clone(&log),
            reply: Mutex::new(Reply::Ok(processed("S"))),
            received: Mutex::default(),
        });
        let docs = Arc::new(FakeDocs {
            log: Arc::clone(&log),
            fail_add: AtomicBool::new(false),
            fail_list: AtomicBool::new(false),
            docs: Mutex::default(),
        });

        let clock: Arc<dyn Clock> = Arc::new(SteppingClock::default());
        let blob_store: Arc<dyn BlobStore> = blobs.clone();
        let doc_store: Arc<dyn DocumentStore> = docs.clone();
        let records = RecordStore::new(doc_store, "podcasts");
        let orchestrator = Orchestrator::new(
            FileValidator::new(),
            BlobUploader::new(blob_store, "documents", Arc::clone(&clock)),
            processor.clone(),
            records.clone(),
            HistoryCache::new(records),
            clock,
        );

        Self {
            log,
            blobs,
            processor,
            docs,
            orchestrator,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.lock().clone()
    }

    pub fn set_reply(&self, reply: Reply) {
        *self.processor.reply.lock() = reply;
    }
}

pub fn pdf_2mb() -> SelectedFile {
    SelectedFile::new("doc.pdf", Some("application/pdf"), vec![0x25; 2 * 1024 * 1024])
}
