//! Client side of the document-processing backend.
//!
//! This module provides:
//! * [`DocumentProcessor`]: async trait: raw document in, summary, script
//!   and audio location out.
//! * [`HttpProcessingClient`]: multipart `POST` to the backend's single
//!   upload endpoint, with a bounded timeout.
//! * [`ProcessedDocument`]: the validated result; only constructed after
//!   the response passed the schema check in [`response`].
//! * [`ProcessingError`]: unreachable / timed out, server failure, or
//!   malformed success response. Kept distinct so the caller can tell them
//!   apart.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use doc_to_podcast::backend::{DocumentProcessor, HttpProcessingClient};
//! use doc_to_podcast::config::BackendConfig;
//! use doc_to_podcast::file::SelectedFile;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = HttpProcessingClient::from_config(&BackendConfig::default());
//!     let file = SelectedFile::from_path("chapter.pdf").await.unwrap();
//!     let processed = client.process(&file).await.unwrap();
//!     println!("{}", processed.summary);
//! }
//! ```

pub mod client;
pub mod response;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{DocumentProcessor, HttpProcessingClient, ProcessingError};
pub use response::ProcessedDocument;
