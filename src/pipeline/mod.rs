//! Generation workflow for doc-to-podcast.
//!
//! This module sequences validate → upload → process → persist → refresh
//! history and exposes the workflow state that a renderer reads.
//!
//! # Architecture
//!
//! ```text
//! Orchestrator::generate(Option<SelectedFile>)   ← one invocation at a time
//!        │
//!        ├─ FileValidator      (pure)
//!        ├─ BlobUploader       → Arc<dyn BlobStore>
//!        ├─ DocumentProcessor  (Arc<dyn …>, HTTP multipart)
//!        ├─ RecordStore        → Arc<dyn DocumentStore>
//!        └─ HistoryCache       (Arc<[GenerationRecord]>, swapped wholesale)
//!
//! Orchestrator::view() → WorkflowView ←─── read by the renderer
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use doc_to_podcast::config::AppConfig;
//! use doc_to_podcast::file::SelectedFile;
//! use doc_to_podcast::pipeline::{GenerateOutcome, Orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let orchestrator = Orchestrator::from_config(&AppConfig::load()?);
//!     let file = SelectedFile::from_path("report.pdf").await?;
//!
//!     match orchestrator.generate(Some(file)).await {
//!         GenerateOutcome::Completed { record, .. } => println!("{}", record.audio_path),
//!         GenerateOutcome::Failed(e) => eprintln!("{}", e.user_message()),
//!         GenerateOutcome::Rejected => {}
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use error::{GenerationError, HISTORY_NOTICE};
pub use runner::{GenerateOutcome, Orchestrator};
pub use state::{ErrorKind, WorkflowState, WorkflowView};
