//! doc-to-podcast: turn a PDF or text document into a generated podcast.
//!
//! The [`pipeline::Orchestrator`] validates a file, uploads the original to a
//! blob store, sends it to the processing backend for summary, script and
//! audio, persists the combined record and keeps a newest-first history.
//!
//! Every external service sits behind an async capability trait
//! ([`storage::BlobStore`], [`backend::DocumentProcessor`],
//! [`records::DocumentStore`]) so the workflow runs against fakes in tests.

pub mod backend;
pub mod clock;
pub mod config;
pub mod file;
pub mod pipeline;
pub mod records;
pub mod storage;

#[cfg(test)]
mod test_support;

pub use pipeline::{GenerateOutcome, Orchestrator, WorkflowState, WorkflowView};
