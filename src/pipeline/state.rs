//! Workflow state machine and the snapshot handed to the presentation layer.
//!
//! [`WorkflowState`] drives the orchestrator's state machine. Renderers read
//! it through [`WorkflowView`], which also carries the current result, the
//! user-facing error message, the secondary notice and the history contents.

use std::fmt;
use std::sync::Arc;

use crate::records::GenerationRecord;

// ---------------------------------------------------------------------------
// ErrorKind
// ---------------------------------------------------------------------------

/// Which step failed, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No file, or a file that is neither PDF nor plain text.
    Validation,
    /// The blob write failed.
    Storage,
    /// The processing backend was unreachable or timed out.
    Network,
    /// The processing backend answered with a failure status.
    Server,
    /// The processing backend answered success with an unusable body.
    ResponseShape,
    /// The record could not be written (or read).
    Persistence,
}

impl ErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "ValidationError",
            ErrorKind::Storage => "StorageError",
            ErrorKind::Network => "NetworkError",
            ErrorKind::Server => "ServerError",
            ErrorKind::ResponseShape => "ResponseShapeError",
            ErrorKind::Persistence => "PersistenceError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// WorkflowState
// ---------------------------------------------------------------------------

/// States of one generate invocation.
///
/// ```text
/// Idle ──file──▶ Validating ──ok──▶ Uploading ──url──▶ Processing
///      ──no file──▶ Error(Validation)
/// Processing ──outputs──▶ Persisting ──id──▶ RefreshingHistory ──▶ Done
/// any non-terminal state ──failure──▶ Error(kind)
/// Done / Error ──next invocation──▶ Idle
/// any non-terminal state ──future dropped──▶ Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowState {
    /// Nothing has run yet.
    #[default]
    Idle,

    /// The file is being checked against the accepted types.
    Validating,

    /// The original is being written to the blob store.
    Uploading,

    /// The processing backend is producing summary, script and audio.
    Processing,

    /// The assembled record is being written to the database.
    Persisting,

    /// The history is being re-read. Its failure never fails the invocation.
    RefreshingHistory,

    /// The invocation produced a persisted record.
    Done,

    /// The invocation stopped at a failed step.
    Error(ErrorKind),
}

impl WorkflowState {
    /// Returns `true` while an invocation is in flight.
    ///
    /// New generate requests are rejected while busy.
    ///
    /// ```
    /// use doc_to_podcast::pipeline::{ErrorKind, WorkflowState};
    ///
    /// assert!(!WorkflowState::Idle.is_busy());
    /// assert!(WorkflowState::Uploading.is_busy());
    /// assert!(WorkflowState::RefreshingHistory.is_busy());
    /// assert!(!WorkflowState::Done.is_busy());
    /// assert!(!WorkflowState::Error(ErrorKind::Network).is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        !matches!(
            self,
            WorkflowState::Idle | WorkflowState::Done | WorkflowState::Error(_)
        )
    }

    /// `Done` and `Error` end an invocation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowState::Done | WorkflowState::Error(_))
    }

    /// A short human-readable label suitable for a status line.
    pub fn label(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "Idle",
            WorkflowState::Validating => "Validating",
            WorkflowState::Uploading => "Uploading",
            WorkflowState::Processing => "Processing",
            WorkflowState::Persisting => "Saving",
            WorkflowState::RefreshingHistory => "Refreshing history",
            WorkflowState::Done => "Done",
            WorkflowState::Error(_) => "Error",
        }
    }
}

// ---------------------------------------------------------------------------
// WorkflowView
// ---------------------------------------------------------------------------

/// Everything a renderer needs, captured at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowView {
    pub state: WorkflowState,

    /// The record on display: the one the last successful invocation
    /// produced, or one picked from history. Kept when a later invocation
    /// fails.
    pub current: Option<GenerationRecord>,

    /// User-facing message for `WorkflowState::Error`.
    pub error_message: Option<String>,

    /// Non-fatal notice, e.g. a failed history refresh.
    pub notice: Option<String>,

    /// History contents, newest first.
    pub history: Arc<[GenerationRecord]>,
}

/// Mutable part of the orchestrator, guarded by one lock.
#[derive(Debug, Default)]
pub(crate) struct WorkflowStatus {
    pub state: WorkflowState,
    pub current: Option<GenerationRecord>,
    pub error_message: Option<String>,
    pub notice: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
