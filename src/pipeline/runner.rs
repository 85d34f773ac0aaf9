//! Orchestrator: drives one generate invocation through every step.
//!
//! # Flow
//!
//! ```text
//! generate(file)
//!   └─▶ FileValidator::validate            [Validating]
//!         └─▶ BlobUploader::upload         [Uploading]     → file URL
//!               └─▶ DocumentProcessor::process (bytes) [Processing]
//!                     └─▶ RecordStore::persist         [Persisting] → id
//!                           └─▶ HistoryCache::refresh  [RefreshingHistory]
//!                                 ├─ Ok  → Done
//!                                 └─ Err → warn, notice, Done
//! any failing step → Error(kind), later steps never run
//! ```
//!
//! Steps run strictly one after another. Upload and processing take
//! independent inputs (the processor gets the original bytes, never the blob
//! URL) but are not overlapped. Nothing is retried or rolled back: a blob
//! uploaded before a later failure stays where it is.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::backend::{DocumentProcessor, HttpProcessingClient};
use crate::clock::{iso_timestamp, Clock, SystemClock};
use crate::config::AppConfig;
use crate::file::{FileValidator, SelectedFile, ValidationError};
use crate::records::{self, GenerationRecord, HistoryCache, NewRecord, PersistenceError, RecordStore};
use crate::storage::{self, BlobUploader};

use super::error::{GenerationError, HISTORY_NOTICE};
use super::state::{WorkflowState, WorkflowStatus, WorkflowView};

// ---------------------------------------------------------------------------
// GenerateOutcome
// ---------------------------------------------------------------------------

/// How a call to [`Orchestrator::generate`] ended.
#[derive(Debug)]
pub enum GenerateOutcome {
    /// A record was persisted. `history_notice` is set when the follow-up
    /// history refresh failed.
    Completed {
        record: GenerationRecord,
        history_notice: Option<String>,
    },

    /// A step failed; the workflow is in `Error(error.kind())`.
    Failed(GenerationError),

    /// Another invocation was in flight; nothing happened.
    Rejected,
}

impl GenerateOutcome {
    pub fn record(&self) -> Option<&GenerationRecord> {
        match self {
            GenerateOutcome::Completed { record, .. } => Some(record),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&GenerationError> {
        match self {
            GenerateOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Owns the workflow state and sequences the generate steps.
///
/// Share it behind an `Arc`; at most one invocation runs at a time and any
/// request made meanwhile is answered with [`GenerateOutcome::Rejected`].
///
/// ```rust,no_run
/// use doc_to_podcast::config::AppConfig;
/// use doc_to_podcast::file::SelectedFile;
/// use doc_to_podcast::pipeline::Orchestrator;
///
/// # async fn example() -> std::io::Result<()> {
/// let orchestrator = Orchestrator::from_config(&AppConfig::default());
/// orchestrator.load_history().await.ok();
///
/// let file = SelectedFile::from_path("notes.pdf").await?;
/// let outcome = orchestrator.generate(Some(file)).await;
/// println!("{}", orchestrator.view().state.label());
/// # let _ = outcome;
/// # Ok(())
/// # }
/// ```
pub struct Orchestrator {
    validator: FileValidator,
    uploader: BlobUploader,
    processor: Arc<dyn DocumentProcessor>,
    records: RecordStore,
    history: HistoryCache,
    clock: Arc<dyn Clock>,
    status: Mutex<WorkflowStatus>,
}

impl Orchestrator {
    /// Create an orchestrator from its collaborators.
    ///
    /// `history` should read from the same collection `records` writes to,
    /// otherwise fresh records never show up in it.
    pub fn new(
        validator: FileValidator,
        uploader: BlobUploader,
        processor: Arc<dyn DocumentProcessor>,
        records: RecordStore,
        history: HistoryCache,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            validator,
            uploader,
            processor,
            records,
            history,
            clock,
            status: Mutex::new(WorkflowStatus::default()),
        }
    }

    /// Wire the configured blob store, backend client and database.
    pub fn from_config(config: &AppConfig) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let uploader = BlobUploader::new(
            storage::from_config(&config.storage),
            config.storage.prefix.clone(),
            Arc::clone(&clock),
        );
        let processor = Arc::new(HttpProcessingClient::from_config(&config.backend));
        let records = RecordStore::new(
            records::from_config(&config.database),
            config.database.collection.clone(),
        );
        let history = HistoryCache::new(records.clone());

        Self::new(
            FileValidator::new(),
            uploader,
            processor,
            records,
            history,
            clock,
        )
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Run one invocation for `file`.
    ///
    /// `None` stands for "generate pressed with nothing selected" and ends
    /// in `Error(Validation)` without touching any service.
    pub async fn generate(&self, file: Option<SelectedFile>) -> GenerateOutcome {
        let file = {
            let mut st = self.status.lock();
            if st.state.is_busy() {
                log::warn!(
                    "pipeline: generate ignored, invocation already {}",
                    st.state.label()
                );
                return GenerateOutcome::Rejected;
            }

            enter(&mut st, WorkflowState::Idle);
            st.error_message = None;
            st.notice = None;

            match file {
                Some(file) => {
                    enter(&mut st, WorkflowState::Validating);
                    file
                }
                None => {
                    let error = GenerationError::from(ValidationError::NoFile);
                    fail(&mut st, &error);
                    return GenerateOutcome::Failed(error);
                }
            }
        };

        let in_flight = InFlight::new(&self.status);
        let result = self.run(&file).await;
        in_flight.disarm();

        match result {
            Ok((record, history_notice)) => {
                let mut st = self.status.lock();
                enter(&mut st, WorkflowState::Done);
                st.notice = history_notice.clone();
                log::info!("pipeline: generated podcast for {} ({})", record.file_name, record.id);
                GenerateOutcome::Completed {
                    record,
                    history_notice,
                }
            }
            Err(error) => {
                fail(&mut self.status.lock(), &error);
                GenerateOutcome::Failed(error)
            }
        }
    }

    async fn run(
        &self,
        file: &SelectedFile,
    ) -> Result<(GenerationRecord, Option<String>), GenerationError> {
        // ── 1. Validate (no I/O) ─────────────────────────────────────────
        self.validator.validate(file)?;

        // ── 2. Upload the original ───────────────────────────────────────
        self.set_state(WorkflowState::Uploading);
        let file_url = self.uploader.upload(file).await?;

        // ── 3. Process the original bytes ────────────────────────────────
        self.set_state(WorkflowState::Processing);
        let processed = self.processor.process(file).await?;

        // ── 4. Persist the assembled record ──────────────────────────────
        self.set_state(WorkflowState::Persisting);
        let new_record = NewRecord {
            file_name: file.name().to_string(),
            file_url,
            summary: processed.summary,
            podcast_script: processed.podcast_script,
            audio_path: processed.audio_path,
            created_at: iso_timestamp(self.clock.now()),
            backend_id: processed.backend_id,
        };
        let id = self.records.persist(&new_record).await?;
        let record = new_record.into_record(id);

        {
            let mut st = self.status.lock();
            st.current = Some(record.clone());
            enter(&mut st, WorkflowState::RefreshingHistory);
        }

        // ── 5. Refresh history; failure is only a notice ─────────────────
        let notice = match self.history.refresh().await {
            Ok(_) => None,
            Err(e) => {
                log::warn!("pipeline: record saved but history refresh failed: {e}");
                Some(HISTORY_NOTICE.to_string())
            }
        };

        Ok((record, notice))
    }

    /// Initial history load. Failure sets the notice and never touches the
    /// workflow state.
    pub async fn load_history(&self) -> Result<Arc<[GenerationRecord]>, PersistenceError> {
        match self.history.refresh().await {
            Ok(entries) => {
                let mut st = self.status.lock();
                if st.notice.as_deref() == Some(HISTORY_NOTICE) {
                    st.notice = None;
                }
                Ok(entries)
            }
            Err(e) => {
                self.status.lock().notice = Some(HISTORY_NOTICE.to_string());
                Err(e)
            }
        }
    }

    /// Make the cached history entry `id` the current result.
    ///
    /// Returns `false` when no such entry is cached or an invocation is in
    /// flight.
    pub fn show_record(&self, id: &str) -> bool {
        let mut st = self.status.lock();
        if st.state.is_busy() {
            return false;
        }
        match self.history.find(id) {
            Some(record) => {
                st.current = Some(record);
                true
            }
            None => false,
        }
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> WorkflowView {
        let st = self.status.lock();
        WorkflowView {
            state: st.state,
            current: st.current.clone(),
            error_message: st.error_message.clone(),
            notice: st.notice.clone(),
            history: self.history.entries(),
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.status.lock().state
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn set_state(&self, state: WorkflowState) {
        enter(&mut self.status.lock(), state);
    }
}

/// Puts the workflow back to `Idle` if a `generate` future is dropped
/// before it finishes, so the orchestrator does not stay busy forever.
struct InFlight<'a> {
    status: &'a Mutex<WorkflowStatus>,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn new(status: &'a Mutex<WorkflowStatus>) -> Self {
        Self { status, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut st = self.status.lock();
        log::warn!("pipeline: invocation abandoned while {}", st.state.label());
        enter(&mut st, WorkflowState::Idle);
    }
}

fn enter(st: &mut WorkflowStatus, state: WorkflowState) {
    log::debug!("pipeline: {:?} → {:?}", st.state, state);
    st.state = state;
}

fn fail(st: &mut WorkflowStatus, error: &GenerationError) {
    enter(st, WorkflowState::Error(error.kind()));
    st.error_message = Some(error.user_message());
    log::error!("pipeline error ({}): {error}", error.kind());
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
