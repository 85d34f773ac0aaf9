//! The error that ends a generate invocation, and its user-facing text.

use thiserror::Error;

use crate::backend::ProcessingError;
use crate::file::ValidationError;
use crate::records::PersistenceError;
use crate::storage::StorageError;

use super::state::ErrorKind;

/// Notice shown when the history could not be read.
pub const HISTORY_NOTICE: &str = "Error loading previous podcasts";

/// Why an invocation stopped. Wraps the failing subsystem's error unchanged.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("upload failed: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Processing(#[from] ProcessingError),

    #[error("saving the record failed: {0}")]
    Persistence(#[from] PersistenceError),
}

impl GenerationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerationError::Validation(_) => ErrorKind::Validation,
            GenerationError::Storage(_) => ErrorKind::Storage,
            GenerationError::Processing(e) if e.is_network() => ErrorKind::Network,
            GenerationError::Processing(ProcessingError::Server { .. }) => ErrorKind::Server,
            GenerationError::Processing(_) => ErrorKind::ResponseShape,
            GenerationError::Persistence(_) => ErrorKind::Persistence,
        }
    }

    /// The single message shown to the user. Server-supplied detail text is
    /// preferred over the status code.
    pub fn user_message(&self) -> String {
        match self {
            GenerationError::Validation(ValidationError::NoFile) => {
                "Please select a file first".into()
            }
            GenerationError::Validation(ValidationError::UnsupportedType { .. }) => {
                "Please select a PDF or TXT file".into()
            }
            GenerationError::Storage(StorageError::Unauthorized { .. }) => {
                "File storage access denied. Check your storage rules.".into()
            }
            GenerationError::Storage(StorageError::QuotaExceeded) => {
                "File storage quota exceeded. Please try again later.".into()
            }
            GenerationError::Storage(_) => "Failed to upload file to storage".into(),
            GenerationError::Processing(ProcessingError::Unreachable(_)) => {
                "Cannot connect to server. Please make sure the backend is running.".into()
            }
            GenerationError::Processing(ProcessingError::Timeout) => {
                "The server did not respond in time. Please try again.".into()
            }
            GenerationError::Processing(ProcessingError::Server { status, detail }) => {
                match detail {
                    Some(detail) => format!("Server error: {detail}"),
                    None => format!("Server error: {status}"),
                }
            }
            GenerationError::Processing(ProcessingError::ResponseShape(_)) => {
                "Invalid response from server".into()
            }
            GenerationError::Persistence(PersistenceError::PermissionDenied { .. }) => {
                "Database access denied. Check your database rules.".into()
            }
            GenerationError::Persistence(_) => {
                "Error saving podcast. Please try again.".into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn unsupported() -> ValidationError {
        ValidationError::UnsupportedType {
            name: "doc.exe".into(),
            content_type: Some("application/x-msdownload".into()),
        }
    }

    #[test]
    fn kinds_follow_the_failing_step() {
        let cases: Vec<(GenerationError, ErrorKind)> = vec![
            (ValidationError::NoFile.into(), ErrorKind::Validation),
            (unsupported().into(), ErrorKind::Validation),
            (StorageError::QuotaExceeded.into(), ErrorKind::Storage),
            (ProcessingError::Timeout.into(), ErrorKind::Network),
            (ProcessingError::Unreachable("refused".into()).into(), ErrorKind::Network),
            (
                ProcessingError::Server { status: 500, detail: None }.into(),
                ErrorKind::Server,
            ),
            (
                ProcessingError::ResponseShape("missing field `summary`".into()).into(),
                ErrorKind::ResponseShape,
            ),
            (
                PersistenceError::Transport("refused".into()).into(),
                ErrorKind::Persistence,
            ),
        ];

        for (error, kind) in cases {
            assert_eq!(error.kind(), kind, "{error:?}");
        }
    }

    #[test]
    fn server_detail_is_preferred() {
        let with_detail = GenerationError::from(ProcessingError::Server {
            status: 400,
            detail: Some("Only PDF and TXT files are allowed".into()),
        });
        assert_eq!(
            with_detail.user_message(),
            "Server error: Only PDF and TXT files are allowed"
        );

        let without = GenerationError::from(ProcessingError::Server {
            status: 502,
            detail: None,
        });
        assert_eq!(without.user_message(), "Server error: 502");
    }

    #[test]
    fn messages_per_kind() {
        assert_eq!(
            GenerationError::from(ValidationError::NoFile).user_message(),
            "Please select a file first"
        );
        assert_eq!(
            GenerationError::from(unsupported()).user_message(),
            "Please select a PDF or TXT file"
        );
        assert_eq!(
            GenerationError::from(StorageError::Transport("reset".into())).user_message(),
            "Failed to upload file to storage"
        );
        assert_eq!(
            GenerationError::from(StorageError::Unauthorized { status: 403 }).user_message(),
            "File storage access denied. Check your storage rules."
        );
        assert_eq!(
            GenerationError::from(ProcessingError::ResponseShape("x".into())).user_message(),
            "Invalid response from server"
        );
        assert!(GenerationError::from(ProcessingError::Unreachable("x".into()))
            .user_message()
            .starts_with("Cannot connect to server"));
        assert_eq!(
            GenerationError::from(PersistenceError::PermissionDenied { status: 403 })
                .user_message(),
            "Database access denied. Check your database rules."
        );
    }

    #[test]
    fn display_keeps_the_underlying_cause() {
        let err = GenerationError::from(StorageError::QuotaExceeded);
        assert!(err.to_string().starts_with("upload failed: "));
    }
}
