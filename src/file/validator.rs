//! Type gate for candidate documents.
//!
//! Pure and synchronous; runs before any storage or network call.

use thiserror::Error;

use super::SelectedFile;

const ACCEPTED_TYPES: [&str; 2] = ["application/pdf", "text/plain"];

/// Reasons a generate request is refused before any I/O happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The generate request carried no file, or one without a name.
    #[error("no file selected")]
    NoFile,

    /// Neither the declared type nor the name identify a PDF or text file.
    #[error("unsupported file type")]
    UnsupportedType {
        name: String,
        content_type: Option<String>,
    },
}

/// Accepts PDF and plain-text documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileValidator;

impl FileValidator {
    pub fn new() -> Self {
        Self
    }

    /// A blank name counts as no file at all.
    ///
    /// Otherwise accept when the declared content type is PDF or plain text, or the
    /// name ends in `.txt` (some platforms declare no type for text files).
    ///
    /// ```
    /// use doc_to_podcast::file::{FileValidator, SelectedFile};
    ///
    /// let validator = FileValidator::new();
    /// let pdf = SelectedFile::new("doc.pdf", Some("application/pdf"), vec![]);
    /// assert!(validator.validate(&pdf).is_ok());
    ///
    /// let exe = SelectedFile::new("doc.exe", Some("application/x-msdownload"), vec![]);
    /// assert_eq!(
    ///     validator.validate(&exe).unwrap_err().to_string(),
    ///     "unsupported file type"
    /// );
    /// ```
    pub fn validate<'a>(&self, file: &'a SelectedFile) -> Result<&'a SelectedFile, ValidationError> {
        if file.name().trim().is_empty() {
            return Err(ValidationError::NoFile);
        }

        let declared_ok = file
            .content_type()
            .map(essence)
            .is_some_and(|t| ACCEPTED_TYPES.iter().any(|a| a.eq_ignore_ascii_case(t)));

        if declared_ok || file.name().ends_with(".txt") {
            Ok(file)
        } else {
            Err(ValidationError::UnsupportedType {
                name: file.name().to_string(),
                content_type: file.content_type().map(str::to_string),
            })
        }
    }
}

/// Strip MIME parameters: `text/plain; charset=utf-8` → `text/plain`.
fn essence(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or_default().trim()
}
