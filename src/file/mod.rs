//! Candidate documents and the gate they must pass before any network call.
//!
//! * [`SelectedFile`]: a document the user picked: display name, declared
//!   content type and raw bytes.
//! * [`FileValidator`]: accepts PDF and plain-text documents, rejects
//!   everything else with [`ValidationError`].

pub mod selected;
pub mod validator;

pub use selected::SelectedFile;
pub use validator::{FileValidator, ValidationError};
