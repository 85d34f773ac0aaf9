//! The user's chosen document.

use std::io;
use std::path::Path;

/// A document picked by the user, held fully in memory.
///
/// The same bytes feed both the blob upload and the processing request, so
/// the file is read once and shared by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

impl SelectedFile {
    /// Build a file from parts already in memory.
    ///
    /// An empty `content_type` is treated as undeclared.
    pub fn new(name: impl Into<String>, content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
            bytes,
        }
    }

    /// Read `path` from disk.
    ///
    /// The display name is the final path component; the declared content
    /// type is guessed from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} has no usable file name", path.display()),
                )
            })?
            .to_string();

        let bytes = tokio::fs::read(path).await?;
        let content_type = mime_guess::from_path(path).first().map(|m| m.to_string());

        Ok(Self::new(name, content_type.as_deref(), bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared MIME type, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// Size in megabytes, formatted with two decimals (e.g. `"2.00"`).
    pub fn size_mb(&self) -> String {
        format!("{:.2}", self.bytes.len() as f64 / 1024.0 / 1024.0)
    }
}
