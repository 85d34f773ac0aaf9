//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\doc-to-podcast\
//!   macOS:   ~/Library/Application Support/doc-to-podcast/
//!   Linux:   ~/.config/doc-to-podcast/
//!
//! Data dir (local blobs + local record database):
//!   Windows: %LOCALAPPDATA%\doc-to-podcast\
//!   macOS:   ~/Library/Application Support/doc-to-podcast/
//!   Linux:   ~/.local/share/doc-to-podcast/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory holding `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Directory for the local blob store.
    pub blobs_dir: PathBuf,
    /// Full path to the local record database (`records.json`).
    pub records_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "doc-to-podcast";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        Self {
            settings_file: config_dir.join("settings.toml"),
            config_dir,
            blobs_dir: data_dir.join("blobs"),
            records_file: data_dir.join("records.json"),
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
