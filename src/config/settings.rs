//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.
//! Every struct is `#[serde(default)]`, so a partial `settings.toml` only
//! overrides the keys it names.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// BackendConfig
// ---------------------------------------------------------------------------

/// Settings for the document-processing backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend, without a trailing slash.
    pub base_url: String,
    /// Path of the single multipart upload endpoint.
    pub upload_path: String,
    /// Maximum seconds to wait for a processing response.
    ///
    /// Summarisation plus speech synthesis routinely takes minutes, so the
    /// default is five.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            upload_path: "/upload_file/".into(),
            timeout_secs: 300,
        }
    }
}

impl BackendConfig {
    /// Full URL of the upload endpoint.
    pub fn upload_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.upload_path
        )
    }
}

// ---------------------------------------------------------------------------
// StorageConfig
// ---------------------------------------------------------------------------

/// Selects which blob store keeps uploaded originals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StorageProvider {
    /// Firebase Storage over its REST API.
    Firebase,
    /// A directory on the local filesystem; URLs are `file://`.
    Local,
}

impl Default for StorageProvider {
    fn default() -> Self {
        Self::Local
    }
}

/// Settings for the blob store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Which backend to use.
    pub provider: StorageProvider,
    /// Firebase bucket name (e.g. `my-app.firebasestorage.app`).
    pub bucket: String,
    /// Firebase Storage REST base URL.
    pub base_url: String,
    /// Key prefix ("folder") for uploaded documents.
    pub prefix: String,
    /// Optional Firebase auth token sent as `Authorization: Firebase <token>`.
    pub auth_token: Option<String>,
    /// Root directory for the local provider.
    pub local_dir: PathBuf,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: StorageProvider::default(),
            bucket: String::new(),
            base_url: "https://firebasestorage.googleapis.com".into(),
            prefix: "documents".into(),
            auth_token: None,
            local_dir: AppPaths::new().blobs_dir,
            request_timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// DatabaseConfig
// ---------------------------------------------------------------------------

/// Selects which document database keeps generation records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DatabaseProvider {
    /// Cloud Firestore over its REST API.
    Firestore,
    /// A JSON file on the local filesystem.
    Local,
}

impl Default for DatabaseProvider {
    fn default() -> Self {
        Self::Local
    }
}

/// Settings for the record database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Which backend to use.
    pub provider: DatabaseProvider,
    /// Firestore project id.
    pub project_id: String,
    /// Web API key appended as `?key=`; `None` for emulators.
    pub api_key: Option<String>,
    /// Collection holding one document per generation record.
    pub collection: String,
    /// Firestore REST base URL.
    pub base_url: String,
    /// Documents requested per list page.
    pub page_size: u32,
    /// Path of the local provider's JSON file.
    pub local_file: PathBuf,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            provider: DatabaseProvider::default(),
            project_id: String::new(),
            api_key: None,
            collection: "podcasts".into(),
            base_url: "https://firestore.googleapis.com".into(),
            page_size: 300,
            local_file: AppPaths::new().records_file,
            request_timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use doc_to_podcast::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Processing backend settings.
    pub backend: BackendConfig,
    /// Blob store settings.
    pub storage: StorageConfig,
    /// Record database settings.
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
