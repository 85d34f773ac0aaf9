//! Configuration module.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the processing
//! backend, blob storage and record database, `AppPaths` for cross-platform
//! data directories, and TOML persistence via `AppConfig::load` /
//! `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    AppConfig, BackendConfig, DatabaseConfig, DatabaseProvider, StorageConfig, StorageProvider,
};
