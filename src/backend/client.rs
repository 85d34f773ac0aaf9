//! `DocumentProcessor` trait and its HTTP implementation.
//!
//! `HttpProcessingClient` posts the raw document as `multipart/form-data`
//! (field `file`) to the backend's upload endpoint. Connection details and
//! the timeout come from [`BackendConfig`]; nothing is hardcoded.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use thiserror::Error;

use crate::backend::response::{self, ProcessedDocument};
use crate::config::BackendConfig;
use crate::file::SelectedFile;

// ---------------------------------------------------------------------------
// ProcessingError
// ---------------------------------------------------------------------------

/// Errors that can occur while processing a document.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// No response was received: connection refused, DNS, reset.
    #[error("processing backend unreachable: {0}")]
    Unreachable(String),

    /// The request did not complete within the configured timeout.
    #[error("processing backend timed out")]
    Timeout,

    /// The backend answered with a non-success status.
    #[error("processing backend returned HTTP {status}")]
    Server { status: u16, detail: Option<String> },

    /// Success status, but the body is missing or misusing required fields.
    #[error("invalid response from processing backend: {0}")]
    ResponseShape(String),
}

impl ProcessingError {
    /// `true` for the two "never got an answer" variants.
    pub fn is_network(&self) -> bool {
        matches!(self, ProcessingError::Unreachable(_) | ProcessingError::Timeout)
    }
}

impl From<reqwest::Error> for ProcessingError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProcessingError::Timeout
        } else {
            ProcessingError::Unreachable(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// DocumentProcessor trait
// ---------------------------------------------------------------------------

/// Async trait for turning a document into summary, script and audio.
///
/// Implementors must be `Send + Sync` so they can be held behind
/// `Arc<dyn DocumentProcessor>`. Implementations never retry.
#[async_trait]
pub trait DocumentProcessor: Send + Sync {
    async fn process(&self, file: &SelectedFile) -> Result<ProcessedDocument, ProcessingError>;
}

// ---------------------------------------------------------------------------
// HttpProcessingClient
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

/// Talks to the processing backend over HTTP.
pub struct HttpProcessingClient {
    client: reqwest::Client,
    base_url: String,
    upload_url: String,
}

impl HttpProcessingClient {
    /// Build a client from config. The HTTP client carries the configured
    /// timeout, which bounds the whole request including the body read.
    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(
            &config.base_url,
            config.upload_url(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn new(base_url: &str, upload_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            upload_url: upload_url.into(),
        }
    }

    /// `GET {base_url}/` and confirm the backend reports itself healthy.
    /// Returns the backend's message.
    pub async fn health_check(&self) -> Result<String, ProcessingError> {
        let response = self.client.get(format!("{}/", self.base_url)).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(ProcessingError::Server {
                status: status.as_u16(),
                detail: response::server_detail(&body),
            });
        }

        let health: HealthResponse = serde_json::from_slice(&body)
            .map_err(|e| ProcessingError::ResponseShape(e.to_string()))?;

        if health.status != "healthy" {
            return Err(ProcessingError::ResponseShape(format!(
                "backend reports status `{}`",
                health.status
            )));
        }
        Ok(health.message.unwrap_or_default())
    }
}

/// The multipart part for `file`. An unparseable declared type is dropped
/// rather than failing the request.
fn file_part(file: &SelectedFile) -> Part {
    let part = || Part::bytes(file.bytes().to_vec()).file_name(file.name().to_string());
    match file.content_type() {
        Some(ct) => part().mime_str(ct).unwrap_or_else(|_| part()),
        None => part(),
    }
}

#[async_trait]
impl DocumentProcessor for HttpProcessingClient {
    async fn process(&self, file: &SelectedFile) -> Result<ProcessedDocument, ProcessingError> {
        let form = Form::new().part("file", file_part(file));

        log::debug!(
            "backend: sending {} ({} MB) to {}",
            file.name(),
            file.size_mb(),
            self.upload_url
        );

        let response = self.client.post(&self.upload_url).multipart(form).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let detail = response::server_detail(&body);
            log::debug!("backend: HTTP {status}, detail = {detail:?}");
            return Err(ProcessingError::Server {
                status: status.as_u16(),
                detail,
            });
        }

        let processed = response::parse_success(&body)?;
        if let Some(message) = &processed.message {
            log::info!("backend: {message}");
        }
        Ok(processed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
