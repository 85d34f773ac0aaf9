//! Firebase Storage over its REST API.
//!
//! Upload is a single `POST {base}/v0/b/{bucket}/o?uploadType=media&name=…`
//! with the raw bytes as the body. The response metadata carries a
//! `downloadTokens` list; the first token makes the object publicly
//! readable at `{base}/v0/b/{bucket}/o/{encoded name}?alt=media&token=…`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use crate::config::StorageConfig;
use crate::storage::blob::{BlobStore, StorageError};

/// Subset of the object metadata returned by an upload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectMetadata {
    name: String,
    download_tokens: Option<String>,
}

pub struct FirebaseStorage {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
    auth_token: Option<String>,
}

impl FirebaseStorage {
    /// Build a client from config; the HTTP client carries the configured
    /// per-request timeout.
    pub fn from_config(config: &StorageConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
            auth_token: config.auth_token.clone().filter(|t| !t.is_empty()),
        }
    }

    fn objects_url(&self) -> String {
        format!("{}/v0/b/{}/o", self.base_url, self.bucket)
    }

    /// Public download URL for `name`. The object name is a single path
    /// segment, so `/` inside it is percent-encoded.
    fn download_url(&self, name: &str, token: Option<&str>) -> Result<String, StorageError> {
        let mut url = Url::parse(&self.objects_url())
            .map_err(|e| StorageError::InvalidResponse(format!("bad storage base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| StorageError::InvalidResponse("storage base URL cannot be a base".into()))?
            .push(name);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("alt", "media");
            if let Some(token) = token {
                query.append_pair("token", token);
            }
        }
        Ok(url.into())
    }
}

#[async_trait]
impl BlobStore for FirebaseStorage {
    async fn write(
        &self,
        key: &str,
        bytes: &[u8],
        content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        let mut req = self
            .client
            .post(self.objects_url())
            .query(&[("uploadType", "media"), ("name", key)])
            .header(CONTENT_TYPE, content_type.unwrap_or("application/octet-stream"))
            .body(bytes.to_vec());

        if let Some(token) = &self.auth_token {
            req = req.header(AUTHORIZATION, format!("Firebase {token}"));
        }

        let response = req.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::debug!("storage: upload of {key} rejected with {status}: {body}");
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StorageError::Unauthorized {
                    status: status.as_u16(),
                },
                StatusCode::TOO_MANY_REQUESTS => StorageError::QuotaExceeded,
                _ => StorageError::Rejected {
                    status: status.as_u16(),
                    message: error_message(&body),
                },
            });
        }

        let meta: ObjectMetadata = response
            .json()
            .await
            .map_err(|e| StorageError::InvalidResponse(e.to_string()))?;

        let token = meta
            .download_tokens
            .as_deref()
            .and_then(|t| t.split(',').next())
            .map(str::trim)
            .filter(|t| !t.is_empty());

        self.download_url(&meta.name, token)
    }
}

/// Pull `error.message` out of a Google-style error body, else the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
