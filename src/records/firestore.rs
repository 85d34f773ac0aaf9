//! Cloud Firestore over its REST API (v1).
//!
//! * add:  `POST {base}/v1/projects/{p}/databases/(default)/documents/{c}`
//!   with `{"fields": {...}}`; the new id is the last segment of the
//!   returned `name`.
//! * list: `GET` on the same URL with `pageSize`, following
//!   `nextPageToken` until the collection is exhausted.
//!
//! Firestore wraps every value in a typed envelope (`stringValue`,
//! `integerValue`, `mapValue`, …); [`encode_value`] / [`decode_value`]
//! translate to and from plain JSON.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::config::DatabaseConfig;
use crate::records::document::{Document, DocumentStore, PersistenceError, StoredDocument};

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,
    next_page_token: Option<String>,
}

pub struct Firestore {
    client: reqwest::Client,
    base_url: String,
    project_id: String,
    api_key: Option<String>,
    page_size: u32,
}

impl Firestore {
    pub fn from_config(config: &DatabaseConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            page_size: config.page_size.max(1),
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents/{}",
            self.base_url, self.project_id, collection
        )
    }

    fn with_key(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.query(&[("key", key)]),
            None => req,
        }
    }

    /// Turn a non-success response into the matching error.
    async fn failure(response: reqwest::Response) -> PersistenceError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        log::debug!("records: database answered {status}: {body}");

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PersistenceError::PermissionDenied {
                status: status.as_u16(),
            },
            _ => PersistenceError::Rejected {
                status: status.as_u16(),
                message: serde_json::from_str::<Value>(&body)
                    .ok()
                    .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
                    .unwrap_or_else(|| body.trim().to_string()),
            },
        }
    }
}

#[async_trait]
impl DocumentStore for Firestore {
    async fn add(&self, collection: &str, document: Document) -> Result<String, PersistenceError> {
        let body = json!({ "fields": encode_fields(document) });
        let req = self.with_key(self.client.post(self.collection_url(collection)));

        let response = req.json(&body).send().await?;
        if !response.status().is_success() {
            return Err(Self::failure(response).await);
        }

        let created: FirestoreDocument = response
            .json()
            .await
            .map_err(|e| PersistenceError::InvalidResponse(e.to_string()))?;

        document_id(&created.name)
            .map(str::to_string)
            .ok_or_else(|| PersistenceError::InvalidResponse(format!("bad document name `{}`", created.name)))
    }

    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, PersistenceError> {
        let url = self.collection_url(collection);
        let page_size = self.page_size.to_string();
        let mut page_token: Option<String> = None;
        let mut documents = Vec::new();

        loop {
            let mut req = self
                .with_key(self.client.get(&url))
                .query(&[("pageSize", page_size.as_str())]);
            if let Some(token) = &page_token {
                req = req.query(&[("pageToken", token.as_str())]);
            }

            let response = req.send().await?;
            if !response.status().is_success() {
                return Err(Self::failure(response).await);
            }

            let page: ListResponse = response
                .json()
                .await
                .map_err(|e| PersistenceError::InvalidResponse(e.to_string()))?;

            for doc in page.documents {
                let Some(id) = document_id(&doc.name) else {
                    log::warn!("records: ignoring document with bad name `{}`", doc.name);
                    continue;
                };
                documents.push(StoredDocument {
                    id: id.to_string(),
                    fields: decode_fields(doc.fields),
                });
            }

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(documents)
    }
}

/// `projects/p/databases/(default)/documents/podcasts/AbC123` → `AbC123`.
fn document_id(name: &str) -> Option<&str> {
    name.rsplit('/').next().filter(|id| !id.is_empty())
}

// ---------------------------------------------------------------------------
// Value codec
// ---------------------------------------------------------------------------

fn encode_fields(fields: Document) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(k, v)| (k, encode_value(v)))
        .collect()
}

fn decode_fields(fields: Map<String, Value>) -> Document {
    fields
        .into_iter()
        .map(|(k, v)| (k, decode_value(v)))
        .collect()
}

/// Plain JSON → Firestore typed value.
pub(crate) fn encode_value(value: Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            // int64 travels as a decimal string
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.into_iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Firestore typed value → plain JSON. Timestamps and references come back
/// as their string form; unknown envelopes become `null`.
pub(crate) fn decode_value(value: Value) -> Value {
    let Value::Object(mut envelope) = value else {
        return Value::Null;
    };

    if let Some(s) = envelope.remove("stringValue") {
        return s;
    }
    if let Some(b) = envelope.remove("booleanValue") {
        return b;
    }
    if let Some(i) = envelope.remove("integerValue") {
        return match &i {
            Value::String(s) => s.parse::<i64>().map(Value::from).unwrap_or(i),
            _ => i,
        };
    }
    if let Some(d) = envelope.remove("doubleValue") {
        return d;
    }
    if let Some(t) = envelope.remove("timestampValue") {
        return t;
    }
    if let Some(r) = envelope.remove("referenceValue") {
        return r;
    }
    if let Some(Value::Object(mut array)) = envelope.remove("arrayValue") {
        let values = match array.remove("values") {
            Some(Value::Array(values)) => values.into_iter().map(decode_value).collect(),
            _ => Vec::new(),
        };
        return Value::Array(values);
    }
    if let Some(Value::Object(mut map)) = envelope.remove("mapValue") {
        return match map.remove("fields") {
            Some(Value::Object(fields)) => Value::Object(decode_fields(fields)),
            _ => Value::Object(Map::new()),
        };
    }
    Value::Null
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
