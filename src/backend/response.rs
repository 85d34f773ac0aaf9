//! Schema check for backend responses.
//!
//! The backend answers `{id, summary, podcast_script, audio_path, message?}`.
//! Nothing downstream sees the raw JSON: either every required field is
//! present and usable and a [`ProcessedDocument`] comes out, or the response
//! is rejected as [`ProcessingError::ResponseShape`].

use serde::Deserialize;

use crate::backend::client::ProcessingError;

/// The validated output of one processing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedDocument {
    /// Backend-side identifier, opaque to this crate.
    pub backend_id: String,
    pub summary: String,
    pub podcast_script: String,
    /// Location of the generated audio.
    pub audio_path: String,
    /// Informational text from the backend, if any.
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    id: Option<String>,
    summary: Option<String>,
    podcast_script: Option<String>,
    audio_path: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Parse and validate a success-status body.
pub(crate) fn parse_success(body: &[u8]) -> Result<ProcessedDocument, ProcessingError> {
    let raw: RawResponse = serde_json::from_slice(body)
        .map_err(|e| ProcessingError::ResponseShape(format!("body is not the expected JSON: {e}")))?;

    let backend_id = required(raw.id, "id")?;
    let summary = required(raw.summary, "summary")?;
    let podcast_script = required(raw.podcast_script, "podcast_script")?;
    let audio_path = raw
        .audio_path
        .ok_or_else(|| ProcessingError::ResponseShape("missing field `audio_path`".into()))?;

    Ok(ProcessedDocument {
        backend_id,
        summary,
        podcast_script,
        audio_path,
        message: raw.message,
    })
}

fn required(value: Option<String>, field: &str) -> Result<String, ProcessingError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        Some(_) => Err(ProcessingError::ResponseShape(format!("field `{field}` is empty"))),
        None => Err(ProcessingError::ResponseShape(format!("missing field `{field}`"))),
    }
}

/// Extract the server's explanation from an error body.
///
/// FastAPI-style `{"detail": "..."}` wins; a structured `detail` is rendered
/// as compact JSON; a non-JSON body is used verbatim. Empty means `None`.
pub(crate) fn server_detail(body: &[u8]) -> Option<String> {
    let detail = match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(json) => match json.get("detail") {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        },
        Err(_) => {
            let text = String::from_utf8_lossy(body).trim().to_string();
            Some(text)
        }
    };
    detail.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn shape_message(body: &str) -> String {
        match parse_success(body.as_bytes()).unwrap_err() {
            ProcessingError::ResponseShape(msg) => msg,
            other => panic!("expected ResponseShape, got {other:?}"),
        }
    }

    #[test]
    fn full_response_is_accepted() {
        let body = r#"{"id":"abc","summary":"S","podcast_script":"P","audio_path":"https://x/a.mp3","message":"done"}"#;
        let doc = parse_success(body.as_bytes()).expect("valid");
        assert_eq!(
            doc,
            ProcessedDocument {
                backend_id: "abc".into(),
                summary: "S".into(),
                podcast_script: "P".into(),
                audio_path: "https://x/a.mp3".into(),
                message: Some("done".into()),
            }
        );
    }

    #[test]
    fn message_is_optional() {
        let body = r#"{"id":"abc","summary":"S","podcast_script":"P","audio_path":"audio_outputs/podcast_1.mp3"}"#;
        let doc = parse_success(body.as_bytes()).expect("valid");
        assert_eq!(doc.message, None);
        assert_eq!(doc.audio_path, "audio_outputs/podcast_1.mp3");
    }

    #[test]
    fn missing_summary_is_rejected() {
        let msg = shape_message(r#"{"id":"abc","podcast_script":"P","audio_path":"a"}"#);
        assert_eq!(msg, "missing field `summary`");
    }

    #[test]
    fn empty_script_is_rejected() {
        let msg = shape_message(r#"{"id":"abc","summary":"S","podcast_script":"  ","audio_path":"a"}"#);
        assert_eq!(msg, "field `podcast_script` is empty");
    }

    #[test]
    fn null_id_is_rejected() {
        let msg = shape_message(r#"{"id":null,"summary":"S","podcast_script":"P","audio_path":"a"}"#);
        assert_eq!(msg, "missing field `id`");
    }

    #[test]
    fn missing_audio_path_is_rejected() {
        let msg = shape_message(r#"{"id":"abc","summary":"S","podcast_script":"P"}"#);
        assert_eq!(msg, "missing field `audio_path`");
    }

    #[test]
    fn wrong_field_type_is_rejected() {
        let msg = shape_message(r#"{"id":7,"summary":"S","podcast_script":"P","audio_path":"a"}"#);
        assert!(msg.starts_with("body is not the expected JSON"));
    }

    #[test]
    fn html_body_is_rejected() {
        let msg = shape_message("<html>proxy error</html>");
        assert!(msg.starts_with("body is not the expected JSON"));
    }

    #[test]
    fn detail_string_is_extracted() {
        let detail = server_detail(br#"{"detail":"Only PDF and TXT files are allowed"}"#);
        assert_eq!(detail.as_deref(), Some("Only PDF and TXT files are allowed"));
    }

    #[test]
    fn structured_detail_is_rendered_as_json() {
        let detail = server_detail(br#"{"detail":[{"loc":["body","file"],"msg":"field required"}]}"#);
        assert_eq!(
            detail.as_deref(),
            Some(r#"[{"loc":["body","file"],"msg":"field required"}]"#)
        );
    }

    #[test]
    fn plain_text_body_is_used_verbatim() {
        assert_eq!(
            server_detail(b"Internal Server Error\n").as_deref(),
            Some("Internal Server Error")
        );
    }

    #[test]
    fn empty_or_detail_less_bodies_have_no_detail() {
        assert_eq!(server_detail(b""), None);
        assert_eq!(server_detail(br#"{"error":"x"}"#), None);
        assert_eq!(server_detail(br#"{"detail":""}"#), None);
    }
}
