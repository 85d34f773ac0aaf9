//! The unit of work product.

use serde::{Deserialize, Serialize};

/// A generation result that has not been persisted yet.
///
/// Field names serialise in camelCase (`fileName`, `podcastScript`, …),
/// which is the document layout in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    pub file_name: String,
    /// Older documents written by the backend itself have no blob URL.
    #[serde(default)]
    pub file_url: String,
    pub summary: String,
    pub podcast_script: String,
    pub audio_path: String,
    /// RFC 3339 UTC, millisecond precision. Sole history sort key.
    pub created_at: String,
    #[serde(default)]
    pub backend_id: String,
}

impl NewRecord {
    /// Attach the database-assigned id. This is the only way to obtain a
    /// [`GenerationRecord`], so every record in hand is durable.
    pub fn into_record(self, id: String) -> GenerationRecord {
        GenerationRecord {
            id,
            file_name: self.file_name,
            file_url: self.file_url,
            summary: self.summary,
            podcast_script: self.podcast_script,
            audio_path: self.audio_path,
            created_at: self.created_at,
            backend_id: self.backend_id,
        }
    }
}

/// A persisted generation result. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRecord {
    pub id: String,
    pub file_name: String,
    pub file_url: String,
    pub summary: String,
    pub podcast_script: String,
    pub audio_path: String,
    pub created_at: String,
    pub backend_id: String,
}

impl GenerationRecord {
    /// First `max_chars` characters of the summary, with `...` appended when
    /// truncated. Used by history listings.
    pub fn summary_preview(&self, max_chars: usize) -> String {
        if self.summary.chars().count() > max_chars {
            self.summary.chars().take(max_chars).collect::<String>() + "..."
        } else {
            self.summary.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn new_record() -> NewRecord {
        NewRecord {
            file_name: "doc.pdf".into(),
            file_url: "https://blobs.test/documents/1_doc.pdf".into(),
            summary: "S".into(),
            podcast_script: "P".into(),
            audio_path: "https://x/a.mp3".into(),
            created_at: "2026-10-16T09:30:00.000Z".into(),
            backend_id: "abc".into(),
        }
    }

    #[test]
    fn serialises_with_camel_case_fields() {
        let json = serde_json::to_value(new_record()).expect("serialise");
        assert_eq!(
            json,
            serde_json::json!({
                "fileName": "doc.pdf",
                "fileUrl": "https://blobs.test/documents/1_doc.pdf",
                "summary": "S",
                "podcastScript": "P",
                "audioPath": "https://x/a.mp3",
                "createdAt": "2026-10-16T09:30:00.000Z",
                "backendId": "abc"
            })
        );
    }

    #[test]
    fn into_record_keeps_every_field() {
        let record = new_record().into_record("doc-1".into());
        assert_eq!(record.id, "doc-1");
        assert_eq!(record.file_name, "doc.pdf");
        assert_eq!(record.backend_id, "abc");
        assert_eq!(record.created_at, "2026-10-16T09:30:00.000Z");
    }

    #[test]
    fn backend_written_document_decodes_without_url_or_backend_id() {
        let json = serde_json::json!({
            "fileName": "old.txt",
            "fileType": "text/plain",
            "summary": "S",
            "podcastScript": "P",
            "audioPath": "audio_outputs/podcast_1a2b3c4d.mp3",
            "status": "completed",
            "createdAt": "2025-01-01T00:00:00Z"
        });
        let record: NewRecord = serde_json::from_value(json).expect("decode");
        assert_eq!(record.file_url, "");
        assert_eq!(record.backend_id, "");
    }

    #[test]
    fn summary_preview_truncates_by_characters() {
        let mut record = new_record().into_record("x".into());
        record.summary = "สวัสดีครับ".into();
        assert_eq!(record.summary_preview(3), "สวั...");
        assert_eq!(record.summary_preview(50), "สวัสดีครับ");
    }
}
