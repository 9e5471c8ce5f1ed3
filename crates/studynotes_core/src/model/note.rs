//! Note record and edit payload.
//!
//! # Responsibility
//! - Mirror one remote note with structured content.
//! - Carry create/update payloads and their validation.
//!
//! # Invariants
//! - `id` is assigned by the backend and immutable once assigned.
//! - A note is only changed through a confirmed update.

use crate::model::document::Doc;
use crate::model::projection::{derive_preview, lift, project};
use crate::model::timestamp;
use crate::model::validation::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Backend-assigned note identifier.
pub type NoteId = String;

/// Note as confirmed by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Serialized as `note_id` to match the store's key name.
    #[serde(rename = "note_id", alias = "id")]
    pub id: NoteId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: Doc,
    /// Falls back to receipt time when the store omits it.
    #[serde(default = "Utc::now", with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Lossy flat text of the note body.
    pub fn plain_text(&self) -> String {
        project(&self.content)
    }

    /// Single-line body preview for list views.
    pub fn preview(&self) -> Option<String> {
        derive_preview(&self.content)
    }
}

/// Title + content submitted on create/update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: Doc,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: Doc) -> Self {
        Self {
            title: title.into(),
            content,
        }
    }

    /// Builds a draft from the flat-text editing surface.
    ///
    /// The body is lifted into a single paragraph; any structure the note had
    /// before is gone once this draft is saved.
    pub fn from_plain_text(title: impl Into<String>, text: &str) -> Self {
        Self::new(title, lift(text))
    }

    /// Rejects drafts with no title and no text.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() && self.content.is_blank() {
            return Err(ValidationError::EmptyNote);
        }
        Ok(())
    }

    /// Whether saving this draft over `note` would change nothing.
    pub fn matches(&self, note: &Note) -> bool {
        self.title == note.title && self.content == note.content
    }
}

#[cfg(test)]
mod tests {
    use super::{Note, NoteDraft};
    use crate::model::document::Doc;
    use crate::model::validation::ValidationError;
    use serde_json::json;

    #[test]
    fn decodes_store_item_with_naive_timestamp() {
        let note: Note = serde_json::from_value(json!({
            "note_id": "n-1",
            "title": "Groceries",
            "content": {"type": "doc", "content": [
                {"type": "paragraph", "content": [{"type": "text", "text": "milk,eggs"}]}
            ]},
            "created_at": "2024-05-01T10:00:00.000001"
        }))
        .unwrap();

        assert_eq!(note.id, "n-1");
        assert_eq!(note.plain_text(), "milk,eggs");
        assert_eq!(note.preview().as_deref(), Some("milk,eggs"));
    }

    #[test]
    fn missing_content_decodes_as_empty_doc() {
        let note: Note = serde_json::from_value(json!({
            "id": "n-2",
            "created_at": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(note.content, Doc::empty());
        assert_eq!(note.title, "");
    }

    #[test]
    fn draft_validation_needs_title_or_text() {
        assert_eq!(
            NoteDraft::new(" ", Doc::empty()).validate(),
            Err(ValidationError::EmptyNote)
        );
        assert_eq!(NoteDraft::new("t", Doc::empty()).validate(), Ok(()));
        assert_eq!(NoteDraft::from_plain_text("", "body").validate(), Ok(()));
    }
}
