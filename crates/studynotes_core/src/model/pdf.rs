//! Uploaded PDF record and pipeline payloads.
//!
//! # Invariants
//! - `extracted_text` is only set by a confirmed extract call.
//! - `summary` is only set by a confirmed summarize call.

use crate::model::timestamp;
use crate::model::validation::{validate_upload, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Backend-assigned PDF identifier.
pub type PdfId = String;

/// PDF as known to the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfRecord {
    pub id: PdfId,
    #[serde(default)]
    pub filename: String,
    /// Falls back to receipt time when the upload response omits it.
    #[serde(default = "Utc::now", with = "timestamp")]
    pub uploaded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    #[serde(default, alias = "summarized", skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl PdfRecord {
    /// Note title used when the summary is added to notes.
    ///
    /// The filename with a trailing `.pdf` (any case) removed.
    pub fn note_title(&self) -> String {
        let name = self.filename.trim();
        let lower = name.to_ascii_lowercase();
        match lower.strip_suffix(".pdf") {
            Some(stem) if !stem.is_empty() => name[..stem.len()].to_string(),
            _ => name.to_string(),
        }
    }
}

/// Response of the extract stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedText {
    pub extracted_text: String,
}

/// Response of the summarize stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfSummary {
    #[serde(rename = "summarized", alias = "summary")]
    pub summary: String,
}

/// File selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl PdfUpload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_upload(&self.filename, &self.bytes)
    }
}
