//! Remote store collaborator contract.
//!
//! # Responsibility
//! - Define the logical operations the core needs from the remote store.
//! - Collapse every transport or application failure into one error shape.
//!
//! # Invariants
//! - Implementations never retry; a retry is always a new caller command.
//! - Transport and non-2xx failures are indistinguishable to callers.
//!
//! # See also
//! - `http` for the REST implementation.

pub mod http;

use crate::model::event::{Event, EventDraft};
use crate::model::note::{Note, NoteDraft};
use crate::model::pdf::{ExtractedText, PdfRecord, PdfSummary, PdfUpload};
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use http::HttpBackend;

/// Result type for backend calls.
pub type OpResult<T> = Result<T, OperationError>;

/// Failed backend call with a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationError {
    message: String,
}

impl OperationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for OperationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "operation failed: {}", self.message)
    }
}

impl Error for OperationError {}

impl From<reqwest::Error> for OperationError {
    fn from(value: reqwest::Error) -> Self {
        Self::new(value.to_string())
    }
}

/// Logical operations offered by the remote store.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn list_notes(&self) -> OpResult<Vec<Note>>;
    async fn get_note(&self, id: &str) -> OpResult<Note>;
    async fn create_note(&self, draft: &NoteDraft) -> OpResult<Note>;
    async fn update_note(&self, id: &str, draft: &NoteDraft) -> OpResult<Note>;
    async fn delete_note(&self, id: &str) -> OpResult<()>;

    async fn upload_pdf(&self, upload: &PdfUpload) -> OpResult<PdfRecord>;
    async fn list_pdfs(&self) -> OpResult<Vec<PdfRecord>>;
    async fn get_pdf(&self, id: &str) -> OpResult<PdfRecord>;
    async fn delete_pdf(&self, id: &str) -> OpResult<()>;
    async fn extract_pdf(&self, id: &str) -> OpResult<ExtractedText>;
    async fn summarize_pdf(&self, id: &str) -> OpResult<PdfSummary>;

    async fn create_event(&self, draft: &EventDraft) -> OpResult<Event>;
    async fn list_events(&self) -> OpResult<Vec<Event>>;
    async fn delete_event(&self, id: &str) -> OpResult<()>;
}
