//! REST implementation of the backend contract.
//!
//! # Responsibility
//! - Map each backend operation onto the store's HTTP routes.
//! - Derive one readable message from any failed response.
//!
//! # Invariants
//! - Every request carries a fresh `x-request-id` used in log lines.
//! - Note bodies and PDF text are never logged.
//! - No retries; the client timeout is the only transport budget.

use crate::api::{Backend, OpResult, OperationError};
use crate::config::ClientConfig;
use crate::model::document::Doc;
use crate::model::event::{Event, EventDraft};
use crate::model::note::{Note, NoteDraft};
use crate::model::pdf::{ExtractedText, PdfRecord, PdfSummary, PdfUpload};
use crate::model::timestamp;
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";
const PDF_FORM_FIELD: &str = "pdf";
const PDF_MIME: &str = "application/pdf";
const MAX_ERROR_BODY_CHARS: usize = 200;

/// `reqwest`-backed store client.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Builds a client from validated configuration.
    pub fn new(config: &ClientConfig) -> OpResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| {
                OperationError::new(format!("failed to create HTTP client: {err}"))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        op: &'static str,
        request: RequestBuilder,
    ) -> OpResult<T> {
        let response = self.dispatch(op, request).await?;
        response.json::<T>().await.map_err(|err| {
            warn!("event=backend_call module=api status=error op={op} reason=decode");
            OperationError::new(format!("unexpected response from {op}: {err}"))
        })
    }

    async fn send_empty(&self, op: &'static str, request: RequestBuilder) -> OpResult<()> {
        self.dispatch(op, request).await.map(|_| ())
    }

    async fn dispatch(
        &self,
        op: &'static str,
        request: RequestBuilder,
    ) -> OpResult<reqwest::Response> {
        let request_id = Uuid::new_v4();
        let response = request
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .send()
            .await
            .map_err(|err| {
                warn!(
                    "event=backend_call module=api status=error op={op} request_id={request_id} reason=transport"
                );
                OperationError::from(err)
            })?;

        let status = response.status();
        if status.is_success() {
            debug!(
                "event=backend_call module=api status=ok op={op} request_id={request_id} http_status={}",
                status.as_u16()
            );
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(
            "event=backend_call module=api status=error op={op} request_id={request_id} http_status={}",
            status.as_u16()
        );
        Err(OperationError::new(error_message(status, &body)))
    }
}

/// Extracts the failure message from a non-2xx response.
///
/// Order: JSON `error`, then JSON `message`, then the raw body (capped), then
/// the status line.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    let trimmed = body.trim();
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        for key in ["error", "message"] {
            if let Some(message) = value.get(key).and_then(|field| field.as_str()) {
                if !message.trim().is_empty() {
                    return message.trim().to_string();
                }
            }
        }
    } else if !trimmed.is_empty() {
        let mut message = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect::<String>();
        if trimmed.chars().count() > MAX_ERROR_BODY_CHARS {
            message.push_str("...");
        }
        return message;
    }
    status.to_string()
}

#[derive(Deserialize)]
struct NotesEnvelope {
    #[serde(default)]
    notes: Vec<Note>,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// Note write response. The store may answer with only an acknowledgement
/// (`{"message": ..., "note_id": ...}`); missing fields come from the draft.
#[derive(Deserialize)]
struct NoteEcho {
    #[serde(default, alias = "id")]
    note_id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<Doc>,
    #[serde(default)]
    created_at: Option<String>,
}

impl NoteEcho {
    fn into_note(self, fallback_id: Option<&str>, draft: &NoteDraft) -> OpResult<Note> {
        let id = self
            .note_id
            .or_else(|| fallback_id.map(str::to_string))
            .ok_or_else(|| OperationError::new("store response is missing `note_id`"))?;
        let created_at = match self.created_at.as_deref() {
            Some(raw) => timestamp::parse(raw).map_err(OperationError::new)?,
            None => Utc::now(),
        };
        Ok(Note {
            id,
            title: self.title.unwrap_or_else(|| draft.title.clone()),
            content: self.content.unwrap_or_else(|| draft.content.clone()),
            created_at,
        })
    }
}

#[derive(Serialize)]
struct NoteUpdateBody<'a> {
    note_id: &'a str,
    title: &'a str,
    content: &'a Doc,
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_notes(&self) -> OpResult<Vec<Note>> {
        let envelope: NotesEnvelope = self
            .send("list_notes", self.client.get(self.url("/notes")))
            .await?;
        Ok(envelope.notes)
    }

    async fn get_note(&self, id: &str) -> OpResult<Note> {
        self.send(
            "get_note",
            self.client.get(self.url("/note")).query(&[("note_id", id)]),
        )
        .await
    }

    async fn create_note(&self, draft: &NoteDraft) -> OpResult<Note> {
        let echo: NoteEcho = self
            .send(
                "create_note",
                self.client.post(self.url("/summarize")).json(draft),
            )
            .await?;
        echo.into_note(None, draft)
    }

    async fn update_note(&self, id: &str, draft: &NoteDraft) -> OpResult<Note> {
        let body = NoteUpdateBody {
            note_id: id,
            title: &draft.title,
            content: &draft.content,
        };
        let echo: NoteEcho = self
            .send("update_note", self.client.put(self.url("/note")).json(&body))
            .await?;
        echo.into_note(Some(id), draft)
    }

    async fn delete_note(&self, id: &str) -> OpResult<()> {
        self.send_empty(
            "delete_note",
            self.client.delete(self.url("/note")).query(&[("note_id", id)]),
        )
        .await
    }

    async fn upload_pdf(&self, upload: &PdfUpload) -> OpResult<PdfRecord> {
        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.filename.clone())
            .mime_str(PDF_MIME)?;
        let form = Form::new().part(PDF_FORM_FIELD, part);
        let mut record: PdfRecord = self
            .send(
                "upload_pdf",
                self.client.post(self.url("/upload-pdf")).multipart(form),
            )
            .await?;
        if record.filename.is_empty() {
            record.filename = upload.filename.clone();
        }
        Ok(record)
    }

    async fn list_pdfs(&self) -> OpResult<Vec<PdfRecord>> {
        self.send("list_pdfs", self.client.get(self.url("/pdfs")))
            .await
    }

    async fn get_pdf(&self, id: &str) -> OpResult<PdfRecord> {
        let envelope: DataEnvelope<PdfRecord> = self
            .send(
                "get_pdf",
                self.client.get(self.url("/pdf")).query(&[("pdf_id", id)]),
            )
            .await?;
        Ok(envelope.data)
    }

    async fn delete_pdf(&self, id: &str) -> OpResult<()> {
        self.send_empty(
            "delete_pdf",
            self.client.delete(self.url("/pdf")).query(&[("pdf_id", id)]),
        )
        .await
    }

    async fn extract_pdf(&self, id: &str) -> OpResult<ExtractedText> {
        self.send(
            "extract_pdf",
            self.client
                .post(self.url("/pdf/extract"))
                .query(&[("pdf_id", id)]),
        )
        .await
    }

    async fn summarize_pdf(&self, id: &str) -> OpResult<PdfSummary> {
        self.send(
            "summarize_pdf",
            self.client
                .post(self.url("/pdf/summarize"))
                .query(&[("pdf_id", id)]),
        )
        .await
    }

    async fn create_event(&self, draft: &EventDraft) -> OpResult<Event> {
        self.send(
            "create_event",
            self.client.post(self.url("/schedule-event")).json(draft),
        )
        .await
    }

    async fn list_events(&self) -> OpResult<Vec<Event>> {
        self.send("list_events", self.client.get(self.url("/events")))
            .await
    }

    async fn delete_event(&self, id: &str) -> OpResult<()> {
        let path = format!("/events/{}", urlencoding::encode(id));
        self.send_empty("delete_event", self.client.delete(self.url(&path)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::error_message;
    use reqwest::StatusCode;

    #[test]
    fn error_message_prefers_error_then_message_then_body() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"error":"No text provided."}"#),
            "No text provided."
        );
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, r#"{"message":"Note not found"}"#),
            "Note not found"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "upstream down"),
            "upstream down"
        );
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, ""),
            "500 Internal Server Error"
        );
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, r#"{"detail":1}"#),
            "500 Internal Server Error"
        );
    }

    #[test]
    fn error_message_caps_raw_bodies() {
        let body = "x".repeat(500);
        let message = error_message(StatusCode::BAD_GATEWAY, &body);
        assert!(message.ends_with("..."));
        assert_eq!(message.chars().count(), 203);
    }
}
