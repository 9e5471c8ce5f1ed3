//! Scripted in-process backend for service-level tests.
//!
//! Each operation pops its next response from a per-operation queue at call
//! time. A gated call then waits until its sender fires, which lets tests
//! control the order in which responses land.

#![allow(dead_code)]

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use studynotes_core::{
    Backend, Event, EventDraft, ExtractedText, Note, NoteDraft, OpResult, OperationError,
    PdfRecord, PdfSummary, PdfUpload,
};
use tokio::sync::oneshot;

type Scripted = Result<Value, String>;

#[derive(Default)]
struct Script {
    responses: HashMap<&'static str, VecDeque<Scripted>>,
    gates: HashMap<&'static str, VecDeque<oneshot::Receiver<()>>>,
    calls: HashMap<&'static str, usize>,
    note_drafts: Vec<NoteDraft>,
}

#[derive(Default)]
pub struct ScriptedBackend {
    script: Mutex<Script>,
}

impl ScriptedBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_ok(&self, op: &'static str, value: Value) {
        self.push(op, Ok(value));
    }

    pub fn push_err(&self, op: &'static str, message: &str) {
        self.push(op, Err(message.to_string()));
    }

    /// Holds the next call to `op` until the returned sender fires.
    pub fn gate(&self, op: &'static str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.lock().gates.entry(op).or_default().push_back(rx);
        tx
    }

    pub fn calls(&self, op: &'static str) -> usize {
        self.lock().calls.get(op).copied().unwrap_or(0)
    }

    /// Drafts submitted through `create_note`, in call order.
    pub fn note_drafts(&self) -> Vec<NoteDraft> {
        self.lock().note_drafts.clone()
    }

    fn push(&self, op: &'static str, response: Scripted) {
        self.lock().responses.entry(op).or_default().push_back(response);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap()
    }

    async fn respond<T: DeserializeOwned>(&self, op: &'static str) -> OpResult<T> {
        let (response, gate) = {
            let mut script = self.lock();
            *script.calls.entry(op).or_default() += 1;
            let response = script.responses.get_mut(op).and_then(VecDeque::pop_front);
            let gate = script.gates.get_mut(op).and_then(VecDeque::pop_front);
            (response, gate)
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        match response {
            Some(Ok(value)) => serde_json::from_value(value)
                .map_err(|err| OperationError::new(format!("bad scripted {op}: {err}"))),
            Some(Err(message)) => Err(OperationError::new(message)),
            None => Err(OperationError::new(format!("no scripted response for {op}"))),
        }
    }

    async fn respond_empty(&self, op: &'static str) -> OpResult<()> {
        self.respond::<Value>(op).await.map(|_| ())
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn list_notes(&self) -> OpResult<Vec<Note>> {
        self.respond("list_notes").await
    }

    async fn get_note(&self, _id: &str) -> OpResult<Note> {
        self.respond("get_note").await
    }

    async fn create_note(&self, draft: &NoteDraft) -> OpResult<Note> {
        self.lock().note_drafts.push(draft.clone());
        self.respond("create_note").await
    }

    async fn update_note(&self, _id: &str, _draft: &NoteDraft) -> OpResult<Note> {
        self.respond("update_note").await
    }

    async fn delete_note(&self, _id: &str) -> OpResult<()> {
        self.respond_empty("delete_note").await
    }

    async fn upload_pdf(&self, _upload: &PdfUpload) -> OpResult<PdfRecord> {
        self.respond("upload_pdf").await
    }

    async fn list_pdfs(&self) -> OpResult<Vec<PdfRecord>> {
        self.respond("list_pdfs").await
    }

    async fn get_pdf(&self, _id: &str) -> OpResult<PdfRecord> {
        self.respond("get_pdf").await
    }

    async fn delete_pdf(&self, _id: &str) -> OpResult<()> {
        self.respond_empty("delete_pdf").await
    }

    async fn extract_pdf(&self, _id: &str) -> OpResult<ExtractedText> {
        self.respond("extract_pdf").await
    }

    async fn summarize_pdf(&self, _id: &str) -> OpResult<PdfSummary> {
        self.respond("summarize_pdf").await
    }

    async fn create_event(&self, _draft: &EventDraft) -> OpResult<Event> {
        self.respond("create_event").await
    }

    async fn list_events(&self) -> OpResult<Vec<Event>> {
        self.respond("list_events").await
    }

    async fn delete_event(&self, _id: &str) -> OpResult<()> {
        self.respond_empty("delete_event").await
    }
}

/// Store JSON for a note with one plain paragraph.
pub fn note_json(id: &str, title: &str, text: &str) -> Value {
    serde_json::json!({
        "note_id": id,
        "title": title,
        "content": {"type": "doc", "content": [
            {"type": "paragraph", "content": [{"type": "text", "text": text}]}
        ]},
        "created_at": "2024-05-01T10:00:00"
    })
}

/// Bytes carrying the PDF signature.
pub fn pdf_bytes() -> Vec<u8> {
    b"%PDF-1.7\n%minimal\n".to_vec()
}
