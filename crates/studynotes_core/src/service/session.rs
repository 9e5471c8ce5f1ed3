//! Client session: the three collection caches plus PDF pipelines.
//!
//! # Responsibility
//! - Own one cache per entity kind and one pipeline per PDF id.
//! - Route pipeline results back into the PDF cache.
//!
//! # Invariants
//! - Pipelines are looked up and cloned out of the registry before awaiting.
//! - Deleting a PDF drops its pipeline only when the delete is confirmed.
//! - An open pipeline is never replaced; a later registration for the same id
//!   returns the existing one.
//! - Nothing outlives the session.

use crate::api::Backend;
use crate::model::note::Note;
use crate::model::pdf::{PdfId, PdfRecord, PdfUpload};
use crate::model::validation::ValidationError;
use crate::service::event_service::EventService;
use crate::service::note_service::NoteService;
use crate::service::pdf_service::PdfService;
use crate::service::pipeline::{PdfPipeline, PipelineError};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

pub struct Session<B: Backend> {
    backend: Arc<B>,
    notes: NoteService<B>,
    pdfs: PdfService<B>,
    events: EventService<B>,
    pipelines: RefCell<BTreeMap<PdfId, Rc<PdfPipeline>>>,
}

impl<B: Backend> Session<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            notes: NoteService::new(Arc::clone(&backend)),
            pdfs: PdfService::new(Arc::clone(&backend)),
            events: EventService::new(Arc::clone(&backend)),
            pipelines: RefCell::new(BTreeMap::new()),
            backend,
        }
    }

    pub fn notes(&self) -> &NoteService<B> {
        &self.notes
    }

    pub fn pdfs(&self) -> &PdfService<B> {
        &self.pdfs
    }

    pub fn events(&self) -> &EventService<B> {
        &self.events
    }

    pub fn pipeline(&self, pdf_id: &str) -> Option<Rc<PdfPipeline>> {
        self.pipelines.borrow().get(pdf_id).cloned()
    }

    /// Uploads a PDF and opens its pipeline at `Uploaded`.
    ///
    /// `Ok(None)` means the upload call failed; see `pdfs().error()`.
    pub async fn upload_pdf(
        &self,
        upload: PdfUpload,
    ) -> Result<Option<Rc<PdfPipeline>>, ValidationError> {
        let record = self.pdfs.upload(upload).await?;
        Ok(record.map(|record| self.register(record)))
    }

    /// Returns the pipeline for a PDF, fetching the record when none is open.
    pub async fn open_pipeline(&self, pdf_id: &str) -> Option<Rc<PdfPipeline>> {
        if let Some(pipeline) = self.pipeline(pdf_id) {
            return Some(pipeline);
        }
        let record = self.pdfs.get(pdf_id).await?;
        Some(self.register(record))
    }

    pub async fn extract(&self, pdf_id: &str) -> Result<bool, PipelineError> {
        let pipeline = self.require(pdf_id)?;
        let applied = pipeline.extract(self.backend.as_ref()).await?;
        if applied {
            self.sync_record(&pipeline.record());
        }
        Ok(applied)
    }

    pub async fn summarize(&self, pdf_id: &str) -> Result<bool, PipelineError> {
        let pipeline = self.require(pdf_id)?;
        let applied = pipeline.summarize(self.backend.as_ref()).await?;
        if applied {
            self.sync_record(&pipeline.record());
        }
        Ok(applied)
    }

    /// Creates a note from the PDF summary; the note list needs a refresh to
    /// show it.
    pub async fn add_to_notes(&self, pdf_id: &str) -> Result<Option<Note>, PipelineError> {
        let pipeline = self.require(pdf_id)?;
        pipeline.add_to_notes(&self.notes).await
    }

    pub async fn delete_pdf(&self, pdf_id: &str) -> bool {
        let deleted = self.pdfs.delete(pdf_id).await;
        if deleted {
            self.pipelines.borrow_mut().remove(pdf_id);
        }
        deleted
    }

    fn register(&self, record: PdfRecord) -> Rc<PdfPipeline> {
        let mut pipelines = self.pipelines.borrow_mut();
        let pipeline = pipelines
            .entry(record.id.clone())
            .or_insert_with(|| Rc::new(PdfPipeline::new(record)));
        Rc::clone(pipeline)
    }

    fn require(&self, pdf_id: &str) -> Result<Rc<PdfPipeline>, PipelineError> {
        self.pipeline(pdf_id)
            .ok_or_else(|| PipelineError::UnknownPdf(pdf_id.to_string()))
    }

    fn sync_record(&self, record: &PdfRecord) {
        self.pdfs.patch(&record.id, |cached| {
            cached.extracted_text = record.extracted_text.clone();
            cached.summary = record.summary.clone();
        });
    }
}
