//! Per-PDF ingestion pipeline.
//!
//! # Responsibility
//! - Gate `Extract -> Summarize -> AddToNotes` on the previous step's result.
//! - Track loading and error per step.
//!
//! # Invariants
//! - The stage is derived from the confirmed record, never set directly.
//! - A rejected step changes nothing and issues no backend call.
//! - A step cannot be re-entered while it is in flight.
//! - `AddedToNotes` is terminal.
//!
//! # See also
//! - `service::session` for the registry of pipelines by PDF id.

use crate::api::Backend;
use crate::model::note::{Note, NoteDraft};
use crate::model::pdf::PdfRecord;
use crate::model::projection::lift;
use crate::model::validation::ValidationError;
use crate::service::note_service::NoteService;
use log::{info, warn};
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Ingestion stage of one PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineStage {
    Uploaded,
    Extracted,
    Summarized,
    AddedToNotes,
}

/// User-triggered pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    Extract,
    Summarize,
    AddToNotes,
}

impl PipelineStep {
    fn index(self) -> usize {
        match self {
            Self::Extract => 0,
            Self::Summarize => 1,
            Self::AddToNotes => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Extract => "extract",
            Self::Summarize => "summarize",
            Self::AddToNotes => "add_to_notes",
        }
    }
}

/// Loading flag and last error of one step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepStatus {
    pub loading: bool,
    pub error: Option<String>,
}

/// Step rejected before any backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// No pipeline is registered for the PDF id.
    UnknownPdf(String),
    /// Summarize requested before a successful extract.
    NotExtracted,
    /// Add-to-notes requested before a successful summarize.
    NotSummarized,
    /// The summary already became a note.
    AlreadyAdded,
    /// The same step is still running.
    StepInFlight(PipelineStep),
    /// The summary note failed local validation.
    InvalidNote(ValidationError),
}

impl Display for PipelineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownPdf(id) => write!(f, "unknown pdf `{id}`"),
            Self::NotExtracted => write!(f, "extract the text first"),
            Self::NotSummarized => write!(f, "summarize the text first"),
            Self::AlreadyAdded => write!(f, "summary was already added to notes"),
            Self::StepInFlight(step) => write!(f, "{} is already running", step.as_str()),
            Self::InvalidNote(err) => write!(f, "invalid summary note: {err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidNote(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for PipelineError {
    fn from(value: ValidationError) -> Self {
        Self::InvalidNote(value)
    }
}

/// Pipeline of one uploaded PDF.
#[derive(Debug)]
pub struct PdfPipeline {
    record: RefCell<PdfRecord>,
    added_note_id: RefCell<Option<String>>,
    steps: RefCell<[StepStatus; 3]>,
}

impl PdfPipeline {
    pub fn new(record: PdfRecord) -> Self {
        Self {
            record: RefCell::new(record),
            added_note_id: RefCell::new(None),
            steps: RefCell::new(Default::default()),
        }
    }

    pub fn pdf_id(&self) -> String {
        self.record.borrow().id.clone()
    }

    /// Copy of the confirmed record.
    pub fn record(&self) -> PdfRecord {
        self.record.borrow().clone()
    }

    pub fn stage(&self) -> PipelineStage {
        if self.added_note_id.borrow().is_some() {
            return PipelineStage::AddedToNotes;
        }
        let record = self.record.borrow();
        if record.summary.is_some() {
            PipelineStage::Summarized
        } else if record.extracted_text.is_some() {
            PipelineStage::Extracted
        } else {
            PipelineStage::Uploaded
        }
    }

    pub fn status(&self, step: PipelineStep) -> StepStatus {
        self.steps.borrow()[step.index()].clone()
    }

    /// Id of the note created from the summary, once added.
    pub fn added_note_id(&self) -> Option<String> {
        self.added_note_id.borrow().clone()
    }

    /// Runs text extraction. Repeating it overwrites the previous text.
    ///
    /// `Ok(false)` means the backend call failed; see `status(Extract)`.
    pub async fn extract<B: Backend>(&self, backend: &B) -> Result<bool, PipelineError> {
        let step = PipelineStep::Extract;
        self.begin(step)?;
        let id = self.pdf_id();
        match backend.extract_pdf(&id).await {
            Ok(extracted) => {
                self.record.borrow_mut().extracted_text = Some(extracted.extracted_text);
                self.succeed(step, &id);
                Ok(true)
            }
            Err(err) => {
                self.fail(step, &id, err.message());
                Ok(false)
            }
        }
    }

    /// Summarizes the extracted text.
    pub async fn summarize<B: Backend>(&self, backend: &B) -> Result<bool, PipelineError> {
        let step = PipelineStep::Summarize;
        if self.record.borrow().extracted_text.is_none() {
            return Err(PipelineError::NotExtracted);
        }
        self.begin(step)?;
        let id = self.pdf_id();
        match backend.summarize_pdf(&id).await {
            Ok(summary) => {
                self.record.borrow_mut().summary = Some(summary.summary);
                self.succeed(step, &id);
                Ok(true)
            }
            Err(err) => {
                self.fail(step, &id, err.message());
                Ok(false)
            }
        }
    }

    /// Turns the summary into a note through the note cache.
    ///
    /// The note is titled after the file and its body is the lifted summary.
    /// `Ok(None)` means the create call failed.
    pub async fn add_to_notes<B: Backend>(
        &self,
        notes: &NoteService<B>,
    ) -> Result<Option<Note>, PipelineError> {
        let step = PipelineStep::AddToNotes;
        let draft = {
            let record = self.record.borrow();
            let summary = record.summary.as_deref().ok_or(PipelineError::NotSummarized)?;
            NoteDraft::new(record.note_title(), lift(summary))
        };
        draft.validate()?;
        self.begin(step)?;
        let id = self.pdf_id();
        match notes.create_validated(draft).await {
            Some(note) => {
                *self.added_note_id.borrow_mut() = Some(note.id.clone());
                self.succeed(step, &id);
                Ok(Some(note))
            }
            None => {
                let message = notes
                    .error()
                    .unwrap_or_else(|| "failed to create note".to_string());
                self.fail(step, &id, &message);
                Ok(None)
            }
        }
    }

    fn begin(&self, step: PipelineStep) -> Result<(), PipelineError> {
        if self.stage() == PipelineStage::AddedToNotes {
            return Err(PipelineError::AlreadyAdded);
        }
        let mut steps = self.steps.borrow_mut();
        let status = &mut steps[step.index()];
        if status.loading {
            return Err(PipelineError::StepInFlight(step));
        }
        status.loading = true;
        status.error = None;
        Ok(())
    }

    fn succeed(&self, step: PipelineStep, id: &str) {
        self.steps.borrow_mut()[step.index()].loading = false;
        info!(
            "event=pdf_pipeline module=service status=ok step={} pdf_id={id}",
            step.as_str()
        );
    }

    fn fail(&self, step: PipelineStep, id: &str, message: &str) {
        let mut steps = self.steps.borrow_mut();
        let status = &mut steps[step.index()];
        status.loading = false;
        status.error = Some(message.to_string());
        warn!(
            "event=pdf_pipeline module=service status=error step={} pdf_id={id}",
            step.as_str()
        );
    }
}
