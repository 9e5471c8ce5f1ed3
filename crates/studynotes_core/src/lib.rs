//! Core client logic for StudyNotes.
//! Views render from these caches and never talk to the backend directly.

pub mod api;
pub mod cache;
pub mod config;
pub mod logging;
pub mod model;
pub mod search;
pub mod service;

pub use api::{Backend, HttpBackend, OpResult, OperationError};
pub use cache::{CacheOp, CacheSlice};
pub use config::{ClientConfig, ConfigError};
pub use logging::{
    default_log_level, init_from_config, init_logging, logging_status, LogTarget, LoggingError,
};
pub use model::document::{Block, Doc, HeadingLevel, Mark, TextRun};
pub use model::event::{Event, EventDraft, EventId};
pub use model::note::{Note, NoteDraft, NoteId};
pub use model::pdf::{ExtractedText, PdfId, PdfRecord, PdfSummary, PdfUpload};
pub use model::projection::{derive_preview, lift, project};
pub use model::validation::{validate_event, validate_upload, ValidationError};
pub use search::filter::filter_notes;
pub use service::event_service::EventService;
pub use service::note_service::NoteService;
pub use service::pdf_service::PdfService;
pub use service::pipeline::{PdfPipeline, PipelineError, PipelineStage, PipelineStep, StepStatus};
pub use service::session::Session;

/// Minimal health-check API for smoke probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
