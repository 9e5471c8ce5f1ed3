//! Core use-case services.
//!
//! # Responsibility
//! - Turn view commands into validated backend calls against one cache.
//! - Sequence the PDF ingestion pipeline.
//! - Keep views decoupled from transport details.
//!
//! # Invariants
//! - Validation errors are returned before any backend call.
//! - Operation errors are recorded in the owning cache or pipeline step and
//!   reported as `None`/`false`, never propagated.

pub mod event_service;
pub mod note_service;
pub mod pdf_service;
pub mod pipeline;
pub mod session;
