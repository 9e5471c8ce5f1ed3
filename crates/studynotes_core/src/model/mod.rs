//! Client-side domain model for notes, PDFs and events.
//!
//! # Responsibility
//! - Define the records mirrored from the remote store and their wire shape.
//! - Own the structured document tree and its plain-text projection.
//! - Hold the pre-submission validation rules.
//!
//! # Invariants
//! - Entity ids are assigned by the backend and never rewritten locally.
//! - Validation runs before any network call.

pub mod document;
pub mod event;
pub mod note;
pub mod pdf;
pub mod projection;
pub(crate) mod timestamp;
pub mod validation;
