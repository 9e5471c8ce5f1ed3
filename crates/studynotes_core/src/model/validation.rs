//! Pre-submission validation rules.
//!
//! # Responsibility
//! - Reject commands the backend would refuse, before any request is sent.
//!
//! # Invariants
//! - Validation errors never reach a cache slice's `error` field.
//! - An event whose start equals its end is valid.

use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// Client-side validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Title is empty or whitespace.
    EmptyTitle,
    /// Event window is reversed.
    EndBeforeStart {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// Upload has no bytes or no filename.
    MissingFile,
    /// Upload bytes do not carry the PDF signature.
    NotPdf(String),
    /// Note has neither a title nor any text.
    EmptyNote,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title is required"),
            Self::EndBeforeStart { start, end } => write!(
                f,
                "end ({}) must not be before start ({})",
                end.to_rfc3339(),
                start.to_rfc3339()
            ),
            Self::MissingFile => write!(f, "select a PDF file first"),
            Self::NotPdf(filename) => write!(f, "`{filename}` is not a PDF file"),
            Self::EmptyNote => write!(f, "note has no title and no text"),
        }
    }
}

impl Error for ValidationError {}

/// Checks an event title and time window.
pub fn validate_event(
    title: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if start > end {
        return Err(ValidationError::EndBeforeStart { start, end });
    }
    Ok(())
}

/// Checks an upload before it is streamed to the backend.
pub fn validate_upload(filename: &str, bytes: &[u8]) -> Result<(), ValidationError> {
    if filename.trim().is_empty() || bytes.is_empty() {
        return Err(ValidationError::MissingFile);
    }
    if !bytes.starts_with(PDF_SIGNATURE) {
        return Err(ValidationError::NotPdf(filename.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_event, validate_upload, ValidationError};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn equal_start_and_end_is_accepted() {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
        assert_eq!(validate_event("Standup", t0, t0), Ok(()));
    }

    #[test]
    fn reversed_window_is_rejected() {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
        let t1 = t0 + Duration::minutes(15);
        assert_eq!(
            validate_event("Standup", t1, t0),
            Err(ValidationError::EndBeforeStart { start: t1, end: t0 })
        );
    }

    #[test]
    fn blank_title_is_checked_first() {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
        let t1 = t0 + Duration::hours(1);
        assert_eq!(
            validate_event("  \t", t1, t0),
            Err(ValidationError::EmptyTitle)
        );
    }

    #[test]
    fn upload_requires_bytes_name_and_signature() {
        assert_eq!(
            validate_upload("", b"%PDF-1.7"),
            Err(ValidationError::MissingFile)
        );
        assert_eq!(
            validate_upload("a.pdf", b""),
            Err(ValidationError::MissingFile)
        );
        assert_eq!(
            validate_upload("a.txt", b"hello"),
            Err(ValidationError::NotPdf("a.txt".to_string()))
        );
        assert_eq!(validate_upload("a.pdf", b"%PDF-1.7\n..."), Ok(()));
    }
}
