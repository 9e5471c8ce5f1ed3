//! In-memory note filter.
//!
//! # Invariants
//! - Matching is a case-insensitive substring test on title or projected body.
//! - An empty or absent term matches every note. The term is not trimmed.
//! - Output keeps the relative order of the input; nothing is ranked.
//! - Every call is a full linear scan; there is no index to keep in sync.

use crate::model::note::Note;
use crate::model::projection::project;

/// Returns the notes matching `term`, in input order.
pub fn filter_notes(items: &[Note], term: Option<&str>) -> Vec<Note> {
    let needle = match term {
        Some(value) if !value.is_empty() => value.to_lowercase(),
        _ => return items.to_vec(),
    };

    items
        .iter()
        .filter(|note| note_matches(note, &needle))
        .cloned()
        .collect()
}

fn note_matches(note: &Note, needle: &str) -> bool {
    note.title.to_lowercase().contains(needle)
        || project(&note.content).to_lowercase().contains(needle)
}
