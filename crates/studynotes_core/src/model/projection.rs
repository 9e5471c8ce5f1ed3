//! Plain-text projection of document trees.
//!
//! # Responsibility
//! - Flatten a `Doc` into one string for search and single-field editing.
//! - Lift a flat string back into a minimal `Doc`.
//! - Derive the short list preview shown next to a note title.
//!
//! # Invariants
//! - Runs inside a block join with no separator; blocks join with `\n`.
//! - Marks are dropped. `lift(project(doc))` loses every block boundary and
//!   mark, so saving through the flat-text path collapses the document.

use crate::model::document::{Block, Doc, TextRun};
use once_cell::sync::Lazy;
use regex::Regex;

const PREVIEW_MAX_CHARS: usize = 100;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Flattens a document to plain text.
pub fn project(doc: &Doc) -> String {
    doc.children
        .iter()
        .map(project_block)
        .collect::<Vec<_>>()
        .join("\n")
}

fn project_block(block: &Block) -> String {
    block
        .children()
        .iter()
        .map(|run| run.text.as_str())
        .collect()
}

/// Wraps `text` verbatim as one unmarked run in one paragraph.
pub fn lift(text: &str) -> Doc {
    Doc::new(vec![Block::paragraph(vec![TextRun::plain(text)])])
}

/// Derives a single-line preview from document text.
///
/// Rules:
/// - whitespace runs (including block breaks) collapse to one space;
/// - the result is trimmed and capped at 100 chars;
/// - blank documents yield `None`.
pub fn derive_preview(doc: &Doc) -> Option<String> {
    let projected = project(doc);
    let normalized = WHITESPACE_RE.replace_all(&projected, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(PREVIEW_MAX_CHARS).collect())
}

#[cfg(test)]
mod tests {
    use super::{derive_preview, lift, project};
    use crate::model::document::{Block, Doc, HeadingLevel, Mark, TextRun};

    fn two_block_doc() -> Doc {
        Doc::new(vec![
            Block::heading(HeadingLevel::H1, vec![TextRun::plain("Groceries")]),
            Block::paragraph(vec![
                TextRun::plain("milk, "),
                TextRun::with_marks("eggs", [Mark::Bold]),
            ]),
        ])
    }

    #[test]
    fn project_joins_runs_without_separator_and_blocks_with_newline() {
        assert_eq!(project(&two_block_doc()), "Groceries\nmilk, eggs");
    }

    #[test]
    fn project_of_canonical_empty_doc_is_empty_string() {
        assert_eq!(project(&Doc::empty()), "");
        assert_eq!(project(&Doc::new(Vec::new())), "");
    }

    #[test]
    fn lift_then_project_preserves_single_line_text() {
        for text in ["", "hello", "  spaced  out ", "milk,eggs"] {
            assert_eq!(project(&lift(text)), text);
        }
    }

    #[test]
    fn project_then_lift_collapses_structure() {
        let doc = two_block_doc();
        let lifted = lift(&project(&doc));
        assert_ne!(lifted, doc);
        assert_eq!(lifted.children.len(), 1);
        assert!(!lifted.has_marks());

        let marked_only = Doc::new(vec![Block::paragraph(vec![TextRun::with_marks(
            "x",
            [Mark::Italic],
        )])]);
        assert_ne!(lift(&project(&marked_only)), marked_only);
    }

    #[test]
    fn preview_collapses_whitespace_and_caps_length() {
        assert_eq!(
            derive_preview(&two_block_doc()).as_deref(),
            Some("Groceries milk, eggs")
        );
        assert_eq!(derive_preview(&lift("   \n ")), None);

        let long = lift(&"a".repeat(250));
        assert_eq!(derive_preview(&long).map(|value| value.len()), Some(100));
    }
}
