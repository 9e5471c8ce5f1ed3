//! Structured note document tree.
//!
//! # Responsibility
//! - Define the closed block/inline node set used for note content.
//! - Map the tree to and from the rich-text editor's JSON document shape.
//!
//! # Invariants
//! - `Doc` is the only root; blocks hold text runs and nothing else.
//! - Equality is structural, never by identity.
//! - The model does not validate editor output. Decoding keeps the nodes it
//!   knows, flattens list and quote containers into paragraphs, and skips the
//!   rest.

use crate::model::projection::lift;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Inline formatting flag carried by a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mark {
    Bold,
    Italic,
}

/// Heading depth supported by the editor toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingLevel {
    H1,
    H2,
}

impl HeadingLevel {
    /// Numeric level as written on the wire.
    pub fn as_u8(self) -> u8 {
        match self {
            Self::H1 => 1,
            Self::H2 => 2,
        }
    }

    fn from_wire(level: u8) -> Self {
        if level == 1 {
            Self::H1
        } else {
            Self::H2
        }
    }
}

/// Leaf text with an unordered set of marks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TextRun {
    pub text: String,
    pub marks: BTreeSet<Mark>,
}

impl TextRun {
    /// Creates an unmarked run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: BTreeSet::new(),
        }
    }

    /// Creates a run carrying the given marks; duplicates collapse.
    pub fn with_marks(text: impl Into<String>, marks: impl IntoIterator<Item = Mark>) -> Self {
        Self {
            text: text.into(),
            marks: marks.into_iter().collect(),
        }
    }

    pub fn is_marked(&self) -> bool {
        !self.marks.is_empty()
    }
}

/// Block-level node. Blocks never nest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Block {
    Paragraph {
        children: Vec<TextRun>,
    },
    Heading {
        level: HeadingLevel,
        children: Vec<TextRun>,
    },
}

impl Block {
    pub fn paragraph(children: Vec<TextRun>) -> Self {
        Self::Paragraph { children }
    }

    pub fn heading(level: HeadingLevel, children: Vec<TextRun>) -> Self {
        Self::Heading { level, children }
    }

    /// Text runs of this block in document order.
    pub fn children(&self) -> &[TextRun] {
        match self {
            Self::Paragraph { children } | Self::Heading { children, .. } => children,
        }
    }
}

/// Document root.
///
/// Serialized as the editor JSON (`{"type":"doc","content":[...]}`). A bare
/// JSON string is also accepted on decode and lifted into one paragraph, which
/// is how plain-text notes were stored before structured content existed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WireContent", into = "WireNode")]
pub struct Doc {
    pub children: Vec<Block>,
}

impl Doc {
    pub fn new(children: Vec<Block>) -> Self {
        Self { children }
    }

    /// Canonical empty document: one paragraph holding one empty run.
    pub fn empty() -> Self {
        Self::new(vec![Block::paragraph(vec![TextRun::plain("")])])
    }

    /// Replaces the whole tree with the editor's latest value.
    ///
    /// Returns `false` when `next` is structurally equal to the current tree,
    /// so callers can skip a redundant save.
    pub fn replace(&mut self, next: Doc) -> bool {
        if *self == next {
            return false;
        }
        *self = next;
        true
    }

    /// Whether any run carries a mark.
    pub fn has_marks(&self) -> bool {
        self.runs().any(TextRun::is_marked)
    }

    /// Whether every run is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.runs().all(|run| run.text.trim().is_empty())
    }

    fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.children.iter().flat_map(|block| block.children().iter())
    }
}

impl Default for Doc {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireContent {
    Node(WireNode),
    Text(String),
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum WireNode {
    Doc {
        #[serde(default)]
        content: Vec<WireNode>,
    },
    Paragraph {
        #[serde(default)]
        content: Vec<WireNode>,
    },
    Heading {
        #[serde(default)]
        attrs: WireHeadingAttrs,
        #[serde(default)]
        content: Vec<WireNode>,
    },
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        marks: Vec<WireMark>,
    },
    CodeBlock {
        #[serde(default)]
        content: Vec<WireNode>,
    },
    BulletList {
        #[serde(default)]
        content: Vec<WireNode>,
    },
    OrderedList {
        #[serde(default)]
        content: Vec<WireNode>,
    },
    ListItem {
        #[serde(default)]
        content: Vec<WireNode>,
    },
    Blockquote {
        #[serde(default)]
        content: Vec<WireNode>,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Serialize, Deserialize)]
struct WireHeadingAttrs {
    level: u8,
}

impl Default for WireHeadingAttrs {
    fn default() -> Self {
        Self { level: 1 }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum WireMark {
    Bold,
    Italic,
    #[serde(other)]
    Unsupported,
}

impl TryFrom<WireContent> for Doc {
    type Error = String;

    fn try_from(value: WireContent) -> Result<Self, Self::Error> {
        match value {
            WireContent::Text(text) => Ok(lift(&text)),
            WireContent::Node(WireNode::Doc { content }) => {
                let mut blocks = Vec::new();
                for node in content {
                    collect_blocks(node, &mut blocks);
                }
                Ok(Doc::new(blocks))
            }
            WireContent::Node(_) => Err("document root must be a `doc` node".to_string()),
        }
    }
}

/// Lists, list items and quotes are flattened: their text blocks become
/// top-level paragraphs in document order. Code blocks become paragraphs.
fn collect_blocks(node: WireNode, blocks: &mut Vec<Block>) {
    match node {
        WireNode::Paragraph { content } | WireNode::CodeBlock { content } => {
            blocks.push(Block::paragraph(runs_from_wire(content)))
        }
        WireNode::Heading { attrs, content } => blocks.push(Block::heading(
            HeadingLevel::from_wire(attrs.level),
            runs_from_wire(content),
        )),
        WireNode::BulletList { content }
        | WireNode::OrderedList { content }
        | WireNode::ListItem { content }
        | WireNode::Blockquote { content } => {
            for child in content {
                collect_blocks(child, blocks);
            }
        }
        WireNode::Doc { .. } | WireNode::Text { .. } | WireNode::Unsupported => {}
    }
}

fn runs_from_wire(nodes: Vec<WireNode>) -> Vec<TextRun> {
    nodes
        .into_iter()
        .filter_map(|node| match node {
            WireNode::Text { text, marks } => Some(TextRun {
                text,
                marks: marks
                    .into_iter()
                    .filter_map(|mark| match mark {
                        WireMark::Bold => Some(Mark::Bold),
                        WireMark::Italic => Some(Mark::Italic),
                        WireMark::Unsupported => None,
                    })
                    .collect(),
            }),
            _ => None,
        })
        .collect()
}

impl From<Doc> for WireNode {
    fn from(doc: Doc) -> Self {
        WireNode::Doc {
            content: doc.children.into_iter().map(block_to_wire).collect(),
        }
    }
}

fn block_to_wire(block: Block) -> WireNode {
    match block {
        Block::Paragraph { children } => WireNode::Paragraph {
            content: runs_to_wire(children),
        },
        Block::Heading { level, children } => WireNode::Heading {
            attrs: WireHeadingAttrs {
                level: level.as_u8(),
            },
            content: runs_to_wire(children),
        },
    }
}

fn runs_to_wire(runs: Vec<TextRun>) -> Vec<WireNode> {
    runs.into_iter()
        .map(|run| WireNode::Text {
            text: run.text,
            marks: run
                .marks
                .into_iter()
                .map(|mark| match mark {
                    Mark::Bold => WireMark::Bold,
                    Mark::Italic => WireMark::Italic,
                })
                .collect(),
        })
        .collect()
}
