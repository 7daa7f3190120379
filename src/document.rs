//! Structured document produced by a render call.
//!
//! Every `String` held by these types is HTML-safe markup or escaped text,
//! except [`Block::CodeBlock`]'s `raw_text`, which is verbatim source.

#[cfg(feature = "serde")]
use serde::Serialize;

/// Column alignment for table cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Alignment {
    /// Left-aligned (`:---` or `---`).
    #[default]
    Left,
    /// Center-aligned (`:---:`).
    Center,
    /// Right-aligned (`---:`).
    Right,
}

impl Alignment {
    /// Value for the HTML `align` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Type of list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ListKind {
    /// Unordered list (`-`, `+`, `*` markers).
    Unordered,
    /// Ordered list (`N.` markers).
    Ordered {
        /// Number written on the first marker.
        start: u32,
    },
}

impl ListKind {
    /// Whether this is an ordered list.
    #[inline]
    pub fn is_ordered(self) -> bool {
        matches!(self, Self::Ordered { .. })
    }

    /// Same list type, ignoring the start number.
    #[inline]
    pub fn same_type(self, other: ListKind) -> bool {
        self.is_ordered() == other.is_ordered()
    }
}

/// Task list item state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum TaskState {
    /// Not a task item.
    #[default]
    None,
    /// Unchecked task `[ ]`.
    Unchecked,
    /// Checked task `[x]` or `[X]`.
    Checked,
}

/// Where a table came from, which decides what its cells hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum TableSource {
    /// GFM pipe table; cells hold inline-formatted markup.
    Markdown,
    /// Heuristic ASCII table; cells hold escaped plain text.
    Ascii,
}

/// A list item. Nested lists hang off the item they follow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ListItem {
    pub inline: String,
    pub task: TaskState,
    pub children: Vec<List>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct List {
    pub kind: ListKind,
    pub items: Vec<ListItem>,
}

impl List {
    /// Whether this is an ordered list.
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.kind.is_ordered()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Table {
    pub headers: Vec<String>,
    /// One entry per separator-row column; empty when the table had no
    /// alignment row.
    pub alignments: Vec<Alignment>,
    pub rows: Vec<Vec<String>>,
    pub source: TableSource,
}

impl Table {
    /// Alignment for column `col`, defaulting to left.
    #[inline]
    pub fn alignment(&self, col: usize) -> Alignment {
        self.alignments.get(col).copied().unwrap_or_default()
    }
}

/// One top-level structural unit of the rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Block {
    Heading {
        /// Heading level (1-6).
        level: u8,
        inline: String,
    },
    Paragraph {
        inline: String,
    },
    List(List),
    Blockquote {
        children: Vec<Block>,
    },
    CodeBlock {
        /// Lower-cased first word of the fence info string.
        language: Option<String>,
        raw_text: String,
    },
    HorizontalRule,
    Table(Table),
}

/// An ordered sequence of block nodes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    /// Wrap a block sequence.
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Whether the document has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of top-level blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Iterate the top-level blocks.
    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_kind() {
        let ul = ListKind::Unordered;
        let ol = ListKind::Ordered { start: 1 };
        assert_ne!(ul, ol);
        assert!(ol.same_type(ListKind::Ordered { start: 7 }));
        assert!(!ul.same_type(ol));
    }

    #[test]
    fn test_task_state_default() {
        assert_eq!(TaskState::default(), TaskState::None);
    }

    #[test]
    fn test_missing_alignment_defaults_left() {
        let table = Table {
            headers: vec!["a".into(), "b".into()],
            alignments: vec![Alignment::Right],
            rows: Vec::new(),
            source: TableSource::Markdown,
        };
        assert_eq!(table.alignment(0), Alignment::Right);
        assert_eq!(table.alignment(1), Alignment::Left);
    }
}
