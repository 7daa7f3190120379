//! replymark: safe structured rendering of untrusted LLM reply text
//!
//! This crate turns an assistant or user message body into a structured
//! [`Document`] of block nodes, and optionally into HTML.
//!
//! # Design Principles
//! - Total: every `&str` renders; malformed syntax degrades to paragraphs
//! - Safe: every string in a document is HTML-escaped or generated markup
//! - Protected spans: code and math never see emphasis or link rewriting
//! - No shared state: each call owns its token lists and list stack
//!
//! # Entry points
//! - [`to_document`]: the Markdown grammar (GFM pipe tables, lists,
//!   blockquotes, fences, headings)
//! - [`plain_to_document`]: the ASCII-table fallback, for data dumps with
//!   dashed separators that are not valid GFM tables

/// Debug event on a degrade path. Expands to nothing without `trace`.
macro_rules! debug_event {
    ($($arg:tt)*) => {{
        #[cfg(feature = "trace")]
        {
            tracing::debug!($($arg)*);
        }
    }};
}

pub mod ascii_table;
pub mod block;
pub mod cursor;
pub mod document;
pub mod escape;
pub mod inline;
pub mod limits;
pub mod numeric;
pub mod render;

// Re-export primary types
pub use ascii_table::{looks_like_table, parse_table, AsciiTable};
pub use block::BlockParser;
pub use document::{
    Alignment, Block, Document, List, ListItem, ListKind, Table, TableSource, TaskState,
};
pub use inline::{format_inline, protect, Protected, TokenKind, TokenRegistry};
pub use numeric::NumericCell;
pub use render::HtmlWriter;

/// Parsing/rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Protect `\(..\)` and `\[..\]` as math spans.
    pub math: bool,
    /// Also accept `$$..$$` as display math. Off by default; ignored when
    /// `math` is off.
    pub dollar_math: bool,
    /// Link bare `http(s)://` and `www.` URLs.
    pub autolinks: bool,
    /// Format ASCII-table body cells as numbers when rendering HTML.
    pub numeric_cells: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            math: true,
            dollar_math: false,
            autolinks: true,
            numeric_cells: true,
        }
    }
}

/// Parse Markdown into a document.
///
/// # Example
/// ```
/// use replymark::Block;
///
/// let doc = replymark::to_document("# Hello\n\nWorld");
/// assert_eq!(doc.len(), 2);
/// assert!(matches!(&doc.blocks[1], Block::Paragraph { inline } if inline == "World"));
/// ```
pub fn to_document(input: &str) -> Document {
    to_document_with_options(input, &Options::default())
}

/// Parse Markdown into a document with options.
pub fn to_document_with_options(input: &str, options: &Options) -> Document {
    let mut blocks = Vec::with_capacity((input.len() / 64).max(4));
    BlockParser::new(*options).parse(input, &mut blocks);
    Document::new(blocks)
}

/// Parse plain text, turning table-like runs into tables.
///
/// # Example
/// ```
/// use replymark::{Block, TableSource};
///
/// let doc = replymark::plain_to_document("A | B\n---+---\n1 | 2");
/// let Block::Table(table) = &doc.blocks[0] else { panic!() };
/// assert_eq!(table.source, TableSource::Ascii);
/// ```
pub fn plain_to_document(input: &str) -> Document {
    plain_to_document_with_options(input, &Options::default())
}

/// Parse plain text with options.
pub fn plain_to_document_with_options(input: &str, options: &Options) -> Document {
    let mut blocks = Vec::new();
    ascii_table::render_plain(input, options, &mut blocks);
    Document::new(blocks)
}

/// Convert Markdown to HTML.
///
/// # Example
/// ```
/// let html = replymark::to_html("# Hello\n\nWorld");
/// assert!(html.contains("<h1>Hello</h1>"));
/// assert!(html.contains("<p>World</p>"));
/// ```
pub fn to_html(input: &str) -> String {
    to_html_with_options(input, &Options::default())
}

/// Convert Markdown to HTML with options.
pub fn to_html_with_options(input: &str, options: &Options) -> String {
    render_html(&to_document_with_options(input, options), options, input.len())
}

/// Convert Markdown to HTML, writing into a provided buffer.
///
/// The buffer is cleared first; its capacity is reused.
pub fn to_html_into(input: &str, out: &mut String, options: &Options) {
    out.clear();
    out.reserve(input.len() + input.len() / 4);
    let mut writer = HtmlWriter::with_capacity(0);
    std::mem::swap(writer.buffer_mut(), out);
    writer.write_document(&to_document_with_options(input, options), options);
    std::mem::swap(writer.buffer_mut(), out);
}

/// Convert plain text to HTML.
pub fn plain_to_html(input: &str) -> String {
    plain_to_html_with_options(input, &Options::default())
}

/// Convert plain text to HTML with options.
pub fn plain_to_html_with_options(input: &str, options: &Options) -> String {
    render_html(&plain_to_document_with_options(input, options), options, input.len())
}

fn render_html(document: &Document, options: &Options, input_len: usize) -> String {
    let mut writer = HtmlWriter::with_capacity_for(input_len);
    writer.write_document(document, options);
    writer.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_paragraph() {
        assert_eq!(to_html("Hello, world!"), "<p>Hello, world!</p>\n");
    }

    #[test]
    fn test_paragraph_escaping() {
        let html = to_html("<script>alert('xss')</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(to_html(""), "");
        assert!(to_document("").is_empty());
    }

    #[test]
    fn test_only_whitespace() {
        assert_eq!(to_html("   \n\n   "), "");
    }

    #[test]
    fn test_thematic_break_variants() {
        assert_eq!(to_html("---"), "<hr />\n");
        assert_eq!(to_html("***"), "<hr />\n");
        assert_eq!(to_html("___"), "<hr />\n");
    }

    #[test]
    fn test_to_html_into_reuses_buffer() {
        let mut buffer = String::from("stale");
        to_html_into("# Test", &mut buffer, &Options::default());
        assert_eq!(buffer, "<h1>Test</h1>\n");
    }

    #[test]
    fn test_token_order() {
        let html = to_html(r"`a` \(x\) \[y\]");
        let code = html.find("<code>a</code>").unwrap();
        let inline = html.find("class=\"math-inline\" data-math=\"x\"").unwrap();
        let display = html.find("class=\"math-display\" data-math=\"y\"").unwrap();
        assert!(code < inline && inline < display, "{html}");
    }

    #[test]
    fn test_list_nesting() {
        let doc = to_document("- a\n  - b\n- c");
        let [Block::List(list)] = doc.blocks.as_slice() else {
            panic!("expected one list, got {doc:?}");
        };
        assert!(!list.is_ordered());
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].inline, "a");
        assert_eq!(list.items[1].inline, "c");
        assert_eq!(list.items[0].children[0].items[0].inline, "b");
    }

    #[test]
    fn test_table_alignment() {
        let doc = to_document("| a | b | c |\n| :--- | ---: | :---: |\n| 1 | 2 | 3 |");
        let [Block::Table(table)] = doc.blocks.as_slice() else {
            panic!("expected table, got {doc:?}");
        };
        assert_eq!(
            table.alignments,
            vec![Alignment::Left, Alignment::Right, Alignment::Center]
        );
    }

    #[test]
    fn test_plain_header_only_table() {
        let doc = plain_to_document("A | B\n---|---");
        let [Block::Table(table)] = doc.blocks.as_slice() else {
            panic!("expected table, got {doc:?}");
        };
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_plain_numeric_html() {
        let html = plain_to_html("Item | Delta\n-----+------\nA | -$1,234.5%");
        assert!(html.contains("<td class=\"numeric\">-$1,234.50%</td>"), "{html}");
    }

    #[test]
    fn test_plain_numeric_disabled() {
        let options = Options {
            numeric_cells: false,
            ..Options::default()
        };
        let html = plain_to_html_with_options("Item | Delta\n-----+------\nA | 1.5", &options);
        assert!(html.contains("<td>1.5</td>"), "{html}");
    }

    #[test]
    fn test_dollar_amounts_stay_text() {
        assert_eq!(
            to_html("Pay $$5 now or $$10 later"),
            "<p>Pay $$5 now or $$10 later</p>\n"
        );
    }

    #[test]
    fn test_math_disabled() {
        let options = Options {
            math: false,
            ..Options::default()
        };
        let html = to_html_with_options(r"\(x\)", &options);
        assert!(!html.contains("math-inline"), "{html}");
    }

    #[test]
    fn test_idempotent() {
        let input = "# T\n\n`a` $$b$$ [c](https://d.e)\n\n| x |\n|---|\n| 1 |";
        assert_eq!(to_document(input), to_document(input));
    }
}
