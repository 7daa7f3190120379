//! HTML output writer.
//!
//! Renders a [`Document`] to HTML. Block nodes already carry HTML-safe
//! inline markup, so the writer only adds structure, escapes code block
//! text and formats ASCII-table cells.

use crate::document::{Alignment, Block, Document, List, ListKind, Table, TableSource, TaskState};
use crate::escape;
use crate::numeric::NumericCell;
use crate::Options;

/// HTML output writer with pre-allocated, reusable buffer.
///
/// # Example
/// ```
/// use replymark::HtmlWriter;
///
/// let mut writer = HtmlWriter::with_capacity_for(1000);
/// writer.paragraph_start();
/// writer.write_escaped_text("Hello <World>");
/// writer.paragraph_end();
///
/// let html = writer.into_string();
/// assert_eq!(html, "<p>Hello &lt;World&gt;</p>\n");
/// ```
#[derive(Debug, Clone)]
pub struct HtmlWriter {
    out: String,
}

impl HtmlWriter {
    /// Create a new writer with default capacity.
    #[inline]
    pub fn new() -> Self {
        Self {
            out: String::with_capacity(1024),
        }
    }

    /// Create with pre-allocated capacity based on expected input size.
    ///
    /// Typical HTML is ~1.25x input size.
    #[inline]
    pub fn with_capacity_for(input_len: usize) -> Self {
        Self::with_capacity(input_len + input_len / 4)
    }

    /// Create with explicit capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            out: String::with_capacity(capacity),
        }
    }

    /// Write a string without escaping.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.out.push_str(s);
    }

    /// Write text with HTML escaping (for text content).
    #[inline]
    pub fn write_escaped_text(&mut self, text: &str) {
        escape::escape_text_into(&mut self.out, text);
    }

    /// Write attribute value with full escaping (including quotes).
    #[inline]
    pub fn write_escaped_attr(&mut self, attr: &str) {
        escape::escape_attr_into(&mut self.out, attr);
    }

    /// Write a newline.
    #[inline]
    pub fn newline(&mut self) {
        self.out.push('\n');
    }

    /// Take ownership of the output.
    #[inline]
    pub fn into_string(self) -> String {
        self.out
    }

    /// Mutable access to the underlying buffer.
    #[inline]
    pub fn buffer_mut(&mut self) -> &mut String {
        &mut self.out
    }

    // === Block-level helpers ===

    /// Write paragraph start: `<p>`
    #[inline]
    pub fn paragraph_start(&mut self) {
        self.write_str("<p>");
    }

    /// Write paragraph end: `</p>\n`
    #[inline]
    pub fn paragraph_end(&mut self) {
        self.write_str("</p>\n");
    }

    /// Write heading start: `<hN>`
    #[inline]
    pub fn heading_start(&mut self, level: u8) {
        self.write_str("<h");
        self.out.push(heading_digit(level));
        self.out.push('>');
    }

    /// Write heading end: `</hN>\n`
    #[inline]
    pub fn heading_end(&mut self, level: u8) {
        self.write_str("</h");
        self.out.push(heading_digit(level));
        self.write_str(">\n");
    }

    /// Write code block start with optional language class.
    #[inline]
    pub fn code_block_start(&mut self, lang: Option<&str>) {
        match lang {
            Some(l) if !l.is_empty() => {
                self.write_str("<pre><code class=\"language-");
                self.write_escaped_attr(l);
                self.write_str("\">");
            }
            _ => {
                self.write_str("<pre><code>");
            }
        }
    }

    /// Write code block end: `</code></pre>\n`
    #[inline]
    pub fn code_block_end(&mut self) {
        self.write_str("</code></pre>\n");
    }

    /// Write thematic break: `<hr />\n`
    #[inline]
    pub fn thematic_break(&mut self) {
        self.write_str("<hr />\n");
    }

    /// Write blockquote start: `<blockquote>\n`
    #[inline]
    pub fn blockquote_start(&mut self) {
        self.write_str("<blockquote>\n");
    }

    /// Write blockquote end: `</blockquote>\n`
    #[inline]
    pub fn blockquote_end(&mut self) {
        self.write_str("</blockquote>\n");
    }

    /// Write list start (unordered): `<ul>\n`
    #[inline]
    pub fn ul_start(&mut self) {
        self.write_str("<ul>\n");
    }

    /// Write list end (unordered): `</ul>\n`
    #[inline]
    pub fn ul_end(&mut self) {
        self.write_str("</ul>\n");
    }

    /// Write list start (ordered): `<ol>\n` or `<ol start="N">\n`
    #[inline]
    pub fn ol_start(&mut self, start: u32) {
        if start == 1 {
            self.write_str("<ol>\n");
        } else {
            self.write_str("<ol start=\"");
            self.out.push_str(&start.to_string());
            self.write_str("\">\n");
        }
    }

    /// Write list end (ordered): `</ol>\n`
    #[inline]
    pub fn ol_end(&mut self) {
        self.write_str("</ol>\n");
    }

    /// Write list item start: `<li>`
    #[inline]
    pub fn li_start(&mut self) {
        self.write_str("<li>");
    }

    /// Write list item end: `</li>\n`
    #[inline]
    pub fn li_end(&mut self) {
        self.write_str("</li>\n");
    }

    /// Write a disabled task checkbox followed by a space.
    #[inline]
    pub fn task_checkbox(&mut self, checked: bool) {
        if checked {
            self.write_str("<input type=\"checkbox\" checked=\"\" disabled=\"\" /> ");
        } else {
            self.write_str("<input type=\"checkbox\" disabled=\"\" /> ");
        }
    }

    /// Write one table cell. `content` is already HTML-safe.
    pub fn table_cell(&mut self, tag: &'static str, align: Option<Alignment>, content: &str) {
        self.open_cell(tag, align, None);
        self.write_str(content);
        self.close_cell(tag);
    }

    /// Write a body cell through the numeric formatter.
    pub fn numeric_cell(&mut self, content: &str) {
        let cell = NumericCell::format(content);
        if !cell.is_numeric {
            self.table_cell("td", None, &cell.value);
            return;
        }
        self.open_cell("td", None, Some("numeric"));
        self.write_str(&cell.value);
        if !cell.suffix.is_empty() {
            self.write_str("<span class=\"suffix\">");
            self.write_str(&cell.suffix);
            self.write_str("</span>");
        }
        self.close_cell("td");
    }

    fn open_cell(&mut self, tag: &'static str, align: Option<Alignment>, class: Option<&'static str>) {
        self.out.push('<');
        self.write_str(tag);
        if let Some(align) = align {
            self.write_str(" align=\"");
            self.write_str(align.as_str());
            self.out.push('"');
        }
        if let Some(class) = class {
            self.write_str(" class=\"");
            self.write_str(class);
            self.out.push('"');
        }
        self.out.push('>');
    }

    fn close_cell(&mut self, tag: &'static str) {
        self.write_str("</");
        self.write_str(tag);
        self.write_str(">\n");
    }

    // === Document rendering ===

    /// Render a whole document.
    pub fn write_document(&mut self, document: &Document, options: &Options) {
        for block in document {
            self.write_block(block, options);
        }
    }

    /// Render one block node.
    pub fn write_block(&mut self, block: &Block, options: &Options) {
        match block {
            Block::Heading { level, inline } => {
                self.heading_start(*level);
                self.write_str(inline);
                self.heading_end(*level);
            }
            Block::Paragraph { inline } => {
                self.paragraph_start();
                self.write_str(inline);
                self.paragraph_end();
            }
            Block::List(list) => self.write_list(list),
            Block::Blockquote { children } => {
                self.blockquote_start();
                for child in children {
                    self.write_block(child, options);
                }
                self.blockquote_end();
            }
            Block::CodeBlock { language, raw_text } => {
                self.code_block_start(language.as_deref());
                if !raw_text.is_empty() {
                    self.write_escaped_text(raw_text);
                    self.newline();
                }
                self.code_block_end();
            }
            Block::HorizontalRule => self.thematic_break(),
            Block::Table(table) => self.write_table(table, options),
        }
    }

    fn write_list(&mut self, list: &List) {
        match list.kind {
            ListKind::Unordered => self.ul_start(),
            ListKind::Ordered { start } => self.ol_start(start),
        }
        for item in &list.items {
            self.li_start();
            match item.task {
                TaskState::None => {}
                TaskState::Unchecked => self.task_checkbox(false),
                TaskState::Checked => self.task_checkbox(true),
            }
            self.write_str(&item.inline);
            if !item.children.is_empty() {
                self.newline();
                for child in &item.children {
                    self.write_list(child);
                }
            }
            self.li_end();
        }
        match list.kind {
            ListKind::Unordered => self.ul_end(),
            ListKind::Ordered { .. } => self.ol_end(),
        }
    }

    fn write_table(&mut self, table: &Table, options: &Options) {
        // Left is the default rendering, so only center and right get an attribute.
        let align = |col: usize| Some(table.alignment(col)).filter(|&a| a != Alignment::Left);

        self.write_str("<table>\n<thead>\n<tr>\n");
        for (col, header) in table.headers.iter().enumerate() {
            self.table_cell("th", align(col), header);
        }
        self.write_str("</tr>\n</thead>\n");

        if !table.rows.is_empty() {
            self.write_str("<tbody>\n");
            for row in &table.rows {
                self.write_str("<tr>\n");
                match table.source {
                    // Padded or truncated to the header width.
                    TableSource::Markdown => {
                        for col in 0..table.headers.len() {
                            let cell = row.get(col).map_or("", String::as_str);
                            self.table_cell("td", align(col), cell);
                        }
                    }
                    TableSource::Ascii => {
                        for cell in row {
                            if options.numeric_cells {
                                self.numeric_cell(cell);
                            } else {
                                self.table_cell("td", None, cell);
                            }
                        }
                    }
                }
                self.write_str("</tr>\n");
            }
            self.write_str("</tbody>\n");
        }
        self.write_str("</table>\n");
    }
}

#[inline]
fn heading_digit(level: u8) -> char {
    char::from(b'0' + level.clamp(1, 6))
}

impl Default for HtmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Write for HtmlWriter {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.out.push_str(s);
        Ok(())
    }
}
