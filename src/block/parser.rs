//! Block scanner implementation.

use super::list_stack::ListStack;
use super::table::{is_pipe_row, parse_alignment_row, TableBuilder};
use crate::cursor::{indent_width, is_blank, Cursor};
use crate::document::{Alignment, Block, ListKind, TaskState};
use crate::inline::format_inline;
use crate::limits::{MAX_BLOCK_NESTING, MAX_LIST_MARKER_DIGITS};
use crate::Options;

/// State for an open fenced code block.
#[derive(Debug)]
struct FenceState<'a> {
    /// The fence character (` or ~).
    fence_char: u8,
    /// Length of the opening fence.
    fence_len: usize,
    /// Indentation of the opening fence.
    indent: usize,
    /// Lower-cased first word of the info string.
    language: Option<String>,
    lines: Vec<&'a str>,
}

impl FenceState<'_> {
    fn into_block(self) -> Block {
        Block::CodeBlock {
            language: self.language,
            raw_text: self.lines.join("\n"),
        }
    }
}

/// Table progress between lines.
#[derive(Debug, Default)]
enum TableState<'a> {
    #[default]
    Closed,
    /// A pipe row waiting for the next line to confirm it as a header.
    Pending(&'a str),
    Open(TableBuilder),
}

/// What to do after classifying a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// The line was consumed.
    Done,
    /// State changed; classify the same line again.
    Reprocess,
}

/// A parsed list marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ListMarker<'a> {
    kind: ListKind,
    indent: usize,
    task: TaskState,
    content: &'a str,
}

/// Block parser state.
pub struct BlockParser<'a> {
    options: Options,
    /// Blockquote nesting depth of this parser.
    depth: usize,
    /// Trimmed lines of the open paragraph.
    paragraph: Vec<&'a str>,
    lists: ListStack,
    fence: Option<FenceState<'a>>,
    /// Unprefixed lines of the open blockquote.
    quote: Option<Vec<&'a str>>,
    table: TableState<'a>,
}

impl<'a> BlockParser<'a> {
    /// Create a new block parser.
    pub fn new(options: Options) -> Self {
        Self::nested(options, 0)
    }

    fn nested(options: Options, depth: usize) -> Self {
        Self {
            options,
            depth,
            paragraph: Vec::new(),
            lists: ListStack::new(),
            fence: None,
            quote: None,
            table: TableState::Closed,
        }
    }

    /// Parse all blocks of `input`.
    pub fn parse(&mut self, input: &'a str, out: &mut Vec<Block>) {
        self.parse_lines(input.lines(), out);
    }

    /// Parse pre-split lines. Used for blockquote bodies and for the
    /// non-table runs of the plain-text renderer.
    pub(crate) fn parse_lines<I>(&mut self, lines: I, out: &mut Vec<Block>)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for line in lines {
            self.feed(line, out);
        }
        self.finish(out);
    }

    fn feed(&mut self, line: &'a str, out: &mut Vec<Block>) {
        while self.step(line, out) == Step::Reprocess {}
    }

    /// Classify one line against the current state, in priority order.
    fn step(&mut self, line: &'a str, out: &mut Vec<Block>) -> Step {
        if let Some(fence) = self.fence.as_mut() {
            if is_closing_fence(line, fence) {
                if let Some(fence) = self.fence.take() {
                    out.push(fence.into_block());
                }
            } else {
                let content = strip_indent(line, fence.indent);
                fence.lines.push(content);
            }
            return Step::Done;
        }

        if let Some(quote) = self.quote.as_mut() {
            if let Some(rest) = quote_remainder(line) {
                quote.push(rest);
                return Step::Done;
            }
            if is_blank(line) {
                quote.push("");
                return Step::Done;
            }
            self.close_quote(out);
            return Step::Reprocess;
        }

        match std::mem::take(&mut self.table) {
            TableState::Closed => {}
            TableState::Pending(header) => {
                if let Some(alignments) = parse_alignment_row(line) {
                    self.open_table(header, &alignments, out);
                    return Step::Done;
                }
                if is_pipe_row(line) {
                    self.open_table(header, &[], out);
                    if let TableState::Open(builder) = &mut self.table {
                        builder.push_row(line, &self.options);
                    }
                    return Step::Done;
                }
                debug_event!(header, "pending table header reverted to text");
                self.add_text_line(header, out);
                return Step::Reprocess;
            }
            TableState::Open(mut builder) => {
                if is_pipe_row(line) {
                    if parse_alignment_row(line).is_none() {
                        builder.push_row(line, &self.options);
                    }
                    self.table = TableState::Open(builder);
                    return Step::Done;
                }
                out.extend(builder.finish());
                return Step::Reprocess;
            }
        }

        if let Some(fence) = parse_fence_open(line) {
            self.close_containers(out);
            self.fence = Some(fence);
            return Step::Done;
        }

        if is_blank(line) {
            self.close_paragraph(out);
            return Step::Done;
        }

        if let Some(rest) = quote_remainder(line) {
            if self.depth < MAX_BLOCK_NESTING {
                self.close_containers(out);
                self.quote = Some(vec![rest]);
                return Step::Done;
            }
            debug_event!(depth = self.depth, "blockquote nesting cap reached");
        }

        if let Some((level, content)) = parse_atx_heading(line) {
            self.close_containers(out);
            out.push(Block::Heading {
                level,
                inline: format_inline(content, &self.options),
            });
            return Step::Done;
        }

        if is_thematic_break(line) {
            self.close_containers(out);
            out.push(Block::HorizontalRule);
            return Step::Done;
        }

        if is_pipe_row(line) {
            self.table = TableState::Pending(line);
            return Step::Done;
        }

        if let Some(marker) = parse_list_marker(line) {
            self.close_paragraph(out);
            self.lists.close_to_indent(marker.indent, &self.options, out);
            self.lists.ensure_list(marker.kind, marker.indent, &self.options, out);
            self.lists.push_item(marker.content, marker.task);
            return Step::Done;
        }

        self.add_text_line(line, out);
        Step::Done
    }

    /// Close everything still open at end of input.
    fn finish(&mut self, out: &mut Vec<Block>) {
        if let Some(fence) = self.fence.take() {
            out.push(fence.into_block());
        }
        if self.quote.is_some() {
            self.close_quote(out);
        }
        match std::mem::take(&mut self.table) {
            TableState::Closed => {}
            TableState::Pending(header) => {
                debug_event!(header, "pending table header reverted to text");
                self.add_text_line(header, out);
            }
            TableState::Open(builder) => out.extend(builder.finish()),
        }
        self.close_containers(out);
    }

    /// Text line: continues the last list item when indented past the
    /// outermost marker, otherwise joins the paragraph.
    fn add_text_line(&mut self, line: &'a str, out: &mut Vec<Block>) {
        let text = line.trim();
        if let Some(base) = self.lists.base_indent() {
            if indent_width(line) > base && self.lists.append_to_last_item(text) {
                return;
            }
            self.lists.close_all(&self.options, out);
        }
        self.paragraph.push(text);
    }

    fn open_table(&mut self, header: &str, alignments: &[Alignment], out: &mut Vec<Block>) {
        self.close_containers(out);
        self.table = TableState::Open(TableBuilder::new(header, alignments, &self.options));
    }

    fn close_paragraph(&mut self, out: &mut Vec<Block>) {
        if self.paragraph.is_empty() {
            return;
        }
        let text = self.paragraph.join(" ");
        self.paragraph.clear();
        out.push(Block::Paragraph {
            inline: format_inline(&text, &self.options),
        });
    }

    /// Close the paragraph and every open list.
    fn close_containers(&mut self, out: &mut Vec<Block>) {
        self.close_paragraph(out);
        self.lists.close_all(&self.options, out);
    }

    fn close_quote(&mut self, out: &mut Vec<Block>) {
        let Some(lines) = self.quote.take() else {
            return;
        };
        let mut children = Vec::new();
        BlockParser::nested(self.options, self.depth + 1).parse_lines(lines, &mut children);
        out.push(Block::Blockquote { children });
    }
}

/// Try to parse a fenced code block opening.
fn parse_fence_open(line: &str) -> Option<FenceState<'_>> {
    let mut cursor = Cursor::new(line);
    let indent = cursor.eat_while(|b| b == b' ');

    let fence_char = match cursor.peek() {
        Some(b @ (b'`' | b'~')) => b,
        _ => return None,
    };
    let fence_len = cursor.eat_while(|b| b == fence_char);
    if fence_len < 3 {
        return None;
    }

    let info = cursor.rest().trim();
    // For backtick fences, info string cannot contain backticks
    if fence_char == b'`' && info.contains('`') {
        return None;
    }

    Some(FenceState {
        fence_char,
        fence_len,
        indent,
        language: info.split_whitespace().next().map(str::to_ascii_lowercase),
        lines: Vec::new(),
    })
}

/// Closing fence: same character, at least as long, nothing after but spaces.
fn is_closing_fence(line: &str, fence: &FenceState<'_>) -> bool {
    let mut cursor = Cursor::new(line);
    cursor.skip_spaces();
    let closing_len = cursor.eat_while(|b| b == fence.fence_char);
    if closing_len < fence.fence_len {
        return false;
    }
    cursor.skip_spaces();
    cursor.is_eof()
}

/// Strip up to `indent` leading spaces.
fn strip_indent(line: &str, indent: usize) -> &str {
    let spaces = line.bytes().take(indent).take_while(|&b| b == b' ').count();
    &line[spaces..]
}

/// Remainder of a `> text` or `>text` line.
fn quote_remainder(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix('>')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

/// Try to parse an ATX heading. Returns the level and content.
fn parse_atx_heading(line: &str) -> Option<(u8, &str)> {
    let mut cursor = Cursor::new(line.trim_start());
    let level = cursor.eat_while(|b| b == b'#');
    if level == 0 || level > 6 {
        return None;
    }
    // Must be followed by space, tab, or end of line
    if !cursor.is_eof() && !cursor.at(b' ') && !cursor.at(b'\t') {
        return None;
    }
    cursor.skip_spaces();
    Some((level as u8, trim_heading_end(cursor.rest())))
}

/// Trim trailing spaces and an optional closing `#` sequence.
fn trim_heading_end(content: &str) -> &str {
    let content = content.trim_end_matches([' ', '\t']);
    let without_hashes = content.trim_end_matches('#');
    if without_hashes.len() == content.len() {
        return content;
    }
    // Closing hashes must be preceded by space (or be the whole content)
    if without_hashes.is_empty() || without_hashes.ends_with([' ', '\t']) {
        without_hashes.trim_end_matches([' ', '\t'])
    } else {
        content
    }
}

/// Three or more of the same `-`, `*` or `_`, optionally spaced out.
fn is_thematic_break(line: &str) -> bool {
    let trimmed = line.trim();
    let Some(marker) = trimmed.bytes().next() else {
        return false;
    };
    if !matches!(marker, b'-' | b'*' | b'_') {
        return false;
    }

    let mut count = 0;
    for b in trimmed.bytes() {
        if b == marker {
            count += 1;
        } else if b != b' ' && b != b'\t' {
            return false;
        }
    }
    count >= 3
}

/// Parse `-`, `+`, `*` or `N.` followed by whitespace.
fn parse_list_marker(line: &str) -> Option<ListMarker<'_>> {
    let indent = indent_width(line);
    let mut cursor = Cursor::new(line);
    cursor.skip_spaces();

    let kind = match cursor.peek()? {
        b'-' | b'+' | b'*' => {
            cursor.bump();
            ListKind::Unordered
        }
        b'0'..=b'9' => {
            let start = cursor.offset();
            let digits = cursor.eat_while(|b| b.is_ascii_digit());
            if digits > MAX_LIST_MARKER_DIGITS {
                return None;
            }
            let number = cursor.slice_from(start).parse().ok()?;
            if !cursor.eat(b'.') {
                return None;
            }
            ListKind::Ordered { start: number }
        }
        _ => return None,
    };

    if cursor.skip_spaces() == 0 && !cursor.is_eof() {
        return None;
    }

    let (task, content) = split_task(cursor.rest());
    Some(ListMarker {
        kind,
        indent,
        task,
        content: content.trim_end(),
    })
}

/// Split a leading `[ ]`, `[x]` or `[X]` off an item.
fn split_task(content: &str) -> (TaskState, &str) {
    let task = match content.get(..3) {
        Some("[ ]") => TaskState::Unchecked,
        Some("[x]" | "[X]") => TaskState::Checked,
        _ => return (TaskState::None, content),
    };
    let rest = &content[3..];
    match rest.bytes().next() {
        None => (task, rest),
        Some(b' ' | b'\t') => (task, rest.trim_start()),
        Some(_) => (TaskState::None, content),
    }
}
