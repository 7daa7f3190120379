//! Heuristic ASCII-table renderer.
//!
//! Plain data dumps often arrive as pipe-delimited rows with a dashed
//! separator but without a valid GFM alignment row:
//!
//! ```text
//! Name  | Revenue | Margin
//! ------+---------+-------
//! Acme  | $1,200  | 0.125
//! ```
//!
//! Blank-line separated runs that look like this become table nodes.
//! Everything else goes through the Markdown block scanner unchanged.

use std::borrow::Cow;

use html_escape::decode_html_entities;

use crate::block::BlockParser;
use crate::cursor::is_blank;
use crate::document::{Block, Table, TableSource};
use crate::escape::escape_text;
use crate::limits::MAX_ASCII_TABLE_COLUMNS;
use crate::numeric::NumericCell;
use crate::Options;

/// A table recognized by the heuristic detector. Cells are plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciiTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl AsciiTable {
    /// Body cells run through the numeric formatter.
    pub fn formatted_rows(&self) -> Vec<Vec<NumericCell>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|cell| NumericCell::format(cell)).collect())
            .collect()
    }

    /// Convert into a document node with HTML-escaped cells.
    pub fn into_block(self) -> Block {
        let escape_all = |cells: Vec<String>| cells.iter().map(|cell| escape_text(cell)).collect::<Vec<_>>();
        Block::Table(Table {
            headers: escape_all(self.headers),
            alignments: Vec::new(),
            rows: self.rows.into_iter().map(escape_all).collect(),
            source: TableSource::Ascii,
        })
    }
}

/// Best-effort normalization of one line before detection.
///
/// Decodes HTML entities and folds box-drawing and full-width
/// characters onto `|`, `-` and `+`. Lines that need nothing are
/// borrowed.
pub fn normalize_line(line: &str) -> Cow<'_, str> {
    let decoded = decode_html_entities(line);
    if decoded.is_ascii() {
        return decoded;
    }
    Cow::Owned(decoded.chars().map(fold_char).collect())
}

fn fold_char(c: char) -> char {
    match c {
        '│' | '┃' | '║' | '｜' => '|',
        '─' | '━' | '═' => '-',
        '┼' | '╋' | '╬' | '├' | '┤' | '┬' | '┴' | '┌' | '┐' | '└' | '┘' | '╔' | '╗' | '╚' | '╝' | '╠' | '╣'
        | '╦' | '╩' => '+',
        '\u{00A0}' => ' ',
        other => other,
    }
}

/// A separator row is non-blank and holds only whitespace, `-`, `+`,
/// `=` and `|`.
pub fn is_separator_row(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| matches!(c, '-' | '+' | '=' | '|') || c.is_whitespace())
}

/// Split a row on `|`, trimming cells and dropping empty ones.
pub fn split_row(line: &str) -> Vec<String> {
    line.split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .take(MAX_ASCII_TABLE_COLUMNS)
        .map(str::to_owned)
        .collect()
}

/// Whether a block of lines looks like an ASCII table.
///
/// The header is the first non-separator line, so a frame border above
/// it is ignored. Needs at least two non-blank lines, a `|` in the
/// header, a separator row after it, and `|` on at least two lines.
pub fn looks_like_table<S: AsRef<str>>(lines: &[S]) -> bool {
    let lines: Vec<&str> = lines
        .iter()
        .map(|line| line.as_ref())
        .filter(|line: &&str| !is_blank(line))
        .collect();
    if lines.len() < 2 {
        return false;
    }
    let Some(header) = lines.iter().position(|line| !is_separator_row(line)) else {
        return false;
    };
    if !lines[header].contains('|') {
        return false;
    }
    let has_separator = lines[header + 1..].iter().any(|line| is_separator_row(line));
    let piped = lines.iter().filter(|line| line.trim().contains('|')).count();
    has_separator && piped >= 2
}

/// Parse a block that [`looks_like_table`].
///
/// Leading separator lines (a frame's top border) are skipped and the
/// header comes from the first non-separator line. Body rows are the
/// pipe-bearing lines after the first separator that follows the
/// header; lines between header and separator are skipped, and so are
/// further separator lines, which carry no cell text. Returns `None`
/// when the header yields no cells or no separator follows it.
pub fn parse_table<S: AsRef<str>>(lines: &[S]) -> Option<AsciiTable> {
    let mut lines = lines
        .iter()
        .map(|line| line.as_ref())
        .filter(|line: &&str| !is_blank(line))
        .skip_while(|line| is_separator_row(line));
    let headers = split_row(lines.next()?);
    if headers.is_empty() {
        return None;
    }

    let mut lines = lines.skip_while(|line| !is_separator_row(line));
    lines.next()?;

    let rows = lines
        .filter(|line| line.contains('|') && !is_separator_row(line))
        .map(split_row)
        .collect();

    Some(AsciiTable { headers, rows })
}

/// Render plain text: table-like runs become tables, the rest is
/// scanned as Markdown.
pub(crate) fn render_plain(input: &str, options: &Options, out: &mut Vec<Block>) {
    let raw: Vec<&str> = input.lines().collect();
    let normalized: Vec<Cow<'_, str>> = raw.iter().map(|line| normalize_line(line)).collect();

    let mut pending: Vec<&str> = Vec::new();
    let mut in_fence = false;
    let mut start = 0;

    while start < normalized.len() {
        if is_blank(&normalized[start]) {
            pending.push(raw[start]);
            start += 1;
            continue;
        }
        let end = normalized[start..]
            .iter()
            .position(|line| is_blank(line))
            .map_or(normalized.len(), |n| start + n);
        let run = &normalized[start..end];

        // Runs inside or around a fence are code, never tables.
        let fenced_run = in_fence || run.iter().any(|line| is_fence_line(line));
        for line in run {
            if is_fence_line(line) {
                in_fence = !in_fence;
            }
        }

        let candidate = !fenced_run && looks_like_table(run);
        match candidate.then(|| parse_table(run)).flatten() {
            Some(table) => {
                flush_markdown(&mut pending, options, out);
                out.push(table.into_block());
            }
            None => {
                if candidate {
                    debug_event!(lines = run.len(), "ascii run handed back to markdown");
                }
                pending.extend_from_slice(&raw[start..end]);
            }
        }
        start = end;
    }

    flush_markdown(&mut pending, options, out);
}

fn is_fence_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

fn flush_markdown<'a>(pending: &mut Vec<&'a str>, options: &Options, out: &mut Vec<Block>) {
    if pending.iter().all(|line| is_blank(line)) {
        pending.clear();
        return;
    }
    BlockParser::new(*options).parse_lines(pending.drain(..), out);
}
