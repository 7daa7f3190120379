//! GFM pipe-table helpers.
//!
//! A table is a header row, an alignment row and any number of body
//! rows. The block scanner decides when a table opens and closes; this
//! module only classifies and splits lines.

use smallvec::SmallVec;

use crate::document::{Alignment, Block, Table, TableSource};
use crate::inline::format_inline;
use crate::limits::MAX_TABLE_COLUMNS;
use crate::Options;

/// Split cells; most tables fit inline.
pub(crate) type Cells = SmallVec<[String; 8]>;

/// Whether a line is a pipe row: trimmed, it starts and ends with `|`.
#[inline]
pub(crate) fn is_pipe_row(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 2 && trimmed.starts_with('|') && trimmed.ends_with('|')
}

/// Parse an alignment row like `| :--- | ---: | :---: |`.
///
/// Every segment must be dashes with optional colons on either side.
pub(crate) fn parse_alignment_row(line: &str) -> Option<SmallVec<[Alignment; 8]>> {
    let trimmed = line.trim();
    if !trimmed.contains('|') {
        return None;
    }
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);

    let mut alignments = SmallVec::new();
    for segment in inner.split('|') {
        let segment = segment.trim();
        let left = segment.starts_with(':');
        let right = segment.ends_with(':');
        let dashes = segment.strip_prefix(':').unwrap_or(segment);
        let dashes = dashes.strip_suffix(':').unwrap_or(dashes);
        if dashes.is_empty() || !dashes.bytes().all(|b| b == b'-') {
            return None;
        }
        let alignment = match (left, right) {
            (true, true) => Alignment::Center,
            (false, true) => Alignment::Right,
            _ => Alignment::Left,
        };
        if alignments.len() < MAX_TABLE_COLUMNS {
            alignments.push(alignment);
        }
    }
    Some(alignments)
}

/// Split a pipe row into raw cell strings.
///
/// Pipes inside code spans and `\(...\)` math do not split, and `\|`
/// is an escaped literal pipe.
pub(crate) fn split_cells(line: &str) -> Cells {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    let bytes = inner.as_bytes();

    let mut cells = Cells::new();
    let mut current = String::new();
    let mut copied = 0;
    let mut i = 0;
    let mut code_run = 0usize;
    let mut in_math = false;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' if bytes.get(i + 1) == Some(&b'|') => {
                current.push_str(&inner[copied..i]);
                current.push('|');
                i += 2;
                copied = i;
                continue;
            }
            b'\\' if code_run == 0 && bytes.get(i + 1) == Some(&b'(') => {
                in_math = true;
                i += 2;
                continue;
            }
            b'\\' if code_run == 0 && bytes.get(i + 1) == Some(&b')') => {
                in_math = false;
                i += 2;
                continue;
            }
            b'`' if !in_math => {
                let run = bytes[i..].iter().take_while(|&&b| b == b'`').count();
                if code_run == 0 {
                    // Only open when a matching run closes it on this line.
                    if has_closing_run(&bytes[i + run..], run) {
                        code_run = run;
                    }
                } else if run == code_run {
                    code_run = 0;
                }
                i += run;
                continue;
            }
            b'|' if code_run == 0 && !in_math => {
                current.push_str(&inner[copied..i]);
                push_cell(&mut cells, &mut current);
                i += 1;
                copied = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    current.push_str(&inner[copied..]);
    push_cell(&mut cells, &mut current);
    cells
}

fn push_cell(cells: &mut Cells, current: &mut String) {
    if cells.len() < MAX_TABLE_COLUMNS {
        cells.push(current.trim().to_owned());
    }
    current.clear();
}

fn has_closing_run(bytes: &[u8], len: usize) -> bool {
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let run = bytes[i..].iter().take_while(|&&b| b == b'`').count();
            if run == len {
                return true;
            }
            i += run;
        } else {
            i += 1;
        }
    }
    false
}

/// Accumulates one Markdown table while the scanner is inside it.
#[derive(Debug)]
pub(crate) struct TableBuilder {
    headers: Vec<String>,
    alignments: Vec<Alignment>,
    rows: Vec<Vec<String>>,
}

impl TableBuilder {
    /// Open a table from its header row.
    pub(crate) fn new(header: &str, alignments: &[Alignment], options: &Options) -> Self {
        Self {
            headers: format_cells(header, options),
            alignments: alignments.to_vec(),
            rows: Vec::new(),
        }
    }

    /// Add a body row.
    pub(crate) fn push_row(&mut self, line: &str, options: &Options) {
        self.rows.push(format_cells(line, options));
    }

    /// Finish the table. Returns `None` when the header has no cells.
    pub(crate) fn finish(self) -> Option<Block> {
        if self.headers.iter().all(String::is_empty) {
            debug_event!(rows = self.rows.len(), "table without header cells omitted");
            return None;
        }
        Some(Block::Table(Table {
            headers: self.headers,
            alignments: self.alignments,
            rows: self.rows,
            source: TableSource::Markdown,
        }))
    }
}

fn format_cells(line: &str, options: &Options) -> Vec<String> {
    split_cells(line)
        .iter()
        .map(|cell| format_inline(cell, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pipe_row() {
        assert!(is_pipe_row("| a | b |"));
        assert!(is_pipe_row("  |a|  "));
        assert!(!is_pipe_row("a | b"));
        assert!(!is_pipe_row("|"));
        assert!(!is_pipe_row(""));
    }

    #[test]
    fn test_alignment_row() {
        let aligns = parse_alignment_row("| :--- | ---: | :---: | --- |").unwrap();
        assert_eq!(
            aligns.as_slice(),
            &[Alignment::Left, Alignment::Right, Alignment::Center, Alignment::Left]
        );
    }

    #[test]
    fn test_alignment_row_without_outer_pipes() {
        let aligns = parse_alignment_row("---|:-:").unwrap();
        assert_eq!(aligns.as_slice(), &[Alignment::Left, Alignment::Center]);
    }

    #[test]
    fn test_alignment_row_invalid() {
        assert!(parse_alignment_row("| a | b |").is_none());
        assert!(parse_alignment_row("| --- | |").is_none());
        assert!(parse_alignment_row("| : |").is_none());
        assert!(parse_alignment_row("---").is_none());
    }

    #[test]
    fn test_split_cells() {
        assert_eq!(split_cells("| a | b | c |").as_slice(), &["a", "b", "c"]);
    }

    #[test]
    fn test_split_cells_keeps_empty() {
        assert_eq!(split_cells("| a |  | c |").as_slice(), &["a", "", "c"]);
    }

    #[test]
    fn test_split_cells_escaped_pipe() {
        assert_eq!(split_cells("| a \\| b | c |").as_slice(), &["a | b", "c"]);
    }

    #[test]
    fn test_split_cells_pipe_in_code() {
        assert_eq!(split_cells("| `a|b` | c |").as_slice(), &["`a|b`", "c"]);
    }

    #[test]
    fn test_split_cells_pipe_in_math() {
        assert_eq!(split_cells("| \\(|x|\\) | c |").as_slice(), &["\\(|x|\\)", "c"]);
    }

    #[test]
    fn test_split_cells_unclosed_backtick() {
        assert_eq!(split_cells("| `a | b |").as_slice(), &["`a", "b"]);
    }

    #[test]
    fn test_builder_formats_cells() {
        let options = Options::default();
        let mut builder = TableBuilder::new("| **a** | b |", &[Alignment::Left, Alignment::Right], &options);
        builder.push_row("| `x` | <y> |", &options);
        let Some(Block::Table(table)) = builder.finish() else {
            panic!("expected table");
        };
        assert_eq!(table.headers, vec!["<strong>a</strong>", "b"]);
        assert_eq!(table.rows, vec![vec!["<code>x</code>", "&lt;y&gt;"]]);
        assert_eq!(table.source, TableSource::Markdown);
    }

    #[test]
    fn test_builder_empty_header_omitted() {
        let options = Options::default();
        let builder = TableBuilder::new("| | |", &[], &options);
        assert!(builder.finish().is_none());
    }
}
