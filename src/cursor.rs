//! Byte cursor for line and cell scanning.
//!
//! All the constructs this crate recognizes start with ASCII markers,
//! so scanning works on bytes and only ever splits the underlying
//! `str` right after an ASCII byte.

/// A cursor for byte-by-byte scanning of a single line or cell.
///
/// # Example
/// ```
/// use replymark::cursor::Cursor;
///
/// let mut cursor = Cursor::new("## Title");
/// assert_eq!(cursor.eat_while(|b| b == b'#'), 2);
/// assert_eq!(cursor.peek(), Some(b' '));
/// cursor.skip_spaces();
/// assert_eq!(cursor.rest(), "Title");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor over a string.
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Current offset from the start of input.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Number of bytes remaining.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    /// Check if cursor is at end of input.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Peek the current byte without advancing.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    /// Peek at byte n positions ahead.
    #[inline]
    pub fn peek_ahead(&self, n: usize) -> Option<u8> {
        self.input.as_bytes().get(self.pos + n).copied()
    }

    /// Check if the current byte equals `b`.
    #[inline]
    pub fn at(&self, b: u8) -> bool {
        self.peek() == Some(b)
    }

    /// Advance by one byte.
    ///
    /// Only call this on an ASCII byte; the cursor never stops inside
    /// a multi-byte character.
    #[inline]
    pub fn bump(&mut self) {
        if !self.is_eof() {
            self.pos += 1;
        }
    }

    /// Consume `b` if it is the current byte.
    #[inline]
    pub fn eat(&mut self, b: u8) -> bool {
        if self.at(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume ASCII bytes while `pred` holds. Returns how many were consumed.
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) -> usize {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if !b.is_ascii() || !pred(b) {
                break;
            }
            self.pos += 1;
        }
        self.pos - start
    }

    /// Skip spaces and tabs. Returns how many bytes were skipped.
    #[inline]
    pub fn skip_spaces(&mut self) -> usize {
        self.eat_while(|b| b == b' ' || b == b'\t')
    }

    /// The unconsumed remainder.
    #[inline]
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Slice of the input between `start` and the current position.
    #[inline]
    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.input[start..self.pos]
    }
}

/// Indentation width of a line, counting a tab as four columns.
#[inline]
pub fn indent_width(line: &str) -> usize {
    line.bytes()
        .take_while(|&b| b == b' ' || b == b'\t')
        .map(|b| if b == b'\t' { 4 } else { 1 })
        .sum()
}

/// Whether a line is empty or whitespace-only.
#[inline]
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
