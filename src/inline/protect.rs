//! Placeholder protection for code and math spans.
//!
//! Protected spans are cut out of the text before any inline transform
//! runs and replaced by `U+E000 <kind> <index> U+E001`. The registry that
//! owns the cut-out source lives only as long as one render call.

use std::fmt::Write;

use memchr::memmem;

use super::{code_span, math};
use crate::Options;

/// Opening delimiter of a placeholder token (private-use area).
pub const TOKEN_OPEN: char = '\u{E000}';
/// Closing delimiter of a placeholder token (private-use area).
pub const TOKEN_CLOSE: char = '\u{E001}';

const TOKEN_OPEN_UTF8: &[u8] = "\u{E000}".as_bytes();

/// What a placeholder stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Backtick code span.
    Code,
    /// `\[...\]`.
    DisplayMath,
    /// `$$...$$`. Renders like [`TokenKind::DisplayMath`] and shares its list.
    DollarMath,
    /// `\(...\)`.
    InlineMath,
    /// Opening `<a>` tag of an explicit `[text](url)` link.
    Link,
    /// Complete anchor for a bare URL.
    Autolink,
}

impl TokenKind {
    #[inline]
    fn tag(self) -> char {
        match self {
            Self::Code => 'C',
            Self::DisplayMath => 'D',
            Self::DollarMath => 'S',
            Self::InlineMath => 'M',
            Self::Link => 'L',
            Self::Autolink => 'A',
        }
    }

    #[inline]
    fn from_tag(b: u8) -> Option<Self> {
        match b {
            b'C' => Some(Self::Code),
            b'D' => Some(Self::DisplayMath),
            b'S' => Some(Self::DollarMath),
            b'M' => Some(Self::InlineMath),
            b'L' => Some(Self::Link),
            b'A' => Some(Self::Autolink),
            _ => None,
        }
    }
}

/// Source text of the protected spans, indexed by placeholder number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenRegistry {
    pub code: Vec<String>,
    pub display_math: Vec<String>,
    pub inline_math: Vec<String>,
}

impl TokenRegistry {
    /// Look up the source of a protected span.
    pub fn get(&self, kind: TokenKind, index: usize) -> Option<&str> {
        let list = match kind {
            TokenKind::Code => &self.code,
            TokenKind::DisplayMath | TokenKind::DollarMath => &self.display_math,
            TokenKind::InlineMath => &self.inline_math,
            TokenKind::Link | TokenKind::Autolink => return None,
        };
        list.get(index).map(String::as_str)
    }

    /// Total number of protected spans.
    pub fn len(&self) -> usize {
        self.code.len() + self.display_math.len() + self.inline_math.len()
    }

    /// Whether nothing was protected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Text with protected spans replaced by placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Protected {
    pub text: String,
    pub tokens: TokenRegistry,
}

/// Cut code and math spans out of `raw`.
///
/// Order is fixed: display math, then inline math, then code spans.
///
/// # Example
/// ```
/// use replymark::{protect, Options};
///
/// let p = protect("`a` \\(x\\)", &Options::default());
/// assert_eq!(p.tokens.code, vec!["a"]);
/// assert_eq!(p.tokens.inline_math, vec!["x"]);
/// assert!(!p.text.contains('`'));
/// ```
pub fn protect(raw: &str, options: &Options) -> Protected {
    let mut text = strip_token_delimiters(raw);
    let mut tokens = TokenRegistry::default();

    if options.math {
        text = math::extract(&text, "\\[", "\\]", TokenKind::DisplayMath, &mut tokens.display_math);
        if options.dollar_math {
            text = math::extract(&text, "$$", "$$", TokenKind::DollarMath, &mut tokens.display_math);
        }
        text = math::extract(&text, "\\(", "\\)", TokenKind::InlineMath, &mut tokens.inline_math);
    }
    text = code_span::extract(&text, &mut tokens.code);

    Protected { text, tokens }
}

/// Input can never carry its own placeholders.
fn strip_token_delimiters(raw: &str) -> String {
    if raw.contains([TOKEN_OPEN, TOKEN_CLOSE]) {
        raw.chars().filter(|&c| c != TOKEN_OPEN && c != TOKEN_CLOSE).collect()
    } else {
        raw.to_owned()
    }
}

/// Append a placeholder for entry `index` of `kind`.
#[inline]
pub(crate) fn push_placeholder(out: &mut String, kind: TokenKind, index: usize) {
    out.push(TOKEN_OPEN);
    out.push(kind.tag());
    let _ = write!(out, "{index}");
    out.push(TOKEN_CLOSE);
}

/// A placeholder located in a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Placeholder {
    /// Byte offset of `TOKEN_OPEN`.
    pub start: usize,
    /// Byte offset just past `TOKEN_CLOSE`.
    pub end: usize,
    pub kind: TokenKind,
    pub index: usize,
}

/// Parse the placeholder starting exactly at `start`.
pub(crate) fn parse_placeholder(text: &str, start: usize) -> Option<Placeholder> {
    let rest = text.get(start..)?.strip_prefix(TOKEN_OPEN)?;
    let bytes = rest.as_bytes();
    let kind = TokenKind::from_tag(*bytes.first()?)?;
    let digits = bytes[1..].iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 || digits > 9 {
        return None;
    }
    let index: usize = rest[1..1 + digits].parse().ok()?;
    let tail = rest[1 + digits..].strip_prefix(TOKEN_CLOSE)?;
    let end = text.len() - tail.len();
    Some(Placeholder { start, end, kind, index })
}

/// Find the next well-formed placeholder at or after `from`.
pub(crate) fn find_placeholder(text: &str, from: usize) -> Option<Placeholder> {
    let finder = memmem::Finder::new(TOKEN_OPEN_UTF8);
    let mut pos = from;
    while pos < text.len() {
        let found = pos + finder.find(&text.as_bytes()[pos..])?;
        if let Some(ph) = parse_placeholder(text, found) {
            return Some(ph);
        }
        pos = found + TOKEN_OPEN_UTF8.len();
    }
    None
}
