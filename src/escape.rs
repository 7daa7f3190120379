//! HTML escaping utilities.
//!
//! Fast-path optimized: scans for first escapable character,
//! then bulk-copies segments between escapes.
//!
//! Every replacement is pure ASCII and every split point sits on an
//! ASCII byte, so slicing the input `str` at those points is always
//! on a char boundary.

use memchr::{memchr, memchr2, memchr3};

/// Lookup table for escapable characters in text content.
/// Index by byte value, true if needs escaping.
/// `"` is escaped as well so escaped text can be dropped into an attribute.
const TEXT_ESCAPE_TABLE: [bool; 256] = {
    let mut table = [false; 256];
    table[b'<' as usize] = true;
    table[b'>' as usize] = true;
    table[b'&' as usize] = true;
    table[b'"' as usize] = true;
    table
};

/// Lookup table for escapable characters in attributes.
const ATTR_ESCAPE_TABLE: [bool; 256] = {
    let mut table = [false; 256];
    table[b'<' as usize] = true;
    table[b'>' as usize] = true;
    table[b'&' as usize] = true;
    table[b'"' as usize] = true;
    table[b'\'' as usize] = true;
    table
};

/// Escape HTML text content into output buffer.
///
/// Escapes `<`, `>`, `&` and `"` to their HTML entity equivalents.
///
/// # Example
/// ```
/// use replymark::escape::escape_text_into;
///
/// let mut out = String::new();
/// escape_text_into(&mut out, "<script>");
/// assert_eq!(out, "&lt;script&gt;");
/// ```
#[inline]
pub fn escape_text_into(out: &mut String, input: &str) {
    let first = first_text_escape(input.as_bytes());
    escape_into_with_table(out, input, first, &TEXT_ESCAPE_TABLE)
}

/// Escape HTML attribute value into output buffer.
///
/// Escapes `<`, `>`, `&`, `"`, and `'` to their HTML entity equivalents.
///
/// # Example
/// ```
/// use replymark::escape::escape_attr_into;
///
/// let mut out = String::new();
/// escape_attr_into(&mut out, "value=\"test\"");
/// assert_eq!(out, "value=&quot;test&quot;");
/// ```
#[inline]
pub fn escape_attr_into(out: &mut String, input: &str) {
    let first = first_attr_escape(input.as_bytes());
    escape_into_with_table(out, input, first, &ATTR_ESCAPE_TABLE)
}

/// Internal escaping with a custom lookup table.
#[inline]
fn escape_into_with_table(
    out: &mut String,
    input: &str,
    first: Option<usize>,
    escape_table: &[bool; 256],
) {
    let bytes = input.as_bytes();
    let mut pos = match first {
        Some(p) => p,
        None => {
            out.push_str(input);
            return;
        }
    };

    out.reserve(input.len() + input.len() / 8);
    out.push_str(&input[..pos]);

    while pos < bytes.len() {
        let scan_start = pos;
        while pos < bytes.len() && !escape_table[bytes[pos] as usize] {
            pos += 1;
        }

        if pos > scan_start {
            out.push_str(&input[scan_start..pos]);
        }

        if pos < bytes.len() {
            out.push_str(match bytes[pos] {
                b'<' => "&lt;",
                b'>' => "&gt;",
                b'&' => "&amp;",
                b'"' => "&quot;",
                _ => "&#39;",
            });
            pos += 1;
        }
    }
}

#[inline]
fn first_text_escape(input: &[u8]) -> Option<usize> {
    let a = memchr3(b'<', b'>', b'&', input);
    let b = memchr(b'"', input);
    min_opt(a, b)
}

#[inline]
fn first_attr_escape(input: &[u8]) -> Option<usize> {
    let a = memchr3(b'<', b'>', b'&', input);
    let b = memchr2(b'"', b'\'', input);
    min_opt(a, b)
}

#[inline]
fn min_opt(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

/// Escape and return as a new String.
///
/// Prefer `escape_text_into` to reuse buffers.
pub fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 8);
    escape_text_into(&mut out, input);
    out
}

/// Escape an attribute value and return as a new String.
pub fn escape_attr(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 8);
    escape_attr_into(&mut out, input);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text_basic() {
        let mut out = String::new();
        escape_text_into(&mut out, "Hello, World!");
        assert_eq!(out, "Hello, World!");
    }

    #[test]
    fn test_escape_text_lt() {
        assert_eq!(escape_text("<script>"), "&lt;script&gt;");
    }

    #[test]
    fn test_escape_text_amp() {
        assert_eq!(escape_text("a & b"), "a &amp; b");
    }

    #[test]
    fn test_escape_text_mixed() {
        assert_eq!(
            escape_text("<a href=\"test\">link & stuff</a>"),
            "&lt;a href=&quot;test&quot;&gt;link &amp; stuff&lt;/a&gt;"
        );
    }

    #[test]
    fn test_escape_text_keeps_single_quote() {
        assert_eq!(escape_text("it's"), "it's");
    }

    #[test]
    fn test_escape_empty() {
        assert_eq!(escape_text(""), "");
        assert_eq!(escape_attr(""), "");
    }

    #[test]
    fn test_escape_attr_all() {
        assert_eq!(escape_attr("<>&\"'"), "&lt;&gt;&amp;&quot;&#39;");
    }

    #[test]
    fn test_escape_at_boundaries() {
        assert_eq!(escape_text("<"), "&lt;");
        assert_eq!(escape_text("hello<"), "hello&lt;");
        assert_eq!(escape_text("<hello"), "&lt;hello");
    }

    #[test]
    fn test_escape_unicode() {
        assert_eq!(escape_text("Grüße <tag> \u{E000}"), "Grüße &lt;tag&gt; \u{E000}");
    }
}
