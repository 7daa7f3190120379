//! Math span extraction.
//!
//! `\[...\]` and `$$...$$` are display math, `\(...\)` is inline math.
//! Matching is non-greedy: each opener pairs with the first closer after it.
//! Content inside is not parsed for inline markup.

use super::protect::{push_placeholder, TokenKind};

/// Replace every `open ... close` span in `text` with a placeholder,
/// appending the span content to `list`.
///
/// Spans with blank content stay literal. An opener preceded by a
/// backslash (`\\[` is a LaTeX line break) is not an opener.
pub(crate) fn extract(
    text: &str,
    open: &str,
    close: &str,
    kind: TokenKind,
    list: &mut Vec<String>,
) -> String {
    if !text.contains(open) {
        return text.to_owned();
    }

    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut pos = 0;

    while let Some(opener) = find_opener(text, pos, open) {
        let content_start = opener + open.len();
        let Some(rel) = text[content_start..].find(close) else {
            // No closer after this opener means none after any later one either.
            break;
        };
        let content_end = content_start + rel;
        let content = &text[content_start..content_end];

        if content.trim().is_empty() {
            pos = content_start;
            continue;
        }

        out.push_str(&text[copied..opener]);
        push_placeholder(&mut out, kind, list.len());
        list.push(content.to_owned());

        pos = content_end + close.len();
        copied = pos;
    }

    out.push_str(&text[copied..]);
    out
}

/// Next opener at or after `from` that is not backslash-escaped.
fn find_opener(text: &str, from: usize, open: &str) -> Option<usize> {
    let mut pos = from;
    while let Some(rel) = text.get(pos..)?.find(open) {
        let at = pos + rel;
        let escaped = open.starts_with('\\') && at > 0 && text.as_bytes()[at - 1] == b'\\';
        if !escaped {
            return Some(at);
        }
        pos = at + open.len();
    }
    None
}
