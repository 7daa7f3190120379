//! Code span extraction.
//!
//! Backtick runs must match exactly: a run of N backticks opens a span
//! that only a run of exactly N backticks closes.

use memchr::memchr;

use super::protect::{push_placeholder, TokenKind};
use crate::limits::MAX_CODE_SPAN_BACKTICKS;

/// Replace every code span in `text` with a placeholder, appending the
/// span content to `list`.
pub(crate) fn extract(text: &str, list: &mut Vec<String>) -> String {
    let bytes = text.as_bytes();
    if memchr(b'`', bytes).is_none() {
        return text.to_owned();
    }

    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut pos = 0;
    // Run lengths known to have no closer past the current position.
    let mut exhausted = [false; MAX_CODE_SPAN_BACKTICKS + 1];

    while let Some(rel) = memchr(b'`', &bytes[pos..]) {
        let opener = pos + rel;
        let run = run_length(bytes, opener);
        pos = opener + run;

        if run > MAX_CODE_SPAN_BACKTICKS || exhausted[run] {
            continue;
        }

        let Some(closer) = find_closer(bytes, pos, run) else {
            exhausted[run] = true;
            continue;
        };

        out.push_str(&text[copied..opener]);
        push_placeholder(&mut out, TokenKind::Code, list.len());
        list.push(strip_padding(&text[pos..closer]).to_owned());

        pos = closer + run;
        copied = pos;
    }

    out.push_str(&text[copied..]);
    out
}

#[inline]
fn run_length(bytes: &[u8], start: usize) -> usize {
    bytes[start..].iter().take_while(|&&b| b == b'`').count()
}

/// First backtick run of exactly `len` at or after `from`.
fn find_closer(bytes: &[u8], from: usize, len: usize) -> Option<usize> {
    let mut pos = from;
    while let Some(rel) = memchr(b'`', &bytes[pos..]) {
        let start = pos + rel;
        let run = run_length(bytes, start);
        if run == len {
            return Some(start);
        }
        pos = start + run;
    }
    None
}

/// Strip one space from each side when both sides have one and the
/// content is not all spaces.
#[inline]
fn strip_padding(content: &str) -> &str {
    if content.len() >= 2
        && content.starts_with(' ')
        && content.ends_with(' ')
        && !content.bytes().all(|b| b == b' ')
    {
        &content[1..content.len() - 1]
    } else {
        content
    }
}
