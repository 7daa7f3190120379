//! Link and autolink substitution.
//!
//! Handles:
//! - Inline links: `[text](url)`
//! - Bare autolinks: `https://example.com`, `http://...`, `www.example.com`
//!
//! Both passes run on already-escaped text. Generated anchor markup is
//! parked behind placeholders so the emphasis passes never see an `href`.

use super::protect::{find_placeholder, push_placeholder, TokenKind, TOKEN_OPEN};

/// Schemes that are never turned into a link.
const UNSAFE_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:"];

/// Anchor attributes shared by every generated link.
const ANCHOR_ATTRS: &str = r#" target="_blank" rel="noopener noreferrer""#;

/// Replace `[text](url)` with a link placeholder followed by the link
/// text and a closing `</a>`.
///
/// The opening tag is appended to `anchors`. Unsafe targets, targets
/// with whitespace and targets holding a placeholder stay literal.
pub(crate) fn replace_links(text: &str, anchors: &mut Vec<String>) -> String {
    if !text.contains("](") {
        return text.to_owned();
    }

    let bytes = text.as_bytes();
    let parens = ParenIndex::new(text);
    let mut out = String::with_capacity(text.len() + 64);
    let mut copied = 0;
    let mut pos = 0;

    while let Some(rel) = memchr::memchr(b'[', &bytes[pos..]) {
        let open = pos + rel;
        pos = open + 1;

        let Some(link) = match_link(text, open, &parens) else {
            continue;
        };
        let url = &text[link.url_start..link.url_end];
        if is_unsafe(url) {
            pos = link.end;
            continue;
        }

        out.push_str(&text[copied..open]);
        push_placeholder(&mut out, TokenKind::Link, anchors.len());
        anchors.push(open_tag(url));
        out.push_str(&text[open + 1..link.text_end]);
        out.push_str("</a>");

        pos = link.end;
        copied = pos;
    }

    out.push_str(&text[copied..]);
    out
}

/// Byte offsets of a matched `[text](url)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LinkMatch {
    /// Position of `]`.
    text_end: usize,
    url_start: usize,
    url_end: usize,
    /// Position after the closing `)`.
    end: usize,
}

/// Matching `)` for every `(`, sorted by the `(` offset.
///
/// Whitespace and placeholders end every open group, so a target never
/// spans them. Built once per text; each `[text](` then looks its target
/// up instead of rescanning to the end.
struct ParenIndex {
    pairs: Vec<(usize, usize)>,
}

impl ParenIndex {
    fn new(text: &str) -> Self {
        let mut open = Vec::new();
        let mut pairs = Vec::new();
        for (i, c) in text.char_indices() {
            match c {
                '(' => open.push(i),
                ')' => {
                    if let Some(start) = open.pop() {
                        pairs.push((start, i));
                    }
                }
                c if c.is_whitespace() || c == TOKEN_OPEN => open.clear(),
                _ => {}
            }
        }
        pairs.sort_unstable();
        Self { pairs }
    }

    fn closer(&self, open: usize) -> Option<usize> {
        let k = self.pairs.binary_search_by_key(&open, |&(start, _)| start).ok()?;
        Some(self.pairs[k].1)
    }
}

fn match_link(text: &str, open: usize, parens: &ParenIndex) -> Option<LinkMatch> {
    let bytes = text.as_bytes();

    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b']' => break,
            // A later `[` gets its own attempt.
            b'[' => return None,
            _ => i += 1,
        }
    }
    if i >= bytes.len() || bytes.get(i + 1) != Some(&b'(') || i == open + 1 {
        return None;
    }
    let text_end = i;
    let url_start = i + 2;

    let url_end = parens.closer(i + 1)?;
    if url_end == url_start {
        return None;
    }

    Some(LinkMatch {
        text_end,
        url_start,
        url_end,
        end: url_end + 1,
    })
}

/// Replace bare URLs with complete anchors, parked behind placeholders.
///
/// A URL must start the text or follow whitespace. Text inside an
/// explicit link is left alone.
pub(crate) fn replace_autolinks(text: &str, anchors: &mut Vec<String>) -> String {
    if !text.contains("http") && !text.contains("www.") {
        return text.to_owned();
    }

    let mut out = String::with_capacity(text.len() + 64);
    let mut copied = 0;
    let mut pos = 0;
    let mut next_link = next_link_placeholder(text, 0);

    while pos < text.len() {
        // Explicit links own everything up to their `</a>`.
        if next_link == Some(pos) {
            pos = text[pos..].find("</a>").map_or(text.len(), |r| pos + r + 4);
            next_link = next_link_placeholder(text, pos);
            continue;
        }

        let rest = &text[pos..];
        let at_boundary = text[..pos].chars().next_back().is_none_or(char::is_whitespace);
        let candidate = at_boundary && url_prefix_len(rest).is_some();

        if candidate {
            let url = autolink_extent(rest);
            let prefix = url_prefix_len(rest).unwrap_or(url.len());
            if url.len() > prefix {
                out.push_str(&text[copied..pos]);
                push_placeholder(&mut out, TokenKind::Autolink, anchors.len());
                let mut anchor = open_tag(url);
                anchor.push_str(url);
                anchor.push_str("</a>");
                anchors.push(anchor);
                pos += url.len();
                copied = pos;
                continue;
            }
        }

        pos += rest.chars().next().map_or(1, char::len_utf8);
    }

    out.push_str(&text[copied..]);
    out
}

fn next_link_placeholder(text: &str, from: usize) -> Option<usize> {
    let mut pos = from;
    while let Some(ph) = find_placeholder(text, pos) {
        if ph.kind == TokenKind::Link {
            return Some(ph.start);
        }
        pos = ph.end;
    }
    None
}

/// Length of a recognized URL prefix at the start of `s`.
fn url_prefix_len(s: &str) -> Option<usize> {
    ["https://", "http://", "www."]
        .into_iter()
        .find(|prefix| {
            s.len() >= prefix.len() && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
        })
        .map(str::len)
}

/// The URL at the start of `s`, with trailing punctuation trimmed.
fn autolink_extent(s: &str) -> &str {
    // Escaped angle brackets and quotes end a URL like the raw characters would.
    let end = s
        .char_indices()
        .find(|&(i, c)| {
            c.is_whitespace()
                || c == TOKEN_OPEN
                || (c == '&' && ["&lt;", "&gt;", "&quot;"].iter().any(|e| s[i..].starts_with(e)))
        })
        .map_or(s.len(), |(i, _)| i);
    let mut url = &s[..end];

    loop {
        let trimmed = url.trim_end_matches(['.', ',', ';', ':', '!', '?']);
        let trimmed = if trimmed.ends_with(')') && unbalanced_close(trimmed) {
            &trimmed[..trimmed.len() - 1]
        } else {
            trimmed
        };
        if trimmed.len() == url.len() {
            return url;
        }
        url = trimmed;
    }
}

fn unbalanced_close(s: &str) -> bool {
    let opens = s.bytes().filter(|&b| b == b'(').count();
    let closes = s.bytes().filter(|&b| b == b')').count();
    closes > opens
}

/// Build an opening `<a>` tag for an escaped URL.
fn open_tag(url: &str) -> String {
    let href = normalize_href(url);
    let mut tag = String::with_capacity(href.len() + ANCHOR_ATTRS.len() + 12);
    tag.push_str("<a href=\"");
    tag.push_str(&href);
    tag.push('"');
    tag.push_str(ANCHOR_ATTRS);
    tag.push('>');
    tag
}

/// Prefix `https://` unless the target has a scheme or is a path or
/// fragment (`/x`, `//cdn/x`, `./x`, `../x`, `#x`).
pub(crate) fn normalize_href(url: &str) -> String {
    if has_scheme(url) || url.starts_with(['/', '#']) || url.starts_with("./") || url.starts_with("../") {
        url.to_owned()
    } else {
        format!("https://{url}")
    }
}

/// `scheme:` per RFC 3986: a letter followed by letters, digits, `+`, `-`, `.`.
pub(crate) fn has_scheme(url: &str) -> bool {
    let Some(colon) = url.find(':') else {
        return false;
    };
    let scheme = url[..colon].as_bytes();
    match scheme.split_first() {
        Some((first, rest)) => {
            first.is_ascii_alphabetic()
                && rest
                    .iter()
                    .all(|&b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'))
        }
        None => false,
    }
}

fn is_unsafe(url: &str) -> bool {
    UNSAFE_SCHEMES.iter().any(|scheme| {
        url.len() >= scheme.len() && url.as_bytes()[..scheme.len()].eq_ignore_ascii_case(scheme.as_bytes())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links(text: &str) -> (String, Vec<String>) {
        let mut anchors = Vec::new();
        let out = replace_links(text, &mut anchors);
        (out, anchors)
    }

    fn autolinks(text: &str) -> (String, Vec<String>) {
        let mut anchors = Vec::new();
        let out = replace_autolinks(text, &mut anchors);
        (out, anchors)
    }

    #[test]
    fn test_inline_link() {
        let (out, anchors) = links("see [docs](example.com/a) now");
        assert_eq!(anchors.len(), 1);
        assert!(anchors[0].starts_with("<a href=\"https://example.com/a\""));
        assert!(out.contains("docs</a> now"));
    }

    #[test]
    fn test_link_with_scheme_kept() {
        let (_, anchors) = links("[a](http://x.io)");
        assert!(anchors[0].contains("href=\"http://x.io\""));
        let (_, anchors) = links("[a](//cdn.io/x)");
        assert!(anchors[0].contains("href=\"//cdn.io/x\""));
        let (_, anchors) = links("[a](/docs#b)");
        assert!(anchors[0].contains("href=\"/docs#b\""));
    }

    #[test]
    fn test_link_balanced_parens() {
        let (out, anchors) = links("[wiki](https://en.wikipedia.org/wiki/Rust_(language)) end");
        assert!(anchors[0].contains("Rust_(language)\""));
        assert!(out.ends_with("wiki</a> end"));
    }

    #[test]
    fn test_unsafe_scheme_not_linked() {
        let (out, anchors) = links("[x](javascript:alert(1))");
        assert!(anchors.is_empty());
        assert_eq!(out, "[x](javascript:alert(1))");
        let (_, anchors) = links("[x](JavaScript:alert(1))");
        assert!(anchors.is_empty());
    }

    #[test]
    fn test_link_with_space_in_url_not_linked() {
        let (out, anchors) = links("[a](b c)");
        assert!(anchors.is_empty());
        assert_eq!(out, "[a](b c)");
    }

    #[test]
    fn test_nested_paren_target_resolved_per_opener() {
        let (out, anchors) = links("[a](b([d](e)");
        assert_eq!(anchors.len(), 1);
        assert!(anchors[0].contains("href=\"https://e\""));
        assert!(out.starts_with("[a](b("));
    }

    #[test]
    fn test_unclosed_targets_stay_literal() {
        let input = "[a](b".repeat(20_000);
        let (out, anchors) = links(&input);
        assert!(anchors.is_empty());
        assert_eq!(out, input);
    }

    #[test]
    fn test_placeholder_in_target_not_linked() {
        let (_, anchors) = links("[a](x\u{E000}C0\u{E001})");
        assert!(anchors.is_empty());
    }

    #[test]
    fn test_empty_link_text_not_linked() {
        let (_, anchors) = links("[](x.com)");
        assert!(anchors.is_empty());
    }

    #[test]
    fn test_autolink_https() {
        let (out, anchors) = autolinks("go to https://example.com/path.");
        assert_eq!(anchors.len(), 1);
        assert!(anchors[0].contains("href=\"https://example.com/path\""));
        assert!(anchors[0].ends_with(">https://example.com/path</a>"));
        assert!(out.ends_with('.'));
    }

    #[test]
    fn test_autolink_www_prefixed() {
        let (_, anchors) = autolinks("www.rust-lang.org");
        assert!(anchors[0].contains("href=\"https://www.rust-lang.org\""));
    }

    #[test]
    fn test_autolink_needs_boundary() {
        let (out, anchors) = autolinks("xhttps://example.com");
        assert!(anchors.is_empty());
        assert_eq!(out, "xhttps://example.com");
    }

    #[test]
    fn test_autolink_unbalanced_paren_trimmed() {
        let (out, anchors) = autolinks("(see https://x.io/a)");
        assert!(anchors[0].contains("href=\"https://x.io/a\""));
        assert!(out.ends_with(')'));
    }

    #[test]
    fn test_bare_prefix_not_linked() {
        let (_, anchors) = autolinks("https:// nothing");
        assert!(anchors.is_empty());
    }

    #[test]
    fn test_autolink_skips_explicit_link_text() {
        let mut anchors = Vec::new();
        let linked = replace_links("[https://a.io](https://a.io) https://b.io", &mut anchors);
        let out = replace_autolinks(&linked, &mut anchors);
        assert_eq!(anchors.len(), 2);
        assert!(anchors[1].contains("https://b.io"));
        assert!(out.contains("https://a.io</a>"));
    }

    #[test]
    fn test_autolink_stops_at_escaped_bracket() {
        let (_, anchors) = autolinks("see https://x.io/a&gt; now");
        assert!(anchors[0].contains("href=\"https://x.io/a\""));
    }

    #[test]
    fn test_has_scheme() {
        assert!(has_scheme("mailto:a@b.c"));
        assert!(has_scheme("git+ssh://x"));
        assert!(!has_scheme("example.com"));
        assert!(!has_scheme(":x"));
    }
}
