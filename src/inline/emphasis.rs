//! Emphasis, strong emphasis and strikethrough substitution.
//!
//! Runs as a fixed sequence of delimiter passes, longest delimiters first
//! so that `**bold**` is never read as two `*italic*` markers:
//! `***`, `**`, `__`, `~~`, `*`, `_`.
//!
//! A pair only matches when opener and closer sit inside the same element
//! left by earlier passes (or by a link), so the generated tags always nest.

use std::collections::{HashMap, VecDeque};

use super::protect::{parse_placeholder, TokenKind, TOKEN_OPEN};

/// One delimiter pass.
#[derive(Debug, Clone, Copy)]
struct Pass {
    delim: &'static str,
    open: &'static str,
    close: &'static str,
}

const PASSES: [Pass; 6] = [
    Pass {
        delim: "***",
        open: "<strong><em>",
        close: "</em></strong>",
    },
    Pass {
        delim: "**",
        open: "<strong>",
        close: "</strong>",
    },
    Pass {
        delim: "__",
        open: "<strong>",
        close: "</strong>",
    },
    Pass {
        delim: "~~",
        open: "<del>",
        close: "</del>",
    },
    Pass {
        delim: "*",
        open: "<em>",
        close: "</em>",
    },
    Pass {
        delim: "_",
        open: "<em>",
        close: "</em>",
    },
];

/// Apply every emphasis pass to escaped, placeholder-protected text.
pub(crate) fn apply(text: &str) -> String {
    let mut current = text.to_owned();
    for pass in PASSES {
        if current.contains(pass.delim) {
            current = replace_pairs(&current, pass);
        }
    }
    current
}

fn replace_pairs(text: &str, pass: Pass) -> String {
    let delim = pass.delim;
    let scopes = Scopes::new(text);
    let mut closers = closer_queues(text, delim, &scopes);
    let mut out = String::with_capacity(text.len() + 16);
    let mut copied = 0;
    let mut pos = 0;

    while let Some(rel) = text[pos..].find(delim) {
        let opener = pos + rel;
        pos = opener + 1;

        if !can_open(text, opener, delim) {
            continue;
        }

        let content_start = opener + delim.len();
        // Content must be non-empty.
        let Some(first) = char_after(text, content_start) else {
            break;
        };
        let min_close = content_start + first.len_utf8();
        let Some(queue) = closers.get_mut(&scopes.at(opener)) else {
            continue;
        };
        while queue.front().is_some_and(|&at| at < min_close) {
            queue.pop_front();
        }
        let Some(closer) = queue.pop_front() else {
            continue;
        };

        out.push_str(&text[copied..opener]);
        out.push_str(pass.open);
        out.push_str(&text[content_start..closer]);
        out.push_str(pass.close);

        pos = closer + delim.len();
        copied = pos;
    }

    out.push_str(&text[copied..]);
    out
}

/// Every position that can close `delim`, queued per scope in text order.
fn closer_queues(text: &str, delim: &str, scopes: &Scopes) -> HashMap<u32, VecDeque<usize>> {
    let mut queues: HashMap<u32, VecDeque<usize>> = HashMap::new();
    let mut pos = 0;
    while let Some(rel) = text[pos..].find(delim) {
        let at = pos + rel;
        if can_close(text, at, delim) {
            queues.entry(scopes.at(at)).or_default().push_back(at);
        }
        pos = at + 1;
    }
    queues
}

const OPEN_TAGS: [&str; 3] = ["<strong>", "<em>", "<del>"];
const CLOSE_TAGS: [&str; 4] = ["</strong>", "</em>", "</del>", "</a>"];

/// Element scope of every offset in a text.
///
/// Each opened element gets a fresh id; offset 0 and anything outside
/// all elements is scope 0. Two offsets share a scope only if the markup
/// between them is balanced.
struct Scopes {
    /// `(end of tag, scope after it)` in text order.
    marks: Vec<(usize, u32)>,
}

impl Scopes {
    fn new(text: &str) -> Self {
        let mut marks = Vec::new();
        let mut stack: Vec<u32> = Vec::new();
        let mut next = 0u32;
        let mut pos = 0;

        while let Some(rel) = text[pos..].find(['<', TOKEN_OPEN]) {
            let at = pos + rel;
            let rest = &text[at..];
            if let Some(len) = opening_len(text, at) {
                next += 1;
                stack.push(next);
                pos = at + len;
                marks.push((pos, next));
            } else if let Some(tag) = CLOSE_TAGS.iter().find(|tag| rest.starts_with(*tag)) {
                stack.pop();
                pos = at + tag.len();
                marks.push((pos, stack.last().copied().unwrap_or(0)));
            } else {
                pos = at + rest.chars().next().map_or(1, char::len_utf8);
            }
        }

        Self { marks }
    }

    fn at(&self, offset: usize) -> u32 {
        match self.marks.partition_point(|&(end, _)| end <= offset) {
            0 => 0,
            k => self.marks[k - 1].1,
        }
    }
}

/// Length of an element opener at `at`: an emphasis tag or the
/// placeholder standing in for a link's `<a>`.
fn opening_len(text: &str, at: usize) -> Option<usize> {
    let rest = &text[at..];
    if let Some(tag) = OPEN_TAGS.iter().find(|tag| rest.starts_with(*tag)) {
        return Some(tag.len());
    }
    parse_placeholder(text, at)
        .filter(|ph| ph.kind == TokenKind::Link)
        .map(|ph| ph.end - at)
}

fn can_open(text: &str, at: usize, delim: &str) -> bool {
    let after = char_after(text, at + delim.len());
    if after.is_none_or(char::is_whitespace) {
        return false;
    }
    if !flanks_cleanly(text, at, delim) {
        return false;
    }
    // `_` never opens inside a word.
    !(delim.starts_with('_') && char_before(text, at).is_some_and(char::is_alphanumeric))
}

fn can_close(text: &str, at: usize, delim: &str) -> bool {
    let before = char_before(text, at);
    if before.is_none_or(char::is_whitespace) {
        return false;
    }
    if !flanks_cleanly(text, at, delim) {
        return false;
    }
    !(delim.starts_with('_') && char_after(text, at + delim.len()).is_some_and(char::is_alphanumeric))
}

/// Single-character delimiters must not touch another copy of the same
/// character, so leftover `**` never pairs up as `*` + `*`.
fn flanks_cleanly(text: &str, at: usize, delim: &str) -> bool {
    if delim.len() != 1 {
        return true;
    }
    let ch = delim.as_bytes()[0] as char;
    char_before(text, at) != Some(ch) && char_after(text, at + 1) != Some(ch)
}

#[inline]
fn char_before(text: &str, at: usize) -> Option<char> {
    text.get(..at)?.chars().next_back()
}

#[inline]
fn char_after(text: &str, at: usize) -> Option<char> {
    text.get(at..)?.chars().next()
}
