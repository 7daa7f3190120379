//! Inline formatter.
//!
//! Runs in fixed phases over one text-bearing leaf:
//! 1. Protection: code and math spans become placeholders
//! 2. Escaping: `<`, `>`, `&`, `"`
//! 3. Substitution: links, autolinks, emphasis passes
//! 4. Restoration: placeholders become `<code>`, math containers and anchors

mod code_span;
mod emphasis;
mod links;
mod math;
mod protect;

pub use protect::{protect, Protected, TokenKind, TokenRegistry, TOKEN_CLOSE, TOKEN_OPEN};

use crate::escape::{escape_attr_into, escape_text, escape_text_into};
use crate::Options;
use protect::find_placeholder;

/// Format one run of inline text into HTML-safe markup.
///
/// # Example
/// ```
/// use replymark::{format_inline, Options};
///
/// let html = format_inline("**bold** `a<b`", &Options::default());
/// assert_eq!(html, "<strong>bold</strong> <code>a&lt;b</code>");
/// ```
pub fn format_inline(text: &str, options: &Options) -> String {
    let protected = protect(text, options);
    format_protected(&protected, options)
}

/// Format text that has already been through [`protect`].
pub fn format_protected(protected: &Protected, options: &Options) -> String {
    let escaped = escape_text(&protected.text);

    let mut anchors = Vec::new();
    let mut working = links::replace_links(&escaped, &mut anchors);
    if options.autolinks {
        working = links::replace_autolinks(&working, &mut anchors);
    }
    working = emphasis::apply(&working);

    restore(&working, &protected.tokens, &anchors)
}

/// Swap every placeholder in `text` for its final markup.
fn restore(text: &str, tokens: &TokenRegistry, anchors: &[String]) -> String {
    let mut out = String::with_capacity(text.len() + tokens.len() * 32);
    let mut copied = 0;
    let mut pos = 0;

    while let Some(ph) = find_placeholder(text, pos) {
        out.push_str(&text[copied..ph.start]);
        match ph.kind {
            TokenKind::Code => {
                if let Some(code) = tokens.get(TokenKind::Code, ph.index) {
                    out.push_str("<code>");
                    escape_text_into(&mut out, &math_source(code, tokens));
                    out.push_str("</code>");
                }
            }
            TokenKind::DisplayMath | TokenKind::DollarMath | TokenKind::InlineMath => {
                if let Some(source) = tokens.get(ph.kind, ph.index) {
                    push_math(&mut out, ph.kind, source);
                }
            }
            TokenKind::Link | TokenKind::Autolink => {
                if let Some(anchor) = anchors.get(ph.index) {
                    out.push_str(anchor);
                }
            }
        }
        pos = ph.end;
        copied = pos;
    }

    out.push_str(&text[copied..]);
    out
}

/// Math is protected before code, so a code span can hold math
/// placeholders. Put the math back as its delimited source.
fn math_source<'a>(code: &'a str, tokens: &TokenRegistry) -> std::borrow::Cow<'a, str> {
    if !code.contains(TOKEN_OPEN) {
        return std::borrow::Cow::Borrowed(code);
    }

    let mut out = String::with_capacity(code.len() + 16);
    let mut copied = 0;
    let mut pos = 0;
    while let Some(ph) = find_placeholder(code, pos) {
        out.push_str(&code[copied..ph.start]);
        let (open, close) = match ph.kind {
            TokenKind::DisplayMath => ("\\[", "\\]"),
            TokenKind::DollarMath => ("$$", "$$"),
            _ => ("\\(", "\\)"),
        };
        if let Some(source) = tokens.get(ph.kind, ph.index) {
            out.push_str(open);
            out.push_str(source);
            out.push_str(close);
        }
        pos = ph.end;
        copied = pos;
    }
    out.push_str(&code[copied..]);
    std::borrow::Cow::Owned(out)
}

fn push_math(out: &mut String, kind: TokenKind, source: &str) {
    let class = if matches!(kind, TokenKind::DisplayMath | TokenKind::DollarMath) {
        "math-display"
    } else {
        "math-inline"
    };
    out.push_str("<span class=\"");
    out.push_str(class);
    out.push_str("\" data-math=\"");
    escape_attr_into(out, source);
    out.push_str("\">");
    escape_text_into(out, source);
    out.push_str("</span>");
}
