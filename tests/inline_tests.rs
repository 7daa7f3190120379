//! Inline formatting through the public API.

use replymark::{format_inline, protect, to_html, Options, TokenKind};

fn fmt(text: &str) -> String {
    format_inline(text, &Options::default())
}

const ATTRS: &str = "target=\"_blank\" rel=\"noopener noreferrer\"";

// === Escaping ===

#[test]
fn script_tag_escaped() {
    assert_eq!(
        to_html("<script>alert('x')</script>"),
        "<p>&lt;script&gt;alert('x')&lt;/script&gt;</p>\n"
    );
}

#[test]
fn quotes_and_ampersands_escaped() {
    assert_eq!(fmt("\"a\" & b"), "&quot;a&quot; &amp; b");
}

#[test]
fn entities_are_not_decoded() {
    assert_eq!(fmt("&lt;b&gt;"), "&amp;lt;b&amp;gt;");
}

// === Protection ===

#[test]
fn protect_registers_each_kind() {
    let options = Options {
        dollar_math: true,
        ..Options::default()
    };
    let protected = protect("`c` \\(i\\) \\[d\\] $$e$$", &options);
    assert_eq!(protected.tokens.code, vec!["c"]);
    assert_eq!(protected.tokens.inline_math, vec!["i"]);
    assert_eq!(protected.tokens.display_math, vec!["d", "e"]);
    assert_eq!(protected.tokens.len(), 4);
    assert_eq!(protected.tokens.get(TokenKind::DollarMath, 1), Some("e"));
}

#[test]
fn token_round_trip_order() {
    assert_eq!(
        fmt("`a` \\(x\\) \\[y\\]"),
        "<code>a</code> <span class=\"math-inline\" data-math=\"x\">x</span> \
         <span class=\"math-display\" data-math=\"y\">y</span>"
    );
}

#[test]
fn forged_placeholders_stripped() {
    assert_eq!(fmt("x\u{E000}D0\u{E001}y"), "xD0y");
}

// === Code spans ===

#[test]
fn code_span_escapes_html() {
    assert_eq!(fmt("`<div>`"), "<code>&lt;div&gt;</code>");
}

#[test]
fn double_backtick_span_holds_single() {
    assert_eq!(fmt("``a ` b``"), "<code>a ` b</code>");
}

#[test]
fn code_span_padding_stripped() {
    assert_eq!(fmt("`` `x` ``"), "<code>`x`</code>");
}

#[test]
fn unmatched_backtick_literal() {
    assert_eq!(fmt("a ` b"), "a ` b");
}

// === Emphasis ===

#[test]
fn strong_and_em() {
    assert_eq!(fmt("**b** and *i* and __u__ and _v_"), "<strong>b</strong> and <em>i</em> and <strong>u</strong> and <em>v</em>");
}

#[test]
fn strong_em_triple() {
    assert_eq!(fmt("***both***"), "<strong><em>both</em></strong>");
}

#[test]
fn snake_case_untouched() {
    assert_eq!(fmt("call snake_case_name now"), "call snake_case_name now");
}

#[test]
fn arithmetic_untouched() {
    assert_eq!(fmt("2 * 3 * 4"), "2 * 3 * 4");
}

#[test]
fn unclosed_strong_literal() {
    assert_eq!(fmt("**open"), "**open");
}

// === Links ===

#[test]
fn inline_link() {
    assert_eq!(
        fmt("[Rust](https://rust-lang.org)"),
        format!("<a href=\"https://rust-lang.org\" {ATTRS}>Rust</a>")
    );
}

#[test]
fn bare_domain_link_gets_scheme() {
    assert_eq!(
        fmt("[docs](docs.rs)"),
        format!("<a href=\"https://docs.rs\" {ATTRS}>docs</a>")
    );
}

#[test]
fn link_text_is_formatted() {
    assert_eq!(
        fmt("[*see*](https://x.io)"),
        format!("<a href=\"https://x.io\" {ATTRS}><em>see</em></a>")
    );
}

#[test]
fn link_href_quote_cannot_break_attribute() {
    let html = fmt("[a](https://x.io/\"onmouseover=\"x)");
    assert!(!html.contains("\"onmouseover"), "{html}");
}

#[test]
fn unsafe_schemes_not_linked() {
    for input in ["[a](javascript:x)", "[a](VBScript:x)", "[a](data:text/html,x)"] {
        assert!(!fmt(input).contains("<a "), "{input}");
    }
}

#[test]
fn code_inside_link_text() {
    assert_eq!(
        fmt("[`x`](https://x.io)"),
        format!("<a href=\"https://x.io\" {ATTRS}><code>x</code></a>")
    );
}
