//! Numeric cell formatting.

use replymark::NumericCell;

fn cell(raw: &str) -> (bool, String, String) {
    let cell = NumericCell::format(raw);
    (cell.is_numeric, cell.value, cell.suffix)
}

fn numeric(value: &str, suffix: &str) -> (bool, String, String) {
    (true, value.to_string(), suffix.to_string())
}

#[test]
fn currency_percent_negative() {
    assert_eq!(cell("-$1,234.5%"), numeric("-$1,234.50%", ""));
}

#[test]
fn small_ratio_keeps_three_decimals() {
    assert_eq!(cell("0.125x leverage"), numeric("0.125", "x leverage"));
}

#[test]
fn not_numeric_returned_trimmed() {
    assert_eq!(cell("  N/A "), (false, "N/A".to_string(), String::new()));
    assert_eq!(cell("abc 12"), (false, "abc 12".to_string(), String::new()));
}

#[test]
fn magnitude_tiers() {
    assert_eq!(cell("0.5").1, "0.500");
    assert_eq!(cell("42").1, "42.00");
    assert_eq!(cell("999.999").1, "1,000.00");
    assert_eq!(cell("1000").1, "1,000");
    assert_eq!(cell("12345678.9").1, "12,345,679");
}

#[test]
fn explicit_plus_kept() {
    assert_eq!(cell("+12bps"), numeric("+12.00", "bps"));
    assert_eq!(cell("+$2,500"), numeric("+$2,500", ""));
}

#[test]
fn suffix_trimmed() {
    assert_eq!(cell("3.2 x"), numeric("3.20", "x"));
}

#[test]
fn percent_always_two_decimals() {
    assert_eq!(cell("0.5%").1, "0.50%");
    assert_eq!(cell("1500%").1, "1,500.00%");
}

#[test]
fn sign_or_currency_alone_not_numeric() {
    for raw in ["", "-", "+", "$", "-$", "%"] {
        assert!(!NumericCell::format(raw).is_numeric, "{raw:?}");
    }
}
