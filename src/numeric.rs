//! Numeric table cell formatting.
//!
//! A cell is read as `[+-][$]digits[,digits][.digits][%] suffix` and
//! rewritten with magnitude-dependent precision and comma grouping.

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::cursor::Cursor;

/// A table cell after numeric formatting.
///
/// # Example
/// ```
/// use replymark::NumericCell;
///
/// let cell = NumericCell::format("0.125x leverage");
/// assert!(cell.is_numeric);
/// assert_eq!(cell.value, "0.125");
/// assert_eq!(cell.suffix, "x leverage");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct NumericCell {
    pub is_numeric: bool,
    /// Formatted number, or the trimmed input when not numeric.
    pub value: String,
    /// Free-form text after the number (`bps`, `x`, ...).
    pub suffix: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    None,
    Minus,
    Plus,
}

impl NumericCell {
    /// Format a raw cell. Never fails: anything that is not a finite
    /// number comes back unchanged with `is_numeric == false`.
    pub fn format(raw: &str) -> Self {
        let trimmed = raw.trim();
        parse(trimmed).unwrap_or_else(|| Self {
            is_numeric: false,
            value: trimmed.to_owned(),
            suffix: String::new(),
        })
    }
}

fn parse(cell: &str) -> Option<NumericCell> {
    let mut cursor = Cursor::new(cell);

    let sign = if cursor.eat(b'-') {
        Sign::Minus
    } else if cursor.eat(b'+') {
        Sign::Plus
    } else {
        Sign::None
    };
    let currency = cursor.eat(b'$');

    if !cursor.peek().is_some_and(|b| b.is_ascii_digit()) {
        return None;
    }
    let core_start = cursor.offset();
    cursor.eat_while(|b| b.is_ascii_digit() || b == b',');
    if cursor.at(b'.') && cursor.peek_ahead(1).is_some_and(|b| b.is_ascii_digit()) {
        cursor.bump();
        cursor.eat_while(|b| b.is_ascii_digit());
    }
    let core = cursor.slice_from(core_start);
    let percent = cursor.eat(b'%');
    let suffix = cursor.rest().trim();

    let number: f64 = core.replace(',', "").parse().ok()?;
    if !number.is_finite() {
        return None;
    }

    let decimals = if percent {
        2
    } else if number < 1.0 {
        3
    } else if number < 1000.0 {
        2
    } else {
        0
    };

    let mut value = String::with_capacity(core.len() + 8);
    match sign {
        Sign::Minus => value.push('-'),
        Sign::Plus => value.push('+'),
        Sign::None => {}
    }
    if currency {
        value.push('$');
    }
    push_grouped(&mut value, &format!("{number:.decimals$}"));
    if percent {
        value.push('%');
    }

    Some(NumericCell {
        is_numeric: true,
        value,
        suffix: suffix.to_owned(),
    })
}

/// Append a plain decimal string with en-US thousands separators.
fn push_grouped(out: &mut String, plain: &str) {
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (plain, None),
    };
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
}
