//! DoS prevention constants.
//!
//! Reply text is untrusted, so every recursive or stacked structure
//! has a hard cap. Exceeding a cap degrades the construct to plain text.

/// Maximum nesting depth for blockquotes (each level is a recursive parse)
pub const MAX_BLOCK_NESTING: usize = 32;

/// Maximum nesting depth for lists
pub const MAX_LIST_NESTING: usize = 16;

/// Maximum backtick run length for code spans (prevents O(n^2) matching)
/// Longer runs are treated as literal text
pub const MAX_CODE_SPAN_BACKTICKS: usize = 32;

/// Maximum digits in ordered list marker (prevents big-integer parsing)
pub const MAX_LIST_MARKER_DIGITS: usize = 9;

/// Maximum Markdown table columns; extra cells are dropped
pub const MAX_TABLE_COLUMNS: usize = 128;

/// Maximum ASCII table columns; extra cells are dropped
pub const MAX_ASCII_TABLE_COLUMNS: usize = 128;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_are_reasonable() {
        const { assert!(MAX_BLOCK_NESTING >= 16) };
        const { assert!(MAX_BLOCK_NESTING <= 64) };
        const { assert!(MAX_LIST_NESTING >= 8) };
        const { assert!(MAX_CODE_SPAN_BACKTICKS >= 16) };
        const { assert!(MAX_LIST_MARKER_DIGITS <= 9) };
    }
}
