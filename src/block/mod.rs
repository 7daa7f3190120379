//! Block-level scanner.
//!
//! The scanner is line-oriented and handles:
//! - Fenced code blocks
//! - Blockquotes
//! - ATX headings
//! - Thematic breaks
//! - GFM pipe tables
//! - Nested lists
//! - Paragraphs

mod list_stack;
mod parser;
mod table;

pub use parser::BlockParser;
