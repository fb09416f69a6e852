//! # marklint_parser
//!
//! Turns Markdown source into a [`MdNode`](marklint_ast::MdNode) tree.
//!
//! This crate provides:
//! - A `Parser` trait so other front-ends can be plugged in
//! - `MarkdownParser`, built on `markdown-rs` with GFM and front matter
//! - `decode_source`, the UTF-8 gate every file passes before parsing
//!
//! ## Example
//!
//! ```rust
//! use marklint_ast::{AstArena, NodeType};
//! use marklint_parser::{MarkdownParser, Parser};
//!
//! let arena = AstArena::new();
//! let parser = MarkdownParser::new();
//! let root = parser.parse(&arena, "# Hello\n\nThis is a paragraph.\n").unwrap();
//!
//! assert_eq!(root.node_type, NodeType::Root);
//! assert_eq!(root.children[0].heading_depth(), Some(1));
//! ```

mod error;
mod markdown;
mod traits;

pub use error::ParseError;
pub use markdown::MarkdownParser;
pub use traits::Parser;

/// Validates raw file bytes as UTF-8.
///
/// Markdown sources are always handled as `str`, so a file that is not
/// valid UTF-8 cannot be linted and is reported as a parse error.
pub fn decode_source(bytes: &[u8]) -> Result<&str, ParseError> {
    std::str::from_utf8(bytes).map_err(|e| ParseError::InvalidUtf8 {
        offset: e.valid_up_to(),
    })
}
