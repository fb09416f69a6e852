//! # marklint_ast
//!
//! Markdown AST definitions for marklint.
//!
//! The tree mirrors mdast closely enough for style rules while staying cheap
//! to build on every fix pass:
//!
//! - Nodes are `Copy` and allocated in a per-parse `bumpalo` arena
//! - Every node carries a byte [`Span`] into the source it was parsed from
//! - Line/column [`Position`]s are derived on demand from a line index, not
//!   stored on nodes
//!
//! ## Example
//!
//! ```rust
//! use marklint_ast::{AstArena, MdNode, NodeType, Span};
//!
//! let arena = AstArena::new();
//! let text = arena.alloc(MdNode::new_text(NodeType::Text, Span::new(2, 7), "Hello"));
//! let children = arena.alloc_slice_copy(&[*text]);
//! let heading = MdNode::new_parent(NodeType::Heading, Span::new(0, 7), children);
//!
//! assert_eq!(heading.children.len(), 1);
//! ```

mod arena;
mod node;
mod node_type;
mod span;
pub mod visitor;

pub use arena::AstArena;
pub use node::{CodeData, HeadingData, LinkData, ListData, MdNode, NodeData};
pub use node_type::NodeType;
pub use span::{Location, Position, Span};

pub use visitor::{VisitResult, Visitor};
