//! Read-only traversal of the Markdown tree.
//!
//! Override only the hooks you need; every default walks the children, so a
//! visitor sees the whole tree unless a hook returns `ControlFlow::Break`.
//!
//! ```rust
//! use std::ops::ControlFlow;
//! use marklint_ast::{AstArena, MdNode, NodeData, NodeType, Span};
//! use marklint_ast::visitor::{VisitResult, Visitor, walk_node};
//!
//! struct Depths(Vec<u8>);
//!
//! impl<'a> Visitor<'a> for Depths {
//!     fn visit_heading(&mut self, node: &MdNode<'a>) -> VisitResult {
//!         self.0.extend(node.heading_depth());
//!         ControlFlow::Continue(())
//!     }
//! }
//!
//! let arena = AstArena::new();
//! let mut h = MdNode::new_leaf(NodeType::Heading, Span::new(0, 3));
//! h.data = NodeData::heading(2, false);
//! let children = arena.alloc_slice_copy(&[h]);
//! let root = MdNode::new_parent(NodeType::Root, Span::new(0, 3), children);
//!
//! let mut depths = Depths(Vec::new());
//! let _ = walk_node(&mut depths, &root);
//! assert_eq!(depths.0, vec![2]);
//! ```

use std::ops::ControlFlow;

use crate::{MdNode, NodeType};

/// `Continue(())` keeps walking, `Break(())` stops the whole traversal.
pub type VisitResult = ControlFlow<()>;

pub trait Visitor<'a> {
    /// Called before a node is dispatched.
    fn enter_node(&mut self, _node: &MdNode<'a>) -> VisitResult {
        ControlFlow::Continue(())
    }

    /// Called after a node and its children were visited.
    fn exit_node(&mut self, _node: &MdNode<'a>) -> VisitResult {
        ControlFlow::Continue(())
    }

    fn visit_heading(&mut self, node: &MdNode<'a>) -> VisitResult {
        walk_children(self, node)
    }

    fn visit_code(&mut self, node: &MdNode<'a>) -> VisitResult {
        walk_children(self, node)
    }

    fn visit_inline_code(&mut self, node: &MdNode<'a>) -> VisitResult {
        walk_children(self, node)
    }

    fn visit_front_matter(&mut self, node: &MdNode<'a>) -> VisitResult {
        walk_children(self, node)
    }

    fn visit_html(&mut self, node: &MdNode<'a>) -> VisitResult {
        walk_children(self, node)
    }

    fn visit_text(&mut self, node: &MdNode<'a>) -> VisitResult {
        walk_children(self, node)
    }

    /// Every other node type.
    fn visit_other(&mut self, node: &MdNode<'a>) -> VisitResult {
        walk_children(self, node)
    }
}

/// Visits `node` and, through the default hooks, its descendants.
pub fn walk_node<'a, V>(visitor: &mut V, node: &MdNode<'a>) -> VisitResult
where
    V: Visitor<'a> + ?Sized,
{
    visitor.enter_node(node)?;

    match node.node_type {
        NodeType::Heading => visitor.visit_heading(node),
        NodeType::Code => visitor.visit_code(node),
        NodeType::InlineCode => visitor.visit_inline_code(node),
        NodeType::FrontMatter => visitor.visit_front_matter(node),
        NodeType::Html => visitor.visit_html(node),
        NodeType::Text => visitor.visit_text(node),
        _ => visitor.visit_other(node),
    }?;

    visitor.exit_node(node)
}

/// Visits each child of `node` in source order.
pub fn walk_children<'a, V>(visitor: &mut V, node: &MdNode<'a>) -> VisitResult
where
    V: Visitor<'a> + ?Sized,
{
    for child in node.children {
        walk_node(visitor, child)?;
    }
    ControlFlow::Continue(())
}
