//! MdNode definition.

use crate::{NodeType, Span};

/// A node in the Markdown tree.
///
/// Nodes are allocated in an [`AstArena`](crate::AstArena); `'a` ties the
/// children slice and borrowed strings to that arena.
///
/// ```rust
/// use marklint_ast::{AstArena, MdNode, NodeData, NodeType, Span};
///
/// let arena = AstArena::new();
/// let mut code = MdNode::new_text(NodeType::Code, Span::new(0, 20), "fn main() {}");
/// code.data = NodeData::code(Some(arena.alloc_str("rust")), true);
///
/// assert_eq!(code.code_lang(), Some("rust"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MdNode<'a> {
    /// The kind of this node.
    pub node_type: NodeType,

    /// Byte span in the source text.
    pub span: Span,

    /// Child nodes, in source order.
    pub children: &'a [MdNode<'a>],

    /// Literal value for text-like nodes (text, code, html, front matter).
    pub value: Option<&'a str>,

    /// Kind-specific data.
    pub data: NodeData<'a>,
}

/// Kind-specific payload of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NodeData<'a> {
    #[default]
    None,
    Heading(HeadingData),
    List(ListData),
    Code(CodeData<'a>),
    Link(LinkData<'a>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingData {
    /// Heading level, 1 to 6.
    pub depth: u8,
    /// True for underlined (`===` / `---`) headings.
    pub setext: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListData {
    pub ordered: bool,
    /// First item number of an ordered list.
    pub start: Option<u32>,
    /// Loose list (blank lines between items).
    pub spread: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeData<'a> {
    pub lang: Option<&'a str>,
    /// False for indented code blocks.
    pub fenced: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkData<'a> {
    pub url: &'a str,
    pub title: Option<&'a str>,
}

impl<'a> MdNode<'a> {
    /// Creates a node with children.
    #[inline]
    pub const fn new_parent(node_type: NodeType, span: Span, children: &'a [MdNode<'a>]) -> Self {
        Self {
            node_type,
            span,
            children,
            value: None,
            data: NodeData::None,
        }
    }

    /// Creates a text-like node carrying a literal value.
    #[inline]
    pub const fn new_text(node_type: NodeType, span: Span, value: &'a str) -> Self {
        Self {
            node_type,
            span,
            children: &[],
            value: Some(value),
            data: NodeData::None,
        }
    }

    /// Creates a node with neither children nor value.
    #[inline]
    pub const fn new_leaf(node_type: NodeType, span: Span) -> Self {
        Self {
            node_type,
            span,
            children: &[],
            value: None,
            data: NodeData::None,
        }
    }

    /// Returns true if this node has children.
    #[inline]
    pub const fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Heading depth, if this is a heading.
    #[inline]
    pub const fn heading_depth(&self) -> Option<u8> {
        match self.data {
            NodeData::Heading(h) => Some(h.depth),
            _ => None,
        }
    }

    /// True for ATX-style headings (`# Title`).
    #[inline]
    pub const fn is_atx_heading(&self) -> bool {
        matches!(self.data, NodeData::Heading(HeadingData { setext: false, .. }))
    }

    /// Info-string language of a code block.
    #[inline]
    pub const fn code_lang(&self) -> Option<&'a str> {
        match self.data {
            NodeData::Code(code) => code.lang,
            _ => None,
        }
    }
}

impl<'a> NodeData<'a> {
    #[inline]
    pub const fn heading(depth: u8, setext: bool) -> Self {
        Self::Heading(HeadingData { depth, setext })
    }

    #[inline]
    pub const fn list(ordered: bool, start: Option<u32>, spread: bool) -> Self {
        Self::List(ListData {
            ordered,
            start,
            spread,
        })
    }

    #[inline]
    pub const fn code(lang: Option<&'a str>, fenced: bool) -> Self {
        Self::Code(CodeData { lang, fenced })
    }

    #[inline]
    pub const fn link(url: &'a str, title: Option<&'a str>) -> Self {
        Self::Link(LinkData { url, title })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AstArena;

    #[test]
    fn parent_node_holds_children() {
        let arena = AstArena::new();
        let child = arena.alloc(MdNode::new_text(NodeType::Text, Span::new(2, 7), "Title"));
        let children = arena.alloc_slice_copy(&[*child]);
        let mut heading = MdNode::new_parent(NodeType::Heading, Span::new(0, 7), children);
        heading.data = NodeData::heading(1, false);

        assert!(heading.has_children());
        assert_eq!(heading.heading_depth(), Some(1));
        assert!(heading.is_atx_heading());
    }

    #[test]
    fn setext_heading_is_not_atx() {
        let mut heading = MdNode::new_leaf(NodeType::Heading, Span::new(0, 12));
        heading.data = NodeData::heading(2, true);
        assert!(!heading.is_atx_heading());
    }

    #[test]
    fn non_heading_has_no_depth() {
        let node = MdNode::new_text(NodeType::Text, Span::new(0, 5), "hello");
        assert_eq!(node.heading_depth(), None);
        assert_eq!(node.value, Some("hello"));
        assert!(!node.has_children());
    }

    #[test]
    fn code_lang_only_for_code_nodes() {
        let mut code = MdNode::new_text(NodeType::Code, Span::new(0, 10), "x");
        code.data = NodeData::code(None, false);
        assert_eq!(code.code_lang(), None);
        assert_eq!(code.data, NodeData::Code(CodeData { lang: None, fenced: false }));
    }
}
