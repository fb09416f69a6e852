//! Node kinds of the Markdown tree.
//!
//! Names follow mdast (<https://github.com/syntax-tree/mdast>), which is what
//! markdown-rs produces and what rule authors usually think in.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of an [`MdNode`](crate::MdNode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub enum NodeType {
    /// Document root.
    Root,

    // Block content
    Paragraph,
    /// ATX (`# Title`) or setext (`Title\n===`) heading.
    Heading,
    ThematicBreak,
    Blockquote,
    List,
    ListItem,
    /// Fenced or indented code block.
    Code,
    /// Raw HTML, block or inline.
    Html,
    /// Link reference definition (`[id]: url`).
    Definition,
    /// YAML (`---`) or TOML (`+++`) front matter.
    FrontMatter,
    Table,
    TableRow,
    TableCell,
    FootnoteDefinition,

    // Inline content
    Text,
    Emphasis,
    Strong,
    Delete,
    InlineCode,
    Break,
    Link,
    Image,
    LinkReference,
    ImageReference,
    FootnoteReference,
}

impl NodeType {
    /// Returns true for block-level nodes.
    #[inline]
    pub const fn is_block(&self) -> bool {
        matches!(
            self,
            NodeType::Root
                | NodeType::Paragraph
                | NodeType::Heading
                | NodeType::ThematicBreak
                | NodeType::Blockquote
                | NodeType::List
                | NodeType::ListItem
                | NodeType::Code
                | NodeType::Definition
                | NodeType::FrontMatter
                | NodeType::Table
                | NodeType::TableRow
                | NodeType::FootnoteDefinition
        )
    }

    /// Returns true for nodes whose source text is not Markdown prose.
    ///
    /// Whitespace and punctuation rules must leave these ranges alone.
    #[inline]
    pub const fn is_verbatim(&self) -> bool {
        matches!(
            self,
            NodeType::Code | NodeType::InlineCode | NodeType::Html | NodeType::FrontMatter
        )
    }

    /// Returns the mdast name of this node type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            NodeType::Root => "root",
            NodeType::Paragraph => "paragraph",
            NodeType::Heading => "heading",
            NodeType::ThematicBreak => "thematicBreak",
            NodeType::Blockquote => "blockquote",
            NodeType::List => "list",
            NodeType::ListItem => "listItem",
            NodeType::Code => "code",
            NodeType::Html => "html",
            NodeType::Definition => "definition",
            NodeType::FrontMatter => "frontMatter",
            NodeType::Table => "table",
            NodeType::TableRow => "tableRow",
            NodeType::TableCell => "tableCell",
            NodeType::FootnoteDefinition => "footnoteDefinition",
            NodeType::Text => "text",
            NodeType::Emphasis => "emphasis",
            NodeType::Strong => "strong",
            NodeType::Delete => "delete",
            NodeType::InlineCode => "inlineCode",
            NodeType::Break => "break",
            NodeType::Link => "link",
            NodeType::Image => "image",
            NodeType::LinkReference => "linkReference",
            NodeType::ImageReference => "imageReference",
            NodeType::FootnoteReference => "footnoteReference",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
