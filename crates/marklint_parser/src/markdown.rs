//! Markdown parser using markdown-rs (wooorm/markdown-rs).
//!
//! markdown-rs yields an owned mdast tree; this module copies it into the
//! arena as [`MdNode`]s, keeping byte spans and the little structural data
//! the rules need (heading style, fence style, list shape, link targets).

use markdown::mdast::Node;
use markdown::{ParseOptions, to_mdast};
use marklint_ast::{AstArena, MdNode, NodeData, NodeType, Span};

use crate::{ParseError, Parser};

/// Markdown parser implementation.
///
/// Parses CommonMark plus the GFM extensions (tables, strikethrough,
/// footnotes, autolinks) and YAML/TOML front matter.
///
/// `ParseOptions` may hold MDX callbacks that are not `Send`, so options are
/// built per parse instead of being stored on the parser.
pub struct MarkdownParser;

impl MarkdownParser {
    /// Creates a new Markdown parser with GFM and front matter enabled.
    pub fn new() -> Self {
        Self
    }

    fn default_options() -> ParseOptions {
        let mut options = ParseOptions::gfm();
        options.constructs.frontmatter = true;
        options
    }

    fn convert_node<'a>(&self, arena: &'a AstArena, node: &Node, source: &str) -> MdNode<'a> {
        match node {
            Node::Root(root) => self.parent(arena, node, &root.children, source, NodeType::Root),

            Node::Paragraph(para) => {
                self.parent(arena, node, &para.children, source, NodeType::Paragraph)
            }

            Node::Heading(heading) => {
                let mut converted =
                    self.parent(arena, node, &heading.children, source, NodeType::Heading);
                let setext = !source[converted.span.range()]
                    .trim_start_matches([' ', '\t'])
                    .starts_with('#');
                converted.data = NodeData::heading(heading.depth, setext);
                converted
            }

            Node::Text(text) => self.text(arena, node, &text.value, NodeType::Text),

            Node::Emphasis(em) => self.parent(arena, node, &em.children, source, NodeType::Emphasis),

            Node::Strong(strong) => {
                self.parent(arena, node, &strong.children, source, NodeType::Strong)
            }

            Node::Delete(del) => self.parent(arena, node, &del.children, source, NodeType::Delete),

            Node::InlineCode(code) => self.text(arena, node, &code.value, NodeType::InlineCode),

            Node::Code(code) => {
                let mut converted = self.text(arena, node, &code.value, NodeType::Code);
                let opening = source[converted.span.range()].trim_start_matches(' ');
                let fenced = opening.starts_with("```") || opening.starts_with("~~~");
                let lang = code.lang.as_deref().map(|lang| arena.alloc_str(lang));
                converted.data = NodeData::code(lang, fenced);
                converted
            }

            Node::Html(html) => self.text(arena, node, &html.value, NodeType::Html),

            Node::Yaml(yaml) => self.text(arena, node, &yaml.value, NodeType::FrontMatter),

            Node::Toml(toml) => self.text(arena, node, &toml.value, NodeType::FrontMatter),

            Node::Link(link) => {
                let mut converted =
                    self.parent(arena, node, &link.children, source, NodeType::Link);
                let title = link.title.as_deref().map(|t| arena.alloc_str(t));
                converted.data = NodeData::link(arena.alloc_str(&link.url), title);
                converted
            }

            Node::Image(image) => {
                let mut converted = self.leaf(node, NodeType::Image);
                let title = image.title.as_deref().map(|t| arena.alloc_str(t));
                converted.data = NodeData::link(arena.alloc_str(&image.url), title);
                converted
            }

            Node::Definition(def) => {
                let mut converted = self.leaf(node, NodeType::Definition);
                let title = def.title.as_deref().map(|t| arena.alloc_str(t));
                converted.data = NodeData::link(arena.alloc_str(&def.url), title);
                converted
            }

            Node::LinkReference(reference) => self.parent(
                arena,
                node,
                &reference.children,
                source,
                NodeType::LinkReference,
            ),

            Node::ImageReference(_) => self.leaf(node, NodeType::ImageReference),

            Node::FootnoteReference(_) => self.leaf(node, NodeType::FootnoteReference),

            Node::FootnoteDefinition(def) => self.parent(
                arena,
                node,
                &def.children,
                source,
                NodeType::FootnoteDefinition,
            ),

            Node::List(list) => {
                let mut converted =
                    self.parent(arena, node, &list.children, source, NodeType::List);
                converted.data = NodeData::list(list.ordered, list.start, list.spread);
                converted
            }

            Node::ListItem(item) => {
                self.parent(arena, node, &item.children, source, NodeType::ListItem)
            }

            Node::Blockquote(quote) => {
                self.parent(arena, node, &quote.children, source, NodeType::Blockquote)
            }

            Node::ThematicBreak(_) => self.leaf(node, NodeType::ThematicBreak),

            Node::Break(_) => self.leaf(node, NodeType::Break),

            Node::Table(table) => self.parent(arena, node, &table.children, source, NodeType::Table),

            Node::TableRow(row) => {
                self.parent(arena, node, &row.children, source, NodeType::TableRow)
            }

            Node::TableCell(cell) => {
                self.parent(arena, node, &cell.children, source, NodeType::TableCell)
            }

            // Math and MDX are not enabled; anything else is opaque to the rules.
            _ => self.leaf(node, NodeType::Html),
        }
    }

    fn parent<'a>(
        &self,
        arena: &'a AstArena,
        node: &Node,
        children: &[Node],
        source: &str,
        node_type: NodeType,
    ) -> MdNode<'a> {
        let children = arena.alloc_slice_fill_iter(
            children
                .iter()
                .map(|child| self.convert_node(arena, child, source)),
        );
        MdNode::new_parent(node_type, node_span(node), children)
    }

    fn text<'a>(
        &self,
        arena: &'a AstArena,
        node: &Node,
        value: &str,
        node_type: NodeType,
    ) -> MdNode<'a> {
        MdNode::new_text(node_type, node_span(node), arena.alloc_str(value))
    }

    fn leaf<'a>(&self, node: &Node, node_type: NodeType) -> MdNode<'a> {
        MdNode::new_leaf(node_type, node_span(node))
    }
}

fn node_span(node: &Node) -> Span {
    match node.position() {
        Some(pos) => Span::new(pos.start.offset as u32, pos.end.offset as u32),
        None => Span::new(0, 0),
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for MarkdownParser {
    fn parse<'a>(&self, arena: &'a AstArena, source: &str) -> Result<MdNode<'a>, ParseError> {
        if u32::try_from(source.len()).is_err() {
            return Err(ParseError::TooLarge { len: source.len() });
        }

        let mdast =
            to_mdast(source, &Self::default_options()).map_err(|e| ParseError::syntax(e.to_string()))?;

        Ok(self.convert_node(arena, &mdast, source))
    }
}
