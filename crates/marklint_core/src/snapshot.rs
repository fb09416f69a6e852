//! Immutable parsed view of one file's content.
//!
//! A snapshot is built at the start of every fix pass and thrown away at the
//! end of it. Nothing in it is ever patched: positions for the next pass
//! come from parsing the new content again.

use std::ops::ControlFlow;
use std::path::Path;

use marklint_ast::visitor::{VisitResult, Visitor, walk_children, walk_node};
use marklint_ast::{AstArena, Location, MdNode, NodeData, Position, Span};
use marklint_parser::{ParseError, Parser, decode_source};

/// Pre-computed metadata for a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineInfo {
    /// Byte offset of line start (inclusive).
    pub start: u32,
    /// Byte offset of the line terminator (`\n` or `\r\n`); equals `end` on
    /// a final line without one.
    pub newline_start: u32,
    /// Byte offset just past the terminator.
    pub end: u32,
    /// Indentation level in columns (tabs advance to the next multiple of 4).
    pub indent: u32,
    /// Byte length of leading whitespace.
    pub indent_bytes: u32,
    /// Whether this line contains only whitespace.
    pub is_blank: bool,
    /// Whether this line belongs to a code block or front matter.
    pub verbatim: bool,
}

impl LineInfo {
    /// Creates a new LineInfo from a line's content, terminator included.
    pub fn from_line(start: u32, line: &str) -> Self {
        let end = start + line.len() as u32;
        let content = line
            .strip_suffix('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .unwrap_or(line);
        let newline_start = start + content.len() as u32;

        let is_blank = content.trim().is_empty();
        let (indent, indent_bytes) = if is_blank {
            (0, 0)
        } else {
            let leading_len = content.len() - content.trim_start().len();
            let visual = content[..leading_len].chars().fold(0u32, |acc, c| {
                if c == '\t' { (acc + 4) / 4 * 4 } else { acc + 1 }
            });
            (visual, leading_len as u32)
        };

        Self {
            start,
            newline_start,
            end,
            indent,
            indent_bytes,
            is_blank,
            verbatim: false,
        }
    }

    /// Returns the byte offset of the first non-whitespace character.
    pub fn content_start(&self) -> u32 {
        self.start + self.indent_bytes
    }

    /// Returns true if the line ends with a terminator.
    pub fn has_newline(&self) -> bool {
        self.newline_start < self.end
    }

    /// Span of the line without its terminator.
    pub fn content_span(&self) -> Span {
        Span::new(self.start, self.newline_start)
    }
}

/// An ATX or setext heading found in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingInfo {
    pub span: Span,
    /// Heading level (1-6).
    pub depth: u8,
    pub setext: bool,
    /// Zero-based index of the line the heading starts on.
    pub line: usize,
    /// Direct child of the document, not inside a list or blockquote.
    pub top_level: bool,
}

/// Parsed, read-only view of one file at one point in time.
#[derive(Debug)]
pub struct SourceSnapshot<'a> {
    path: &'a Path,
    source: &'a str,
    lines: Vec<LineInfo>,
    headings: Vec<HeadingInfo>,
    front_matter: Option<Span>,
    root: MdNode<'a>,
}

impl<'a> SourceSnapshot<'a> {
    /// Validates `bytes` as UTF-8 and parses them.
    pub fn parse(
        arena: &'a AstArena,
        parser: &dyn Parser,
        path: &'a Path,
        bytes: &'a [u8],
    ) -> Result<Self, ParseError> {
        let source = decode_source(bytes)?;
        Self::from_source(arena, parser, path, source)
    }

    /// Parses already-decoded source text.
    pub fn from_source(
        arena: &'a AstArena,
        parser: &dyn Parser,
        path: &'a Path,
        source: &'a str,
    ) -> Result<Self, ParseError> {
        let root = parser.parse(arena, source)?;
        let mut lines = index_lines(source);

        let mut collector = StructureCollector::default();
        let flow = walk_node(&mut collector, &root);
        debug_assert!(flow.is_continue() && collector.depth == 0);

        for span in &collector.verbatim {
            for line in lines
                .iter_mut()
                .filter(|l| l.start < span.end && span.start < l.end)
            {
                line.verbatim = true;
            }
        }

        let mut snapshot = Self {
            path,
            source,
            lines,
            headings: Vec::with_capacity(collector.headings.len()),
            front_matter: collector.front_matter,
            root,
        };
        snapshot.headings = collector
            .headings
            .iter()
            .map(|&(span, depth, setext, top_level)| HeadingInfo {
                span,
                depth,
                setext,
                line: snapshot.line_index(span.start),
                top_level,
            })
            .collect();

        Ok(snapshot)
    }

    pub fn path(&self) -> &'a Path {
        self.path
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn root(&self) -> &MdNode<'a> {
        &self.root
    }

    pub fn lines(&self) -> &[LineInfo] {
        &self.lines
    }

    pub fn headings(&self) -> &[HeadingInfo] {
        &self.headings
    }

    /// Span of the leading YAML or TOML block, if any.
    pub fn front_matter(&self) -> Option<Span> {
        self.front_matter
    }

    /// Text of line `index` without its terminator.
    pub fn line_text(&self, index: usize) -> &'a str {
        let line = &self.lines[index];
        &self.source[line.content_span().range()]
    }

    /// Zero-based index of the line containing `offset`.
    ///
    /// An offset at the very end of content that ends with a newline maps to
    /// one past the last line.
    pub fn line_index(&self, offset: u32) -> usize {
        let idx = self
            .lines
            .partition_point(|l| l.start <= offset)
            .saturating_sub(1);
        match self.lines.get(idx) {
            Some(line) if offset >= line.end && line.has_newline() => idx + 1,
            _ => idx,
        }
    }

    /// 1-based line and byte column of `offset`.
    pub fn position_at(&self, offset: u32) -> Position {
        let idx = self.line_index(offset);
        let line_start = self.lines.get(idx).map_or_else(
            || self.lines.last().map_or(0, |l| l.end),
            |l| l.start,
        );
        Position::new(idx as u32 + 1, offset - line_start + 1)
    }

    pub fn location(&self, span: Span) -> Location {
        Location::new(self.position_at(span.start), self.position_at(span.end))
    }
}

fn index_lines(source: &str) -> Vec<LineInfo> {
    let mut lines = Vec::with_capacity(source.len() / 32 + 1);
    let mut start = 0u32;
    for line in source.split_inclusive('\n') {
        let info = LineInfo::from_line(start, line);
        start = info.end;
        lines.push(info);
    }
    lines
}

#[derive(Default)]
struct StructureCollector {
    verbatim: Vec<Span>,
    headings: Vec<(Span, u8, bool, bool)>,
    front_matter: Option<Span>,
    depth: usize,
}

impl<'a> Visitor<'a> for StructureCollector {
    fn enter_node(&mut self, _node: &MdNode<'a>) -> VisitResult {
        self.depth += 1;
        ControlFlow::Continue(())
    }

    fn exit_node(&mut self, _node: &MdNode<'a>) -> VisitResult {
        self.depth -= 1;
        ControlFlow::Continue(())
    }

    fn visit_heading(&mut self, node: &MdNode<'a>) -> VisitResult {
        if let NodeData::Heading(h) = node.data {
            // Root is depth 1, so its children are at depth 2.
            self.headings
                .push((node.span, h.depth, h.setext, self.depth == 2));
        }
        walk_children(self, node)
    }

    fn visit_code(&mut self, node: &MdNode<'a>) -> VisitResult {
        self.verbatim.push(node.span);
        ControlFlow::Continue(())
    }

    fn visit_front_matter(&mut self, node: &MdNode<'a>) -> VisitResult {
        self.verbatim.push(node.span);
        self.front_matter.get_or_insert(node.span);
        ControlFlow::Continue(())
    }
}
