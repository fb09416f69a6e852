//! Parser trait definition.

use marklint_ast::{AstArena, MdNode};

use crate::ParseError;

/// Converts source text into an [`MdNode`] tree allocated in an arena.
///
/// Implementations must be deterministic: the same source always yields the
/// same tree with the same spans.
pub trait Parser: Send + Sync {
    /// Parses the source text; the returned root borrows from `arena`.
    fn parse<'a>(&self, arena: &'a AstArena, source: &str) -> Result<MdNode<'a>, ParseError>;
}
