//! Byte-range edits and the engine that turns many of them into one rewrite.
//!
//! Rules never touch content directly. Each finding may carry a handful of
//! [`TextEdit`]s against the snapshot it was computed on; the pipeline pools
//! the edits of every rule, resolves conflicts between them with
//! [`prepare_edits_filtered`] and applies the survivors in a single linear
//! pass with [`PreparedEditSet::apply`].
//!
//! Conflict resolution:
//!
//! - edits are ordered by `(start, end)`, ties keep input order
//! - two edits conflict iff `s1 < e2 && s2 < e1`; touching edits and
//!   insertions at the same offset never conflict
//! - overlapping pure deletions merge into one deletion
//! - an exact duplicate (same range, same replacement) collapses into the
//!   edit already accepted
//! - any other conflict keeps the earlier edit and skips the later one

use std::fmt;

use marklint_ast::Span;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// A single replacement of the half-open byte range `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextEdit {
    /// Start byte offset (inclusive).
    pub start: u32,
    /// End byte offset (exclusive).
    pub end: u32,
    /// Text that replaces the range.
    pub replacement: String,
}

/// What an edit does to the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Insertion,
    Deletion,
    Replacement,
}

impl TextEdit {
    /// Creates an edit replacing `[start, end)` with `replacement`.
    pub fn new(start: u32, end: u32, replacement: impl Into<String>) -> Self {
        Self {
            start,
            end,
            replacement: replacement.into(),
        }
    }

    /// Inserts `text` at `offset`.
    pub fn insert(offset: u32, text: impl Into<String>) -> Self {
        Self::new(offset, offset, text)
    }

    /// Deletes `[start, end)`.
    pub fn delete(start: u32, end: u32) -> Self {
        Self::new(start, end, String::new())
    }

    /// Replaces the bytes covered by `span`.
    pub fn replace_span(span: Span, text: impl Into<String>) -> Self {
        Self::new(span.start, span.end, text)
    }

    pub fn kind(&self) -> EditKind {
        if self.start == self.end {
            EditKind::Insertion
        } else if self.replacement.is_empty() {
            EditKind::Deletion
        } else {
            EditKind::Replacement
        }
    }

    #[inline]
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    #[inline]
    pub fn is_deletion(&self) -> bool {
        self.kind() == EditKind::Deletion
    }

    /// Returns true if the two edits touch a common byte.
    #[inline]
    pub fn conflicts_with(&self, other: &TextEdit) -> bool {
        self.span().overlaps(&other.span())
    }

    /// Checks the edit against the content it is meant for.
    pub fn validate(&self, content: &str) -> Result<(), EditError> {
        let len = content.len();
        if self.start > self.end {
            return Err(EditError::InvertedRange {
                start: self.start,
                end: self.end,
            });
        }
        if self.end as usize > len {
            return Err(EditError::OutOfBounds {
                start: self.start,
                end: self.end,
                len,
            });
        }
        for offset in [self.start, self.end] {
            if !content.is_char_boundary(offset as usize) {
                return Err(EditError::NotCharBoundary { offset });
            }
        }
        Ok(())
    }
}

impl fmt::Display for TextEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}) -> {:?}", self.start, self.end, self.replacement)
    }
}

/// Errors raised while building, validating or strictly preparing edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("edit [{start}, {end}) has start after end")]
    InvertedRange { start: u32, end: u32 },

    #[error("edit [{start}, {end}) is outside content of {len} bytes")]
    OutOfBounds { start: u32, end: u32, len: usize },

    #[error("edit boundary {offset} splits a UTF-8 character")]
    NotCharBoundary { offset: u32 },

    #[error("edit {second} conflicts with {first}")]
    Conflict { first: TextEdit, second: TextEdit },
}

/// Collects the edits of one finding.
///
/// ```rust
/// use marklint_core::EditBuilder;
///
/// let edits = EditBuilder::new()
///     .replace(0, 1, "#")
///     .insert(1, " ")
///     .build()
///     .unwrap();
/// assert_eq!(edits.len(), 2);
/// ```
#[derive(Debug, Default, Clone)]
pub struct EditBuilder {
    edits: Vec<TextEdit>,
}

impl EditBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, offset: u32, text: impl Into<String>) -> Self {
        self.edits.push(TextEdit::insert(offset, text));
        self
    }

    pub fn delete(mut self, start: u32, end: u32) -> Self {
        self.edits.push(TextEdit::delete(start, end));
        self
    }

    pub fn replace(mut self, start: u32, end: u32, text: impl Into<String>) -> Self {
        self.edits.push(TextEdit::new(start, end, text));
        self
    }

    pub fn replace_span(mut self, span: Span, text: impl Into<String>) -> Self {
        self.edits.push(TextEdit::replace_span(span, text));
        self
    }

    /// Returns the edits in `(start, end)` order.
    ///
    /// Edits of a single finding must not overlap one another; the first
    /// overlapping pair is reported as a conflict.
    pub fn build(mut self) -> Result<Vec<TextEdit>, EditError> {
        self.edits.sort_by_key(|e| (e.start, e.end));
        for (i, first) in self.edits.iter().enumerate() {
            if first.start > first.end {
                return Err(EditError::InvertedRange {
                    start: first.start,
                    end: first.end,
                });
            }
            if let Some(second) = self.edits[i + 1..].iter().find(|e| first.conflicts_with(e)) {
                return Err(EditError::Conflict {
                    first: first.clone(),
                    second: second.clone(),
                });
            }
        }
        Ok(self.edits)
    }
}

/// The conflict-free outcome of preparing a bag of edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreparedEditSet {
    /// Edits to apply, sorted and pairwise non-overlapping.
    pub accepted: Vec<TextEdit>,
    /// Edits dropped because they conflicted with an accepted edit.
    pub skipped: Vec<TextEdit>,
    /// Number of edits folded into an accepted one.
    pub merged_count: usize,
}

impl PreparedEditSet {
    /// Returns true if there is nothing to apply.
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    /// Rewrites `content` with the accepted edits in one forward pass.
    ///
    /// `content` must be the text the edits were prepared against. Bytes
    /// outside accepted ranges are copied unchanged.
    pub fn apply(&self, content: &str) -> String {
        apply_sorted(content, &self.accepted)
    }
}

/// Prepares edits, dropping conflicting ones instead of failing.
///
/// Invalid edits (out of range, inverted, splitting a character) are still
/// an error: they mean a rule computed offsets against the wrong content.
pub fn prepare_edits_filtered(
    content: &str,
    edits: impl IntoIterator<Item = TextEdit>,
) -> Result<PreparedEditSet, EditError> {
    let prepared = resolve(content, edits)?;

    for skipped in &prepared.skipped {
        warn!("Skipping conflicting edit {}", skipped);
    }
    if prepared.merged_count > 0 {
        debug!("Merged {} edit(s)", prepared.merged_count);
    }

    Ok(prepared)
}

/// Prepares edits, failing on the first conflict that cannot be merged.
pub fn prepare_edits(
    content: &str,
    edits: impl IntoIterator<Item = TextEdit>,
) -> Result<PreparedEditSet, EditError> {
    let prepared = resolve(content, edits)?;

    if let Some(second) = prepared.skipped.first() {
        let first = prepared
            .accepted
            .iter()
            .find(|a| a.conflicts_with(second))
            .cloned()
            .unwrap_or_else(|| second.clone());
        return Err(EditError::Conflict {
            first,
            second: second.clone(),
        });
    }

    Ok(prepared)
}

fn resolve(
    content: &str,
    edits: impl IntoIterator<Item = TextEdit>,
) -> Result<PreparedEditSet, EditError> {
    let mut sorted: Vec<TextEdit> = edits.into_iter().collect();
    for edit in &sorted {
        edit.validate(content)?;
    }
    // Stable: equal ranges keep the order the rules produced them in.
    sorted.sort_by_key(|e| (e.start, e.end));

    let mut prepared = PreparedEditSet {
        accepted: Vec::with_capacity(sorted.len()),
        ..Default::default()
    };

    for edit in sorted {
        let duplicate = prepared
            .accepted
            .iter()
            .rev()
            .take_while(|a| a.start == edit.start)
            .any(|a| *a == edit);
        if duplicate {
            prepared.merged_count += 1;
            continue;
        }

        // Accepted edits are sorted and disjoint, and `edit` starts at or
        // after all of them, so only the last one can overlap it.
        match prepared.accepted.last_mut() {
            Some(last) if last.conflicts_with(&edit) => {
                if last.is_deletion() && edit.is_deletion() {
                    last.end = last.end.max(edit.end);
                    prepared.merged_count += 1;
                } else {
                    prepared.skipped.push(edit);
                }
            }
            _ => prepared.accepted.push(edit),
        }
    }

    Ok(prepared)
}

fn apply_sorted(content: &str, edits: &[TextEdit]) -> String {
    let growth: usize = edits.iter().map(|e| e.replacement.len()).sum();
    let mut out = String::with_capacity(content.len() + growth);
    let mut cursor = 0usize;

    for edit in edits {
        let (start, end) = (edit.start as usize, edit.end as usize);
        debug_assert!(start >= cursor, "edits must be sorted and disjoint");
        out.push_str(&content[cursor..start]);
        out.push_str(&edit.replacement);
        cursor = end;
    }
    out.push_str(&content[cursor..]);

    out
}
