//! Arena allocator for AST nodes.
//!
//! One arena backs one parse. The fix pipeline creates a fresh arena per
//! pass, so a whole tree is released in one go when the pass ends.

use bumpalo::Bump;

/// Bump arena for [`MdNode`](crate::MdNode) trees and the strings they
/// borrow.
///
/// ```rust
/// use marklint_ast::AstArena;
///
/// let arena = AstArena::new();
/// let lang = arena.alloc_str("rust");
/// assert_eq!(lang, "rust");
/// ```
pub struct AstArena {
    bump: Bump,
}

impl AstArena {
    /// Creates a new arena.
    #[inline]
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    /// Creates an arena sized for a source of `source_len` bytes.
    ///
    /// Markdown trees are roughly proportional to the source size; reserving
    /// up front avoids a handful of chunk allocations on typical files.
    #[inline]
    pub fn for_source(source_len: usize) -> Self {
        Self {
            bump: Bump::with_capacity(source_len.saturating_mul(2)),
        }
    }

    /// Allocates a value in the arena and returns a reference to it.
    #[inline]
    pub fn alloc<T>(&self, val: T) -> &T {
        self.bump.alloc(val)
    }

    /// Allocates a string slice in the arena.
    #[inline]
    pub fn alloc_str(&self, s: &str) -> &str {
        self.bump.alloc_str(s)
    }

    /// Allocates a slice by copying from the input slice.
    #[inline]
    pub fn alloc_slice_copy<T: Copy>(&self, slice: &[T]) -> &[T] {
        self.bump.alloc_slice_copy(slice)
    }

    /// Allocates a slice filled from an exact-size iterator.
    #[inline]
    pub fn alloc_slice_fill_iter<T, I>(&self, iter: I) -> &[T]
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        self.bump.alloc_slice_fill_iter(iter)
    }

    /// Returns the total bytes allocated in this arena.
    #[inline]
    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }
}

impl Default for AstArena {
    fn default() -> Self {
        Self::new()
    }
}
