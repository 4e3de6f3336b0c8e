//! Array construction parameters.

use vla_arena::{ArrayAllocator, Global};
use vla_core::Extents;

/// Configuration for building a [`DynArray`](crate::DynArray).
///
/// Carries the requested extents, the structural depth the caller
/// intends, and the two allocators the array draws from. Consumed by
/// [`DynArray::from_config`](crate::DynArray::from_config).
#[derive(Clone, Debug)]
pub struct ArrayConfig<A: ArrayAllocator = Global> {
    /// Per-dimension extents, outermost first.
    pub extents: Extents,

    /// Structural nesting depth of the array.
    ///
    /// Default: `None`, meaning one level per extent. When set, fewer
    /// extents than the depth produce the canonical empty state of that
    /// depth, and surplus extents are ignored with a warning.
    pub declared_depth: Option<usize>,

    /// Allocator for the per-level node tables.
    pub node_allocator: A,

    /// Allocator for the contiguous leaf buffer.
    pub leaf_allocator: A,
}

impl ArrayConfig<Global> {
    /// A config for `extents` using the global allocator for both roles.
    pub fn new(extents: impl Into<Extents>) -> Self {
        Self::with_allocators(extents, Global, Global)
    }
}

impl<A: ArrayAllocator> ArrayConfig<A> {
    /// A config for `extents` with explicit node and leaf allocators.
    pub fn with_allocators(
        extents: impl Into<Extents>,
        node_allocator: A,
        leaf_allocator: A,
    ) -> Self {
        Self {
            extents: extents.into(),
            declared_depth: None,
            node_allocator,
            leaf_allocator,
        }
    }

    /// Set the structural depth.
    pub fn depth(mut self, depth: usize) -> Self {
        self.declared_depth = Some(depth);
        self
    }

    /// The depth the built array will report.
    ///
    /// # Panics
    ///
    /// Panics if the resolved depth is zero.
    pub fn structural_depth(&self) -> usize {
        let depth = self.declared_depth.unwrap_or(self.extents.rank());
        assert!(depth >= 1, "array depth must be at least 1");
        depth
    }

    /// The extents that size the array, or `None` when there are too few
    /// of them for the structural depth.
    pub fn dimensions(&self) -> Option<Extents> {
        self.extents.declared(self.structural_depth())
    }
}

impl Default for ArrayConfig<Global> {
    fn default() -> Self {
        Self::new([0])
    }
}
