//! The owning array.
//!
//! [`DynArray`] owns exactly two things: the [`Hierarchy`] of node tables
//! and the [`Block`] of leaves. Everything reached by indexing below the
//! root is a borrowed view into those two allocations.

use std::fmt;
use std::mem;
use std::ops::{Index, IndexMut};

use smallvec::{smallvec, SmallVec};
use vla_arena::{ArrayAllocator, Block, Global, Hierarchy};
use vla_core::{ArrayError, Extents, Ownership, MAX_SIZE};

use crate::config::ArrayConfig;
use crate::view::{locate, ArrayView, ArrayViewMut, AsView, Item, ItemMut, Iter, IterMut};

/// A nested array whose depth and extents are chosen at runtime.
///
/// All leaves live in one contiguous block from the leaf allocator, in
/// row-major (depth-first) order. Node tables come from the node
/// allocator. A Rust move of a `DynArray` transfers both in O(1).
///
/// `len()` is the number of direct children of the root, not the leaf
/// count: a `10x10` array has `len() == 10`, and so does each row.
///
/// # Examples
///
/// ```
/// use vla::DynArray;
///
/// let mut grid = DynArray::from_elem(&[3, 4], 7).unwrap();
/// assert_eq!(grid.len(), 3);
/// assert_eq!(grid.row(0).len(), 4);
///
/// grid[[1, 2]] = 99;
/// assert_eq!(grid.leaves().iter().filter(|&&v| v == 7).count(), 11);
/// ```
pub struct DynArray<T, A: ArrayAllocator = Global> {
    // Declaration order is drop order: node tables go before the leaves.
    shape: Hierarchy<A>,
    leaves: Block<T, A>,
}

impl<T> DynArray<T, Global> {
    /// An array of `extents` with every leaf `T::default()`.
    ///
    /// Fails with [`ArrayError::LengthViolation`] if any extent or running
    /// product exceeds [`MAX_SIZE`]; nothing is allocated then. A zero
    /// extent gives the canonical empty state.
    ///
    /// # Panics
    ///
    /// Panics if `extents` is empty.
    pub fn new(extents: &[usize]) -> Result<Self, ArrayError>
    where
        T: Default,
    {
        Self::from_fn(extents, |_| T::default())
    }

    /// An array of `extents` with every leaf a clone of `value`.
    ///
    /// # Panics
    ///
    /// Panics if `extents` is empty.
    pub fn from_elem(extents: &[usize], value: T) -> Result<Self, ArrayError>
    where
        T: Clone,
    {
        Self::from_fn(extents, |_| value.clone())
    }

    /// An array of `extents` with each leaf built from its full index.
    ///
    /// Leaves are built in row-major order. If `f` panics, the leaves
    /// already built are dropped in reverse order and every allocation is
    /// released before the panic continues.
    ///
    /// # Panics
    ///
    /// Panics if `extents` is empty.
    pub fn from_fn<F>(extents: &[usize], f: F) -> Result<Self, ArrayError>
    where
        F: FnMut(&[usize]) -> T,
    {
        Self::from_config(ArrayConfig::new(extents), f)
    }

    /// The canonical empty array of the given depth.
    ///
    /// # Panics
    ///
    /// Panics if `depth` is zero.
    pub fn empty(depth: usize) -> Self {
        Self::empty_in(depth, Global, Global)
    }
}

impl<T, A: ArrayAllocator> DynArray<T, A> {
    /// Build an array from a full configuration.
    ///
    /// The first `depth` extents size the array. Too few extents, or a
    /// zero product, yield the canonical empty state of that depth.
    ///
    /// # Panics
    ///
    /// Panics if the configured depth is zero.
    pub fn from_config<F>(config: ArrayConfig<A>, mut f: F) -> Result<Self, ArrayError>
    where
        F: FnMut(&[usize]) -> T,
    {
        let depth = config.structural_depth();
        let dims = config.dimensions();
        let ArrayConfig {
            node_allocator,
            leaf_allocator,
            ..
        } = config;
        let Some(dims) = dims else {
            return Ok(Self::empty_in(depth, node_allocator, leaf_allocator));
        };

        let total = dims.total()?;
        Block::<T, A>::check_len(total)?;
        let shape = Hierarchy::regular(&dims, node_allocator)?;
        if shape.is_empty() {
            return Ok(Self::from_parts(shape, Block::empty(leaf_allocator)));
        }

        let mut index: SmallVec<[usize; 4]> = smallvec![0; depth];
        let leaves = Block::try_from_fn(total, leaf_allocator, |flat| {
            dims.unravel(flat, &mut index);
            f(&index)
        })?;
        Ok(Self::from_parts(shape, leaves))
    }

    /// The canonical empty array of `depth` with explicit allocators.
    ///
    /// # Panics
    ///
    /// Panics if `depth` is zero.
    pub fn empty_in(depth: usize, node_allocator: A, leaf_allocator: A) -> Self {
        Self::from_parts(Hierarchy::empty(depth, node_allocator), Block::empty(leaf_allocator))
    }

    pub(crate) fn from_parts(shape: Hierarchy<A>, leaves: Block<T, A>) -> Self {
        debug_assert_eq!(shape.leaf_count(), leaves.len());
        Self { shape, leaves }
    }

    pub(crate) fn into_parts(self) -> (Hierarchy<A>, Block<T, A>) {
        let Self { shape, leaves } = self;
        (shape, leaves)
    }

    /// Number of direct children of the root.
    pub fn len(&self) -> usize {
        self.shape.len()
    }

    /// Whether the array is in the canonical empty state.
    pub fn is_empty(&self) -> bool {
        self.shape.is_empty()
    }

    /// Levels of indexing from the root down to a leaf.
    pub fn depth(&self) -> usize {
        self.shape.depth()
    }

    /// Total number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// Largest length any level can have.
    pub fn max_size(&self) -> usize {
        MAX_SIZE
    }

    /// Always [`Ownership::Owner`].
    pub fn ownership(&self) -> Ownership {
        Ownership::Owner
    }

    /// Extents of a rectangular array, or `None` for a jagged one.
    pub fn extents(&self) -> Option<Extents> {
        if self.is_empty() {
            return Some(Extents::from(vec![0; self.depth()]));
        }
        let mut extents = Vec::with_capacity(self.depth());
        extents.push(self.len());
        for level in 0..self.depth() - 1 {
            let table = self.shape.table(level);
            let first = table[0].child_len;
            if table.iter().any(|s| s.child_len != first) {
                return None;
            }
            extents.push(first);
        }
        Some(Extents::from(extents))
    }

    /// The node tables.
    pub fn hierarchy(&self) -> &Hierarchy<A> {
        &self.shape
    }

    /// Allocator of the node tables.
    pub fn node_allocator(&self) -> &A {
        self.shape.allocator()
    }

    /// Allocator of the leaf buffer.
    pub fn leaf_allocator(&self) -> &A {
        self.leaves.allocator()
    }

    /// Every leaf, in row-major order.
    pub fn leaves(&self) -> &[T] {
        &self.leaves
    }

    /// Every leaf, mutably.
    pub fn leaves_mut(&mut self) -> &mut [T] {
        &mut self.leaves
    }

    /// A shared view of the whole array.
    pub fn view(&self) -> ArrayView<'_, T, A> {
        ArrayView::new(self.shape.root_ref(), &self.leaves, self.leaves.allocator())
    }

    /// A mutable view of the whole array.
    pub fn view_mut(&mut self) -> ArrayViewMut<'_, T, A> {
        let (leaves, alloc) = self.leaves.parts_mut();
        ArrayViewMut::new(self.shape.root_ref(), leaves, alloc)
    }

    /// Position `i`, or `None` if out of range.
    pub fn get(&self, i: usize) -> Option<Item<'_, T, A>> {
        self.view().get(i)
    }

    /// Bounds-checked position `i`.
    ///
    /// Fails with [`ArrayError::OutOfRange`] when `i >= len()`.
    pub fn at(&self, i: usize) -> Result<Item<'_, T, A>, ArrayError> {
        self.view().at(i)
    }

    /// Position `i`, mutably, or `None` if out of range.
    pub fn get_mut(&mut self, i: usize) -> Option<ItemMut<'_, T, A>> {
        self.view_mut().into_item(i)
    }

    /// Bounds-checked position `i`, mutably.
    pub fn at_mut(&mut self, i: usize) -> Result<ItemMut<'_, T, A>, ArrayError> {
        let len = self.len();
        self.get_mut(i).ok_or(ArrayError::OutOfRange { index: i, len })
    }

    /// Row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range or the array has depth 1.
    pub fn row(&self, i: usize) -> ArrayView<'_, T, A> {
        self.view().row(i)
    }

    /// Row `i`, mutably.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range or the array has depth 1.
    pub fn row_mut(&mut self, i: usize) -> ArrayViewMut<'_, T, A> {
        self.view_mut().into_row(i)
    }

    /// Leaf `i` of a one-dimensional array.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range or the array is deeper than 1.
    pub fn value(&self, i: usize) -> &T {
        self.view().value(i)
    }

    /// Leaf `i` of a one-dimensional array, mutably.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range or the array is deeper than 1.
    pub fn value_mut(&mut self, i: usize) -> &mut T {
        assert_eq!(self.depth(), 1, "value access above the innermost level");
        &mut self.leaves[i]
    }

    /// The first position.
    pub fn front(&self) -> Option<Item<'_, T, A>> {
        self.view().front()
    }

    /// The last position.
    pub fn back(&self) -> Option<Item<'_, T, A>> {
        self.view().back()
    }

    /// Positions of the root, in order.
    pub fn iter(&self) -> Iter<'_, T, A> {
        self.view().iter()
    }

    /// Rows of the root, in order; none for a one-dimensional array.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = ArrayView<'_, T, A>> + '_ {
        self.view().rows()
    }

    /// Mutable positions of the root, in order.
    pub fn iter_mut(&mut self) -> IterMut<'_, T, A> {
        self.view_mut().into_iter()
    }

    /// Overwrite every leaf with a clone of `value`.
    pub fn fill(&mut self, value: &T)
    where
        T: Clone,
    {
        for slot in self.leaves.iter_mut() {
            slot.clone_from(value);
        }
    }

    /// Release everything and return to the canonical empty state.
    ///
    /// Node tables are released first, then leaves in reverse order, then
    /// the leaf buffer. Depth and allocators are kept. Calling it on an
    /// empty array does nothing.
    pub fn clear(&mut self) {
        self.shape.clear();
        let alloc = self.leaves.allocator().clone();
        drop(mem::replace(&mut self.leaves, Block::empty(alloc)));
    }
}

impl<T, A: ArrayAllocator + Default> Default for DynArray<T, A> {
    fn default() -> Self {
        Self::empty_in(1, A::default(), A::default())
    }
}

impl<T, A: ArrayAllocator> AsView<T, A> for DynArray<T, A> {
    fn as_view(&self) -> ArrayView<'_, T, A> {
        self.view()
    }
}

impl<'a, T, A: ArrayAllocator> IntoIterator for &'a DynArray<T, A> {
    type Item = Item<'a, T, A>;
    type IntoIter = Iter<'a, T, A>;

    fn into_iter(self) -> Iter<'a, T, A> {
        self.iter()
    }
}

impl<'a, T, A: ArrayAllocator> IntoIterator for &'a mut DynArray<T, A> {
    type Item = ItemMut<'a, T, A>;
    type IntoIter = IterMut<'a, T, A>;

    fn into_iter(self) -> IterMut<'a, T, A> {
        self.iter_mut()
    }
}

impl<T, A: ArrayAllocator, const N: usize> Index<[usize; N]> for DynArray<T, A> {
    type Output = T;

    fn index(&self, path: [usize; N]) -> &T {
        &self.leaves[locate(self.shape.root_ref(), &path)]
    }
}

impl<T, A: ArrayAllocator, const N: usize> IndexMut<[usize; N]> for DynArray<T, A> {
    fn index_mut(&mut self, path: [usize; N]) -> &mut T {
        let i = locate(self.shape.root_ref(), &path);
        &mut self.leaves[i]
    }
}

impl<T: fmt::Debug, A: ArrayAllocator> fmt::Debug for DynArray<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.view(), f)
    }
}
