//! Arrays where every level owns its own storage.
//!
//! [`NestedArray`] trades the single leaf buffer of [`DynArray`] for
//! plain ownership: each row is a real `NestedArray` living in its
//! parent's block, so rows can be moved, swapped, or replaced as
//! ordinary values. Rows of the innermost level hold their leaves
//! directly.
//!
//! Mutable access to a row goes through [`RowMut`], which only accepts
//! replacements of the row's own depth.
//!
//! [`DynArray`]: crate::DynArray

use std::fmt;
use std::mem;
use std::ops::{Deref, Index, IndexMut};

use smallvec::{smallvec, SmallVec};
use vla_arena::{ArrayAllocator, Block, Global};
use vla_core::{ArrayError, Ownership, MAX_SIZE};

use crate::config::ArrayConfig;
use crate::literal::Literal;

const LIVE_LAYOUT: &str = "every level length was checked before building";

enum Storage<T, A: ArrayAllocator> {
    Values(Block<T, A>),
    Rows(Block<NestedArray<T, A>, A>),
}

/// A runtime-depth array built from nested, individually owned levels.
///
/// Row blocks come from the node allocator and leaf blocks from the
/// leaf allocator; every row carries clones of both.
///
/// # Examples
///
/// ```
/// use vla::NestedArray;
///
/// let mut a = NestedArray::from_elem(&[2, 3], 0u8).unwrap();
/// let mut b = NestedArray::from_elem(&[2, 3], 1u8).unwrap();
/// a.row_mut(0).swap(&mut b.row_mut(1));
/// assert_eq!(a.row(0).values(), &[1, 1, 1]);
/// assert_eq!(b.row(1).values(), &[0, 0, 0]);
/// ```
pub struct NestedArray<T, A: ArrayAllocator = Global> {
    depth: usize,
    node_alloc: A,
    leaf_alloc: A,
    storage: Storage<T, A>,
}

/// Shared access to one entry of a [`NestedArray`].
pub enum Entry<'a, T, A: ArrayAllocator = Global> {
    /// A leaf value.
    Value(&'a T),
    /// A row one level down.
    Row(&'a NestedArray<T, A>),
}

/// Exclusive access to one entry of a [`NestedArray`].
pub enum EntryMut<'a, T, A: ArrayAllocator = Global> {
    /// A leaf value.
    Value(&'a mut T),
    /// A row one level down.
    Row(RowMut<'a, T, A>),
}

/// Exclusive access to one row of a [`NestedArray`].
///
/// Reads go through `Deref`. Every write keeps the row at its depth, so
/// the parent stays well formed: [`replace`](Self::replace) and
/// [`swap`](Self::swap) panic on a row of another depth.
pub struct RowMut<'a, T, A: ArrayAllocator = Global> {
    row: &'a mut NestedArray<T, A>,
}

impl<'a, T, A: ArrayAllocator> Entry<'a, T, A> {
    /// The value, if this is a leaf.
    pub fn value(self) -> Option<&'a T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Row(_) => None,
        }
    }

    /// The row, if this is not a leaf.
    pub fn row(self) -> Option<&'a NestedArray<T, A>> {
        match self {
            Self::Row(r) => Some(r),
            Self::Value(_) => None,
        }
    }
}

impl<'a, T, A: ArrayAllocator> EntryMut<'a, T, A> {
    /// The value, if this is a leaf.
    pub fn value(self) -> Option<&'a mut T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Row(_) => None,
        }
    }

    /// The row, if this is not a leaf.
    pub fn row(self) -> Option<RowMut<'a, T, A>> {
        match self {
            Self::Row(r) => Some(r),
            Self::Value(_) => None,
        }
    }
}

impl<T> NestedArray<T, Global> {
    /// An array of `extents` with every leaf `T::default()`.
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
    /// # Panics
    ///
    /// Panics if `extents` is empty.
    pub fn from_fn<F>(extents: &[usize], f: F) -> Result<Self, ArrayError>
    where
        F: FnMut(&[usize]) -> T,
    {
        Self::from_config(ArrayConfig::new(extents), f)
    }

    /// An array with the literal's shape and values.
    ///
    /// Empty rows are kept as empty rows.
    ///
    /// # Panics
    ///
    /// Panics if the literal mixes nesting depths.
    pub fn from_literal(literal: Literal<T>) -> Self {
        Self::from_literal_in(literal, Global, Global)
    }
}

impl<T, A: ArrayAllocator> NestedArray<T, A> {
    /// Build an array from a full configuration.
    ///
    /// Every level length is checked before the first allocation. Too
    /// few extents, or a zero product, give the canonical empty state.
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
        for (dimension, &extent) in dims.iter().enumerate() {
            let fits = if dimension + 1 == depth {
                Block::<T, A>::check_len(extent)
            } else {
                Block::<Self, A>::check_len(extent)
            };
            fits.map_err(|_| ArrayError::LengthViolation {
                dimension,
                max_size: MAX_SIZE,
            })?;
        }
        if total == 0 {
            return Ok(Self::empty_in(depth, node_allocator, leaf_allocator));
        }

        log::debug!("building nested {dims} array: {total} leaves");
        let mut index: SmallVec<[usize; 4]> = smallvec![0; depth];
        Ok(Self::build(
            &dims,
            0,
            &mut index,
            &node_allocator,
            &leaf_allocator,
            &mut f,
        ))
    }

    fn build<F>(
        dims: &[usize],
        level: usize,
        index: &mut [usize],
        nodes: &A,
        leaves: &A,
        f: &mut F,
    ) -> Self
    where
        F: FnMut(&[usize]) -> T,
    {
        let depth = dims.len() - level;
        let len = dims[level];
        let storage = if depth == 1 {
            Storage::Values(
                Block::try_from_fn(len, leaves.clone(), |i| {
                    index[level] = i;
                    f(index)
                })
                .expect(LIVE_LAYOUT),
            )
        } else {
            Storage::Rows(
                Block::try_from_fn(len, nodes.clone(), |i| {
                    index[level] = i;
                    Self::build(dims, level + 1, index, nodes, leaves, f)
                })
                .expect(LIVE_LAYOUT),
            )
        };
        Self {
            depth,
            node_alloc: nodes.clone(),
            leaf_alloc: leaves.clone(),
            storage,
        }
    }

    /// [`NestedArray::from_literal`] with explicit allocators.
    pub fn from_literal_in(literal: Literal<T>, node_allocator: A, leaf_allocator: A) -> Self {
        let depth = literal.depth();
        Self::build_literal(literal, depth, &node_allocator, &leaf_allocator)
    }

    fn build_literal(literal: Literal<T>, depth: usize, nodes: &A, leaves: &A) -> Self {
        let storage = match literal {
            Literal::Values(values) => Storage::Values(
                Block::try_from_iter(values.len(), leaves.clone(), values).expect(LIVE_LAYOUT),
            ),
            Literal::Rows(rows) => {
                let rows_len = rows.len();
                let built = rows
                    .into_iter()
                    .map(|row| Self::build_literal(row, depth - 1, nodes, leaves));
                Storage::Rows(
                    Block::try_from_iter(rows_len, nodes.clone(), built).expect(LIVE_LAYOUT),
                )
            }
        };
        Self {
            depth,
            node_alloc: nodes.clone(),
            leaf_alloc: leaves.clone(),
            storage,
        }
    }

    /// The canonical empty array of `depth` with explicit allocators.
    ///
    /// # Panics
    ///
    /// Panics if `depth` is zero.
    pub fn empty_in(depth: usize, node_allocator: A, leaf_allocator: A) -> Self {
        assert!(depth >= 1, "array depth must be at least 1");
        let storage = if depth == 1 {
            Storage::Values(Block::empty(leaf_allocator.clone()))
        } else {
            Storage::Rows(Block::empty(node_allocator.clone()))
        };
        Self {
            depth,
            node_alloc: node_allocator,
            leaf_alloc: leaf_allocator,
            storage,
        }
    }

    /// Number of direct entries.
    pub fn len(&self) -> usize {
        match &self.storage {
            Storage::Values(v) => v.len(),
            Storage::Rows(r) => r.len(),
        }
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Levels of indexing from here down to a leaf.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Total number of leaves below this level.
    pub fn leaf_count(&self) -> usize {
        match &self.storage {
            Storage::Values(v) => v.len(),
            Storage::Rows(r) => r.iter().map(Self::leaf_count).sum(),
        }
    }

    /// Every level is owned by its parent.
    pub fn ownership(&self) -> Ownership {
        Ownership::Owner
    }

    /// Allocator of the row blocks.
    pub fn node_allocator(&self) -> &A {
        &self.node_alloc
    }

    /// Allocator of the leaf blocks.
    pub fn leaf_allocator(&self) -> &A {
        &self.leaf_alloc
    }

    /// The leaves of an innermost row; empty above it.
    pub fn values(&self) -> &[T] {
        match &self.storage {
            Storage::Values(v) => v,
            Storage::Rows(_) => &[],
        }
    }

    /// The leaves of an innermost row, mutably; empty above it.
    pub fn values_mut(&mut self) -> &mut [T] {
        match &mut self.storage {
            Storage::Values(v) => v,
            Storage::Rows(_) => &mut [],
        }
    }

    /// The rows one level down; empty at the innermost level.
    pub fn rows(&self) -> &[Self] {
        match &self.storage {
            Storage::Rows(r) => r,
            Storage::Values(_) => &[],
        }
    }

    /// The rows one level down, mutably; empty at the innermost level.
    pub fn rows_mut(&mut self) -> impl ExactSizeIterator<Item = RowMut<'_, T, A>> + '_ {
        self.children_mut().iter_mut().map(RowMut::new)
    }

    fn children_mut(&mut self) -> &mut [Self] {
        match &mut self.storage {
            Storage::Rows(r) => r,
            Storage::Values(_) => &mut [],
        }
    }

    /// Entry `i`, or `None` if out of range.
    pub fn get(&self, i: usize) -> Option<Entry<'_, T, A>> {
        match &self.storage {
            Storage::Values(v) => v.get(i).map(Entry::Value),
            Storage::Rows(r) => r.get(i).map(Entry::Row),
        }
    }

    /// Entry `i`, failing with [`ArrayError::OutOfRange`].
    pub fn at(&self, i: usize) -> Result<Entry<'_, T, A>, ArrayError> {
        let len = self.len();
        self.get(i).ok_or(ArrayError::OutOfRange { index: i, len })
    }

    /// Entry `i` mutably, or `None` if out of range.
    pub fn get_mut(&mut self, i: usize) -> Option<EntryMut<'_, T, A>> {
        match &mut self.storage {
            Storage::Values(v) => v.get_mut(i).map(EntryMut::Value),
            Storage::Rows(r) => r.get_mut(i).map(|row| EntryMut::Row(RowMut::new(row))),
        }
    }

    /// Entry `i` mutably, failing with [`ArrayError::OutOfRange`].
    pub fn at_mut(&mut self, i: usize) -> Result<EntryMut<'_, T, A>, ArrayError> {
        let len = self.len();
        self.get_mut(i).ok_or(ArrayError::OutOfRange { index: i, len })
    }

    /// Row `i`.
    ///
    /// # Panics
    ///
    /// Panics at the innermost level or if `i` is out of range.
    pub fn row(&self, i: usize) -> &Self {
        match &self.storage {
            Storage::Rows(r) => row_at(r, i),
            Storage::Values(_) => panic!("row access at the innermost level"),
        }
    }

    /// Row `i`, mutably.
    ///
    /// The row may be replaced wholesale through [`RowMut::replace`] or
    /// [`RowMut::swap`], by a row of the same depth.
    ///
    /// # Panics
    ///
    /// Panics at the innermost level or if `i` is out of range.
    pub fn row_mut(&mut self, i: usize) -> RowMut<'_, T, A> {
        RowMut::new(self.child_mut(i))
    }

    fn child_mut(&mut self, i: usize) -> &mut Self {
        match &mut self.storage {
            Storage::Rows(r) => {
                let len = r.len();
                r.get_mut(i)
                    .unwrap_or_else(|| panic!("row {i} out of range for length {len}"))
            }
            Storage::Values(_) => panic!("row access at the innermost level"),
        }
    }

    /// Leaf `i` of an innermost row.
    ///
    /// # Panics
    ///
    /// Panics above the innermost level or if `i` is out of range.
    pub fn value(&self, i: usize) -> &T {
        match &self.storage {
            Storage::Values(v) => &v[i],
            Storage::Rows(_) => panic!("value access above the innermost level"),
        }
    }

    /// Leaf `i` of an innermost row, mutably.
    ///
    /// # Panics
    ///
    /// Panics above the innermost level or if `i` is out of range.
    pub fn value_mut(&mut self, i: usize) -> &mut T {
        match &mut self.storage {
            Storage::Values(v) => &mut v[i],
            Storage::Rows(_) => panic!("value access above the innermost level"),
        }
    }

    /// Visit every leaf in row-major order.
    pub fn for_each_leaf<F: FnMut(&T)>(&self, mut f: F) {
        self.visit(&mut f);
    }

    fn visit<F: FnMut(&T)>(&self, f: &mut F) {
        match &self.storage {
            Storage::Values(v) => v.iter().for_each(f),
            Storage::Rows(r) => r.iter().for_each(|row| row.visit(f)),
        }
    }

    /// Visit every leaf mutably in row-major order.
    pub fn for_each_leaf_mut<F: FnMut(&mut T)>(&mut self, mut f: F) {
        self.visit_mut(&mut f);
    }

    fn visit_mut<F: FnMut(&mut T)>(&mut self, f: &mut F) {
        match &mut self.storage {
            Storage::Values(v) => v.iter_mut().for_each(f),
            Storage::Rows(r) => r.iter_mut().for_each(|row| row.visit_mut(f)),
        }
    }

    /// Overwrite every leaf with a clone of `value`.
    pub fn fill(&mut self, value: &T)
    where
        T: Clone,
    {
        self.for_each_leaf_mut(|leaf| leaf.clone_from(value));
    }

    /// Overwrite values with `source`'s, position by position.
    ///
    /// At every level only the first `min(len, source.len)` entries are
    /// written. The shape of `self` never changes.
    ///
    /// # Panics
    ///
    /// Panics if `source` has a different depth.
    pub fn assign<B: ArrayAllocator>(&mut self, source: &NestedArray<T, B>)
    where
        T: Clone,
    {
        check_pair(self.depth, source.depth);
        match (&mut self.storage, &source.storage) {
            (Storage::Values(dst), Storage::Values(src)) => {
                let n = dst.len().min(src.len());
                dst[..n].clone_from_slice(&src[..n]);
            }
            (Storage::Rows(dst), Storage::Rows(src)) => {
                for (d, s) in dst.iter_mut().zip(src.iter()) {
                    d.assign(s);
                }
            }
            _ => unreachable!("equal depths share a storage kind"),
        }
    }

    /// Move `source` into this array.
    ///
    /// When `self` is empty, or both have the same length, `source` is
    /// taken over whole, allocators included, and `self` takes its shape.
    /// Otherwise the first `min(len, source.len)` entries are moved across
    /// level by level under the same rule, and the rest of `source` is
    /// dropped.
    ///
    /// # Panics
    ///
    /// Panics if `source` has a different depth.
    pub fn assign_moved(&mut self, source: Self) {
        check_pair(self.depth, source.depth);
        if self.is_empty() || self.len() == source.len() {
            *self = source;
            return;
        }
        log::debug!(
            "moving {} of {} entries into a nested row",
            self.len().min(source.len()),
            source.len()
        );
        match (&mut self.storage, source.storage) {
            (Storage::Values(dst), Storage::Values(src)) => {
                for (d, s) in dst.iter_mut().zip(src) {
                    *d = s;
                }
            }
            (Storage::Rows(dst), Storage::Rows(src)) => {
                for (d, s) in dst.iter_mut().zip(src) {
                    d.assign_moved(s);
                }
            }
            _ => unreachable!("equal depths share a storage kind"),
        }
    }

    /// Exchange values with `other`, position by position.
    ///
    /// Pairs positions exactly as [`assign`](Self::assign) does; neither
    /// shape changes.
    ///
    /// # Panics
    ///
    /// Panics if `other` has a different depth.
    pub fn swap_with<B: ArrayAllocator>(&mut self, other: &mut NestedArray<T, B>) {
        check_pair(self.depth, other.depth);
        match (&mut self.storage, &mut other.storage) {
            (Storage::Values(a), Storage::Values(b)) => {
                let n = a.len().min(b.len());
                a[..n].swap_with_slice(&mut b[..n]);
            }
            (Storage::Rows(a), Storage::Rows(b)) => {
                for (x, y) in a.iter_mut().zip(b.iter_mut()) {
                    x.swap_with(y);
                }
            }
            _ => unreachable!("equal depths share a storage kind"),
        }
    }

    /// Exchange contents with `other` in O(1).
    ///
    /// Both arrays are top-level owners here, so their depths may differ;
    /// rows are exchanged through [`RowMut::swap`] instead.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Take the contents, leaving `self` empty with the same depth and
    /// allocators.
    pub fn take(&mut self) -> Self {
        let empty = Self::empty_in(
            self.depth,
            self.node_alloc.clone(),
            self.leaf_alloc.clone(),
        );
        mem::replace(self, empty)
    }

    /// Drop every entry and release every block. Idempotent.
    pub fn clear(&mut self) {
        drop(self.take());
    }
}

impl<'a, T, A: ArrayAllocator> RowMut<'a, T, A> {
    fn new(row: &'a mut NestedArray<T, A>) -> Self {
        Self { row }
    }

    /// A shorter-lived handle to the same row.
    pub fn reborrow(&mut self) -> RowMut<'_, T, A> {
        RowMut::new(self.row)
    }

    /// The leaves of an innermost row, mutably; empty above it.
    pub fn values_mut(&mut self) -> &mut [T] {
        self.row.values_mut()
    }

    /// Consume the handle into the row's leaves.
    pub fn into_values_mut(self) -> &'a mut [T] {
        let row = self.row;
        row.values_mut()
    }

    /// The rows one level down; empty at the innermost level.
    pub fn rows_mut(&mut self) -> impl ExactSizeIterator<Item = RowMut<'_, T, A>> + '_ {
        self.row.rows_mut()
    }

    /// See [`NestedArray::get_mut`].
    pub fn get_mut(&mut self, i: usize) -> Option<EntryMut<'_, T, A>> {
        self.row.get_mut(i)
    }

    /// See [`NestedArray::at_mut`].
    pub fn at_mut(&mut self, i: usize) -> Result<EntryMut<'_, T, A>, ArrayError> {
        self.row.at_mut(i)
    }

    /// See [`NestedArray::row_mut`].
    pub fn row_mut(&mut self, i: usize) -> RowMut<'_, T, A> {
        self.row.row_mut(i)
    }

    /// See [`NestedArray::value_mut`].
    pub fn value_mut(&mut self, i: usize) -> &mut T {
        self.row.value_mut(i)
    }

    /// See [`NestedArray::for_each_leaf_mut`].
    pub fn for_each_leaf_mut<F: FnMut(&mut T)>(&mut self, f: F) {
        self.row.for_each_leaf_mut(f);
    }

    /// See [`NestedArray::fill`].
    pub fn fill(&mut self, value: &T)
    where
        T: Clone,
    {
        self.row.fill(value);
    }

    /// See [`NestedArray::assign`].
    pub fn assign<B: ArrayAllocator>(&mut self, source: &NestedArray<T, B>)
    where
        T: Clone,
    {
        self.row.assign(source);
    }

    /// See [`NestedArray::assign_moved`].
    pub fn assign_moved(&mut self, source: NestedArray<T, A>) {
        self.row.assign_moved(source);
    }

    /// See [`NestedArray::swap_with`].
    pub fn swap_with<B: ArrayAllocator>(&mut self, other: &mut NestedArray<T, B>) {
        self.row.swap_with(other);
    }

    /// Put `row` in place of this row and return the old one.
    ///
    /// # Panics
    ///
    /// Panics if `row` has a different depth.
    pub fn replace(&mut self, row: NestedArray<T, A>) -> NestedArray<T, A> {
        check_pair(self.row.depth, row.depth);
        mem::replace(self.row, row)
    }

    /// Exchange this row with `other` in O(1).
    ///
    /// # Panics
    ///
    /// Panics if `other` has a different depth.
    pub fn swap(&mut self, other: &mut RowMut<'_, T, A>) {
        check_pair(self.row.depth, other.row.depth);
        mem::swap(&mut *self.row, &mut *other.row);
    }

    /// Take the row's contents, leaving it empty at the same depth.
    pub fn take(&mut self) -> NestedArray<T, A> {
        self.row.take()
    }

    /// See [`NestedArray::clear`].
    pub fn clear(&mut self) {
        self.row.clear();
    }
}

impl<T, A: ArrayAllocator> Deref for RowMut<'_, T, A> {
    type Target = NestedArray<T, A>;

    fn deref(&self) -> &NestedArray<T, A> {
        &*self.row
    }
}

impl<T: fmt::Debug, A: ArrayAllocator> fmt::Debug for RowMut<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.row, f)
    }
}

fn row_at<T, A: ArrayAllocator>(rows: &[NestedArray<T, A>], i: usize) -> &NestedArray<T, A> {
    rows.get(i)
        .unwrap_or_else(|| panic!("row {i} out of range for length {}", rows.len()))
}

fn check_pair(a: usize, b: usize) {
    assert!(a == b, "cannot pair nested arrays of depth {a} and {b}");
}

impl<T, A: ArrayAllocator, const N: usize> Index<[usize; N]> for NestedArray<T, A> {
    type Output = T;

    fn index(&self, path: [usize; N]) -> &T {
        assert!(
            N == self.depth,
            "index of rank {N} into array of depth {}",
            self.depth
        );
        let (&last, upper) = path.split_last().expect("rank is at least one");
        let mut node = self;
        for &i in upper {
            node = node.row(i);
        }
        node.value(last)
    }
}

impl<T, A: ArrayAllocator, const N: usize> IndexMut<[usize; N]> for NestedArray<T, A> {
    fn index_mut(&mut self, path: [usize; N]) -> &mut T {
        assert!(
            N == self.depth,
            "index of rank {N} into array of depth {}",
            self.depth
        );
        let (&last, upper) = path.split_last().expect("rank is at least one");
        let mut node = self;
        for &i in upper {
            node = node.child_mut(i);
        }
        node.value_mut(last)
    }
}

impl<T: Clone, A: ArrayAllocator> Clone for NestedArray<T, A> {
    fn clone(&self) -> Self {
        let storage = match &self.storage {
            Storage::Values(v) => Storage::Values(
                Block::try_from_fn(v.len(), self.leaf_alloc.clone(), |i| v[i].clone())
                    .expect(LIVE_LAYOUT),
            ),
            Storage::Rows(r) => Storage::Rows(
                Block::try_from_fn(r.len(), self.node_alloc.clone(), |i| r[i].clone())
                    .expect(LIVE_LAYOUT),
            ),
        };
        Self {
            depth: self.depth,
            node_alloc: self.node_alloc.clone(),
            leaf_alloc: self.leaf_alloc.clone(),
            storage,
        }
    }
}

impl<T, A: ArrayAllocator + Default> Default for NestedArray<T, A> {
    fn default() -> Self {
        Self::empty_in(1, A::default(), A::default())
    }
}

impl<T: fmt::Debug, A: ArrayAllocator> fmt::Debug for NestedArray<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.storage {
            Storage::Values(v) => f.debug_list().entries(v.iter()).finish(),
            Storage::Rows(r) => f.debug_list().entries(r.iter()).finish(),
        }
    }
}

impl<T: fmt::Debug, A: ArrayAllocator> fmt::Debug for Entry<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => fmt::Debug::fmt(v, f),
            Self::Row(r) => fmt::Debug::fmt(r, f),
        }
    }
}

impl<T> From<Literal<T>> for NestedArray<T, Global> {
    fn from(literal: Literal<T>) -> Self {
        Self::from_literal(literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> NestedArray<usize> {
        NestedArray::from_fn(&[2, 3], |idx| idx[0] * 10 + idx[1]).unwrap()
    }

    #[test]
    fn builds_row_major() {
        let a = grid();
        assert_eq!(a.len(), 2);
        assert_eq!(a.depth(), 2);
        assert_eq!(a.leaf_count(), 6);
        assert_eq!(a.row(1).values(), &[10, 11, 12]);
        assert_eq!(a[[0, 2]], 2);
        assert_eq!(a.row(0).depth(), 1);
    }

    #[test]
    fn zero_extent_is_empty() {
        let a = NestedArray::<u8>::new(&[3, 0, 2]).unwrap();
        assert!(a.is_empty());
        assert_eq!(a.depth(), 3);
    }

    #[test]
    fn oversized_extent_is_rejected() {
        let err = NestedArray::<u8>::new(&[2, MAX_SIZE + 1]).unwrap_err();
        assert!(matches!(err, ArrayError::LengthViolation { .. }));
    }

    #[test]
    fn at_reports_out_of_range() {
        let a = grid();
        assert!(matches!(a.at(0), Ok(Entry::Row(_))));
        assert_eq!(a.at(2).unwrap_err(), ArrayError::OutOfRange { index: 2, len: 2 });
        assert_eq!(a.row(0).at(1).unwrap().value(), Some(&1));
    }

    #[test]
    fn literal_keeps_empty_rows() {
        let a = NestedArray::from_literal(Literal::rows(vec![vec![1], vec![], vec![2, 3]]));
        assert_eq!(a.len(), 3);
        assert!(a.row(1).is_empty());
        assert_eq!(a.leaf_count(), 3);
        assert_eq!(format!("{a:?}"), "[[1], [], [2, 3]]");
    }

    #[test]
    fn assign_never_reshapes() {
        let mut a = NestedArray::from_elem(&[2, 2], 0).unwrap();
        let b = NestedArray::from_literal(Literal::rows(vec![vec![1, 2, 3], vec![4], vec![5]]));
        a.assign(&b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.row(0).values(), &[1, 2]);
        assert_eq!(a.row(1).values(), &[4, 0]);
    }

    #[test]
    fn assign_moved_steals_on_equal_length() {
        let mut a = NestedArray::from_elem(&[2, 2], 0).unwrap();
        let b = NestedArray::from_literal(Literal::rows(vec![vec![1, 2, 3], vec![4]]));
        a.assign_moved(b);
        assert_eq!(a.row(0).values(), &[1, 2, 3]);
        assert_eq!(a.row(1).values(), &[4]);
    }

    #[test]
    fn assign_moved_is_elementwise_on_length_mismatch() {
        let mut a = NestedArray::from_elem(&[3, 2], 0).unwrap();
        let b = NestedArray::from_literal(Literal::rows(vec![vec![1, 2, 3], vec![4]]));
        a.assign_moved(b);
        assert_eq!(a.len(), 3);
        assert_eq!(a.row(0).values(), &[1, 2]);
        assert_eq!(a.row(1).values(), &[4, 0]);
        assert_eq!(a.row(2).values(), &[0, 0]);
    }

    #[test]
    fn assign_moved_into_empty_takes_shape() {
        let mut a = NestedArray::<usize>::empty_in(2, Global, Global);
        a.assign_moved(grid());
        assert_eq!(a.len(), 2);
        assert_eq!(a.row(1).values(), &[10, 11, 12]);
    }

    #[test]
    fn swap_with_is_bounded() {
        let mut a = NestedArray::from_elem(&[2, 3], 'a').unwrap();
        let mut b = NestedArray::from_elem(&[1, 2], 'b').unwrap();
        a.swap_with(&mut b);
        assert_eq!(a.row(0).values(), &['b', 'b', 'a']);
        assert_eq!(a.row(1).values(), &['a', 'a', 'a']);
        assert_eq!(b.row(0).values(), &['a', 'a']);
    }

    #[test]
    #[should_panic(expected = "cannot pair")]
    fn swap_with_rejects_depth_mismatch() {
        let mut a = NestedArray::from_elem(&[2, 3], 0).unwrap();
        let mut b = NestedArray::from_elem(&[2], 0).unwrap();
        a.swap_with(&mut b);
    }

    #[test]
    fn rows_swap_as_values() {
        let mut a = grid();
        let mut b = NestedArray::from_elem(&[1, 5], 7).unwrap();
        a.row_mut(0).swap(&mut b.row_mut(0));
        assert_eq!(a.row(0).values(), &[7, 7, 7, 7, 7]);
        assert_eq!(b.row(0).values(), &[0, 1, 2]);
        assert_eq!(a.leaf_count(), 8);
        assert_eq!(a[[0, 4]], 7);
    }

    #[test]
    fn row_replace_keeps_parent_depth() {
        let mut a = grid();
        let shorter = NestedArray::from_literal(Literal::Values(vec![4, 5]));
        let old = a.row_mut(1).replace(shorter);
        assert_eq!(old.values(), &[10, 11, 12]);
        assert_eq!(a.row(1).depth(), 1);
        assert_eq!(a[[1, 1]], 5);
        a[[1, 0]] = 9;
        assert_eq!(a.row(1).values(), &[9, 5]);
    }

    #[test]
    #[should_panic(expected = "cannot pair nested arrays of depth 1 and 2")]
    fn row_replace_rejects_other_depth() {
        let mut a = grid();
        let deeper = NestedArray::from_elem(&[2, 2], 0).unwrap();
        a.row_mut(0).replace(deeper);
    }

    #[test]
    #[should_panic(expected = "cannot pair nested arrays of depth 1 and 2")]
    fn row_swap_rejects_other_depth() {
        let mut a = grid();
        let mut b = NestedArray::from_elem(&[2, 2, 2], 0).unwrap();
        a.row_mut(0).swap(&mut b.row_mut(0));
    }

    #[test]
    fn row_handles_write_through() {
        let mut a = NestedArray::from_elem(&[2, 2, 2], 0).unwrap();
        for (i, mut plane) in a.rows_mut().enumerate() {
            for mut row in plane.rows_mut() {
                row.values_mut()[0] = i + 1;
            }
        }
        if let Some(EntryMut::Row(mut plane)) = a.get_mut(1) {
            *plane.row_mut(1).value_mut(1) = 7;
        }
        let taken = a.row_mut(0).row_mut(0).take();
        assert_eq!(taken.values(), &[1, 0]);
        assert!(a.row(0).row(0).is_empty());
        assert_eq!(a.row(0).row(0).depth(), 1);
        assert_eq!(a.row(1).row(1).values(), &[2, 7]);
    }

    #[test]
    #[should_panic(expected = "array depth must be at least 1")]
    fn empty_extents_panic() {
        let _ = NestedArray::<u8>::new(&[]);
    }

    #[test]
    fn take_and_clear_keep_depth() {
        let mut a = grid();
        let b = a.take();
        assert!(a.is_empty());
        assert_eq!(a.depth(), 2);
        assert_eq!(b.leaf_count(), 6);
        let mut c = b.clone();
        c.clear();
        c.clear();
        assert!(c.is_empty());
        assert_eq!(b.row(1).values(), &[10, 11, 12]);
    }

    #[test]
    fn fill_and_visit() {
        let mut a = grid();
        a.fill(&5);
        let mut sum = 0;
        a.for_each_leaf(|&v| sum += v);
        assert_eq!(sum, 30);
        a.for_each_leaf_mut(|v| *v += 1);
        assert_eq!(a.row(1).values(), &[6, 6, 6]);
    }
}
