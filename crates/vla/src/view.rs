//! Borrowed views into one subtree of an array.
//!
//! A view is a node cursor plus the slice of leaves under that node.
//! [`ArrayView`] is the shared form and is `Copy`; [`ArrayViewMut`]
//! holds the only mutable borrow of its leaves, so two mutable views of
//! one array are always disjoint (see [`ArrayViewMut::split_at_mut`]).
//!
//! Indexing a view with one position yields an [`Item`]: the leaf itself
//! at the innermost level, a narrower view everywhere else.

use std::fmt;
use std::mem;
use std::ops::{Index, IndexMut, Range};
use std::slice;

use vla_arena::{ArrayAllocator, Global, Hierarchy, NodeRef, Span};
use vla_core::{ArrayError, Ownership};

/// Anything that can lend a shared view of its whole extent.
pub trait AsView<T, A: ArrayAllocator> {
    /// A view of the entire array or subtree.
    fn as_view(&self) -> ArrayView<'_, T, A>;
}

/// One position of a view.
pub enum Item<'a, T, A: ArrayAllocator = Global> {
    /// A leaf, at the innermost level.
    Value(&'a T),
    /// A nested row, at every other level.
    Row(ArrayView<'a, T, A>),
}

impl<'a, T, A: ArrayAllocator> Item<'a, T, A> {
    /// The leaf, if this is one.
    pub fn value(self) -> Option<&'a T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Row(_) => None,
        }
    }

    /// The row, if this is one.
    pub fn row(self) -> Option<ArrayView<'a, T, A>> {
        match self {
            Self::Value(_) => None,
            Self::Row(r) => Some(r),
        }
    }

    /// Whether this is a leaf.
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

impl<T: fmt::Debug, A: ArrayAllocator> fmt::Debug for Item<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Row(r) => f.debug_tuple("Row").field(r).finish(),
        }
    }
}

/// One mutable position of a view.
pub enum ItemMut<'a, T, A: ArrayAllocator = Global> {
    /// A leaf, at the innermost level.
    Value(&'a mut T),
    /// A nested row, at every other level.
    Row(ArrayViewMut<'a, T, A>),
}

impl<'a, T, A: ArrayAllocator> ItemMut<'a, T, A> {
    /// The leaf, if this is one.
    pub fn value(self) -> Option<&'a mut T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Row(_) => None,
        }
    }

    /// The row, if this is one.
    pub fn row(self) -> Option<ArrayViewMut<'a, T, A>> {
        match self {
            Self::Value(_) => None,
            Self::Row(r) => Some(r),
        }
    }
}

/// A shared view of one subtree.
pub struct ArrayView<'a, T, A: ArrayAllocator = Global> {
    pub(crate) node: NodeRef<'a, A>,
    /// Exactly the leaves of `node`.
    pub(crate) leaves: &'a [T],
    pub(crate) leaf_alloc: &'a A,
}

impl<T, A: ArrayAllocator> Clone for ArrayView<'_, T, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, A: ArrayAllocator> Copy for ArrayView<'_, T, A> {}

/// A mutable view of one subtree.
///
/// Assigning through a view overwrites values in place; the view's shape
/// is borrowed from its owner and never changes.
pub struct ArrayViewMut<'a, T, A: ArrayAllocator = Global> {
    pub(crate) node: NodeRef<'a, A>,
    /// Exactly the leaves of `node`.
    pub(crate) leaves: &'a mut [T],
    pub(crate) leaf_alloc: &'a A,
}

/// Range of `child`'s leaves relative to the start of `parent`'s.
fn relative(parent: Span, child: Span) -> Range<usize> {
    let start = child.leaf_start - parent.leaf_start;
    start..start + child.leaf_len
}

/// Span of child `i` of a non-leaf node.
fn child_span<A: ArrayAllocator>(node: NodeRef<'_, A>, i: usize) -> Span {
    node.children()[i]
}

/// Relative leaf index reached by the full path `path` from `node`.
///
/// # Panics
///
/// Panics if the path length differs from the node's depth or any
/// coordinate is out of range.
pub(crate) fn locate<A: ArrayAllocator>(node: NodeRef<'_, A>, path: &[usize]) -> usize {
    assert_eq!(
        path.len(),
        node.depth(),
        "index of rank {} into array of depth {}",
        path.len(),
        node.depth()
    );
    let base = node.span().leaf_start;
    let mut cur = node;
    for (dimension, &i) in path.iter().enumerate() {
        assert!(
            i < cur.len(),
            "index {i} out of range for length {} at dimension {dimension}",
            cur.len()
        );
        if cur.is_leaf_level() {
            return cur.span().leaf_start + i - base;
        }
        cur = NodeRef::new(cur.hierarchy(), cur.level() + 1, child_span(cur, i));
    }
    unreachable!("a path as long as the depth ends at a leaf")
}

/// Split `node` into its first `mid` children and the rest.
///
/// The halves are not nodes of the hierarchy; they are spans covering a
/// run of siblings, which every view operation accepts.
fn split_span<A: ArrayAllocator>(node: NodeRef<'_, A>, mid: usize) -> (Span, Span) {
    let span = node.span();
    assert!(mid <= span.child_len, "split point {mid} out of range for length {}", span.child_len);
    let leaf_mid = if node.is_leaf_level() {
        span.leaf_start + mid
    } else if mid == span.child_len {
        span.leaf_end()
    } else {
        child_span(node, mid).leaf_start
    };
    let left = Span {
        child_start: span.child_start,
        child_len: mid,
        leaf_start: span.leaf_start,
        leaf_len: leaf_mid - span.leaf_start,
    };
    let right = Span {
        child_start: span.child_start + mid,
        child_len: span.child_len - mid,
        leaf_start: leaf_mid,
        leaf_len: span.leaf_end() - leaf_mid,
    };
    (left, right)
}

impl<'a, T, A: ArrayAllocator> ArrayView<'a, T, A> {
    pub(crate) fn new(node: NodeRef<'a, A>, leaves: &'a [T], leaf_alloc: &'a A) -> Self {
        debug_assert_eq!(leaves.len(), node.span().leaf_len);
        Self {
            node,
            leaves,
            leaf_alloc,
        }
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.node.len()
    }

    /// Whether there are no children.
    pub fn is_empty(&self) -> bool {
        self.node.is_empty()
    }

    /// Levels of indexing from here down to a leaf.
    pub fn depth(&self) -> usize {
        self.node.depth()
    }

    /// Number of leaves in this subtree.
    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// Always [`Ownership::View`].
    pub fn ownership(&self) -> Ownership {
        Ownership::View
    }

    /// The node cursor behind this view.
    pub fn node(&self) -> NodeRef<'a, A> {
        self.node
    }

    /// The hierarchy this view indexes into.
    pub fn hierarchy(&self) -> &'a Hierarchy<A> {
        self.node.hierarchy()
    }

    /// Allocator of the owner's node tables.
    pub fn node_allocator(&self) -> &'a A {
        self.node.hierarchy().allocator()
    }

    /// Allocator of the owner's leaf buffer.
    pub fn leaf_allocator(&self) -> &'a A {
        self.leaf_alloc
    }

    /// Every leaf of this subtree, in order.
    pub fn leaves(&self) -> &'a [T] {
        self.leaves
    }

    /// Position `i`, or `None` if out of range.
    pub fn get(&self, i: usize) -> Option<Item<'a, T, A>> {
        if i >= self.len() {
            return None;
        }
        if self.node.is_leaf_level() {
            return Some(Item::Value(&self.leaves[i]));
        }
        Some(Item::Row(self.child(i)))
    }

    /// Bounds-checked position `i`.
    pub fn at(&self, i: usize) -> Result<Item<'a, T, A>, ArrayError> {
        self.get(i).ok_or(ArrayError::OutOfRange {
            index: i,
            len: self.len(),
        })
    }

    /// Row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range or this is the innermost level.
    pub fn row(&self, i: usize) -> ArrayView<'a, T, A> {
        assert!(!self.node.is_leaf_level(), "row access at the innermost level");
        assert!(i < self.len(), "row {i} out of range for length {}", self.len());
        self.child(i)
    }

    /// Leaf `i` of an innermost-level view.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range or this is not the innermost level.
    pub fn value(&self, i: usize) -> &'a T {
        assert!(self.node.is_leaf_level(), "value access above the innermost level");
        &self.leaves[i]
    }

    /// The first position.
    pub fn front(&self) -> Option<Item<'a, T, A>> {
        self.get(0)
    }

    /// The last position.
    pub fn back(&self) -> Option<Item<'a, T, A>> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    /// Positions in order.
    pub fn iter(&self) -> Iter<'a, T, A> {
        Iter {
            view: *self,
            front: 0,
            back: self.len(),
        }
    }

    /// Rows one level down, in order; none at the innermost level.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = ArrayView<'a, T, A>> + 'a {
        let view = *self;
        let n = if view.node.is_leaf_level() { 0 } else { view.len() };
        (0..n).map(move |i| view.child(i))
    }

    /// Two views over the first `mid` positions and the rest.
    ///
    /// # Panics
    ///
    /// Panics if `mid > len`.
    pub fn split_at(&self, mid: usize) -> (ArrayView<'a, T, A>, ArrayView<'a, T, A>) {
        let (left, right) = split_span(self.node, mid);
        let (l, r) = self.leaves.split_at(left.leaf_len);
        let h = self.node.hierarchy();
        let level = self.node.level();
        (
            ArrayView::new(NodeRef::new(h, level, left), l, self.leaf_alloc),
            ArrayView::new(NodeRef::new(h, level, right), r, self.leaf_alloc),
        )
    }

    fn child(&self, i: usize) -> ArrayView<'a, T, A> {
        let span = child_span(self.node, i);
        let leaves = &self.leaves[relative(self.node.span(), span)];
        let node = NodeRef::new(self.node.hierarchy(), self.node.level() + 1, span);
        ArrayView::new(node, leaves, self.leaf_alloc)
    }
}

impl<T, A: ArrayAllocator> AsView<T, A> for ArrayView<'_, T, A> {
    fn as_view(&self) -> ArrayView<'_, T, A> {
        *self
    }
}

impl<'a, T, A: ArrayAllocator> IntoIterator for ArrayView<'a, T, A> {
    type Item = Item<'a, T, A>;
    type IntoIter = Iter<'a, T, A>;

    fn into_iter(self) -> Iter<'a, T, A> {
        self.iter()
    }
}

impl<T, A: ArrayAllocator, const N: usize> Index<[usize; N]> for ArrayView<'_, T, A> {
    type Output = T;

    fn index(&self, path: [usize; N]) -> &T {
        &self.leaves[locate(self.node, &path)]
    }
}

impl<T: fmt::Debug, A: ArrayAllocator> fmt::Debug for ArrayView<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.node.is_leaf_level() {
            f.debug_list().entries(&self.leaves[..self.len()]).finish()
        } else {
            f.debug_list()
                .entries((0..self.len()).map(|i| self.child(i)))
                .finish()
        }
    }
}

impl<'a, T, A: ArrayAllocator> ArrayViewMut<'a, T, A> {
    pub(crate) fn new(node: NodeRef<'a, A>, leaves: &'a mut [T], leaf_alloc: &'a A) -> Self {
        debug_assert_eq!(leaves.len(), node.span().leaf_len);
        Self {
            node,
            leaves,
            leaf_alloc,
        }
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.node.len()
    }

    /// Whether there are no children.
    pub fn is_empty(&self) -> bool {
        self.node.is_empty()
    }

    /// Levels of indexing from here down to a leaf.
    pub fn depth(&self) -> usize {
        self.node.depth()
    }

    /// Number of leaves in this subtree.
    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// Always [`Ownership::View`].
    pub fn ownership(&self) -> Ownership {
        Ownership::View
    }

    /// The node cursor behind this view.
    pub fn node(&self) -> NodeRef<'a, A> {
        self.node
    }

    /// A shared view of the same subtree.
    pub fn view(&self) -> ArrayView<'_, T, A> {
        ArrayView::new(self.node, &*self.leaves, self.leaf_alloc)
    }

    /// A shorter-lived mutable view of the same subtree.
    pub fn reborrow(&mut self) -> ArrayViewMut<'_, T, A> {
        ArrayViewMut::new(self.node, &mut *self.leaves, self.leaf_alloc)
    }

    /// Every leaf of this subtree, in order.
    pub fn leaves(&self) -> &[T] {
        &*self.leaves
    }

    /// Every leaf of this subtree, mutably.
    pub fn leaves_mut(&mut self) -> &mut [T] {
        &mut *self.leaves
    }

    /// Give up the view and keep the leaf slice.
    pub fn into_leaves(self) -> &'a mut [T] {
        self.leaves
    }

    /// Position `i`, or `None` if out of range.
    pub fn get(&self, i: usize) -> Option<Item<'_, T, A>> {
        self.view().get(i)
    }

    /// Bounds-checked position `i`.
    pub fn at(&self, i: usize) -> Result<Item<'_, T, A>, ArrayError> {
        self.view().at(i)
    }

    /// Position `i`, mutably, or `None` if out of range.
    pub fn get_mut(&mut self, i: usize) -> Option<ItemMut<'_, T, A>> {
        self.reborrow().into_item(i)
    }

    /// Bounds-checked position `i`, mutably.
    pub fn at_mut(&mut self, i: usize) -> Result<ItemMut<'_, T, A>, ArrayError> {
        let len = self.len();
        self.get_mut(i).ok_or(ArrayError::OutOfRange { index: i, len })
    }

    /// Consume the view and keep position `i`.
    pub fn into_item(self, i: usize) -> Option<ItemMut<'a, T, A>> {
        if i >= self.len() {
            return None;
        }
        if self.node.is_leaf_level() {
            return Some(ItemMut::Value(&mut self.leaves[i]));
        }
        Some(ItemMut::Row(self.into_child(i)))
    }

    /// Row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range or this is the innermost level.
    pub fn row(&self, i: usize) -> ArrayView<'_, T, A> {
        self.view().row(i)
    }

    /// Row `i`, mutably.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range or this is the innermost level.
    pub fn row_mut(&mut self, i: usize) -> ArrayViewMut<'_, T, A> {
        self.reborrow().into_row(i)
    }

    /// Consume the view and keep row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range or this is the innermost level.
    pub fn into_row(self, i: usize) -> ArrayViewMut<'a, T, A> {
        assert!(!self.node.is_leaf_level(), "row access at the innermost level");
        assert!(i < self.len(), "row {i} out of range for length {}", self.len());
        self.into_child(i)
    }

    /// Leaf `i` of an innermost-level view.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range or this is not the innermost level.
    pub fn value(&self, i: usize) -> &T {
        self.view().value(i)
    }

    /// Leaf `i` of an innermost-level view, mutably.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range or this is not the innermost level.
    pub fn value_mut(&mut self, i: usize) -> &mut T {
        assert!(self.node.is_leaf_level(), "value access above the innermost level");
        &mut self.leaves[i]
    }

    /// Positions in order.
    pub fn iter(&self) -> Iter<'_, T, A> {
        self.view().iter()
    }

    /// Mutable positions in order.
    pub fn iter_mut(&mut self) -> IterMut<'_, T, A> {
        self.reborrow().into_iter()
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

    /// Two disjoint mutable views over the first `mid` positions and the
    /// rest.
    ///
    /// # Panics
    ///
    /// Panics if `mid > len`.
    pub fn split_at_mut(&mut self, mid: usize) -> (ArrayViewMut<'_, T, A>, ArrayViewMut<'_, T, A>) {
        self.reborrow().into_split(mid)
    }

    /// Consume the view and split it at `mid`.
    ///
    /// # Panics
    ///
    /// Panics if `mid > len`.
    pub fn into_split(self, mid: usize) -> (ArrayViewMut<'a, T, A>, ArrayViewMut<'a, T, A>) {
        let (left, right) = split_span(self.node, mid);
        let (l, r) = self.leaves.split_at_mut(left.leaf_len);
        let h = self.node.hierarchy();
        let level = self.node.level();
        (
            ArrayViewMut::new(NodeRef::new(h, level, left), l, self.leaf_alloc),
            ArrayViewMut::new(NodeRef::new(h, level, right), r, self.leaf_alloc),
        )
    }

    fn into_child(self, i: usize) -> ArrayViewMut<'a, T, A> {
        let span = child_span(self.node, i);
        let range = relative(self.node.span(), span);
        let node = NodeRef::new(self.node.hierarchy(), self.node.level() + 1, span);
        ArrayViewMut::new(node, &mut self.leaves[range], self.leaf_alloc)
    }
}

impl<T, A: ArrayAllocator> AsView<T, A> for ArrayViewMut<'_, T, A> {
    fn as_view(&self) -> ArrayView<'_, T, A> {
        self.view()
    }
}

impl<'a, T, A: ArrayAllocator> IntoIterator for ArrayViewMut<'a, T, A> {
    type Item = ItemMut<'a, T, A>;
    type IntoIter = IterMut<'a, T, A>;

    fn into_iter(self) -> IterMut<'a, T, A> {
        let len = self.len();
        if self.node.is_leaf_level() {
            return IterMut {
                inner: IterMutInner::Values(self.leaves[..len].iter_mut()),
            };
        }
        IterMut {
            inner: IterMutInner::Rows {
                hierarchy: self.node.hierarchy(),
                level: self.node.level() + 1,
                spans: self.node.children().iter(),
                leaves: self.leaves,
                leaf_alloc: self.leaf_alloc,
            },
        }
    }
}

impl<T, A: ArrayAllocator, const N: usize> Index<[usize; N]> for ArrayViewMut<'_, T, A> {
    type Output = T;

    fn index(&self, path: [usize; N]) -> &T {
        &self.leaves[locate(self.node, &path)]
    }
}

impl<T, A: ArrayAllocator, const N: usize> IndexMut<[usize; N]> for ArrayViewMut<'_, T, A> {
    fn index_mut(&mut self, path: [usize; N]) -> &mut T {
        &mut self.leaves[locate(self.node, &path)]
    }
}

impl<T: fmt::Debug, A: ArrayAllocator> fmt::Debug for ArrayViewMut<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.view(), f)
    }
}

/// Iterator over the positions of a shared view.
pub struct Iter<'a, T, A: ArrayAllocator = Global> {
    view: ArrayView<'a, T, A>,
    front: usize,
    back: usize,
}

impl<'a, T, A: ArrayAllocator> Iterator for Iter<'a, T, A> {
    type Item = Item<'a, T, A>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let item = self.view.get(self.front);
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<T, A: ArrayAllocator> DoubleEndedIterator for Iter<'_, T, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        self.view.get(self.back)
    }
}

impl<T, A: ArrayAllocator> ExactSizeIterator for Iter<'_, T, A> {}

/// Iterator over the positions of a mutable view.
pub struct IterMut<'a, T, A: ArrayAllocator = Global> {
    inner: IterMutInner<'a, T, A>,
}

enum IterMutInner<'a, T, A: ArrayAllocator> {
    Values(slice::IterMut<'a, T>),
    Rows {
        hierarchy: &'a Hierarchy<A>,
        level: usize,
        spans: slice::Iter<'a, Span>,
        /// Leaves of the rows not yet yielded.
        leaves: &'a mut [T],
        leaf_alloc: &'a A,
    },
}

impl<'a, T, A: ArrayAllocator> Iterator for IterMut<'a, T, A> {
    type Item = ItemMut<'a, T, A>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IterMutInner::Values(values) => values.next().map(ItemMut::Value),
            IterMutInner::Rows {
                hierarchy,
                level,
                spans,
                leaves,
                leaf_alloc,
            } => {
                let span = *spans.next()?;
                let (head, tail) = mem::take(leaves).split_at_mut(span.leaf_len);
                *leaves = tail;
                let node = NodeRef::new(*hierarchy, *level, span);
                Some(ItemMut::Row(ArrayViewMut::new(node, head, *leaf_alloc)))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            IterMutInner::Values(values) => values.size_hint(),
            IterMutInner::Rows { spans, .. } => spans.size_hint(),
        }
    }
}

impl<T, A: ArrayAllocator> ExactSizeIterator for IterMut<'_, T, A> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DynArray;

    fn grid() -> DynArray<usize> {
        DynArray::from_fn(&[3, 4], |idx| idx[0] * 10 + idx[1]).unwrap()
    }

    #[test]
    fn rows_narrow_the_leaf_slice() {
        let a = grid();
        let row = a.row(1);
        assert_eq!(row.len(), 4);
        assert_eq!(row.depth(), 1);
        assert_eq!(row.leaves(), &[10, 11, 12, 13]);
        assert_eq!(row.ownership(), Ownership::View);
    }

    #[test]
    fn get_distinguishes_rows_and_values() {
        let a = grid();
        assert!(a.view().get(0).unwrap().row().is_some());
        let row = a.row(2);
        assert_eq!(row.get(3).unwrap().value(), Some(&23));
        assert!(row.get(4).is_none());
    }

    #[test]
    fn at_reports_out_of_range() {
        let a = grid();
        let err = a.view().at(3).unwrap_err();
        assert_eq!(err, ArrayError::OutOfRange { index: 3, len: 3 });
        assert!(a.view().at(2).is_ok());
    }

    #[test]
    fn full_path_index() {
        let a = grid();
        assert_eq!(a.view()[[2, 1]], 21);
        assert_eq!(a.row(1)[[3]], 13);
    }

    #[test]
    #[should_panic(expected = "index of rank 1 into array of depth 2")]
    fn full_path_index_checks_rank() {
        let a = grid();
        let _ = a.view()[[1]];
    }

    #[test]
    #[should_panic(expected = "value access above the innermost level")]
    fn value_on_row_level_panics() {
        let a = grid();
        let _ = a.view().value(0);
    }

    #[test]
    fn iter_is_double_ended() {
        let a = grid();
        let firsts: Vec<usize> = a
            .view()
            .iter()
            .rev()
            .map(|i| i.row().unwrap().leaves()[0])
            .collect();
        assert_eq!(firsts, vec![20, 10, 0]);
    }

    #[test]
    fn rows_skip_the_innermost_level() {
        let a = grid();
        let lens: Vec<usize> = a.view().rows().map(|r| r.len()).collect();
        assert_eq!(lens, [4, 4, 4]);
        assert_eq!(a.row(0).rows().len(), 0);
    }

    #[test]
    fn split_at_covers_both_halves() {
        let a = grid();
        let (left, right) = a.view().split_at(1);
        assert_eq!(left.len(), 1);
        assert_eq!(right.len(), 2);
        assert_eq!(right.leaves()[0], 10);
        assert_eq!(right.row(1).leaves(), &[20, 21, 22, 23]);
    }

    #[test]
    fn split_at_mut_gives_disjoint_rows() {
        let mut a = grid();
        let mut root = a.view_mut();
        let (mut top, mut rest) = root.split_at_mut(1);
        top.row_mut(0).fill(&7);
        rest.row_mut(1).value_mut(0).clone_from(&99);
        assert_eq!(a.row(0).leaves(), &[7, 7, 7, 7]);
        assert_eq!(a[[2, 0]], 99);
    }

    #[test]
    fn iter_mut_walks_rows() {
        let mut a = grid();
        for (r, item) in a.view_mut().iter_mut().enumerate() {
            let mut row = item.row().unwrap();
            row.fill(&r);
        }
        assert_eq!(a.leaves(), &[0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2]);
    }

    #[test]
    fn iter_mut_at_leaf_level_yields_values() {
        let mut a = DynArray::from_vec(vec![1, 2, 3]);
        for item in a.view_mut().iter_mut() {
            *item.value().unwrap() *= 2;
        }
        assert_eq!(a.leaves(), &[2, 4, 6]);
    }

    #[test]
    fn debug_prints_nested_lists() {
        let a = DynArray::from_fn(&[2, 2], |idx| idx[0] + idx[1]).unwrap();
        assert_eq!(format!("{:?}", a.view()), "[[0, 1], [1, 2]]");
    }
}
