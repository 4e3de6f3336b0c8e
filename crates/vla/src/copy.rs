//! Deep copies and copy-assignment.
//!
//! Copying never aliases the source. The copy's node tables are re-sliced
//! from the source spans, so block sizes are read from the source rather
//! than recomputed, and copying a view re-flattens exactly its leaves.

use vla_arena::{zip_leaf_runs, ArrayAllocator, Block, Global, Hierarchy, NodeRef};
use vla_core::ArrayError;

use crate::array::DynArray;
use crate::view::{ArrayView, ArrayViewMut, AsView};

const LIVE_LAYOUT: &str = "a copy never outgrows the live array it was taken from";

impl<'a, T: Clone, A: ArrayAllocator> ArrayView<'a, T, A> {
    /// An owning copy of this subtree, using clones of the owner's
    /// allocators.
    pub fn to_owned(&self) -> DynArray<T, A> {
        self.to_owned_in(self.node_allocator().clone(), self.leaf_allocator().clone())
    }

    /// An owning copy of this subtree, drawing from the given allocators.
    pub fn to_owned_in<B: ArrayAllocator>(
        &self,
        node_allocator: B,
        leaf_allocator: B,
    ) -> DynArray<T, B> {
        let shape = Hierarchy::subtree(self.node, node_allocator).expect(LIVE_LAYOUT);
        let leaves = if shape.is_empty() {
            Block::empty(leaf_allocator)
        } else {
            Block::try_from_fn(self.leaves.len(), leaf_allocator, |i| self.leaves[i].clone())
                .expect(LIVE_LAYOUT)
        };
        DynArray::from_parts(shape, leaves)
    }
}

impl<T: Clone, A: ArrayAllocator> DynArray<T, A> {
    /// A deep copy drawing from fresh allocators.
    pub fn clone_in<B: ArrayAllocator>(
        &self,
        node_allocator: B,
        leaf_allocator: B,
    ) -> DynArray<T, B> {
        self.view().to_owned_in(node_allocator, leaf_allocator)
    }

    /// Replace the whole array with a copy of `source`.
    ///
    /// The old contents are released and the array takes the source's
    /// depth and shape; allocators are kept.
    pub fn assign<B, S>(&mut self, source: &S)
    where
        B: ArrayAllocator,
        S: AsView<T, B> + ?Sized,
    {
        let copy = source
            .as_view()
            .to_owned_in(self.node_allocator().clone(), self.leaf_allocator().clone());
        *self = copy;
    }
}

impl<T: Clone, A: ArrayAllocator> Clone for DynArray<T, A> {
    fn clone(&self) -> Self {
        self.clone_in(self.node_allocator().clone(), self.leaf_allocator().clone())
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign(source);
    }
}

impl<T: Clone> DynArray<T, Global> {
    /// A new array whose rows are copies of `rows`, in order.
    ///
    /// Rows may come from different arrays but must share one depth; the
    /// result is one level deeper. No rows at all gives the empty array
    /// of depth 2.
    ///
    /// # Panics
    ///
    /// Panics if the rows differ in depth.
    pub fn from_rows<'r, B, I>(rows: I) -> Result<Self, ArrayError>
    where
        T: 'r,
        B: ArrayAllocator + 'r,
        I: IntoIterator<Item = ArrayView<'r, T, B>>,
    {
        Self::from_rows_in(rows, Global, Global)
    }
}

impl<T: Clone, A: ArrayAllocator> DynArray<T, A> {
    /// [`DynArray::from_rows`] with explicit allocators.
    pub fn from_rows_in<'r, B, I>(
        rows: I,
        node_allocator: A,
        leaf_allocator: A,
    ) -> Result<Self, ArrayError>
    where
        T: 'r,
        B: ArrayAllocator + 'r,
        I: IntoIterator<Item = ArrayView<'r, T, B>>,
    {
        let rows: Vec<ArrayView<'r, T, B>> = rows.into_iter().collect();
        let row_depth = rows.first().map_or(1, |r| r.depth());
        let nodes: Vec<NodeRef<'r, B>> = rows.iter().map(|r| r.node()).collect();
        let shape = Hierarchy::stack(row_depth, &nodes, node_allocator)?;
        let leaves = if shape.is_empty() {
            Block::empty(leaf_allocator)
        } else {
            let values = rows.iter().flat_map(|r| r.leaves().iter().cloned());
            Block::try_from_iter(shape.leaf_count(), leaf_allocator, values)?
        };
        Ok(Self::from_parts(shape, leaves))
    }
}

impl<'a, T: Clone, A: ArrayAllocator> ArrayViewMut<'a, T, A> {
    /// Overwrite this subtree's values with `source`'s, in place.
    ///
    /// At every level only the first `min(len, source.len)` positions are
    /// written; the rest of this view keeps its values and its shape never
    /// changes. Nothing is allocated.
    ///
    /// # Panics
    ///
    /// Panics if `source` has a different depth.
    pub fn assign<B, S>(&mut self, source: &S)
    where
        B: ArrayAllocator,
        S: AsView<T, B> + ?Sized,
    {
        let src = source.as_view();
        let dst_base = self.node.span().leaf_start;
        let src_base = src.node().span().leaf_start;
        let dst = &mut *self.leaves;
        let values = src.leaves();
        zip_leaf_runs(self.node, src.node(), &mut |d, s| {
            dst[d.start - dst_base..d.end - dst_base]
                .clone_from_slice(&values[s.start - src_base..s.end - src_base]);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_is_independent() {
        let a = DynArray::from_elem(&[3, 4], 7).unwrap();
        let mut b = a.clone();
        b[[1, 2]] = 99;
        assert_eq!(a[[1, 2]], 7);
        assert_eq!(b[[1, 2]], 99);
    }

    #[test]
    fn clone_keeps_jagged_shape() {
        let a = DynArray::from_nested(vec![vec![1, 2], vec![], vec![3, 4, 5]]);
        let b = a.clone();
        assert_eq!(b.len(), 3);
        assert_eq!(b.row(1).len(), 0);
        assert_eq!(b.row(2).leaves(), &[3, 4, 5]);
    }

    #[test]
    fn view_copy_reflattens_its_slice() {
        let a = DynArray::from_fn(&[2, 3, 2], |idx| idx[0] * 100 + idx[1] * 10 + idx[2]).unwrap();
        let b = a.row(1).to_owned();
        assert_eq!(b.depth(), 2);
        assert_eq!(b.len(), 3);
        assert_eq!(b.leaves(), &[100, 101, 110, 111, 120, 121]);
        assert_eq!(b.row(2).leaves(), &[120, 121]);
    }

    #[test]
    fn split_half_copies_as_array() {
        let a = DynArray::from_fn(&[4, 2], |idx| idx[0]).unwrap();
        let (_, tail) = a.view().split_at(2);
        let b = tail.to_owned();
        assert_eq!(b.len(), 2);
        assert_eq!(b.leaves(), &[2, 2, 3, 3]);
    }

    #[test]
    fn owner_assign_rebuilds() {
        let mut a = DynArray::from_elem(&[2, 2], 1).unwrap();
        let b = DynArray::from_elem(&[3, 1, 2], 5).unwrap();
        a.assign(&b);
        assert_eq!(a.depth(), 3);
        assert_eq!(a.len(), 3);
        assert_eq!(a.leaf_count(), 6);
    }

    #[test]
    fn clone_from_keeps_target_allocators() {
        let mut a = DynArray::from_elem(&[1, 1], 0).unwrap();
        let b = DynArray::from_nested(vec![vec![1], vec![2, 3]]);
        a.clone_from(&b);
        assert_eq!(a.row(1).leaves(), &[2, 3]);
        assert_eq!(a.node_allocator(), &Global);
    }

    #[test]
    fn view_assign_is_bounded_by_min() {
        let mut a = DynArray::from_elem(&[2, 4], 0).unwrap();
        let src = DynArray::from_vec(vec![1, 2]);
        a.row_mut(1).assign(&src);
        assert_eq!(a.row(1).leaves(), &[1, 2, 0, 0]);
        assert_eq!(a.row(1).len(), 4);

        let long = DynArray::from_vec(vec![9; 10]);
        a.row_mut(0).assign(&long);
        assert_eq!(a.row(0).leaves(), &[9, 9, 9, 9]);
        assert_eq!(a.row(1).leaves(), &[1, 2, 0, 0]);
    }

    #[test]
    fn view_assign_between_rows_of_other_arrays() {
        let mut a = DynArray::from_elem(&[2, 2, 2], 0).unwrap();
        let b = DynArray::from_fn(&[3, 3], |idx| idx[0] * 3 + idx[1]).unwrap();
        a.row_mut(0).assign(&b.view());
        assert_eq!(a.row(0).leaves(), &[0, 1, 3, 4]);
        assert!(a.row(1).leaves().iter().all(|&v| v == 0));
    }

    #[test]
    #[should_panic(expected = "cannot pair")]
    fn view_assign_rejects_depth_mismatch() {
        let mut a = DynArray::from_elem(&[2, 2], 0).unwrap();
        let b = DynArray::from_elem(&[2, 2], 1).unwrap();
        a.row_mut(0).assign(&b);
    }

    #[test]
    fn from_rows_stacks_views() {
        let a = DynArray::from_fn(&[2, 2], |idx| idx[0] * 2 + idx[1]).unwrap();
        let b = DynArray::from_vec(vec![7, 8, 9]);
        let c = DynArray::from_rows([a.row(1), b.view(), a.row(0)]).unwrap();
        assert_eq!(c.depth(), 2);
        assert_eq!(c.len(), 3);
        assert_eq!(c.row(1).leaves(), &[7, 8, 9]);
        assert_eq!(c.leaves(), &[2, 3, 7, 8, 9, 0, 1]);
    }

    #[test]
    fn from_no_rows_is_empty() {
        let c = DynArray::<u8>::from_rows(Vec::<ArrayView<'_, u8>>::new()).unwrap();
        assert!(c.is_empty());
        assert_eq!(c.depth(), 2);
    }
}
