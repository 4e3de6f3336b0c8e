//! Moves, swaps, and exchanges.
//!
//! An owner hands its allocations over in O(1). A view cannot: its node
//! tables and leaves belong to an ancestor, so moving out of a view
//! rebuilds fresh storage and moves the leaves across one by one, leaving
//! the view's shape untouched.

use std::mem;

use vla_arena::{zip_leaf_runs, ArrayAllocator, Block, Hierarchy};

use crate::array::DynArray;
use crate::view::ArrayViewMut;

const LIVE_LAYOUT: &str = "a moved-out subtree never outgrows its source";

/// Put `value` in `target` and return what was there.
///
/// Both are owners, so this is a pointer exchange.
pub fn exchange<T, A: ArrayAllocator>(
    target: &mut DynArray<T, A>,
    value: DynArray<T, A>,
) -> DynArray<T, A> {
    mem::replace(target, value)
}

impl<T, A: ArrayAllocator> DynArray<T, A> {
    /// Take the contents in O(1), leaving `self` canonically empty with
    /// the same depth and allocators.
    pub fn take(&mut self) -> Self {
        let empty = Self::empty_in(
            self.depth(),
            self.node_allocator().clone(),
            self.leaf_allocator().clone(),
        );
        mem::replace(self, empty)
    }

    /// Exchange contents with `other` in O(1). No element is touched.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }
}

impl<'a, T, A: ArrayAllocator> ArrayViewMut<'a, T, A> {
    /// Move this subtree's values into a new owner.
    ///
    /// Each leaf is replaced by `T::default()`; the view keeps its shape.
    /// The new array draws from clones of the owner's allocators.
    pub fn take(&mut self) -> DynArray<T, A>
    where
        T: Default,
    {
        let node_alloc = self.node.hierarchy().allocator().clone();
        let shape = Hierarchy::subtree(self.node, node_alloc).expect(LIVE_LAYOUT);
        let leaf_alloc = self.leaf_alloc.clone();
        if shape.is_empty() {
            return DynArray::from_parts(shape, Block::empty(leaf_alloc));
        }
        let len = self.leaves.len();
        let moved = self.leaves.iter_mut().map(mem::take);
        let leaves = Block::try_from_iter(len, leaf_alloc, moved).expect(LIVE_LAYOUT);
        DynArray::from_parts(shape, leaves)
    }

    /// Move `source`'s values into this subtree, in place.
    ///
    /// At every level only the first `min(len, source.len)` positions are
    /// paired. Unpaired source values are dropped with `source`; unpaired
    /// values here are kept. The shape never changes.
    ///
    /// # Panics
    ///
    /// Panics if `source` has a different depth.
    pub fn assign_moved<B: ArrayAllocator>(&mut self, source: DynArray<T, B>) {
        let (src_shape, src_leaves) = source.into_parts();
        let dst_base = self.node.span().leaf_start;
        let dst = &mut *self.leaves;
        let mut values = src_leaves.into_iter();
        let mut pos = 0;
        zip_leaf_runs(self.node, src_shape.root_ref(), &mut |d, s| {
            while pos < s.start {
                drop(values.next());
                pos += 1;
            }
            for slot in &mut dst[d.start - dst_base..d.end - dst_base] {
                if let Some(v) = values.next() {
                    *slot = v;
                }
                pos += 1;
            }
        });
    }

    /// Move `value` into this subtree and return the previous contents.
    ///
    /// Equivalent to [`take`](Self::take) followed by
    /// [`assign_moved`](Self::assign_moved).
    pub fn replace<B: ArrayAllocator>(&mut self, value: DynArray<T, B>) -> DynArray<T, A>
    where
        T: Default,
    {
        let old = self.take();
        self.assign_moved(value);
        old
    }

    /// Exchange values with `other`, position by position.
    ///
    /// Pairs positions exactly as [`assign`](Self::assign) does; neither
    /// shape changes.
    ///
    /// # Panics
    ///
    /// Panics if `other` has a different depth.
    pub fn swap_with<B: ArrayAllocator>(&mut self, other: &mut ArrayViewMut<'_, T, B>) {
        let a_base = self.node.span().leaf_start;
        let b_base = other.node.span().leaf_start;
        let a = &mut *self.leaves;
        let b = &mut *other.leaves;
        zip_leaf_runs(self.node, other.node, &mut |x, y| {
            let theirs = &mut b[y.start - b_base..y.end - b_base];
            a[x.start - a_base..x.end - a_base].swap_with_slice(theirs);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_move_is_a_steal() {
        let mut a = DynArray::from_vec(vec![1, 2, 3, 4, 5]);
        let ptr = a.leaves().as_ptr();
        let b = a.take();
        assert!(a.is_empty());
        assert_eq!(a.depth(), 1);
        assert_eq!(b.leaves(), &[1, 2, 3, 4, 5]);
        assert_eq!(b.leaves().as_ptr(), ptr);
    }

    #[test]
    fn swap_exchanges_without_touching_elements() {
        let mut a = DynArray::from_elem(&[2, 2], 'a').unwrap();
        let mut b = DynArray::from_vec(vec!['b'; 3]);
        let pa = a.leaves().as_ptr();
        a.swap(&mut b);
        assert_eq!(a.depth(), 1);
        assert_eq!(b.depth(), 2);
        assert_eq!(b.leaves().as_ptr(), pa);
    }

    #[test]
    fn exchange_returns_the_old_array() {
        let mut a = DynArray::from_vec(vec![1]);
        let old = exchange(&mut a, DynArray::from_vec(vec![2, 3]));
        assert_eq!(old.leaves(), &[1]);
        assert_eq!(a.leaves(), &[2, 3]);
    }

    #[test]
    fn view_take_rebuilds_and_leaves_defaults() {
        let mut a = DynArray::from_fn(&[2, 3], |idx| (idx[0] * 3 + idx[1]) as u32 + 1).unwrap();
        let row = a.row_mut(1).take();
        assert_eq!(row.depth(), 1);
        assert_eq!(row.leaves(), &[4, 5, 6]);
        assert_eq!(a.row(1).leaves(), &[0, 0, 0]);
        assert_eq!(a.row(1).len(), 3);
        assert_eq!(a.row(0).leaves(), &[1, 2, 3]);
    }

    #[test]
    fn view_take_moves_a_whole_plane() {
        let mut a = DynArray::from_fn(&[2, 3, 2], |idx| {
            (idx[0] * 100 + idx[1] * 10 + idx[2]) as u32 + 1
        })
        .unwrap();
        let plane = a.row_mut(1).take();
        assert_eq!(plane.depth(), 2);
        assert_eq!(plane.len(), 3);
        assert!((0..3).all(|j| plane.row(j).len() == 2));
        assert_eq!(plane.leaves(), &[101, 102, 111, 112, 121, 122]);

        let source = a.row(1);
        assert_eq!(source.depth(), 2);
        assert_eq!(source.len(), 3);
        assert!((0..3).all(|j| source.row(j).len() == 2));
        assert_eq!(source.leaves(), &[0; 6]);
        assert_eq!(a.row(0).leaves(), &[1, 2, 11, 12, 21, 22]);
    }

    #[test]
    fn view_take_keeps_jagged_shape() {
        let mut a = DynArray::from_nested3(vec![
            vec![vec![1], vec![2, 3]],
            vec![vec![4, 5, 6], vec![], vec![7]],
        ]);
        let plane = a.row_mut(1).take();
        assert_eq!(plane.depth(), 2);
        assert_eq!(plane.len(), 3);
        assert_eq!(plane.row(0).leaves(), &[4, 5, 6]);
        assert!(plane.row(1).is_empty());
        assert_eq!(plane.row(2).leaves(), &[7]);

        let source = a.row(1);
        assert_eq!(source.len(), 3);
        assert_eq!(source.row(0).len(), 3);
        assert_eq!(source.row(1).len(), 0);
        assert_eq!(source.row(2).len(), 1);
        assert_eq!(a.leaves(), &[1, 2, 3, 0, 0, 0, 0]);
    }

    #[test]
    fn view_take_without_leaves_is_empty() {
        let mut a = DynArray::from_nested3(vec![vec![vec![1]], vec![vec![], vec![]]]);
        let plane = a.row_mut(1).take();
        assert!(plane.is_empty());
        assert_eq!(plane.depth(), 2);
        assert_eq!(a.row(1).len(), 2);
        assert_eq!(a.leaves(), &[1]);
    }

    #[test]
    fn assign_moved_pairs_prefix_and_drops_rest() {
        let mut a = DynArray::from_elem(&[2, 2], String::new()).unwrap();
        let src = DynArray::from_nested(vec![
            vec![String::from("a"), String::from("b"), String::from("c")],
            vec![String::from("d")],
            vec![String::from("e")],
        ]);
        a.view_mut().assign_moved(src);
        assert_eq!(a.row(0).leaves(), &["a", "b"]);
        assert_eq!(a.row(1).leaves(), &["d", ""]);
    }

    #[test]
    fn replace_returns_previous_contents() {
        let mut a = DynArray::from_fn(&[2, 2], |idx| idx[0] * 2 + idx[1]).unwrap();
        let old = a.row_mut(0).replace(DynArray::from_vec(vec![8, 9]));
        assert_eq!(old.leaves(), &[0, 1]);
        assert_eq!(a.leaves(), &[8, 9, 2, 3]);
    }

    #[test]
    fn swap_with_between_sibling_rows() {
        let mut a = DynArray::from_nested(vec![vec![1, 2, 3], vec![4, 5]]);
        let mut root = a.view_mut();
        let (mut left, mut right) = root.split_at_mut(1);
        left.row_mut(0).swap_with(&mut right.row_mut(0));
        assert_eq!(a.row(0).leaves(), &[4, 5, 3]);
        assert_eq!(a.row(1).leaves(), &[1, 2]);
    }
}
