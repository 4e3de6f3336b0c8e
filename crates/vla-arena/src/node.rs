//! Cursors into a [`Hierarchy`].

use std::fmt;
use std::ops::Range;

use crate::alloc::ArrayAllocator;
use crate::hierarchy::Hierarchy;
use crate::span::Span;

/// A borrowed position in a hierarchy: one node and the depth it sits at.
///
/// Level 0 is the root. A node whose remaining depth is 1 is a leaf-level
/// node; its children are leaves rather than nodes.
pub struct NodeRef<'a, A: ArrayAllocator> {
    hierarchy: &'a Hierarchy<A>,
    level: usize,
    span: Span,
}

impl<A: ArrayAllocator> Clone for NodeRef<'_, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A: ArrayAllocator> Copy for NodeRef<'_, A> {}

impl<'a, A: ArrayAllocator> NodeRef<'a, A> {
    /// A cursor on `span`, which must be a node of `hierarchy` at `level`.
    pub fn new(hierarchy: &'a Hierarchy<A>, level: usize, span: Span) -> Self {
        debug_assert!(level < hierarchy.depth());
        Self {
            hierarchy,
            level,
            span,
        }
    }

    /// The hierarchy this node belongs to.
    pub fn hierarchy(&self) -> &'a Hierarchy<A> {
        self.hierarchy
    }

    /// Depth of this node below the root.
    pub fn level(&self) -> usize {
        self.level
    }

    /// This node's span.
    pub fn span(&self) -> Span {
        self.span
    }

    pub(crate) fn span_ref(&self) -> &Span {
        &self.span
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.span.child_len
    }

    /// Whether the node has no children.
    pub fn is_empty(&self) -> bool {
        self.span.child_len == 0
    }

    /// Remaining depth: levels of indexing from here down to a leaf.
    pub fn depth(&self) -> usize {
        self.hierarchy.depth() - self.level
    }

    /// Whether the children are leaves.
    pub fn is_leaf_level(&self) -> bool {
        self.depth() == 1
    }

    /// Leaves of the whole subtree, in leaf-buffer coordinates.
    pub fn leaf_range(&self) -> Range<usize> {
        self.span.leaf_range()
    }

    /// Child nodes as spans. Empty for leaf-level nodes.
    pub fn children(&self) -> &'a [Span] {
        if self.is_leaf_level() || self.span.child_len == 0 {
            return &[];
        }
        &self.hierarchy.table(self.level)[self.span.child_range()]
    }

    /// Child node `i`, or `None` when out of range or at leaf level.
    pub fn child(&self, i: usize) -> Option<NodeRef<'a, A>> {
        let span = *self.children().get(i)?;
        Some(Self::new(self.hierarchy, self.level + 1, span))
    }

    /// Cursors on every child node, in order.
    pub fn child_refs(&self) -> impl ExactSizeIterator<Item = NodeRef<'a, A>> + 'a {
        let hierarchy = self.hierarchy;
        let level = self.level + 1;
        self.children()
            .iter()
            .map(move |&span| NodeRef::new(hierarchy, level, span))
    }
}

impl<A: ArrayAllocator> fmt::Debug for NodeRef<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("level", &self.level)
            .field("span", &self.span)
            .finish()
    }
}

/// Walk two subtrees of equal depth in lockstep and report matching leaf
/// runs.
///
/// At every level only the first `min(dst.len(), src.len())` children are
/// paired, so surplus elements on either side are never visited. `f`
/// receives one `(dst_leaves, src_leaves)` pair of equal-length ranges per
/// paired leaf-level node, in depth-first order, in each side's own
/// leaf-buffer coordinates.
///
/// # Panics
///
/// Panics if the two subtrees have different depths.
pub fn zip_leaf_runs<A, B, F>(dst: NodeRef<'_, A>, src: NodeRef<'_, B>, f: &mut F)
where
    A: ArrayAllocator,
    B: ArrayAllocator,
    F: FnMut(Range<usize>, Range<usize>),
{
    assert_eq!(
        dst.depth(),
        src.depth(),
        "cannot pair subtrees of depth {} and {}",
        dst.depth(),
        src.depth()
    );
    let n = dst.len().min(src.len());
    if n == 0 {
        return;
    }
    if dst.is_leaf_level() {
        let d = dst.span().leaf_start;
        let s = src.span().leaf_start;
        f(d..d + n, s..s + n);
        return;
    }
    for (dc, sc) in dst.child_refs().zip(src.child_refs()).take(n) {
        zip_leaf_runs(dc, sc, f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::Global;
    use vla_core::Extents;

    fn regular(dims: &[usize]) -> Hierarchy<Global> {
        Hierarchy::regular(&Extents::new(dims), Global).unwrap()
    }

    #[test]
    fn root_ref_reports_depth_and_len() {
        let h = regular(&[2, 3, 4]);
        let root = h.root_ref();
        assert_eq!(root.depth(), 3);
        assert_eq!(root.len(), 2);
        assert!(!root.is_leaf_level());
        assert_eq!(root.leaf_range(), 0..24);
    }

    #[test]
    fn child_walks_down_to_leaf_level() {
        let h = regular(&[2, 3, 4]);
        let node = h.root_ref().child(1).unwrap().child(2).unwrap();
        assert_eq!(node.level(), 2);
        assert!(node.is_leaf_level());
        assert_eq!(node.leaf_range(), 20..24);
        assert!(node.child(0).is_none());
        assert!(node.children().is_empty());
    }

    #[test]
    fn child_out_of_range_is_none() {
        let h = regular(&[2, 2]);
        assert!(h.root_ref().child(2).is_none());
    }

    #[test]
    fn empty_hierarchy_has_no_children() {
        let h = Hierarchy::empty(3, Global);
        assert_eq!(h.root_ref().child_refs().len(), 0);
    }

    #[test]
    fn zip_pairs_common_prefix_only() {
        let a = regular(&[2, 3]);
        let b = regular(&[3, 2]);
        let mut runs = Vec::new();
        zip_leaf_runs(a.root_ref(), b.root_ref(), &mut |d, s| runs.push((d, s)));
        assert_eq!(runs, vec![(0..2, 0..2), (3..5, 2..4)]);
    }

    #[test]
    fn zip_over_jagged_rows() {
        let a = Hierarchy::from_fanouts(2, &[vec![3, 1]], Global).unwrap();
        let b = Hierarchy::from_fanouts(3, &[vec![1, 2, 2]], Global).unwrap();
        let mut runs = Vec::new();
        zip_leaf_runs(a.root_ref(), b.root_ref(), &mut |d, s| runs.push((d, s)));
        assert_eq!(runs, vec![(0..1, 0..1), (3..4, 1..2)]);
    }

    #[test]
    fn zip_on_subtrees_uses_absolute_coordinates() {
        let a = regular(&[2, 2, 2]);
        let b = regular(&[2, 2]);
        let mut runs = Vec::new();
        zip_leaf_runs(a.root_ref().child(1).unwrap(), b.root_ref(), &mut |d, s| runs.push((d, s)));
        assert_eq!(runs, vec![(4..6, 0..2), (6..8, 2..4)]);
    }

    #[test]
    #[should_panic(expected = "cannot pair")]
    fn zip_rejects_depth_mismatch() {
        let a = regular(&[2, 2]);
        let b = regular(&[4]);
        zip_leaf_runs(a.root_ref(), b.root_ref(), &mut |_, _| {});
    }
}
