//! Per-node bookkeeping.

use std::fmt;
use std::ops::Range;

/// Where one node's children and leaves live.
///
/// `child_start..child_start + child_len` indexes the next level's node
/// table, or the leaf buffer for innermost nodes. `leaf_start..leaf_start
/// + leaf_len` is the contiguous run of leaves under the whole subtree;
/// its length is the node's block size.
///
/// For innermost nodes the two ranges coincide.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    /// First child, in the next level's coordinates.
    pub child_start: usize,
    /// Number of direct children.
    pub child_len: usize,
    /// First leaf of the subtree, in leaf-buffer coordinates.
    pub leaf_start: usize,
    /// Number of leaves in the subtree.
    pub leaf_len: usize,
}

impl Span {
    /// The canonical empty span.
    pub const EMPTY: Span = Span {
        child_start: 0,
        child_len: 0,
        leaf_start: 0,
        leaf_len: 0,
    };

    /// Span of an innermost node whose children are leaves.
    pub fn leaves(start: usize, len: usize) -> Self {
        Self {
            child_start: start,
            child_len: len,
            leaf_start: start,
            leaf_len: len,
        }
    }

    /// Children as a range.
    pub fn child_range(&self) -> Range<usize> {
        self.child_start..self.child_start + self.child_len
    }

    /// Leaves as a range.
    pub fn leaf_range(&self) -> Range<usize> {
        self.leaf_start..self.leaf_start + self.leaf_len
    }

    /// One past the last child.
    pub fn child_end(&self) -> usize {
        self.child_start + self.child_len
    }

    /// One past the last leaf.
    pub fn leaf_end(&self) -> usize {
        self.leaf_start + self.leaf_len
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Span(children={:?}, leaves={:?})",
            self.child_range(),
            self.leaf_range()
        )
    }
}
