//! Shape descriptor: per-level node tables over a flat leaf buffer.
//!
//! A [`Hierarchy`] of depth `d` describes how `d` levels of indexing reach
//! the leaves. The root is a single [`Span`]; below it sit `d - 1` node
//! tables, table `k` holding every node at depth `k + 1` in construction
//! order. Because children of consecutive nodes are consecutive, any
//! subtree occupies one contiguous run of every deeper table and one
//! contiguous run of leaves.
//!
//! ```text
//! 3x2 array, depth 2
//!
//! root   Span(children=0..3, leaves=0..6)
//! table0 [Span(0..2), Span(2..4), Span(4..6)]   (children are leaves)
//! leaves [a b | c d | e f]
//! ```
//!
//! Tables are allocated from the node allocator; the hierarchy never
//! touches leaf storage itself.

use std::fmt;
use std::slice;

use smallvec::SmallVec;
use vla_core::{ArrayError, Extents};

use crate::alloc::ArrayAllocator;
use crate::node::NodeRef;
use crate::raw::Block;
use crate::span::Span;

/// Node tables for one array, plus the allocator they came from.
pub struct Hierarchy<A: ArrayAllocator> {
    depth: usize,
    root: Span,
    levels: SmallVec<[Block<Span, A>; 4]>,
    alloc: A,
}

/// One contiguous run of source nodes to re-slice during a copy.
struct Part<'a, B: ArrayAllocator> {
    source: &'a Hierarchy<B>,
    /// Depth of `nodes` within `source`.
    level: usize,
    nodes: &'a [Span],
    /// First leaf of the run, in source coordinates.
    leaf_lo: usize,
}

impl<A: ArrayAllocator> Hierarchy<A> {
    /// The canonical empty hierarchy of the given structural depth.
    ///
    /// # Panics
    ///
    /// Panics if `depth` is zero.
    pub fn empty(depth: usize, alloc: A) -> Self {
        assert!(depth >= 1, "array depth must be at least 1");
        Self {
            depth,
            root: Span::EMPTY,
            levels: SmallVec::new(),
            alloc,
        }
    }

    /// A one-level hierarchy over `len` leaves.
    pub fn flat(len: usize, alloc: A) -> Self {
        let mut h = Self::empty(1, alloc);
        h.root = Span::leaves(0, len);
        h
    }

    /// The rectangular hierarchy for `extents`.
    ///
    /// Validates the extents first; a zero product yields the canonical
    /// empty state of depth `extents.rank()`. Node `i` of level `k`
    /// covers leaves `i * block..(i + 1) * block` with `block` the product
    /// of the remaining extents.
    ///
    /// # Panics
    ///
    /// Panics if `extents` is empty.
    pub fn regular(extents: &Extents, alloc: A) -> Result<Self, ArrayError> {
        let depth = extents.rank();
        assert!(depth >= 1, "array depth must be at least 1");
        let total = extents.total()?;
        if total == 0 {
            return Ok(Self::empty(depth, alloc));
        }

        let mut levels = SmallVec::with_capacity(depth - 1);
        for level in 0..depth - 1 {
            let count = extents.nodes_at(level);
            let fanout = extents[level + 1];
            let block = extents.block_size(level);
            let table = Block::try_from_fn(count, alloc.clone(), |i| Span {
                child_start: i * fanout,
                child_len: fanout,
                leaf_start: i * block,
                leaf_len: block,
            })?;
            levels.push(table);
        }

        log::debug!("built {extents} hierarchy: {total} leaves");
        Ok(Self {
            depth,
            root: Span {
                child_start: 0,
                child_len: extents[0],
                leaf_start: 0,
                leaf_len: total,
            },
            levels,
            alloc,
        })
    }

    /// A possibly jagged hierarchy from per-node child counts.
    ///
    /// `fanouts[k][i]` is the number of children of node `i` at depth
    /// `k + 1`; the innermost entries count leaves. The result has depth
    /// `fanouts.len() + 1`. A shape with no leaves is canonicalised to
    /// the empty state.
    ///
    /// # Panics
    ///
    /// Panics if a level's length does not match the child total of the
    /// level above.
    pub fn from_fanouts(
        root_len: usize,
        fanouts: &[Vec<usize>],
        alloc: A,
    ) -> Result<Self, ArrayError> {
        let depth = fanouts.len() + 1;
        let mut expected = root_len;
        for (level, counts) in fanouts.iter().enumerate() {
            assert_eq!(
                counts.len(),
                expected,
                "level {level} fanout count does not match its parent level"
            );
            expected = counts.iter().sum();
        }
        let total = expected;
        if total == 0 || root_len == 0 {
            return Ok(Self::empty(depth, alloc));
        }

        // Prefix sums of children per level, with a closing sentinel.
        let child_starts: Vec<Vec<usize>> = fanouts.iter().map(|c| prefix_sums(c)).collect();

        // Leaf start of every node, computed bottom-up: an inner node's
        // first leaf is the first leaf of its first child slot.
        let mut leaf_starts: Vec<Vec<usize>> = vec![Vec::new(); fanouts.len()];
        for level in (0..fanouts.len()).rev() {
            leaf_starts[level] = if level + 1 == fanouts.len() {
                child_starts[level].clone()
            } else {
                let below = &leaf_starts[level + 1];
                child_starts[level].iter().map(|&c| below[c]).collect()
            };
        }

        let mut levels = SmallVec::with_capacity(fanouts.len());
        for (level, counts) in fanouts.iter().enumerate() {
            let starts = &child_starts[level];
            let leaves = &leaf_starts[level];
            let table = Block::try_from_fn(counts.len(), alloc.clone(), |i| Span {
                child_start: starts[i],
                child_len: counts[i],
                leaf_start: leaves[i],
                leaf_len: leaves[i + 1] - leaves[i],
            })?;
            levels.push(table);
        }

        log::debug!("built jagged hierarchy: depth {depth}, {total} leaves");
        Ok(Self {
            depth,
            root: Span {
                child_start: 0,
                child_len: root_len,
                leaf_start: 0,
                leaf_len: total,
            },
            levels,
            alloc,
        })
    }

    /// Fresh tables for the subtree under `node`, rebased so its first
    /// leaf is leaf 0.
    ///
    /// Block sizes are read from the source spans, so the copy has the
    /// source's exact shape whether or not it is rectangular. A subtree
    /// without leaves yields the canonical empty state.
    pub fn subtree<B: ArrayAllocator>(node: NodeRef<'_, B>, alloc: A) -> Result<Self, ArrayError> {
        let depth = node.depth();
        let span = node.span();
        if span.leaf_len == 0 || span.child_len == 0 {
            return Ok(Self::empty(depth, alloc));
        }
        if depth == 1 {
            return Ok(Self::flat(span.child_len, alloc));
        }
        let part = Part {
            source: node.hierarchy(),
            level: node.level() + 1,
            nodes: node.children(),
            leaf_lo: span.leaf_start,
        };
        Self::gather_parts(depth, &[part], alloc)
    }

    /// Fresh tables whose root has one child per entry of `rows`, each a
    /// copy of that row's subtree. Rows may come from different arrays.
    ///
    /// # Panics
    ///
    /// Panics if any row's depth differs from `row_depth`.
    pub fn stack<B: ArrayAllocator>(
        row_depth: usize,
        rows: &[NodeRef<'_, B>],
        alloc: A,
    ) -> Result<Self, ArrayError> {
        let parts: Vec<Part<'_, B>> = rows
            .iter()
            .map(|row| {
                assert_eq!(row.depth(), row_depth, "stacked rows must share one depth");
                Part {
                    source: row.hierarchy(),
                    level: row.level(),
                    nodes: slice::from_ref(row.span_ref()),
                    leaf_lo: row.span().leaf_start,
                }
            })
            .collect();
        Self::gather_parts(row_depth + 1, &parts, alloc)
    }

    /// Core of the copy protocol: lay the given node runs side by side as
    /// the children of a new root, level by level.
    fn gather_parts<B: ArrayAllocator>(
        depth: usize,
        parts: &[Part<'_, B>],
        alloc: A,
    ) -> Result<Self, ArrayError> {
        let root_len: usize = parts.iter().map(|p| p.nodes.len()).sum();
        let total: usize = parts
            .iter()
            .map(|p| p.nodes.iter().map(|s| s.leaf_len).sum::<usize>())
            .sum();
        if total == 0 || root_len == 0 {
            return Ok(Self::empty(depth, alloc));
        }

        let mut leaf_bases = Vec::with_capacity(parts.len());
        let mut acc = 0;
        for part in parts {
            leaf_bases.push(acc);
            acc += part.nodes.iter().map(|s| s.leaf_len).sum::<usize>();
        }

        let mut current: Vec<&[Span]> = parts.iter().map(|p| p.nodes).collect();
        let mut levels = SmallVec::with_capacity(depth - 1);
        for t in 0..depth - 1 {
            let innermost = t + 2 == depth;

            let mut next_bases = Vec::with_capacity(parts.len());
            let mut next_acc = 0;
            for nodes in &current {
                next_bases.push(next_acc);
                next_acc += child_run_len(nodes);
            }

            let count: usize = current.iter().map(|n| n.len()).sum();
            let spans = current
                .iter()
                .zip(parts)
                .zip(leaf_bases.iter().zip(&next_bases))
                .flat_map(|((nodes, part), (&leaf_base, &next_base))| {
                    let leaf_lo = part.leaf_lo;
                    let next_lo = nodes.first().map_or(0, |s| s.child_start);
                    nodes.iter().map(move |s| {
                        let leaf_start = leaf_base + (s.leaf_start - leaf_lo);
                        let child_start = if innermost {
                            leaf_base + (s.child_start - leaf_lo)
                        } else {
                            next_base + (s.child_start - next_lo)
                        };
                        Span {
                            child_start,
                            child_len: s.child_len,
                            leaf_start,
                            leaf_len: s.leaf_len,
                        }
                    })
                });
            levels.push(Block::try_from_iter(count, alloc.clone(), spans)?);

            if !innermost {
                current = parts
                    .iter()
                    .zip(&current)
                    .map(|(part, nodes)| child_run(part.source, part.level + t, nodes))
                    .collect();
            }
        }

        log::debug!("copied hierarchy: depth {depth}, {root_len} rows, {total} leaves");
        Ok(Self {
            depth,
            root: Span {
                child_start: 0,
                child_len: root_len,
                leaf_start: 0,
                leaf_len: total,
            },
            levels,
            alloc,
        })
    }

    /// Structural nesting depth (levels of indexing down to a leaf).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The root span.
    pub fn root(&self) -> Span {
        self.root
    }

    /// A cursor on the root node.
    pub fn root_ref(&self) -> NodeRef<'_, A> {
        NodeRef::new(self, 0, self.root)
    }

    /// Number of direct children of the root.
    pub fn len(&self) -> usize {
        self.root.child_len
    }

    /// Whether this is the canonical empty state.
    pub fn is_empty(&self) -> bool {
        self.root.child_len == 0
    }

    /// Number of leaves under the root.
    pub fn leaf_count(&self) -> usize {
        self.root.leaf_len
    }

    /// Nodes at depth `level + 1`.
    ///
    /// # Panics
    ///
    /// Panics if the hierarchy has no such table.
    pub fn table(&self, level: usize) -> &[Span] {
        &self.levels[level]
    }

    /// Total number of nodes across all tables.
    pub fn node_count(&self) -> usize {
        self.levels.iter().map(|t| t.len()).sum()
    }

    /// Bytes held by node tables.
    pub fn memory_bytes(&self) -> usize {
        self.levels.iter().map(|t| t.memory_bytes()).sum()
    }

    /// The node allocator.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Release every table, deepest first, and return to the canonical
    /// empty state. Calling it again is a no-op.
    pub fn clear(&mut self) {
        while let Some(table) = self.levels.pop() {
            drop(table);
        }
        self.root = Span::EMPTY;
    }
}

impl<A: ArrayAllocator> Drop for Hierarchy<A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<A: ArrayAllocator> fmt::Debug for Hierarchy<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hierarchy")
            .field("depth", &self.depth)
            .field("root", &self.root)
            .field("nodes", &self.node_count())
            .finish()
    }
}

fn prefix_sums(counts: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(counts.len() + 1);
    let mut acc = 0;
    out.push(0);
    for &c in counts {
        acc += c;
        out.push(acc);
    }
    out
}

/// The children of a run of nodes at depth `level`, which are themselves
/// a contiguous run of the next table.
fn child_run<'a, B: ArrayAllocator>(
    source: &'a Hierarchy<B>,
    level: usize,
    nodes: &[Span],
) -> &'a [Span] {
    match (nodes.first(), nodes.last()) {
        (Some(first), Some(last)) if last.child_end() > first.child_start => {
            &source.table(level)[first.child_start..last.child_end()]
        }
        _ => &[],
    }
}

fn child_run_len(nodes: &[Span]) -> usize {
    match (nodes.first(), nodes.last()) {
        (Some(first), Some(last)) => last.child_end() - first.child_start,
        _ => 0,
    }
}
