//! Nested literals.
//!
//! A [`Literal`] is the brace-list form of an array: plain values at the
//! innermost level, lists of literals above. Rows may differ in length,
//! which is the one way to build a jagged array.

use vla_arena::{ArrayAllocator, Block, Global, Hierarchy};

use crate::array::DynArray;

/// A nested list of values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Literal<T> {
    /// Innermost level.
    Values(Vec<T>),
    /// A list of rows, all of one depth.
    Rows(Vec<Literal<T>>),
}

impl<T> Literal<T> {
    /// A literal with one row per item.
    pub fn rows<I, R>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Literal<T>>,
    {
        Self::Rows(rows.into_iter().map(Into::into).collect())
    }

    /// Number of direct entries.
    pub fn len(&self) -> usize {
        match self {
            Self::Values(v) => v.len(),
            Self::Rows(r) => r.len(),
        }
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Nesting depth. An empty list of rows counts as depth 2.
    ///
    /// # Panics
    ///
    /// Panics if sibling rows have different depths.
    pub fn depth(&self) -> usize {
        match self {
            Self::Values(_) => 1,
            Self::Rows(rows) => {
                let Some(first) = rows.first() else {
                    return 2;
                };
                let depth = first.depth();
                assert!(
                    rows.iter().all(|r| r.depth() == depth),
                    "literal rows have mixed nesting depth"
                );
                depth + 1
            }
        }
    }

    /// Child counts level by level, for [`Hierarchy::from_fanouts`].
    fn fanouts(&self, depth: usize) -> Vec<Vec<usize>> {
        let mut fanouts = Vec::with_capacity(depth - 1);
        let mut current: Vec<&Literal<T>> = self.row_slice().iter().collect();
        for level in 0..depth - 1 {
            fanouts.push(current.iter().map(|l| l.len()).collect());
            if level + 2 < depth {
                current = current.iter().flat_map(|l| l.row_slice()).collect();
            }
        }
        fanouts
    }

    fn row_slice(&self) -> &[Literal<T>] {
        match self {
            Self::Rows(rows) => rows,
            Self::Values(_) => &[],
        }
    }

    fn flatten_into(self, out: &mut Vec<T>) {
        match self {
            Self::Values(values) => out.extend(values),
            Self::Rows(rows) => {
                for row in rows {
                    row.flatten_into(out);
                }
            }
        }
    }
}

impl<T> From<Vec<T>> for Literal<T> {
    fn from(values: Vec<T>) -> Self {
        Self::Values(values)
    }
}

const LIVE_LAYOUT: &str = "a literal already fits in memory";

impl<T> DynArray<T, Global> {
    /// An array with the literal's shape and values.
    ///
    /// # Panics
    ///
    /// Panics if the literal mixes nesting depths.
    pub fn from_literal(literal: Literal<T>) -> Self {
        Self::from_literal_in(literal, Global, Global)
    }

    /// A one-dimensional array holding `values`.
    pub fn from_vec(values: Vec<T>) -> Self {
        Self::from_literal(Literal::Values(values))
    }

    /// A two-dimensional array, one row per inner vector.
    pub fn from_nested(rows: Vec<Vec<T>>) -> Self {
        Self::from_literal(Literal::rows(rows))
    }

    /// A three-dimensional array.
    pub fn from_nested3(planes: Vec<Vec<Vec<T>>>) -> Self {
        Self::from_literal(Literal::rows(planes.into_iter().map(Literal::<T>::rows)))
    }
}

impl<T, A: ArrayAllocator> DynArray<T, A> {
    /// [`DynArray::from_literal`] with explicit allocators.
    pub fn from_literal_in(literal: Literal<T>, node_allocator: A, leaf_allocator: A) -> Self {
        let depth = literal.depth();
        let fanouts = literal.fanouts(depth);
        let shape =
            Hierarchy::from_fanouts(literal.len(), &fanouts, node_allocator).expect(LIVE_LAYOUT);
        if shape.is_empty() {
            return Self::from_parts(shape, Block::empty(leaf_allocator));
        }
        let mut values = Vec::with_capacity(shape.leaf_count());
        literal.flatten_into(&mut values);
        let leaves = Block::try_from_iter(values.len(), leaf_allocator, values).expect(LIVE_LAYOUT);
        Self::from_parts(shape, leaves)
    }
}

impl<T> From<Vec<T>> for DynArray<T, Global> {
    fn from(values: Vec<T>) -> Self {
        Self::from_vec(values)
    }
}

impl<T> From<Literal<T>> for DynArray<T, Global> {
    fn from(literal: Literal<T>) -> Self {
        Self::from_literal(literal)
    }
}

impl<T> FromIterator<T> for DynArray<T, Global> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jagged_rows_keep_their_lengths() {
        let a = DynArray::from_nested(vec![vec![1, 2], vec![3, 4, 5]]);
        assert_eq!(a.len(), 2);
        assert_eq!(a.row(0).len(), 2);
        assert_eq!(a.row(0).leaves(), &[1, 2]);
        assert_eq!(a.row(1).len(), 3);
        assert_eq!(a.row(1).leaves(), &[3, 4, 5]);
    }

    #[test]
    fn three_levels() {
        let a = DynArray::from_nested3(vec![vec![vec![1], vec![]], vec![vec![2, 3]]]);
        assert_eq!(a.depth(), 3);
        assert_eq!(a.row(0).len(), 2);
        assert_eq!(a.row(0).row(1).len(), 0);
        assert_eq!(a.row(1).row(0).leaves(), &[2, 3]);
        assert_eq!(a[[1, 0, 1]], 3);
    }

    #[test]
    fn empty_literals_are_canonical() {
        let a = DynArray::<u8>::from_vec(Vec::new());
        assert!(a.is_empty());
        let b = DynArray::<u8>::from_nested(vec![vec![], vec![]]);
        assert!(b.is_empty());
        assert_eq!(b.depth(), 2);
    }

    #[test]
    fn collect_builds_one_dimension() {
        let a: DynArray<u32> = (1..=4).collect();
        assert_eq!(a.depth(), 1);
        assert_eq!(a.leaves(), &[1, 2, 3, 4]);
    }

    #[test]
    #[should_panic(expected = "mixed nesting depth")]
    fn mixed_depth_panics() {
        let lit = Literal::Rows(vec![Literal::Values(vec![1]), Literal::rows(vec![vec![2]])]);
        let _ = DynArray::from_literal(lit);
    }

    #[test]
    fn literal_depth_and_len() {
        let lit: Literal<u8> = Literal::rows(vec![vec![1, 2], vec![3]]);
        assert_eq!(lit.depth(), 2);
        assert_eq!(lit.len(), 2);
        assert_eq!(Literal::<u8>::Rows(Vec::new()).depth(), 2);
    }
}
