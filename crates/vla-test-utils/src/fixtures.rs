//! Shared shapes for array tests.

/// Rectangular extents covering one to four dimensions, including a
/// unit extent and a long thin row.
pub fn regular_extents() -> Vec<Vec<usize>> {
    vec![
        vec![7],
        vec![3, 4],
        vec![1, 9],
        vec![2, 3, 4],
        vec![1, 1, 1],
        vec![2, 2, 3, 2],
    ]
}

/// Extents whose product is zero.
pub fn empty_extents() -> Vec<Vec<usize>> {
    vec![vec![0], vec![3, 0], vec![0, 5], vec![2, 0, 4]]
}

/// Rows of differing length, one of them empty.
pub fn jagged_rows() -> Vec<Vec<i32>> {
    vec![vec![1, 2, 3], vec![], vec![4], vec![5, 6]]
}

/// The value stored at `index` by the row-major iota fill: the flat
/// position of the leaf.
pub fn iota(extents: &[usize], index: &[usize]) -> usize {
    index
        .iter()
        .zip(extents)
        .fold(0, |flat, (&i, &n)| flat * n + i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iota_is_row_major() {
        assert_eq!(iota(&[2, 3], &[0, 0]), 0);
        assert_eq!(iota(&[2, 3], &[1, 2]), 5);
        assert_eq!(iota(&[2, 3, 4], &[1, 0, 3]), 15);
    }
}
