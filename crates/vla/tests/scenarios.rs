//! Integration test: the reference construction and value-semantics
//! scenarios, run against each of the three array types.

use vla::prelude::*;
use vla::MAX_SIZE;
use vla_test_utils::CountingAllocator;

// ── 1. Default-valued one-dimensional array ─────────────────────────

#[test]
fn default_valued_1d() {
    let a = DynArray::<i32>::new(&[5]).unwrap();
    assert_eq!(a.len(), 5);
    assert!(a.leaves().iter().all(|&v| v == 0));

    let f = FixedArray::<i32, 1>::new([5]).unwrap();
    assert_eq!(f.len(), 5);
    assert!(f.leaves().iter().all(|&v| v == 0));

    let n = NestedArray::<i32>::new(&[5]).unwrap();
    assert_eq!(n.len(), 5);
    assert!(n.values().iter().all(|&v| v == 0));
}

// ── 2. Value-initialised 3x4 ─────────────────────────────────────────

#[test]
fn value_initialised_2d() {
    let a = DynArray::from_elem(&[3, 4], 7).unwrap();
    assert_eq!(a.len(), 3);
    for row in a.iter() {
        let row = row.row().unwrap();
        assert_eq!(row.len(), 4);
        assert!(row.leaves().iter().all(|&v| v == 7));
    }
    assert_eq!(a.leaf_count(), 12);

    let n = NestedArray::from_elem(&[3, 4], 7).unwrap();
    assert_eq!(n.len(), 3);
    assert!(n.rows().iter().all(|r| r.values() == &[7; 4]));
}

// ── 3. Copy independence ─────────────────────────────────────────────

#[test]
fn copy_then_mutate_copy() {
    let a = DynArray::from_elem(&[3, 4], 7).unwrap();
    let mut b = a.clone();
    b[[1, 2]] = 99;
    assert_eq!(a[[1, 2]], 7);
    assert_eq!(b[[1, 2]], 99);

    let f = FixedArray::<i32, 2>::from_elem([3, 4], 7).unwrap();
    let mut g = f.clone();
    g[[1, 2]] = 99;
    assert_eq!(f[[1, 2]], 7);

    let n = NestedArray::from_elem(&[3, 4], 7).unwrap();
    let mut m = n.clone();
    m[[1, 2]] = 99;
    assert_eq!(n[[1, 2]], 7);
    assert_eq!(m[[1, 2]], 99);
}

// ── 4. Move from a top-level owner ───────────────────────────────────

#[test]
fn move_from_owner() {
    let mut a = DynArray::from_vec(vec![1, 2, 3, 4, 5]);
    let b = a.take();
    assert_eq!(a.len(), 0);
    assert!(a.get(0).is_none());
    assert_eq!(b.leaves(), &[1, 2, 3, 4, 5]);

    let mut n = NestedArray::from_literal(Literal::Values(vec![1, 2, 3, 4, 5]));
    let m = n.take();
    assert_eq!(n.len(), 0);
    assert_eq!(m.values(), &[1, 2, 3, 4, 5]);
}

// ── 5. Jagged literal ────────────────────────────────────────────────

#[test]
fn jagged_literal() {
    let a = DynArray::from_nested(vec![vec![1, 2], vec![3, 4, 5]]);
    assert_eq!(a.len(), 2);
    assert_eq!(a.row(0).len(), 2);
    assert_eq!(a.row(0).leaves(), &[1, 2]);
    assert_eq!(a.row(1).len(), 3);
    assert_eq!(a.row(1).leaves(), &[3, 4, 5]);
    assert_eq!(a.extents(), None);

    let n = NestedArray::from_literal(Literal::rows(vec![vec![1, 2], vec![3, 4, 5]]));
    assert_eq!(n.row(0).values(), &[1, 2]);
    assert_eq!(n.row(1).values(), &[3, 4, 5]);
}

// ── 6. Oversized extent ──────────────────────────────────────────────

#[test]
fn oversized_extent_allocates_nothing() {
    let nodes = CountingAllocator::new();
    let leaves = CountingAllocator::new();
    let config = ArrayConfig::with_allocators([usize::MAX], nodes.clone(), leaves.clone());
    let err = DynArray::<u8, _>::from_config(config, |_| 0).unwrap_err();
    assert!(matches!(err, ArrayError::LengthViolation { max_size: MAX_SIZE, .. }));
    assert_eq!(nodes.allocations(), 0);
    assert_eq!(leaves.allocations(), 0);

    let config = ArrayConfig::with_allocators([usize::MAX], nodes.clone(), leaves.clone());
    assert!(NestedArray::<u8, _>::from_config(config, |_| 0).is_err());
    assert_eq!(nodes.allocations() + leaves.allocations(), 0);

    assert!(FixedArray::<u8, 1>::new([usize::MAX]).is_err());
}
