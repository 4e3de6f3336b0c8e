//! Benchmark shapes for the VLA nested array engine.
//!
//! - [`reference_grid`]: 100x100 `f32` grid (10K leaves)
//! - [`reference_cube`]: 32x32x32 `u32` cube (~32K leaves), iota-filled
//! - [`ragged_rows`]: 1000 rows of lengths cycling through 0..16

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use vla::{ArrayError, DynArray};

/// Extents of [`reference_grid`].
pub const GRID: [usize; 2] = [100, 100];

/// Extents of [`reference_cube`].
pub const CUBE: [usize; 3] = [32, 32, 32];

/// A 100x100 grid with every leaf `1.0`.
pub fn reference_grid() -> Result<DynArray<f32>, ArrayError> {
    DynArray::from_elem(&GRID, 1.0)
}

/// A 32x32x32 cube holding each leaf's row-major position.
pub fn reference_cube() -> Result<DynArray<u32>, ArrayError> {
    DynArray::from_fn(&CUBE, |idx| (idx[0] * CUBE[1] * CUBE[2] + idx[1] * CUBE[2] + idx[2]) as u32)
}

/// A jagged two-level array of 1000 rows, row `i` holding `i % 16` leaves.
pub fn ragged_rows() -> DynArray<u32> {
    DynArray::from_nested((0..1000u32).map(|i| (0..i % 16).collect()).collect())
}
