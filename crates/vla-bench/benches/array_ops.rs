//! Criterion micro-benchmarks for array construction, copy, traversal,
//! and in-place view assignment.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use vla::{DynArray, NestedArray};
use vla_bench::{ragged_rows, reference_cube, reference_grid, CUBE, GRID};

/// Benchmark: Build a 100x100 flattened grid.
fn bench_construct_grid(c: &mut Criterion) {
    c.bench_function("construct_grid_10k", |b| {
        b.iter(|| black_box(reference_grid().unwrap()));
    });
}

/// Benchmark: Build the same grid with one block per row.
fn bench_construct_nested_grid(c: &mut Criterion) {
    c.bench_function("construct_nested_grid_10k", |b| {
        b.iter(|| black_box(NestedArray::from_elem(&GRID, 1.0f32).unwrap()));
    });
}

/// Benchmark: Deep copy of a 32K-leaf cube.
fn bench_clone_cube(c: &mut Criterion) {
    let cube = reference_cube().unwrap();
    c.bench_function("clone_cube_32k", |b| {
        b.iter(|| black_box(cube.clone()));
    });
}

/// Benchmark: Re-flatten one plane of the cube into a new owner.
fn bench_view_to_owned(c: &mut Criterion) {
    let cube = reference_cube().unwrap();
    c.bench_function("view_to_owned_plane", |b| {
        b.iter(|| black_box(cube.row(CUBE[0] / 2).to_owned()));
    });
}

/// Benchmark: Sum every leaf by walking rows, against the flat slice.
fn bench_traverse(c: &mut Criterion) {
    let cube = reference_cube().unwrap();
    c.bench_function("traverse_rows_cube", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for plane in cube.iter() {
                for row in plane.row().unwrap().iter() {
                    sum += row.row().unwrap().leaves().iter().map(|&v| v as u64).sum::<u64>();
                }
            }
            black_box(sum)
        });
    });
    c.bench_function("traverse_leaves_cube", |b| {
        b.iter(|| black_box(cube.leaves().iter().map(|&v| v as u64).sum::<u64>()));
    });
}

/// Benchmark: Assign a short row into every row of a jagged array, in place.
fn bench_view_assign(c: &mut Criterion) {
    let mut ragged = ragged_rows();
    let src = DynArray::from_vec((0..8u32).collect());
    c.bench_function("view_assign_ragged_1000", |b| {
        b.iter(|| {
            for i in 0..ragged.len() {
                ragged.row_mut(i).assign(&src);
            }
            black_box(ragged.leaves()[0]);
        });
    });
}

criterion_group!(
    benches,
    bench_construct_grid,
    bench_construct_nested_grid,
    bench_clone_cube,
    bench_view_to_owned,
    bench_traverse,
    bench_view_assign
);
criterion_main!(benches);
