//! Allocator-aware storage for VLA arrays.
//!
//! Holds the two kinds of memory an array owns: one contiguous block of
//! leaf elements and a set of per-level node tables describing how the
//! leaves are grouped. Apart from the test allocator, this crate holds all
//! of the workspace's `unsafe` code, confined to `alloc.rs` and `raw.rs`.
//!
//! # Architecture
//!
//! ```text
//! DynArray (in `vla`)
//! ├── Hierarchy (node allocator)
//! │   ├── root Span
//! │   └── Block<Span> × (depth - 1)   one table per level, BFS order
//! └── Block<T>      (leaf allocator)  every leaf, DFS order
//! ```
//!
//! A [`Span`] records a node's child range in the next table and its leaf
//! range in the leaf block. Subtrees are contiguous at every level, so a
//! view is a `(level, Span)` pair plus a borrowed leaf slice.
//!
//! # Safety
//!
//! [`Block`] builds its contents through a fill guard: if an initialiser
//! panics, the built prefix is dropped in reverse order and the memory is
//! returned to its allocator before the panic continues.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod alloc;
pub mod hierarchy;
pub mod node;
pub mod raw;
pub mod span;

pub use alloc::{AllocError, ArrayAllocator, Global};
pub use hierarchy::Hierarchy;
pub use node::{zip_leaf_runs, NodeRef};
pub use raw::{Block, IntoIter};
pub use span::Span;
