//! VLA: nested variable-length arrays with allocator-aware ownership.
//!
//! This is the top-level crate. It re-exports the building blocks from
//! the sub-crates and adds the three array types on top of them. For most
//! users, adding `vla` as a single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use vla::prelude::*;
//!
//! // A 3x4 grid; extents are chosen at runtime.
//! let mut grid = DynArray::from_fn(&[3, 4], |idx| idx[0] * 4 + idx[1]).unwrap();
//! assert_eq!(grid.len(), 3);
//! assert_eq!(grid[[2, 3]], 11);
//!
//! // Rows are borrowed views into the one leaf buffer.
//! let row = grid.row(1);
//! assert_eq!(row.ownership(), Ownership::View);
//! assert_eq!(row.leaves(), &[4, 5, 6, 7]);
//!
//! // Assigning into a view writes in place and keeps its shape.
//! let src = DynArray::from_vec(vec![40, 50]);
//! grid.row_mut(1).assign(&src);
//! assert_eq!(grid.row(1).leaves(), &[40, 50, 6, 7]);
//!
//! // Copying a row gives a new owner.
//! let copy = grid.row(1).to_owned();
//! assert_eq!(copy.ownership(), Ownership::Owner);
//! ```
//!
//! # Array types
//!
//! | Type | Depth | Storage |
//! |------|-------|---------|
//! | [`DynArray`] | runtime | one leaf block plus one node table per level |
//! | [`FixedArray`] | const generic | wraps [`DynArray`] |
//! | [`NestedArray`] | runtime | every level owns its own block |
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `vla-arena` | Allocator trait, blocks, node spans, hierarchies |
//! | [`types`] | `vla-core` | Errors, extents, ownership |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod array;
pub mod config;
pub mod copy;
pub mod fixed;
pub mod literal;
pub mod nested;
pub mod transfer;
pub mod view;

/// Allocators, blocks, and shape hierarchies (`vla-arena`).
///
/// Implement [`arena::ArrayAllocator`] to supply node or leaf storage
/// from somewhere other than the global heap.
pub use vla_arena as arena;

/// Errors, extents, and the owner/view distinction (`vla-core`).
pub use vla_core as types;

pub use array::DynArray;
pub use config::ArrayConfig;
pub use fixed::FixedArray;
pub use literal::Literal;
pub use nested::{Entry, EntryMut, NestedArray, RowMut};
pub use transfer::exchange;
pub use view::{ArrayView, ArrayViewMut, AsView, Item, ItemMut, Iter, IterMut};

pub use vla_arena::{AllocError, ArrayAllocator, Global};
pub use vla_core::{ArrayError, Extents, Ownership, MAX_SIZE};

/// Common imports for typical usage.
///
/// ```rust
/// use vla::prelude::*;
/// ```
pub mod prelude {
    // Arrays
    pub use crate::{DynArray, FixedArray, NestedArray};

    // Views and access
    pub use crate::{ArrayView, ArrayViewMut, AsView, Entry, Item, ItemMut};

    // Construction
    pub use crate::{ArrayConfig, Literal};

    // Core types
    pub use vla_arena::{ArrayAllocator, Global};
    pub use vla_core::{ArrayError, Extents, Ownership};
}
