//! Core types and traits for the VLA nested array engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions shared by the workspace: the error
//! taxonomy, dimension extents, and the owner/view distinction.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod extent;
pub mod ownership;

pub use error::ArrayError;
pub use extent::{Extents, MAX_SIZE};
pub use ownership::Ownership;
