//! Owner/view distinction.

use std::fmt;

/// Whether an array surface owns its leaf storage.
///
/// Exactly one level of a hierarchy is the [`Ownership::Owner`]: the
/// outermost array, which allocated the contiguous leaf buffer. Every
/// nested level reached through indexing is a [`Ownership::View`] that
/// borrows a slice of that buffer.
///
/// The distinction decides assignment semantics: assigning into an owner
/// rebuilds it, assigning into a view overwrites values in place and
/// never changes its shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// Holds the leaf buffer and releases it on drop.
    Owner,
    /// Borrows a slice of an ancestor's leaf buffer.
    View,
}

impl Ownership {
    /// `true` for [`Ownership::Owner`].
    pub fn is_owner(self) -> bool {
        matches!(self, Self::Owner)
    }
}

impl fmt::Display for Ownership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner => write!(f, "owner"),
            Self::View => write!(f, "view"),
        }
    }
}
