//! Dimension extents and size validation.
//!
//! [`Extents`] is the ordered list of per-dimension lengths requested at
//! construction. Validation happens here, before anything is allocated:
//! every extent and every running product is checked against
//! [`MAX_SIZE`] after each multiplication, so an overflowing request is
//! rejected instead of wrapping silently.

use std::fmt;
use std::ops::Deref;

use smallvec::SmallVec;

use crate::error::ArrayError;

/// Largest element count any array level may hold.
///
/// Matches the largest positive pointer offset (`isize::MAX`), the bound
/// the allocator layer can address.
pub const MAX_SIZE: usize = isize::MAX as usize;

/// Per-dimension extents, outermost first.
///
/// Uses `SmallVec<[usize; 4]>` so arrays of up to four dimensions keep
/// their extents inline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Extents(SmallVec<[usize; 4]>);

impl Extents {
    /// Create extents from a slice, outermost dimension first.
    pub fn new(extents: &[usize]) -> Self {
        Self(SmallVec::from_slice(extents))
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// The extents as a slice.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Total number of leaf elements, validated.
    ///
    /// Returns `Ok(0)` for zero extents or when any extent is zero. Every
    /// extent is still checked on its own, so `[0, usize::MAX]` is
    /// rejected even though its product is zero.
    pub fn total(&self) -> Result<usize, ArrayError> {
        if self.0.is_empty() {
            return Ok(0);
        }
        let mut product = 1usize;
        for (dimension, &extent) in self.0.iter().enumerate() {
            let violation = ArrayError::LengthViolation {
                dimension,
                max_size: MAX_SIZE,
            };
            if extent > MAX_SIZE {
                return Err(violation);
            }
            product = match product.checked_mul(extent) {
                Some(p) if p <= MAX_SIZE => p,
                _ => return Err(violation),
            };
        }
        Ok(product)
    }

    /// Number of leaves spanned by one node at `level` (0 = the root's
    /// children): the product of every extent after `level`.
    ///
    /// Only meaningful once [`Extents::total`] has succeeded with a
    /// non-zero result; the product saturates rather than wrapping.
    pub fn block_size(&self, level: usize) -> usize {
        self.0
            .iter()
            .skip(level + 1)
            .fold(1usize, |acc, &e| acc.saturating_mul(e))
    }

    /// Number of nodes at `level` (0 = the root's direct children): the
    /// product of the extents up to and including `level`.
    pub fn nodes_at(&self, level: usize) -> usize {
        self.0
            .iter()
            .take(level + 1)
            .fold(1usize, |acc, &e| acc.saturating_mul(e))
    }

    /// Split the extents against a declared nesting depth.
    ///
    /// Returns `None` when fewer than `depth` extents were supplied, which
    /// callers turn into the canonical empty state. Surplus extents have
    /// nothing to size and are dropped with a warning.
    pub fn declared(&self, depth: usize) -> Option<Extents> {
        if self.rank() < depth {
            return None;
        }
        if self.rank() > depth {
            log::warn!(
                "ignoring {} surplus extent(s) beyond declared depth {depth}: {self}",
                self.rank() - depth
            );
        }
        Some(Self(SmallVec::from_slice(&self.0[..depth])))
    }

    /// Decompose a flat leaf position into a full multi-index.
    ///
    /// `out` must have one slot per dimension. Positions are row-major:
    /// the last dimension varies fastest.
    pub fn unravel(&self, mut flat: usize, out: &mut [usize]) {
        debug_assert_eq!(out.len(), self.rank());
        for (slot, &extent) in out.iter_mut().zip(self.0.iter()).rev() {
            *slot = flat % extent;
            flat /= extent;
        }
    }
}

impl Deref for Extents {
    type Target = [usize];

    fn deref(&self) -> &[usize] {
        &self.0
    }
}

impl From<&[usize]> for Extents {
    fn from(v: &[usize]) -> Self {
        Self::new(v)
    }
}

impl<const N: usize> From<[usize; N]> for Extents {
    fn from(v: [usize; N]) -> Self {
        Self::new(&v)
    }
}

impl From<Vec<usize>> for Extents {
    fn from(v: Vec<usize>) -> Self {
        Self(SmallVec::from_vec(v))
    }
}

impl fmt::Display for Extents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, extent) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "x")?;
            }
            write!(f, "{extent}")?;
        }
        Ok(())
    }
}
