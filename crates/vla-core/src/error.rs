//! Error types for the nested array engine.
//!
//! The engine only ever reports two kinds of failure: a requested size
//! that cannot be represented, and a bounds-checked access past the end.
//! Both propagate straight to the caller of the failing operation.

use std::error::Error;
use std::fmt;

/// Errors from array construction and bounds-checked access.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArrayError {
    /// An extent, or the running product of extents, exceeds the maximum
    /// representable index. Nothing was allocated.
    LengthViolation {
        /// Index of the extent at which the limit was crossed.
        dimension: usize,
        /// The limit that was exceeded (see [`crate::MAX_SIZE`]).
        max_size: usize,
    },
    /// Bounds-checked access with an index not below the length.
    OutOfRange {
        /// The rejected position.
        index: usize,
        /// Number of direct children at the accessed level.
        len: usize,
    },
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthViolation {
                dimension,
                max_size,
            } => {
                write!(
                    f,
                    "array too long: extent product exceeds {max_size} at dimension {dimension}"
                )
            }
            Self::OutOfRange { index, len } => {
                write!(f, "out of range: index {index}, len {len}")
            }
        }
    }
}

impl Error for ArrayError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_violation_names_dimension() {
        let err = ArrayError::LengthViolation {
            dimension: 2,
            max_size: 10,
        };
        assert_eq!(
            err.to_string(),
            "array too long: extent product exceeds 10 at dimension 2"
        );
    }

    #[test]
    fn out_of_range_names_index_and_len() {
        let err = ArrayError::OutOfRange { index: 5, len: 5 };
        assert_eq!(err.to_string(), "out of range: index 5, len 5");
    }

    #[test]
    fn is_std_error() {
        fn takes_error(_: &dyn Error) {}
        takes_error(&ArrayError::OutOfRange { index: 0, len: 0 });
    }
}
