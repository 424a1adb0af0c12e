//! Error types for the key-sorted list.
//!
//! Every fallible operation on [`KeySortedList`](crate::ksl::KeySortedList)
//! reports a [`KslError`]. Allocation failures surface as
//! [`KslError::OutOfMemory`]; caller mistakes that the container can detect
//! cheaply (duplicate inserts, missing keys, renames that would reorder
//! entries) are reported instead of corrupting the structure.

use std::collections::TryReserveError;
use std::fmt;

/// Represents errors that can occur when building or mutating a
/// [`KeySortedList`](crate::ksl::KeySortedList).
///
/// # Examples
///
/// ```rust
/// use keysorted::{KeySortedList, KslError};
///
/// let mut list = KeySortedList::new().unwrap();
/// list.insert(1, "one").unwrap();
///
/// assert_eq!(list.insert(1, "uno"), Err(KslError::DuplicateKey));
/// assert_eq!(list.remove(&2), Err(KslError::KeyNotFound));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KslError {
    /// A block could not be allocated.
    ///
    /// The container is left in the structurally valid state it held right
    /// before the failing allocation.
    OutOfMemory,
    /// The configured minimum fanout is too small to keep blocks balanced.
    InvalidFanout {
        /// The rejected minimum fanout.
        min_fanout: usize,
    },
    /// An equivalent key is already stored.
    DuplicateKey,
    /// The requested key is not stored.
    KeyNotFound,
    /// A rename would collide with, or move past, a neighbouring key.
    KeyOrderViolation,
}

impl fmt::Display for KslError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory => write!(formatter, "out of memory while allocating a block"),
            Self::InvalidFanout { min_fanout } => write!(
                formatter,
                "invalid minimum fanout {min_fanout}: must be at least {}",
                crate::config::MIN_SUPPORTED_FANOUT
            ),
            Self::DuplicateKey => write!(formatter, "key is already present"),
            Self::KeyNotFound => write!(formatter, "key is not present"),
            Self::KeyOrderViolation => {
                write!(formatter, "new key would break the ordering of stored keys")
            }
        }
    }
}

impl std::error::Error for KslError {}

impl From<TryReserveError> for KslError {
    fn from(_: TryReserveError) -> Self {
        Self::OutOfMemory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(KslError::OutOfMemory, "out of memory while allocating a block")]
    #[case(
        KslError::InvalidFanout { min_fanout: 1 },
        "invalid minimum fanout 1: must be at least 2"
    )]
    #[case(KslError::DuplicateKey, "key is already present")]
    #[case(KslError::KeyNotFound, "key is not present")]
    #[case(
        KslError::KeyOrderViolation,
        "new key would break the ordering of stored keys"
    )]
    fn test_error_display(#[case] error: KslError, #[case] expected: &str) {
        assert_eq!(format!("{error}"), expected);
    }

    #[rstest]
    fn test_try_reserve_error_maps_to_out_of_memory() {
        let mut buffer: Vec<u64> = Vec::new();
        let error = buffer.try_reserve(usize::MAX).unwrap_err();
        assert_eq!(KslError::from(error), KslError::OutOfMemory);
    }
}
