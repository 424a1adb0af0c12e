//! Construction-time configuration for [`KeySortedList`](crate::ksl::KeySortedList).
//!
//! The block fanout is fixed per container. Every block except the root holds
//! between `min_fanout` and `max_fanout = 2 * min_fanout` entries.

use crate::error::KslError;

/// Minimum fanout used when none is configured.
///
/// Blocks hold up to 32 entries, which keeps a block of small keys within a
/// few cache lines.
pub const DEFAULT_MIN_FANOUT: usize = 16;

/// Smallest minimum fanout that keeps split and merge well defined.
pub const MIN_SUPPORTED_FANOUT: usize = 2;

/// Configuration for a [`KeySortedList`](crate::ksl::KeySortedList).
///
/// # Examples
///
/// ```rust
/// use keysorted::KslConfig;
///
/// let config = KslConfig::new().with_min_fanout(4).with_max_blocks(Some(64));
/// assert_eq!(config.min_fanout(), 4);
/// assert_eq!(config.max_fanout(), 8);
/// assert_eq!(config.max_blocks(), Some(64));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KslConfig {
    min_fanout: usize,
    max_blocks: Option<usize>,
    initial_blocks: usize,
}

impl KslConfig {
    /// Creates the default configuration.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min_fanout: DEFAULT_MIN_FANOUT,
            max_blocks: None,
            initial_blocks: 0,
        }
    }

    /// Sets the minimum number of entries per non-root block.
    #[inline]
    #[must_use]
    pub const fn with_min_fanout(mut self, min_fanout: usize) -> Self {
        self.min_fanout = min_fanout;
        self
    }

    /// Caps the number of live blocks.
    ///
    /// Allocating a block beyond the cap fails with
    /// [`KslError::OutOfMemory`], the same way a failed heap allocation does.
    #[inline]
    #[must_use]
    pub const fn with_max_blocks(mut self, max_blocks: Option<usize>) -> Self {
        self.max_blocks = max_blocks;
        self
    }

    /// Reserves room for this many blocks at construction.
    #[inline]
    #[must_use]
    pub const fn with_initial_blocks(mut self, initial_blocks: usize) -> Self {
        self.initial_blocks = initial_blocks;
        self
    }

    /// Returns the minimum number of entries per non-root block.
    #[inline]
    #[must_use]
    pub const fn min_fanout(&self) -> usize {
        self.min_fanout
    }

    /// Returns the block capacity, always twice the minimum fanout.
    #[inline]
    #[must_use]
    pub const fn max_fanout(&self) -> usize {
        self.min_fanout.saturating_mul(2)
    }

    /// Returns the live block cap, if any.
    #[inline]
    #[must_use]
    pub const fn max_blocks(&self) -> Option<usize> {
        self.max_blocks
    }

    /// Returns the number of block slots reserved at construction.
    #[inline]
    #[must_use]
    pub const fn initial_blocks(&self) -> usize {
        self.initial_blocks
    }

    /// Checks that the configuration describes a usable container.
    ///
    /// # Errors
    ///
    /// Returns [`KslError::InvalidFanout`] if the minimum fanout is below
    /// [`MIN_SUPPORTED_FANOUT`] or its doubled capacity overflows.
    pub const fn validate(&self) -> Result<(), KslError> {
        if self.min_fanout < MIN_SUPPORTED_FANOUT || self.min_fanout.checked_mul(2).is_none() {
            return Err(KslError::InvalidFanout {
                min_fanout: self.min_fanout,
            });
        }
        Ok(())
    }
}

impl Default for KslConfig {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
