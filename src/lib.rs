//! # keysorted
//!
//! A key-sorted skip list: an ordered map of unique keys stored in a
//! balanced tree of fixed-capacity blocks, with a doubly-linked chain of
//! leaves for constant-time stepping between neighbouring entries.
//!
//! ## Overview
//!
//! - **[`KeySortedList`]**: O(log N) insert, remove, lower-bound search, and
//!   in-place key renaming
//! - **Cursors**: [`Cursor`] and [`Position`] walk the leaf chain in either
//!   direction and let a caller resume from the entry an insert or remove
//!   touched
//! - **Pluggable ordering**: any [`Comparator`], including closures; a search
//!   may use a different comparator than the one the list is stored under
//! - **Interval keys**: [`Range`] with [`RangeOrder`] and
//!   [`RangeOverlapOrder`] for "find a stored range overlapping this one"
//! - **Bounded allocation**: every allocation is fallible and surfaces as
//!   [`KslError::OutOfMemory`]; [`KslConfig::with_max_blocks`] caps the
//!   number of blocks
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for [`KeySortedList`] and [`Range`]
//!
//! ## Example
//!
//! ```rust
//! use keysorted::prelude::*;
//!
//! let mut list = KeySortedList::new().unwrap();
//! for key in [30, 10, 20] {
//!     list.insert(key, key * 2).unwrap();
//! }
//!
//! let mut cursor = list.lower_bound(&15);
//! assert_eq!(cursor.entry(), Some((&20, &40)));
//! assert!(cursor.move_next());
//! assert_eq!(cursor.key(), Some(&30));
//! assert!(cursor.move_next());
//! assert!(cursor.is_end());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use keysorted::prelude::*;
/// ```
pub mod prelude {
    pub use crate::compare::{Comparator, NaturalOrder};
    pub use crate::config::KslConfig;
    pub use crate::error::KslError;
    pub use crate::ksl::{Cursor, Iter, KeySortedList, Position};
    pub use crate::range::{Range, RangeOrder, RangeOverlapOrder};
}

pub mod compare;
pub mod config;
pub mod error;
pub mod ksl;
pub mod range;

pub use compare::{Comparator, NaturalOrder};
pub use config::{DEFAULT_MIN_FANOUT, KslConfig, MIN_SUPPORTED_FANOUT};
pub use error::KslError;
pub use ksl::{Cursor, Iter, KeySortedList, Position};
pub use range::{Range, RangeOrder, RangeOverlapOrder};
