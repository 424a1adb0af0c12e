//! Key-sorted skip list: an ordered, block-structured container.
//!
//! This module provides [`KeySortedList`], a balanced tree of fixed-capacity
//! blocks mapping keys to values.
//!
//! # Overview
//!
//! - O(log N) insert, remove, and lower-bound search
//! - O(1) amortised step to the next or previous entry via the leaf chain
//! - lower-bound search under an alternate, compatible ordering
//! - in-place key renaming
//! - O(1) len and `is_empty`
//!
//! # Internal Structure
//!
//! The tree maintains the following invariants after every operation:
//! 1. All leaves are at the same depth
//! 2. Every internal entry's key is the maximum key of its subtree
//! 3. Keys are strictly ascending within a block and unique overall
//! 4. The leaf chain from front to back visits every entry in order once
//! 5. Every block except the root holds between `min_fanout` and
//!    `2 * min_fanout` entries
//!
//! Insertion splits full blocks on the way down and removal merges or
//! rebalances minimal blocks on the way down, so neither ever has to walk
//! back up the tree.
//!
//! # Examples
//!
//! ```rust
//! use keysorted::KeySortedList;
//!
//! let mut list = KeySortedList::new().unwrap();
//! for key in [5, 1, 9, 3, 7] {
//!     list.insert(key, key * 100).unwrap();
//! }
//!
//! let keys: Vec<&i32> = list.keys().collect();
//! assert_eq!(keys, vec![&1, &3, &5, &7, &9]);
//!
//! let cursor = list.lower_bound(&4);
//! assert_eq!(cursor.entry(), Some((&5, &500)));
//!
//! let next = list.remove(&5).unwrap();
//! assert_eq!(list.cursor(next).key(), Some(&7));
//! ```

mod block;
mod cursor;
mod insert;
mod remove;
mod search;
mod update;

use std::fmt;

use crate::compare::{Comparator, NaturalOrder};
use crate::config::KslConfig;
use crate::error::KslError;
use block::{Block, BlockArena, BlockId};

pub use cursor::{Cursor, Iter, Position};

/// An ordered container of unique keys, stored in a block-structured tree.
///
/// Keys are ordered by the comparator `C`, [`NaturalOrder`] by default.
/// Separators are copies of stored keys, hence `K: Clone` for mutation.
///
/// The container is not synchronised; share it across threads only behind
/// external locking.
///
/// # Time Complexity
///
/// | Operation          | Complexity           |
/// |--------------------|----------------------|
/// | `insert`           | O(log N)             |
/// | `remove`           | O(log N)             |
/// | `update_key`       | O(log N)             |
/// | `lower_bound`      | O(log N)             |
/// | `get`              | O(log N)             |
/// | `begin`/`end`      | O(1)                 |
/// | cursor step        | O(1)                 |
/// | `len`/`is_empty`   | O(1)                 |
/// | `clear`            | O(blocks)            |
///
/// # Examples
///
/// ```rust
/// use keysorted::{KeySortedList, KslConfig, NaturalOrder};
///
/// let config = KslConfig::new().with_min_fanout(2);
/// let mut list = KeySortedList::with_config(NaturalOrder, config).unwrap();
/// for key in 1..=100 {
///     list.insert(key, key.to_string()).unwrap();
/// }
/// assert_eq!(list.len(), 100);
/// assert!(list.height() > 1);
/// assert_eq!(list.get(&42), Some(&"42".to_string()));
/// ```
pub struct KeySortedList<K, V, C = NaturalOrder> {
    arena: BlockArena<K, V>,
    root: BlockId,
    /// Leftmost leaf
    front: BlockId,
    /// Rightmost leaf
    back: BlockId,
    comparator: C,
    config: KslConfig,
    /// Number of stored entries
    length: usize,
}

impl<K: Ord, V> KeySortedList<K, V, NaturalOrder> {
    /// Creates an empty list ordered by `K`'s [`Ord`] implementation.
    ///
    /// # Errors
    ///
    /// Returns [`KslError::OutOfMemory`] if the root block cannot be
    /// allocated.
    pub fn new() -> Result<Self, KslError> {
        Self::with_config(NaturalOrder, KslConfig::default())
    }
}

impl<K, V, C> KeySortedList<K, V, C> {
    /// Creates an empty list ordered by `comparator`.
    ///
    /// # Errors
    ///
    /// Returns [`KslError::OutOfMemory`] if the root block cannot be
    /// allocated.
    pub fn with_comparator(comparator: C) -> Result<Self, KslError> {
        Self::with_config(comparator, KslConfig::default())
    }

    /// Creates an empty list with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`KslError::InvalidFanout`] if `config` is rejected by
    /// [`KslConfig::validate`], or [`KslError::OutOfMemory`] if the root
    /// block cannot be allocated.
    pub fn with_config(comparator: C, config: KslConfig) -> Result<Self, KslError> {
        config.validate()?;
        let mut arena = BlockArena::new(config.max_blocks());
        let initial = config
            .max_blocks()
            .map_or(config.initial_blocks(), |limit| config.initial_blocks().min(limit));
        arena.reserve(initial.max(1))?;
        let root = arena.insert(Block::try_new(true, config.max_fanout())?);
        Ok(Self {
            arena,
            root,
            front: root,
            back: root,
            comparator,
            config,
            length: 0,
        })
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the list holds no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the configuration the list was built with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &KslConfig {
        &self.config
    }

    /// Returns the comparator the list is stored under.
    #[inline]
    #[must_use]
    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns the number of block levels, 1 for a single leaf root.
    #[must_use]
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut current = self.root;
        while !self.arena[current].leaf {
            current = self.arena[current].entries[0].child();
            height += 1;
        }
        height
    }

    /// Returns the first entry.
    #[must_use]
    pub fn first(&self) -> Option<(&K, &V)> {
        self.entry_at(Position::new(self.front, 0))
    }

    /// Returns the last entry.
    #[must_use]
    pub fn last(&self) -> Option<(&K, &V)> {
        let len = self.arena[self.back].len();
        len.checked_sub(1)
            .and_then(|index| self.entry_at(Position::new(self.back, index)))
    }

    /// Returns a mutable reference to the value at `position`, or `None` if
    /// the handle does not address an entry.
    pub fn value_mut(&mut self, position: Position) -> Option<&mut V> {
        self.arena
            .get_mut(position.block)?
            .entries
            .get_mut(position.index)?
            .value_mut()
    }

    /// Removes every entry, keeping the root block for reuse.
    pub fn clear(&mut self) {
        tracing::debug!(entries = self.length, blocks = self.arena.live(), "clearing list");
        self.root = self.arena.reset_to(self.root);
        self.front = self.root;
        self.back = self.root;
        self.length = 0;
    }
}

impl<K, V, C: Comparator<K>> KeySortedList<K, V, C> {
    /// Returns a cursor at the first entry whose key does not order before
    /// `key`, or [`end`](Self::end) if there is none.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keysorted::KeySortedList;
    ///
    /// let mut list = KeySortedList::new().unwrap();
    /// for key in [10, 20, 30] {
    ///     list.insert(key, ()).unwrap();
    /// }
    /// assert_eq!(list.lower_bound(&20).key(), Some(&20));
    /// assert_eq!(list.lower_bound(&21).key(), Some(&30));
    /// assert!(list.lower_bound(&31).is_end());
    /// ```
    #[must_use]
    pub fn lower_bound(&self, key: &K) -> Cursor<'_, K, V, C> {
        Cursor::new(
            self,
            search::seek(&self.arena, self.root, key, &self.comparator),
        )
    }

    /// Like [`lower_bound`](Self::lower_bound), but searches with
    /// `comparator` instead of the list's own ordering.
    ///
    /// `comparator` must agree with the stored order on which entries come
    /// first, but it may consider more keys equivalent to the query. An
    /// overlap-aware range comparator, for instance, finds any stored range
    /// that overlaps the query range.
    #[must_use]
    pub fn lower_bound_with<Q>(&self, key: &K, comparator: &Q) -> Cursor<'_, K, V, C>
    where
        Q: Comparator<K> + ?Sized,
    {
        Cursor::new(self, search::seek(&self.arena, self.root, key, comparator))
    }

    /// Returns an iterator starting at the lower bound of `key`.
    #[must_use]
    pub fn range_from(&self, key: &K) -> Iter<'_, K, V, C> {
        self.lower_bound(key).iter()
    }

    /// Returns the position of the entry equivalent to `key`.
    pub(crate) fn find(&self, key: &K) -> Option<Position> {
        let cursor = self.lower_bound(key);
        let found = cursor.key()?;
        (!self.comparator.less(key, found)).then_some(cursor.position())
    }

    /// Returns a reference to the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key)
            .and_then(|position| self.entry_at(position))
            .map(|(_, value)| value)
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let position = self.find(key)?;
        self.value_mut(position)
    }

    /// Returns `true` if an entry equivalent to `key` is stored.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }
}

#[cfg(test)]
impl<K, V, C: Comparator<K>> KeySortedList<K, V, C> {
    /// Asserts every structural invariant of the tree.
    pub(crate) fn check_structure(&self) {
        let mut leaves = Vec::new();
        let mut leaf_depth = None;
        let blocks = self.check_block(self.root, 1, &mut leaf_depth, &mut leaves);
        assert_eq!(blocks, self.arena.live(), "unreachable live blocks");

        assert_eq!(leaves.first(), Some(&self.front));
        assert_eq!(leaves.last(), Some(&self.back));
        let mut chain = Vec::new();
        let mut expected_prev = None;
        let mut current = Some(self.front);
        while let Some(id) = current {
            assert_eq!(self.arena[id].prev, expected_prev, "broken prev link");
            chain.push(id);
            expected_prev = Some(id);
            current = self.arena[id].next;
        }
        assert_eq!(chain, leaves, "leaf chain differs from tree order");

        let mut keys = self.keys();
        let mut count = 0;
        if let Some(mut previous) = keys.next() {
            count += 1;
            for key in keys {
                assert!(self.comparator.less(previous, key), "keys out of order");
                previous = key;
                count += 1;
            }
        }
        assert_eq!(count, self.length);
    }

    fn check_block(
        &self,
        id: BlockId,
        depth: usize,
        leaf_depth: &mut Option<usize>,
        leaves: &mut Vec<BlockId>,
    ) -> usize {
        let block = &self.arena[id];
        assert!(block.len() <= self.config.max_fanout(), "block overflow");
        if id != self.root {
            assert!(block.len() >= self.config.min_fanout(), "block underflow");
        } else if !block.leaf {
            assert!(block.len() >= 2, "internal root with a single child");
        }
        for pair in block.entries.windows(2) {
            assert!(self.comparator.less(&pair[0].key, &pair[1].key));
        }

        if block.leaf {
            match *leaf_depth {
                Some(expected) => assert_eq!(depth, expected, "leaves at uneven depth"),
                None => *leaf_depth = Some(depth),
            }
            assert!(block.entries.iter().all(|entry| entry.value().is_some()));
            leaves.push(id);
            return 1;
        }

        assert!(block.prev.is_none() && block.next.is_none());
        let mut blocks = 1;
        for entry in &block.entries {
            let child = entry.child();
            assert!(
                self.comparator.equivalent(&entry.key, self.arena[child].last_key()),
                "separator differs from subtree maximum"
            );
            blocks += self.check_block(child, depth + 1, leaf_depth, leaves);
        }
        blocks
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K: PartialEq, V: PartialEq, C> PartialEq for KeySortedList<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for KeySortedList<K, V, C> {}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for KeySortedList<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display, C> fmt::Display for KeySortedList<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

static_assertions::assert_impl_all!(KeySortedList<u64, String>: Send, Sync);
static_assertions::assert_impl_all!(Position: Copy, Send, Sync);

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V, C> serde::Serialize for KeySortedList<K, V, C>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct KeySortedListVisitor<K, V, C> {
    marker: std::marker::PhantomData<(K, V, C)>,
}

#[cfg(feature = "serde")]
impl<'de, K, V, C> serde::de::Visitor<'de> for KeySortedListVisitor<K, V, C>
where
    K: serde::Deserialize<'de> + Clone,
    V: serde::Deserialize<'de>,
    C: Comparator<K> + Default,
{
    type Value = KeySortedList<K, V, C>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map with unique keys")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        use serde::de::Error;
        let mut list = KeySortedList::with_comparator(C::default()).map_err(A::Error::custom)?;
        while let Some((key, value)) = access.next_entry()? {
            list.insert(key, value).map_err(A::Error::custom)?;
        }
        Ok(list)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, C> serde::Deserialize<'de> for KeySortedList<K, V, C>
where
    K: serde::Deserialize<'de> + Clone,
    V: serde::Deserialize<'de>,
    C: Comparator<K> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(KeySortedListVisitor {
            marker: std::marker::PhantomData,
        })
    }
}
