//! Positions, cursors, and iterators over a [`KeySortedList`].
//!
//! A [`Position`] is a plain `(block, index)` handle. It is what
//! [`KeySortedList::insert`] and [`KeySortedList::remove`] hand back, so a
//! caller can continue from the affected entry without searching again.
//! A [`Cursor`] borrows the list and walks the leaf chain in either
//! direction; an [`Iter`] is the lazy, double-ended form of the same walk.
//!
//! # Validity
//!
//! Positions are not tracked by the list. Any insert, remove, or clear may
//! split, merge, or release the block a position refers to; after such a
//! mutation only the position returned by the mutation itself is
//! meaningful. A stale position never causes undefined behaviour: it reads
//! as some other entry or as no entry at all.

use std::iter::FusedIterator;

use super::KeySortedList;
use super::block::BlockId;

/// A `(block, index)` handle into a [`KeySortedList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub(crate) block: BlockId,
    pub(crate) index: usize,
}

impl Position {
    #[inline]
    pub(crate) const fn new(block: BlockId, index: usize) -> Self {
        Self { block, index }
    }

    /// Returns the index of the entry within its block.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }
}

/// A bidirectional cursor over the entries of a [`KeySortedList`].
///
/// # Examples
///
/// ```rust
/// use keysorted::KeySortedList;
///
/// let mut list = KeySortedList::new().unwrap();
/// for key in [10, 20, 30] {
///     list.insert(key, key * 2).unwrap();
/// }
///
/// let mut cursor = list.lower_bound(&15);
/// assert_eq!(cursor.entry(), Some((&20, &40)));
/// assert!(cursor.move_prev());
/// assert_eq!(cursor.key(), Some(&10));
/// assert!(cursor.is_begin());
/// assert!(!cursor.move_prev());
/// ```
pub struct Cursor<'a, K, V, C> {
    list: &'a KeySortedList<K, V, C>,
    position: Position,
}

impl<K, V, C> Clone for Cursor<'_, K, V, C> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V, C> Copy for Cursor<'_, K, V, C> {}

impl<'a, K, V, C> Cursor<'a, K, V, C> {
    #[inline]
    pub(crate) const fn new(list: &'a KeySortedList<K, V, C>, position: Position) -> Self {
        Self { list, position }
    }

    /// Returns the handle this cursor points at.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Returns `true` if the cursor is one past the last entry.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.list.arena.get(self.position.block).is_none_or(|block| {
            self.position.index >= block.len() && block.next.is_none()
        })
    }

    /// Returns `true` if the cursor is at the first entry.
    ///
    /// On an empty list the cursor is at the beginning and the end at once.
    #[must_use]
    pub fn is_begin(&self) -> bool {
        self.position.index == 0
            && self
                .list
                .arena
                .get(self.position.block)
                .is_some_and(|block| block.prev.is_none())
    }

    /// Returns the key at the cursor, or `None` at the end.
    #[must_use]
    pub fn key(&self) -> Option<&'a K> {
        self.entry().map(|(key, _)| key)
    }

    /// Returns the value at the cursor, or `None` at the end.
    #[must_use]
    pub fn value(&self) -> Option<&'a V> {
        self.entry().map(|(_, value)| value)
    }

    /// Returns the key and value at the cursor, or `None` at the end.
    #[must_use]
    pub fn entry(&self) -> Option<(&'a K, &'a V)> {
        self.list.entry_at(self.position)
    }

    /// Advances to the next entry.
    ///
    /// Returns `false`, leaving the cursor where it is, if it is already at
    /// the end.
    pub fn move_next(&mut self) -> bool {
        if self.is_end() {
            return false;
        }
        self.position = self.list.step_forward(self.position);
        true
    }

    /// Moves back to the previous entry.
    ///
    /// Returns `false`, leaving the cursor where it is, if it is already at
    /// the first entry.
    pub fn move_prev(&mut self) -> bool {
        if self.is_begin() {
            return false;
        }
        match self.list.step_backward(self.position) {
            Some(position) => {
                self.position = position;
                true
            }
            None => false,
        }
    }

    /// Returns an iterator from the cursor to the end of the list.
    #[must_use]
    pub fn iter(&self) -> Iter<'a, K, V, C> {
        Iter {
            list: self.list,
            front: self.position,
            back: self.list.end_position(),
        }
    }
}

impl<K, V, C> PartialEq for Cursor<'_, K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.list, other.list) && self.position == other.position
    }
}

impl<K, V, C> Eq for Cursor<'_, K, V, C> {}

impl<K, V, C> std::fmt::Debug for Cursor<'_, K, V, C> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Cursor")
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

/// A double-ended iterator over `(key, value)` pairs in key order.
///
/// Produced by [`KeySortedList::iter`], [`KeySortedList::range_from`], and
/// [`Cursor::iter`]. It cannot outlive a mutation of the list, so it never
/// observes a stale position.
pub struct Iter<'a, K, V, C> {
    list: &'a KeySortedList<K, V, C>,
    front: Position,
    back: Position,
}

impl<'a, K, V, C> Iterator for Iter<'a, K, V, C> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let entry = self.list.entry_at(self.front)?;
        self.front = self.list.step_forward(self.front);
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.front == self.back {
            (0, Some(0))
        } else {
            (1, Some(self.list.len()))
        }
    }
}

impl<K, V, C> DoubleEndedIterator for Iter<'_, K, V, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back = self.list.step_backward(self.back)?;
        self.list.entry_at(self.back)
    }
}

impl<K, V, C> FusedIterator for Iter<'_, K, V, C> {}

impl<K, V, C> Clone for Iter<'_, K, V, C> {
    fn clone(&self) -> Self {
        Self {
            list: self.list,
            front: self.front,
            back: self.back,
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a KeySortedList<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C> KeySortedList<K, V, C> {
    /// Returns a cursor at the first entry, equal to [`end`](Self::end) when
    /// the list is empty.
    #[must_use]
    pub fn begin(&self) -> Cursor<'_, K, V, C> {
        Cursor::new(self, Position::new(self.front, 0))
    }

    /// Returns the one-past-the-last cursor.
    #[must_use]
    pub fn end(&self) -> Cursor<'_, K, V, C> {
        Cursor::new(self, self.end_position())
    }

    /// Re-creates a cursor from a handle returned by an earlier call.
    ///
    /// A handle one past the last entry of a block that has a successor is
    /// moved to the first entry of that successor.
    #[must_use]
    pub fn cursor(&self, position: Position) -> Cursor<'_, K, V, C> {
        let position = match self.arena.get(position.block) {
            Some(block) if position.index >= block.len() => block
                .next
                .map_or(position, |next| Position::new(next, 0)),
            _ => position,
        };
        Cursor::new(self, position)
    }

    /// Returns an iterator over all entries in key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keysorted::KeySortedList;
    ///
    /// let mut list = KeySortedList::new().unwrap();
    /// for key in [3, 1, 2] {
    ///     list.insert(key, ()).unwrap();
    /// }
    /// let keys: Vec<i32> = list.iter().map(|(key, _)| *key).collect();
    /// assert_eq!(keys, vec![1, 2, 3]);
    ///
    /// let reversed: Vec<i32> = list.iter().rev().map(|(key, _)| *key).collect();
    /// assert_eq!(reversed, vec![3, 2, 1]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V, C> {
        self.begin().iter()
    }

    /// Returns an iterator over the keys in order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over the values in key order.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    pub(crate) fn end_position(&self) -> Position {
        Position::new(self.back, self.arena[self.back].len())
    }

    pub(crate) fn entry_at(&self, position: Position) -> Option<(&K, &V)> {
        let entry = self.arena.get(position.block)?.entries.get(position.index)?;
        entry.value().map(|value| (&entry.key, value))
    }

    /// Moves one entry forward, crossing into the next leaf at a block
    /// boundary. The caller has checked that `position` is not the end.
    pub(crate) fn step_forward(&self, position: Position) -> Position {
        let Some(block) = self.arena.get(position.block) else {
            return position;
        };
        let index = position.index + 1;
        match block.next {
            Some(next) if index >= block.len() => Position::new(next, 0),
            _ => Position::new(position.block, index),
        }
    }

    /// Moves one entry back, crossing into the previous leaf at a block
    /// boundary. Returns `None` at the first entry.
    pub(crate) fn step_backward(&self, position: Position) -> Option<Position> {
        if position.index > 0 {
            return Some(Position::new(position.block, position.index - 1));
        }
        let prev = self.arena.get(position.block)?.prev?;
        let len = self.arena.get(prev)?.len();
        len.checked_sub(1).map(|index| Position::new(prev, index))
    }
}
