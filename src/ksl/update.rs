//! In-place key renaming.

use smallvec::SmallVec;

use super::block::BlockId;
use super::cursor::Position;
use super::search;
use super::KeySortedList;
use crate::compare::Comparator;
use crate::error::KslError;

/// Path depth kept inline; deeper trees spill to the heap.
const INLINE_PATH_DEPTH: usize = 8;

impl<K: Clone, V, C: Comparator<K>> KeySortedList<K, V, C> {
    /// Renames the entry stored under `old_key` to `new_key` without moving
    /// it.
    ///
    /// Separators on the path that named `old_key` as their subtree maximum,
    /// or that `new_key` now exceeds, are rewritten to `new_key`.
    ///
    /// # Errors
    ///
    /// - [`KslError::KeyNotFound`] if `old_key` is not stored.
    /// - [`KslError::KeyOrderViolation`] if `new_key` does not fit strictly
    ///   between the neighbours of the renamed entry.
    ///
    /// Nothing is modified when an error is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keysorted::{KeySortedList, KslError};
    ///
    /// let mut list = KeySortedList::new().unwrap();
    /// for key in [10, 20, 30] {
    ///     list.insert(key, key.to_string()).unwrap();
    /// }
    ///
    /// list.update_key(&20, 25).unwrap();
    /// assert_eq!(list.get(&25), Some(&"20".to_string()));
    /// assert_eq!(list.update_key(&25, 30), Err(KslError::KeyOrderViolation));
    /// ```
    pub fn update_key(&mut self, old_key: &K, new_key: K) -> Result<(), KslError> {
        let mut path: SmallVec<[(BlockId, usize); INLINE_PATH_DEPTH]> = SmallVec::new();
        let mut current = self.root;
        let leaf_index = loop {
            let block = &self.arena[current];
            let index = search::lower_bound(&block.entries, old_key, &self.comparator);
            if index == block.len() {
                return Err(KslError::KeyNotFound);
            }
            if block.leaf {
                if self.comparator.less(old_key, &block.entries[index].key) {
                    return Err(KslError::KeyNotFound);
                }
                break index;
            }
            path.push((current, index));
            current = block.entries[index].child();
        };

        let cursor = self.cursor(Position::new(current, leaf_index));
        let mut before = cursor;
        if before.move_prev()
            && let Some(previous) = before.key()
            && !self.comparator.less(previous, &new_key)
        {
            return Err(KslError::KeyOrderViolation);
        }
        let mut after = cursor;
        if after.move_next()
            && let Some(following) = after.key()
            && !self.comparator.less(&new_key, following)
        {
            return Err(KslError::KeyOrderViolation);
        }

        for (block, index) in path {
            let separator = &mut self.arena[block].entries[index].key;
            if self.comparator.equivalent(separator, old_key)
                || self.comparator.less(separator, &new_key)
            {
                *separator = new_key.clone();
            }
        }
        self.arena[current].entries[leaf_index].key = new_key;
        Ok(())
    }
}
