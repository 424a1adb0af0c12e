//! Removal with pre-emptive rebalancing.
//!
//! Before the descent enters a child holding only `min_fanout` entries, the
//! child borrows an entry from a sibling with a surplus or is merged with a
//! sibling. The leaf that loses the entry therefore never underflows, and
//! removal never walks back up the tree. Removal performs no allocation.

use super::block::BlockId;
use super::cursor::Position;
use super::search;
use super::KeySortedList;
use crate::compare::Comparator;
use crate::error::KslError;

impl<K: Clone, V, C: Comparator<K>> KeySortedList<K, V, C> {
    /// Removes the entry stored under `key`.
    ///
    /// Returns the position of the entry that followed it, which is the end
    /// position if the removed entry was the last one.
    ///
    /// # Errors
    ///
    /// Returns [`KslError::KeyNotFound`] if no equivalent key is stored. The
    /// stored entries are unchanged, though blocks on the search path may
    /// have been rebalanced.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keysorted::KeySortedList;
    ///
    /// let mut list = KeySortedList::new().unwrap();
    /// for key in [1, 2, 3] {
    ///     list.insert(key, ()).unwrap();
    /// }
    ///
    /// let next = list.remove(&2).unwrap();
    /// assert_eq!(list.cursor(next).key(), Some(&3));
    ///
    /// let next = list.remove(&3).unwrap();
    /// assert!(list.cursor(next).is_end());
    /// ```
    pub fn remove(&mut self, key: &K) -> Result<Position, KslError> {
        let min_fanout = self.config.min_fanout();
        let root = &self.arena[self.root];
        if !root.leaf
            && root.len() == 2
            && self.arena[root.entries[0].child()].len() == min_fanout
            && self.arena[root.entries[1].child()].len() == min_fanout
        {
            self.merge_children(self.root, 0);
        }

        // Topmost separator on the path that equals `key`. Every separator
        // below it on the path equals `key` too.
        let mut maximum_path: Option<(BlockId, usize)> = None;
        let mut current = self.root;
        loop {
            let block = &self.arena[current];
            let index = search::lower_bound(&block.entries, key, &self.comparator);

            if block.leaf {
                if index == block.len() || self.comparator.less(key, &block.entries[index].key) {
                    return Err(KslError::KeyNotFound);
                }
                return Ok(self.remove_from_leaf(current, index, maximum_path));
            }

            if index == block.len() {
                return Err(KslError::KeyNotFound);
            }

            let child = block.entries[index].child();
            if self.arena[child].len() > min_fanout {
                if maximum_path.is_none() && !self.comparator.less(key, &block.entries[index].key) {
                    maximum_path = Some((current, index));
                }
                current = child;
                continue;
            }

            let left_surplus = index > 0
                && self.arena[block.entries[index - 1].child()].len() > min_fanout;
            let right_surplus = index + 1 < block.len()
                && self.arena[block.entries[index + 1].child()].len() > min_fanout;

            if left_surplus {
                self.borrow_from_left(current, index);
            } else if right_surplus {
                self.borrow_from_right(current, index);
            } else {
                let left_index = index.saturating_sub(1);
                let (merged, slot) = self.merge_children(current, left_index);
                if let Some(slot) = slot
                    && maximum_path.is_none()
                    && !self
                        .comparator
                        .less(key, &self.arena[current].entries[slot].key)
                {
                    maximum_path = Some((current, slot));
                }
                current = merged;
            }
        }
    }

    fn remove_from_leaf(
        &mut self,
        leaf: BlockId,
        index: usize,
        maximum_path: Option<(BlockId, usize)>,
    ) -> Position {
        let block = &mut self.arena[leaf];
        block.entries.remove(index);
        self.length -= 1;

        if index < block.len() {
            return Position::new(leaf, index);
        }

        let successor = block.next;
        if let Some((start, slot)) = maximum_path {
            let new_maximum = block.last_key().clone();
            self.refresh_separators(start, slot, &new_maximum);
        }
        successor.map_or(Position::new(leaf, index), |next| Position::new(next, 0))
    }

    /// Lowers the separators from `(start, slot)` down the rightmost path of
    /// that subtree to the leaf's new maximum.
    fn refresh_separators(&mut self, start: BlockId, slot: usize, new_maximum: &K) {
        let mut current = start;
        let mut index = slot;
        loop {
            let entry = &mut self.arena[current].entries[index];
            entry.key = new_maximum.clone();
            let child = entry.child();
            let child_block = &self.arena[child];
            if child_block.leaf {
                return;
            }
            current = child;
            index = child_block.len() - 1;
        }
    }

    /// Moves the last entry of the child before `index` to the front of the
    /// child at `index`.
    fn borrow_from_left(&mut self, parent: BlockId, index: usize) {
        let left = self.arena[parent].entries[index - 1].child();
        let right = self.arena[parent].entries[index].child();
        let (left_block, right_block) = self.arena.pair_mut(left, right);
        if let Some(entry) = left_block.entries.pop() {
            right_block.entries.insert(0, entry);
        }
        let left_maximum = left_block.last_key().clone();
        self.arena[parent].entries[index - 1].key = left_maximum;
        tracing::trace!(from = ?left, to = ?right, "borrowed entry from left sibling");
    }

    /// Moves the first entry of the child after `index` to the back of the
    /// child at `index`.
    fn borrow_from_right(&mut self, parent: BlockId, index: usize) {
        let left = self.arena[parent].entries[index].child();
        let right = self.arena[parent].entries[index + 1].child();
        let (left_block, right_block) = self.arena.pair_mut(left, right);
        left_block.entries.push(right_block.entries.remove(0));
        let left_maximum = left_block.last_key().clone();
        self.arena[parent].entries[index].key = left_maximum;
        tracing::trace!(from = ?right, to = ?left, "borrowed entry from right sibling");
    }

    /// Merges the children at `index` and `index + 1` of `parent` into the
    /// left one and releases the right one.
    ///
    /// If `parent` is a root with exactly these two children, the merged
    /// block replaces it as root and the tree loses a level. Returns the
    /// merged block and, unless the root collapsed, its slot in `parent`.
    fn merge_children(&mut self, parent: BlockId, index: usize) -> (BlockId, Option<usize>) {
        let left = self.arena[parent].entries[index].child();
        let right = self.arena[parent].entries[index + 1].child();

        let mut right_block = self.arena.remove(right);
        let left_block = &mut self.arena[left];
        left_block.entries.append(&mut right_block.entries);
        if left_block.leaf {
            left_block.next = right_block.next;
            match right_block.next {
                Some(next) => self.arena[next].prev = Some(left),
                None => self.back = left,
            }
        }

        if parent == self.root && self.arena[parent].len() == 2 {
            self.arena.remove(parent);
            self.root = left;
            tracing::trace!(root = ?left, height = self.height(), "collapsed root");
            return (left, None);
        }

        let merged_maximum = self.arena[left].last_key().clone();
        let parent_block = &mut self.arena[parent];
        parent_block.entries.remove(index + 1);
        parent_block.entries[index].key = merged_maximum;
        tracing::trace!(left = ?left, right = ?right, "merged blocks");
        (left, Some(index))
    }
}
