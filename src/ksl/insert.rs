//! Insertion with pre-emptive splitting.
//!
//! A full block is split before the descent enters it, so the leaf that
//! finally receives the entry always has room and no split ever has to
//! propagate upwards. Each split allocates its new block before touching the
//! block being split; an allocation failure therefore leaves every block as
//! it was, apart from splits that already completed.

use super::block::{Block, BlockId, Entry};
use super::cursor::Position;
use super::search;
use super::KeySortedList;
use crate::compare::Comparator;
use crate::error::KslError;

impl<K: Clone, V, C: Comparator<K>> KeySortedList<K, V, C> {
    /// Inserts `key` with `value` and returns the position of the new entry.
    ///
    /// # Errors
    ///
    /// - [`KslError::DuplicateKey`] if an equivalent key is already stored.
    /// - [`KslError::OutOfMemory`] if a block needed to make room cannot be
    ///   allocated.
    ///
    /// In both cases the stored entries are unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keysorted::{KeySortedList, KslError};
    ///
    /// let mut list = KeySortedList::new().unwrap();
    /// let position = list.insert(7, "seven").unwrap();
    /// assert_eq!(list.cursor(position).value(), Some(&"seven"));
    /// assert_eq!(list.insert(7, "again"), Err(KslError::DuplicateKey));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<Position, KslError> {
        if self.arena[self.root].len() == self.config.max_fanout() {
            self.split_root()?;
        }

        let mut current = self.root;
        loop {
            let block = &self.arena[current];
            let mut index = search::lower_bound(&block.entries, &key, &self.comparator);

            if block.leaf {
                if index < block.len() && !self.comparator.less(&key, &block.entries[index].key) {
                    return Err(KslError::DuplicateKey);
                }
                self.arena[current]
                    .entries
                    .insert(index, Entry::leaf(key, value));
                self.length += 1;
                return Ok(Position::new(current, index));
            }

            if index == block.len() {
                return self.append_rightmost(current, key, value);
            }

            if !self.comparator.less(&key, &block.entries[index].key) {
                return Err(KslError::DuplicateKey);
            }

            let child = block.entries[index].child();
            if self.arena[child].len() == self.config.max_fanout() {
                self.split_child(current, index)?;
                let parent = &self.arena[current];
                if self.comparator.less(&parent.entries[index].key, &key) {
                    index += 1;
                }
            }

            current = self.arena[current].entries[index].child();
        }
    }

    /// Appends a key larger than everything below `start`.
    ///
    /// The new key becomes the maximum of every subtree on the rightmost
    /// path, so each separator on that path is raised to it. All splits
    /// happen in a first pass; separators change only once nothing can fail.
    fn append_rightmost(
        &mut self,
        start: BlockId,
        key: K,
        value: V,
    ) -> Result<Position, KslError> {
        let mut current = start;
        while !self.arena[current].leaf {
            let last = self.arena[current].len() - 1;
            if self.arena[self.arena[current].last_child()].len() == self.config.max_fanout() {
                self.split_child(current, last)?;
            }
            current = self.arena[current].last_child();
        }

        let mut current = start;
        while !self.arena[current].leaf {
            let block = &mut self.arena[current];
            let last = block.len() - 1;
            block.entries[last].key = key.clone();
            current = block.last_child();
        }

        let leaf = &mut self.arena[current];
        leaf.entries.push(Entry::leaf(key, value));
        self.length += 1;
        Ok(Position::new(current, leaf.len() - 1))
    }

    /// Grows the tree by one level: the root is split in two and a new root
    /// with those two children takes its place.
    fn split_root(&mut self) -> Result<(), KslError> {
        let mut new_root = Block::try_new(false, self.config.max_fanout())?;
        self.arena.reserve(2)?;

        let left = self.root;
        let right = self.split_block(left)?;
        new_root
            .entries
            .push(Entry::internal(self.arena[left].last_key().clone(), left));
        new_root
            .entries
            .push(Entry::internal(self.arena[right].last_key().clone(), right));
        self.root = self.arena.insert(new_root);

        tracing::trace!(root = ?self.root, height = self.height(), "grew tree");
        Ok(())
    }

    /// Splits the child at `index` of `parent` and records the new right
    /// half as the entry after it. `parent` must not be full.
    fn split_child(&mut self, parent: BlockId, index: usize) -> Result<(), KslError> {
        let left = self.arena[parent].entries[index].child();
        let right = self.split_block(left)?;

        let left_max = self.arena[left].last_key().clone();
        let right_max = self.arena[right].last_key().clone();
        let parent_block = &mut self.arena[parent];
        parent_block.entries[index].key = left_max;
        parent_block
            .entries
            .insert(index + 1, Entry::internal(right_max, right));
        Ok(())
    }

    /// Moves the upper half of `left` into a new block placed right after it
    /// and returns the new block.
    fn split_block(&mut self, left: BlockId) -> Result<BlockId, KslError> {
        let leaf = self.arena[left].leaf;
        let mut right_block = Block::try_new(leaf, self.config.max_fanout())?;
        self.arena.reserve(1)?;

        let left_block = &mut self.arena[left];
        let moved = left_block.len() / 2;
        let split_at = left_block.len() - moved;
        right_block.entries.extend(left_block.entries.drain(split_at..));
        if leaf {
            right_block.prev = Some(left);
            right_block.next = left_block.next;
        }
        let successor = right_block.next;

        let right = self.arena.insert(right_block);
        if leaf {
            self.arena[left].next = Some(right);
            match successor {
                Some(next) => self.arena[next].prev = Some(right),
                None => self.back = right,
            }
        }

        tracing::trace!(left = ?left, right = ?right, moved, leaf, "split block");
        Ok(right)
    }
}

#[cfg(test)]
mod tests {
    use crate::compare::NaturalOrder;
    use crate::config::KslConfig;
    use crate::error::KslError;
    use crate::ksl::KeySortedList;
    use rstest::rstest;

    fn small_list() -> KeySortedList<u32, u32> {
        KeySortedList::with_config(NaturalOrder, KslConfig::new().with_min_fanout(2)).unwrap()
    }

    fn collect_keys(list: &KeySortedList<u32, u32>) -> Vec<u32> {
        list.keys().copied().collect()
    }

    #[rstest]
    fn test_insert_into_empty_list() {
        let mut list = small_list();
        let position = list.insert(5, 50).unwrap();
        assert_eq!(list.cursor(position).entry(), Some((&5, &50)));
        assert_eq!(list.len(), 1);
        assert_eq!(list.height(), 1);
    }

    #[rstest]
    fn test_root_split_grows_height() {
        let mut list = small_list();
        for key in 1..=4 {
            list.insert(key, key).unwrap();
        }
        assert_eq!(list.height(), 1);

        list.insert(5, 5).unwrap();
        assert_eq!(list.height(), 2);
        assert_eq!(collect_keys(&list), vec![1, 2, 3, 4, 5]);
        list.check_structure();
    }

    #[rstest]
    fn test_ascending_inserts_take_rightmost_path() {
        let mut list = small_list();
        for key in 1..=200 {
            let position = list.insert(key, key * 2).unwrap();
            assert_eq!(list.cursor(position).key(), Some(&key));
            assert!(list.cursor(position).iter().nth(1).is_none());
        }
        assert_eq!(collect_keys(&list), (1..=200).collect::<Vec<_>>());
        list.check_structure();
    }

    #[rstest]
    fn test_descending_inserts() {
        let mut list = small_list();
        for key in (1..=200).rev() {
            let position = list.insert(key, key).unwrap();
            assert!(list.cursor(position).is_begin());
        }
        assert_eq!(collect_keys(&list), (1..=200).collect::<Vec<_>>());
        list.check_structure();
    }

    #[rstest]
    fn test_returned_position_addresses_new_entry() {
        let mut list = small_list();
        for key in [50, 10, 90, 30, 70, 20, 80, 40, 60, 55, 15, 85] {
            let position = list.insert(key, key + 1).unwrap();
            assert_eq!(list.cursor(position).entry(), Some((&key, &(key + 1))));
            list.check_structure();
        }
    }

    #[rstest]
    fn test_duplicate_insert_is_rejected() {
        let mut list = small_list();
        for key in 1..=50 {
            list.insert(key * 2, key).unwrap();
        }
        for key in 1..=50 {
            assert_eq!(list.insert(key * 2, 0), Err(KslError::DuplicateKey));
        }
        assert_eq!(list.len(), 50);
        assert_eq!(list.get(&40), Some(&20));
        list.check_structure();
    }

    #[rstest]
    fn test_out_of_memory_leaves_contents_unchanged() {
        let config = KslConfig::new().with_min_fanout(2).with_max_blocks(Some(3));
        let mut list = KeySortedList::with_config(NaturalOrder, config).unwrap();

        let mut inserted = Vec::new();
        let mut failure = None;
        for key in 1..=100_u32 {
            match list.insert(key, key) {
                Ok(_) => inserted.push(key),
                Err(error) => {
                    failure = Some((key, error));
                    break;
                }
            }
        }

        let (failed_key, error) = failure.unwrap();
        assert_eq!(error, KslError::OutOfMemory);
        assert!(!list.contains_key(&failed_key));
        assert_eq!(collect_keys(&list), inserted);
        assert_eq!(list.len(), inserted.len());
        list.check_structure();
    }

    #[rstest]
    fn test_out_of_memory_on_root_split_is_atomic() {
        let config = KslConfig::new().with_min_fanout(2).with_max_blocks(Some(1));
        let mut list = KeySortedList::with_config(NaturalOrder, config).unwrap();
        for key in 1..=4 {
            list.insert(key, key).unwrap();
        }

        assert_eq!(list.insert(5, 5), Err(KslError::OutOfMemory));
        assert_eq!(list.height(), 1);
        assert_eq!(collect_keys(&list), vec![1, 2, 3, 4]);
        list.check_structure();
    }
}
