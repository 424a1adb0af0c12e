//! Lower-bound search, within a block and down the tree.

use super::block::{BlockArena, BlockId, Entry};
use super::cursor::Position;
use crate::compare::Comparator;

/// Returns the index of the first entry whose key does not order before
/// `key`, or `entries.len()` if every key does.
#[inline]
pub(crate) fn lower_bound<K, V, C>(entries: &[Entry<K, V>], key: &K, comparator: &C) -> usize
where
    C: Comparator<K> + ?Sized,
{
    entries.partition_point(|entry| comparator.less(&entry.key, key))
}

/// Descends from `root` to the first leaf entry not ordered before `key`.
///
/// Internal blocks are searched with the same comparator, so an alternate
/// ordering may pick a subtree by its own notion of a match. When a block
/// has no such entry the search falls through to the first entry after that
/// subtree, which is `end` if the subtree is the last one.
pub(crate) fn seek<K, V, C>(
    arena: &BlockArena<K, V>,
    root: BlockId,
    key: &K,
    comparator: &C,
) -> Position
where
    C: Comparator<K> + ?Sized,
{
    let mut current = root;
    loop {
        let block = &arena[current];
        let index = lower_bound(&block.entries, key, comparator);

        if block.leaf {
            if index == block.len()
                && let Some(next) = block.next
            {
                return Position::new(next, 0);
            }
            return Position::new(current, index);
        }

        if index == block.len() {
            let mut last = current;
            while !arena[last].leaf {
                last = arena[last].last_child();
            }
            let leaf = &arena[last];
            return match leaf.next {
                Some(next) => Position::new(next, 0),
                None => Position::new(last, leaf.len()),
            };
        }

        current = block.entries[index].child();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::NaturalOrder;
    use crate::range::{Range, RangeOrder, RangeOverlapOrder};
    use rstest::rstest;

    fn entries(keys: &[u32]) -> Vec<Entry<u32, ()>> {
        keys.iter().map(|&key| Entry::leaf(key, ())).collect()
    }

    #[rstest]
    #[case(&[], 5, 0)]
    #[case(&[1, 3, 5, 7], 0, 0)]
    #[case(&[1, 3, 5, 7], 5, 2)]
    #[case(&[1, 3, 5, 7], 6, 3)]
    #[case(&[1, 3, 5, 7], 8, 4)]
    fn test_lower_bound(#[case] keys: &[u32], #[case] key: u32, #[case] expected: usize) {
        assert_eq!(lower_bound(&entries(keys), &key, &NaturalOrder), expected);
    }

    #[rstest]
    fn test_lower_bound_with_overlap_order_finds_covering_range() {
        let stored: Vec<Entry<Range, ()>> = [Range::new(0, 10), Range::new(10, 20), Range::new(30, 40)]
            .into_iter()
            .map(|range| Entry::leaf(range, ()))
            .collect();

        let query = Range::new(15, 16);
        assert_eq!(lower_bound(&stored, &query, &RangeOrder), 2);
        assert_eq!(lower_bound(&stored, &query, &RangeOverlapOrder), 1);
        assert_eq!(lower_bound(&stored, &Range::new(25, 26), &RangeOverlapOrder), 2);
    }
}
