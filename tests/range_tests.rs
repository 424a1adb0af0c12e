//! Tests for interval keys stored in a KeySortedList.

use keysorted::{Comparator, KeySortedList, KslConfig, Range, RangeOrder, RangeOverlapOrder};
use proptest::prelude::*;
use rstest::rstest;

fn gapped_ranges(count: u64) -> KeySortedList<Range, u64, RangeOrder> {
    let config = KslConfig::new().with_min_fanout(2);
    let mut list = KeySortedList::with_config(RangeOrder, config).unwrap();
    for index in 0..count {
        list.insert(Range::new(index * 100, index * 100 + 60), index)
            .unwrap();
    }
    list
}

/// First stored range not ordered before `query` when overlaps count as
/// equivalent, found by a linear scan.
fn scan_lower_bound(list: &KeySortedList<Range, u64, RangeOrder>, query: &Range) -> Option<Range> {
    list.keys()
        .find(|stored| !RangeOverlapOrder.less(*stored, query))
        .copied()
}

// =============================================================================
// Comparator Tests
// =============================================================================

#[rstest]
fn test_ranges_with_equal_begin_are_duplicates() {
    let mut list = KeySortedList::with_comparator(RangeOrder).unwrap();
    list.insert(Range::new(10, 20), ()).unwrap();
    assert!(list.insert(Range::new(10, 50), ()).is_err());
    assert_eq!(list.len(), 1);
}

#[rstest]
#[case(Range::new(130, 140), Some(Range::new(100, 160)))]
#[case(Range::new(160, 170), Some(Range::new(200, 260)))]
#[case(Range::new(150, 250), Some(Range::new(100, 160)))]
#[case(Range::new(0, 1), Some(Range::new(0, 60)))]
#[case(Range::new(9_960, 9_999), None)]
fn test_overlap_lookup(#[case] query: Range, #[case] expected: Option<Range>) {
    let list = gapped_ranges(100);
    let cursor = list.lower_bound_with(&query, &RangeOverlapOrder);
    assert_eq!(cursor.key().copied(), expected);
}

#[rstest]
fn test_overlap_lookup_then_walk_all_overlaps() {
    let list = gapped_ranges(100);
    let query = Range::new(250, 520);
    let overlapping: Vec<Range> = list
        .lower_bound_with(&query, &RangeOverlapOrder)
        .iter()
        .map(|(range, _)| *range)
        .take_while(|range| range.overlaps(&query))
        .collect();
    assert_eq!(
        overlapping,
        vec![
            Range::new(200, 260),
            Range::new(300, 360),
            Range::new(400, 460),
            Range::new(500, 560),
        ]
    );
}

#[rstest]
fn test_removing_range_keeps_overlap_search_exact() {
    let mut list = gapped_ranges(50);
    list.remove(&Range::new(1_000, 1_060)).unwrap();
    let cursor = list.lower_bound_with(&Range::new(1_010, 1_020), &RangeOverlapOrder);
    assert_eq!(cursor.key(), Some(&Range::new(1_100, 1_160)));
}

// =============================================================================
// Overlap Search Laws
// =============================================================================

proptest! {
    /// Law: the tree search under the overlap comparator finds the same
    /// range as a linear scan.
    #[test]
    fn prop_overlap_search_matches_scan(
        count in 1_u64..200,
        begin in 0_u64..20_000,
        len in 1_u64..300
    ) {
        let list = gapped_ranges(count);
        let query = Range::new(begin, begin + len);
        let found = list.lower_bound_with(&query, &RangeOverlapOrder).key().copied();
        prop_assert_eq!(found, scan_lower_bound(&list, &query));
    }
}
