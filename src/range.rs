//! Interval keys and their comparators.
//!
//! [`Range`] is a half-open `[begin, end)` interval over `u64` offsets.
//! Ranges are stored ordered by `begin` under [`RangeOrder`];
//! [`RangeOverlapOrder`] searches the same container for any stored range
//! overlapping a query range.
//!
//! # Examples
//!
//! ```rust
//! use keysorted::{KeySortedList, Range, RangeOrder, RangeOverlapOrder};
//!
//! let mut ranges = KeySortedList::with_comparator(RangeOrder).unwrap();
//! ranges.insert(Range::new(0, 10), "head").unwrap();
//! ranges.insert(Range::new(20, 30), "tail").unwrap();
//!
//! let hit = ranges.lower_bound_with(&Range::new(25, 26), &RangeOverlapOrder);
//! assert_eq!(hit.value(), Some(&"tail"));
//!
//! let miss = ranges.lower_bound_with(&Range::new(12, 15), &RangeOverlapOrder);
//! assert_eq!(miss.key(), Some(&Range::new(20, 30)));
//! ```

use std::fmt;

use crate::compare::Comparator;

/// A half-open interval `[begin, end)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    /// First offset covered by the range.
    pub begin: u64,
    /// First offset past the range.
    pub end: u64,
}

impl Range {
    /// Creates the range `[begin, end)`.
    #[inline]
    #[must_use]
    pub const fn new(begin: u64, end: u64) -> Self {
        Self { begin, end }
    }

    /// Returns the number of offsets covered.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.end.saturating_sub(self.begin)
    }

    /// Returns `true` if the range covers nothing.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the two ranges share at least one offset.
    ///
    /// ```rust
    /// use keysorted::Range;
    ///
    /// assert!(Range::new(0, 10).overlaps(&Range::new(9, 12)));
    /// assert!(!Range::new(0, 10).overlaps(&Range::new(10, 12)));
    /// ```
    #[inline]
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.begin.max(other.begin) < self.end.min(other.end)
    }

    /// Returns the shared part of two ranges, or an empty range when they
    /// are disjoint.
    ///
    /// ```rust
    /// use keysorted::Range;
    ///
    /// let shared = Range::new(0, 10).intersect(&Range::new(5, 15));
    /// assert_eq!(shared, Range::new(5, 10));
    /// assert!(Range::new(0, 5).intersect(&Range::new(7, 9)).is_empty());
    /// ```
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        let begin = self.begin.max(other.begin);
        let end = self.end.min(other.end);
        if begin < end {
            Self::new(begin, end)
        } else {
            Self::default()
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[{}, {})", self.begin, self.end)
    }
}

/// Orders ranges by their `begin` offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RangeOrder;

impl Comparator<Range> for RangeOrder {
    #[inline]
    fn less(&self, lhs: &Range, rhs: &Range) -> bool {
        lhs.begin < rhs.begin
    }
}

/// Orders ranges by `begin`, treating overlapping ranges as equivalent.
///
/// Meant as the search comparator for a container stored under
/// [`RangeOrder`]: a lower bound under this ordering lands on the first
/// stored range that overlaps the query, or on the first range after it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RangeOverlapOrder;

impl Comparator<Range> for RangeOverlapOrder {
    #[inline]
    fn less(&self, lhs: &Range, rhs: &Range) -> bool {
        lhs.begin < rhs.begin && !lhs.overlaps(rhs)
    }
}

static_assertions::assert_impl_all!(Range: Copy, Send, Sync);
static_assertions::assert_impl_all!(RangeOrder: Comparator<Range>, Default);
static_assertions::assert_impl_all!(RangeOverlapOrder: Comparator<Range>, Default);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Range::new(0, 10), 10)]
    #[case(Range::new(5, 5), 0)]
    #[case(Range::new(9, 3), 0)]
    fn test_len(#[case] range: Range, #[case] expected: u64) {
        assert_eq!(range.len(), expected);
        assert_eq!(range.is_empty(), expected == 0);
    }

    #[rstest]
    #[case(Range::new(0, 10), Range::new(5, 15), true)]
    #[case(Range::new(0, 10), Range::new(10, 15), false)]
    #[case(Range::new(7, 8), Range::new(0, 10), true)]
    #[case(Range::new(20, 30), Range::new(0, 10), false)]
    fn test_overlaps_is_symmetric(
        #[case] first: Range,
        #[case] second: Range,
        #[case] expected: bool,
    ) {
        assert_eq!(first.overlaps(&second), expected);
        assert_eq!(second.overlaps(&first), expected);
    }

    #[rstest]
    fn test_intersect_nested() {
        let outer = Range::new(0, 100);
        let inner = Range::new(40, 60);
        assert_eq!(outer.intersect(&inner), inner);
        assert_eq!(inner.intersect(&outer), inner);
    }

    #[rstest]
    fn test_display() {
        assert_eq!(format!("{}", Range::new(3, 7)), "[3, 7)");
    }

    #[rstest]
    fn test_range_order_only_looks_at_begin() {
        assert!(RangeOrder.less(&Range::new(0, 100), &Range::new(1, 2)));
        assert!(!RangeOrder.less(&Range::new(1, 2), &Range::new(1, 100)));
    }

    #[rstest]
    #[case(Range::new(0, 10), Range::new(7, 8), false)]
    #[case(Range::new(5, 15), Range::new(7, 8), false)]
    #[case(Range::new(0, 5), Range::new(7, 8), true)]
    #[case(Range::new(8, 9), Range::new(7, 8), false)]
    fn test_overlap_order(#[case] stored: Range, #[case] query: Range, #[case] expected: bool) {
        assert_eq!(RangeOverlapOrder.less(&stored, &query), expected);
    }
}
