//! Key ordering for the key-sorted list.
//!
//! A [`Comparator`] reports strict less-than between two keys. The container
//! is stored under one comparator and may be searched with another one, as
//! long as both agree on the stored order (see
//! [`KeySortedList::lower_bound_with`](crate::ksl::KeySortedList::lower_bound_with)).

/// A strict weak ordering over keys.
///
/// `less` must describe a consistent strict total order for every key ever
/// stored in one container. A comparator that violates this silently
/// corrupts the container's ordering.
///
/// Closures of type `Fn(&K, &K) -> bool` are comparators:
///
/// ```rust
/// use keysorted::Comparator;
///
/// let descending = |lhs: &i32, rhs: &i32| lhs > rhs;
/// assert!(descending.less(&3, &1));
/// assert!(descending.equivalent(&2, &2));
/// ```
pub trait Comparator<K: ?Sized> {
    /// Returns `true` if `lhs` orders strictly before `rhs`.
    fn less(&self, lhs: &K, rhs: &K) -> bool;

    /// Returns `true` if neither key orders before the other.
    #[inline]
    fn equivalent(&self, lhs: &K, rhs: &K) -> bool {
        !self.less(lhs, rhs) && !self.less(rhs, lhs)
    }
}

/// Orders keys by their [`Ord`] implementation.
///
/// # Examples
///
/// ```rust
/// use keysorted::{Comparator, NaturalOrder};
///
/// assert!(NaturalOrder.less(&1, &2));
/// assert!(!NaturalOrder.less(&"b", &"a"));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Comparator<K> for NaturalOrder {
    #[inline]
    fn less(&self, lhs: &K, rhs: &K) -> bool {
        lhs < rhs
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn less(&self, lhs: &K, rhs: &K) -> bool {
        self(lhs, rhs)
    }
}
