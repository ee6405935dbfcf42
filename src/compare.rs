//! Orderings a tree can be built over.
//!
//! A tree never calls `Ord` directly. It asks its comparator, which lets the
//! stored type carry more data than its ordering looks at.
//!
//! ```
//! use std::cmp::Ordering;
//! use ordered_tree::compare::{ByKey, Compare, Natural};
//!
//! assert_eq!(Natural.compare(&1, &2), Ordering::Less);
//!
//! let by_len = |a: &&str, b: &&str| a.len().cmp(&b.len());
//! assert_eq!(by_len.compare(&"abc", &"z"), Ordering::Greater);
//!
//! let by_first = ByKey::new(|pair: &(u8, &str)| &pair.0);
//! assert_eq!(by_first.compare(&(1, "b"), &(1, "a")), Ordering::Equal);
//! ```

use std::cmp::Ordering;
use std::fmt;

/// A strict total order over `T`.
///
/// Implementations must be consistent: equal values compare `Equal` in both
/// directions and `Less`/`Greater` are transitive. A tree built over an
/// inconsistent comparator stays memory safe but may misplace values.
///
/// # Panics
///
/// In debug builds, removing a value with two children from a
/// [`boxed::OrderedTree`](crate::boxed::OrderedTree) checks the rewritten
/// node against its children and panics if the comparator disagrees with
/// the stored order.
pub trait Compare<T: ?Sized> {
    /// Three-way comparison of `a` against `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Orders values by their own [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Natural;

impl<T: Ord + ?Sized> Compare<T> for Natural {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

impl<T: ?Sized, F> Compare<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Orders values by a key borrowed out of each one.
///
/// Two values with equal keys are the same entry as far as a tree is
/// concerned, whatever else they hold.
#[derive(Clone, Copy)]
pub struct ByKey<F> {
    key: F,
}

impl<F> ByKey<F> {
    /// Builds a comparator from a key-extraction function.
    pub fn new<T, K>(key: F) -> Self
    where
        T: ?Sized,
        K: Ord + ?Sized,
        F: Fn(&T) -> &K,
    {
        Self { key }
    }
}

impl<F> fmt::Debug for ByKey<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByKey").finish_non_exhaustive()
    }
}

impl<T: ?Sized, K: Ord + ?Sized, F> Compare<T> for ByKey<F>
where
    F: Fn(&T) -> &K,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.key)(a).cmp((self.key)(b))
    }
}
