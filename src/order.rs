//! Ordering policies for heap keys
//!
//! Every heap in this crate is parameterized by a [`KeyOrder`], chosen once at
//! construction. The policy answers a single question: how does key `a`
//! compare to key `b`? The heap treats [`Ordering::Less`] as "better" and
//! keeps the best key at the root.
//!
//! Three policies are provided:
//!
//! - [`Natural`]: the key type's own [`Ord`] implementation (the default)
//! - [`FnOrder`]: a caller-supplied `Fn(&K, &K) -> Ordering`
//! - [`ThreeWay`]: a caller-supplied `Fn(&K, &K) -> i32` returning -1/0/1
//!
//! # Contract
//!
//! Custom comparators must describe a total order: antisymmetric, transitive
//! and consistent between calls. This is not checked at runtime; a comparator
//! that breaks it leaves the heap order unspecified (but never unsafe).
//!
//! # Example
//!
//! ```rust
//! use indexed_heaps::order::{FnOrder, KeyOrder, Natural};
//! use std::cmp::Ordering;
//!
//! assert_eq!(Natural.compare(&1, &2), Ordering::Less);
//!
//! // Largest key first
//! let max_first = FnOrder::new(|a: &i32, b: &i32| b.cmp(a));
//! assert_eq!(max_first.compare(&1, &2), Ordering::Greater);
//! ```

use std::cmp::Ordering;
use std::fmt;

/// A three-way comparison between two keys
///
/// Implementations must be pure: the same pair of keys always yields the same
/// result, and no side effects are observable.
pub trait KeyOrder<K: ?Sized> {
    /// Compares `a` with `b`; `Less` means `a` belongs closer to the root
    fn compare(&self, a: &K, b: &K) -> Ordering;

    /// Returns true if `a` is strictly better (closer to the root) than `b`
    #[inline]
    fn is_better(&self, a: &K, b: &K) -> bool {
        self.compare(a, b) == Ordering::Less
    }

    /// Returns true if `a` is strictly worse (further from the root) than `b`
    #[inline]
    fn is_worse(&self, a: &K, b: &K) -> bool {
        self.compare(a, b) == Ordering::Greater
    }
}

/// Orders keys by their [`Ord`] implementation, smallest first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Natural;

impl<K: Ord + ?Sized> KeyOrder<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Orders keys with an injected comparator returning [`Ordering`]
#[derive(Clone, Copy)]
pub struct FnOrder<F> {
    cmp: F,
}

impl<F> FnOrder<F> {
    /// Wraps a comparator. See the module docs for the total-order contract.
    pub fn new(cmp: F) -> Self {
        Self { cmp }
    }
}

impl<K: ?Sized, F> KeyOrder<K> for FnOrder<F>
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        (self.cmp)(a, b)
    }
}

impl<F> fmt::Debug for FnOrder<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnOrder(..)")
    }
}

/// Orders keys with an injected integer comparator
///
/// The comparator returns a negative number when `a < b`, zero when they are
/// equal and a positive number when `a > b`. Only the sign is inspected, so
/// both the strict -1/0/1 form and `a - b` style comparators work.
#[derive(Clone, Copy)]
pub struct ThreeWay<F> {
    cmp: F,
}

impl<F> ThreeWay<F> {
    /// Wraps a -1/0/1 comparator
    pub fn new(cmp: F) -> Self {
        Self { cmp }
    }
}

impl<K: ?Sized, F> KeyOrder<K> for ThreeWay<F>
where
    F: Fn(&K, &K) -> i32,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        (self.cmp)(a, b).cmp(&0)
    }
}

impl<F> fmt::Debug for ThreeWay<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ThreeWay(..)")
    }
}
