//! Binary Min-Heaps with Indexed Key Updates
//!
//! This crate provides an array-backed binary min-heap with a pluggable key
//! ordering, and an index-tracked variant that supports `decrease_key` and
//! `increase_key` in O(log n) by keeping a reverse map from payload to array
//! position.
//!
//! # Features
//!
//! - **[`ArrayHeap`](binary::ArrayHeap)**: O(log n) insert and extract-min,
//!   O(1) peek; key updates by linear payload scan
//! - **[`IndexedHeap`](indexed::IndexedHeap)**: the same heap plus a reverse
//!   index, giving O(log n) `decrease_key`, `increase_key` and `change_key`
//! - **Ordering policies** ([`order`]): natural `Ord`, an `Ordering`
//!   comparator, or a -1/0/1 comparator, chosen once at construction
//!
//! Enable the `check-invariants` Cargo feature to re-verify heap order and
//! index consistency after every mutation.
//!
//! # Example
//!
//! ```rust
//! use indexed_heaps::indexed::IndexedHeap;
//!
//! let mut heap = IndexedHeap::new();
//! heap.insert(5, "item1").unwrap();
//! heap.insert(3, "item2").unwrap();
//! heap.decrease_key(&"item1", 1).unwrap();
//! assert_eq!(heap.peek_min().map(|e| e.payload), Ok("item1"));
//! ```

pub mod binary;
pub mod indexed;
pub mod order;
pub mod traits;

// Re-export the main types for convenience
pub use binary::{ArrayHeap, Entry};
pub use indexed::IndexedHeap;
pub use traits::{DecreaseKeyHeap, Heap, HeapError, InvariantViolation, KeyChange};
