//! Common traits and error types for heap data structures
//!
//! This module provides a two-tier trait hierarchy:
//!
//! - [`Heap`]: insertion and minimum extraction, with an `Option`-returning API
//!   in the style of `std::collections::BinaryHeap`
//! - [`DecreaseKeyHeap`]: adds `decrease_key`/`increase_key`, addressing
//!   elements by payload identity
//!
//! Both [`ArrayHeap`](crate::binary::ArrayHeap) and
//! [`IndexedHeap`](crate::indexed::IndexedHeap) implement both traits. They
//! differ in how a payload is located: the array heap scans, the indexed heap
//! looks it up in its reverse index.

use std::fmt;
use thiserror::Error;

/// Direction of a rejected key update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyChange {
    /// `decrease_key`: the new key must be strictly better
    Decrease,
    /// `increase_key`: the new key must be strictly worse
    Increase,
}

impl fmt::Display for KeyChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyChange::Decrease => f.write_str("better"),
            KeyChange::Increase => f.write_str("worse"),
        }
    }
}

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    /// The heap holds no elements
    #[error("heap is empty")]
    EmptyHeap,
    /// The payload is not currently stored in the heap
    #[error("payload is not in the heap")]
    NotFound,
    /// The payload is already stored in the heap
    #[error("payload is already in the heap")]
    DuplicatePayload,
    /// The new key does not move in the requested direction
    #[error("new key is not strictly {change} than the current key")]
    InvalidKeyChange {
        /// The update that was attempted
        change: KeyChange,
    },
}

/// A broken structural invariant, as reported by `verify()`
///
/// Seeing one of these means a bug in the heap or a comparator that is not a
/// total order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// The key at `position` is better than the key at its parent
    #[error("entry at position {position} is better than its parent at {parent}")]
    HeapOrder {
        /// The offending child position
        position: usize,
        /// Its parent position
        parent: usize,
    },
    /// The reverse index does not point back to the entry's position
    #[error("index maps the payload at position {position} to {indexed:?}")]
    IndexMismatch {
        /// Position of the entry
        position: usize,
        /// What the index holds for its payload
        indexed: Option<usize>,
    },
    /// The reverse index and the heap disagree on the element count
    #[error("index holds {indexed} payloads but the heap holds {len}")]
    IndexSize {
        /// Number of index entries
        indexed: usize,
        /// Number of heap entries
        len: usize,
    },
}

/// Base trait for min-heaps of (key, payload) pairs
///
/// Unlike `BinaryHeap`, which stores values directly and is a max-heap, these
/// heaps store a key separately from the payload and pop the best key first
/// under their ordering policy.
///
/// # Example
///
/// ```rust
/// use indexed_heaps::Heap;
/// use indexed_heaps::binary::ArrayHeap;
///
/// let mut heap = ArrayHeap::new();
/// heap.push(3, "three").unwrap();
/// heap.push(1, "one").unwrap();
/// heap.push(2, "two").unwrap();
///
/// assert_eq!(heap.peek(), Some((&1, &"one")));
/// assert_eq!(heap.pop(), Some((1, "one")));
/// ```
pub trait Heap<K, V> {
    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Inserts an element with the given key
    ///
    /// # Errors
    /// Indexed heaps return [`HeapError::DuplicatePayload`] if the payload is
    /// already present. Plain array heaps never fail.
    ///
    /// # Time Complexity
    /// O(log n) amortized
    fn push(&mut self, key: K, payload: V) -> Result<(), HeapError>;

    /// Returns the best key and its payload without removing them
    ///
    /// # Time Complexity
    /// O(1)
    fn peek(&self) -> Option<(&K, &V)>;

    /// Removes and returns the best key and its payload
    ///
    /// # Time Complexity
    /// O(log n)
    fn pop(&mut self) -> Option<(K, V)>;
}

/// Extended heap trait with key updates addressed by payload
///
/// # Example
///
/// ```rust
/// use indexed_heaps::{DecreaseKeyHeap, Heap};
/// use indexed_heaps::indexed::IndexedHeap;
///
/// let mut heap = IndexedHeap::new();
/// heap.push(10, "item").unwrap();
/// heap.decrease_key(&"item", 5).unwrap();
/// assert_eq!(heap.peek(), Some((&5, &"item")));
/// ```
pub trait DecreaseKeyHeap<K, V>: Heap<K, V> {
    /// Replaces the key of `payload` with a strictly better one
    ///
    /// # Errors
    /// - [`HeapError::NotFound`] if the payload is not in the heap
    /// - [`HeapError::InvalidKeyChange`] if `new_key` is not strictly better
    ///
    /// The heap is left unchanged on error.
    ///
    /// # Time Complexity
    /// - `IndexedHeap`: O(log n)
    /// - `ArrayHeap`: O(n), dominated by the payload scan
    fn decrease_key(&mut self, payload: &V, new_key: K) -> Result<(), HeapError>;

    /// Replaces the key of `payload` with a strictly worse one
    ///
    /// # Errors
    /// - [`HeapError::NotFound`] if the payload is not in the heap
    /// - [`HeapError::InvalidKeyChange`] if `new_key` is not strictly worse
    ///
    /// The heap is left unchanged on error.
    fn increase_key(&mut self, payload: &V, new_key: K) -> Result<(), HeapError>;
}
