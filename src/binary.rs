//! Array-backed binary min-heap
//!
//! [`ArrayHeap`] stores [`Entry`] values in a `Vec` laid out as an implicit
//! binary tree: the parent of position `i` is `(i - 1) / 2` and its children
//! are `2i + 1` and `2i + 2`. Every non-root entry's key is never better than
//! its parent's key under the heap's [`KeyOrder`].
//!
//! All structural changes go through a single private primitive, `exchange`,
//! which swaps two positions and reports both new positions to the heap's
//! [`PositionTracker`]. Insertion, extraction and both sift directions are
//! built on it, so a tracker sees every relocation. The plain heap uses
//! [`Untracked`]; [`IndexedHeap`](crate::indexed::IndexedHeap) plugs in a
//! payload-to-position map.
//!
//! # Time Complexity
//!
//! | Operation      | Complexity          |
//! |----------------|---------------------|
//! | `insert`       | O(log n) amortized  |
//! | `extract_min`  | O(log n)            |
//! | `peek_min`     | O(1)                |
//! | `decrease_key` | O(n) (payload scan) |
//! | `increase_key` | O(n) (payload scan) |
//!
//! # Ties
//!
//! Sift-up only passes a parent that is strictly worse. Sift-down picks the
//! right child only when it is strictly better than the left one, so the
//! leftmost child wins ties, and it only descends past a strictly better
//! child. Equal keys therefore never move relative to each other without
//! cause, which keeps extraction order deterministic for a given sequence of
//! operations.
//!
//! # Example
//!
//! ```rust
//! use indexed_heaps::binary::ArrayHeap;
//!
//! let mut heap = ArrayHeap::new();
//! heap.insert(5, "a");
//! heap.insert(3, "b");
//! heap.insert(8, "c");
//! heap.insert(1, "d");
//!
//! let order: Vec<_> = std::iter::from_fn(|| heap.extract_min().ok())
//!     .map(|entry| entry.payload)
//!     .collect();
//! assert_eq!(order, ["d", "b", "a", "c"]);
//! ```
//!
//! # Concurrency
//!
//! The heap has no internal synchronization. Share it across threads only
//! behind an external lock.

use crate::order::{FnOrder, KeyOrder, Natural, ThreeWay};
use crate::traits::{DecreaseKeyHeap, Heap, HeapError, InvariantViolation, KeyChange};
use log::{debug, trace};
use std::cmp::Ordering;
use std::fmt;
use std::mem;

/// Minimum number of slots added when the backing storage is full
const MIN_GROWTH: usize = 4;

#[inline]
fn parent(child: usize) -> usize {
    (child - 1) / 2
}

#[inline]
fn left(parent: usize) -> usize {
    parent * 2 + 1
}

/// One element of a heap: an ordering key and an opaque payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entry<K, V> {
    /// Determines the entry's place in the heap
    pub key: K,
    /// Caller data; identifies the entry in an indexed heap
    pub payload: V,
}

impl<K, V> Entry<K, V> {
    /// Creates an entry from a key and its payload
    pub fn new(key: K, payload: V) -> Self {
        Self { key, payload }
    }

    /// Splits the entry into its key and payload
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.payload)
    }
}

impl<K, V> From<Entry<K, V>> for (K, V) {
    fn from(entry: Entry<K, V>) -> Self {
        entry.into_parts()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for Entry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key: {}, payload: {}", self.key, self.payload)
    }
}

/// Observer of every position change inside an [`ArrayHeap`]
///
/// The heap calls [`placed`](Self::placed) whenever a payload lands on a
/// position (on insertion and after each exchange) and
/// [`removed`](Self::removed) once an entry has left the heap.
pub trait PositionTracker<V> {
    /// `payload` now lives at `position`
    fn placed(&mut self, payload: &V, position: usize);

    /// `payload` is no longer stored in the heap
    fn removed(&mut self, payload: &V);

    /// Every payload has been removed
    fn clear(&mut self);

    /// Checks tracker state against the heap's current entries
    fn audit<K>(&self, _entries: &[Entry<K, V>]) -> Result<(), InvariantViolation> {
        Ok(())
    }
}

/// A tracker that ignores position changes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Untracked;

impl<V> PositionTracker<V> for Untracked {
    #[inline]
    fn placed(&mut self, _payload: &V, _position: usize) {}

    #[inline]
    fn removed(&mut self, _payload: &V) {}

    #[inline]
    fn clear(&mut self) {}
}

/// A binary min-heap of (key, payload) entries
///
/// `O` decides how keys compare and `T` is notified of every relocation.
/// Most callers use the defaults: keys in their natural order, no tracking.
#[derive(Debug, Clone)]
pub struct ArrayHeap<K, V, O = Natural, T = Untracked> {
    entries: Vec<Entry<K, V>>,
    order: O,
    tracker: T,
}

impl<K: Ord, V> ArrayHeap<K, V> {
    /// Creates an empty heap ordered by `K`'s [`Ord`] implementation
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty heap with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_order(capacity, Natural)
    }
}

impl<K, V, O: KeyOrder<K>> ArrayHeap<K, V, O> {
    /// Creates an empty heap using `order` to compare keys
    pub fn with_order(capacity: usize, order: O) -> Self {
        Self::from_parts(capacity, order, Untracked)
    }
}

impl<K, V, F> ArrayHeap<K, V, FnOrder<F>>
where
    F: Fn(&K, &K) -> Ordering,
{
    /// Creates an empty heap ordered by `cmp`, which must be a total order
    pub fn with_comparator(capacity: usize, cmp: F) -> Self {
        Self::with_order(capacity, FnOrder::new(cmp))
    }
}

impl<K, V, F> ArrayHeap<K, V, ThreeWay<F>>
where
    F: Fn(&K, &K) -> i32,
{
    /// Creates an empty heap ordered by a -1/0/1 comparator
    pub fn with_three_way(capacity: usize, cmp: F) -> Self {
        Self::with_order(capacity, ThreeWay::new(cmp))
    }
}

impl<K, V, O: KeyOrder<K>, T: PositionTracker<V>> ArrayHeap<K, V, O, T> {
    pub(crate) fn from_parts(capacity: usize, order: O, tracker: T) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            order,
            tracker,
        }
    }

    /// Returns the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the heap holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of entries the heap can hold without reallocating
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Returns the ordering policy
    pub fn order(&self) -> &O {
        &self.order
    }

    pub(crate) fn tracker(&self) -> &T {
        &self.tracker
    }

    /// Returns the best entry without removing it
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if the heap holds no entries.
    pub fn peek_min(&self) -> Result<&Entry<K, V>, HeapError> {
        self.entries.first().ok_or(HeapError::EmptyHeap)
    }

    /// Iterates over the entries in array order, not sorted order
    pub fn iter(&self) -> std::slice::Iter<'_, Entry<K, V>> {
        self.entries.iter()
    }

    pub(crate) fn entry_at(&self, position: usize) -> &Entry<K, V> {
        &self.entries[position]
    }

    /// Inserts a new entry and restores heap order by sifting it up
    pub fn insert(&mut self, key: K, payload: V) {
        if self.entries.len() == self.entries.capacity() {
            let additional = self.entries.capacity().max(MIN_GROWTH);
            debug!(
                "growing heap storage from {} to {} slots",
                self.entries.capacity(),
                self.entries.capacity() + additional
            );
            self.entries.reserve_exact(additional);
        }

        let position = self.entries.len();
        self.tracker.placed(&payload, position);
        self.entries.push(Entry { key, payload });
        self.sift_up(position);
        self.check();
    }

    /// Removes and returns the best entry
    ///
    /// The last entry is exchanged into the root, the old root is popped off
    /// the end, and the new root is sifted down.
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if the heap holds no entries.
    pub fn extract_min(&mut self) -> Result<Entry<K, V>, HeapError> {
        let last = match self.entries.len() {
            0 => return Err(HeapError::EmptyHeap),
            len => len - 1,
        };
        self.exchange(0, last);
        let min = self.entries.pop().ok_or(HeapError::EmptyHeap)?;
        self.tracker.removed(&min.payload);

        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        self.check();
        Ok(min)
    }

    /// Removes every entry, keeping the allocated storage
    pub fn clear(&mut self) {
        self.entries.clear();
        self.tracker.clear();
    }

    /// Drains the heap into a vector in extraction order
    pub fn into_sorted_vec(mut self) -> Vec<Entry<K, V>> {
        let mut sorted = Vec::with_capacity(self.entries.len());
        while let Ok(entry) = self.extract_min() {
            sorted.push(entry);
        }
        sorted
    }

    /// Checks the heap-order invariant and the tracker's view of positions
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        for position in 1..self.entries.len() {
            let parent = parent(position);
            if self
                .order
                .is_better(&self.entries[position].key, &self.entries[parent].key)
            {
                return Err(InvariantViolation::HeapOrder { position, parent });
            }
        }
        self.tracker.audit(&self.entries)
    }

    /// Replaces the key at `position` after checking it moves in the
    /// direction `change` asks for, then restores order. Returns the old key.
    ///
    /// Nothing is modified on error.
    pub(crate) fn update_key_at(
        &mut self,
        position: usize,
        new_key: K,
        change: KeyChange,
    ) -> Result<K, HeapError> {
        let current = &self.entries[position].key;
        let valid = match change {
            KeyChange::Decrease => self.order.is_better(&new_key, current),
            KeyChange::Increase => self.order.is_worse(&new_key, current),
        };
        if !valid {
            debug!("rejected {:?} at position {}", change, position);
            return Err(HeapError::InvalidKeyChange { change });
        }

        let old = mem::replace(&mut self.entries[position].key, new_key);
        match change {
            KeyChange::Decrease => self.sift_up(position),
            KeyChange::Increase => self.sift_down(position),
        }
        trace!("{:?} applied at position {}", change, position);
        self.check();
        Ok(old)
    }

    /// Overwrites the key at `position` with one that compares equal to it
    pub(crate) fn replace_equal_key_at(&mut self, position: usize, new_key: K) -> K {
        mem::replace(&mut self.entries[position].key, new_key)
    }

    /// Swaps two positions and reports both payloads' new homes
    ///
    /// This is the only place entries change position after insertion.
    #[inline]
    fn exchange(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.entries.swap(a, b);
        self.tracker.placed(&self.entries[a].payload, a);
        self.tracker.placed(&self.entries[b].payload, b);
    }

    /// Move the entry at `position` toward the root while it beats its parent
    fn sift_up(&mut self, mut position: usize) {
        while position > 0 {
            let parent = parent(position);
            if !self
                .order
                .is_better(&self.entries[position].key, &self.entries[parent].key)
            {
                break;
            }
            self.exchange(position, parent);
            position = parent;
        }
    }

    /// Move the entry at `position` toward the leaves while a child beats it
    fn sift_down(&mut self, mut position: usize) {
        let len = self.entries.len();
        loop {
            let left = left(position);
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut best = left;
            if right < len
                && self
                    .order
                    .is_better(&self.entries[right].key, &self.entries[left].key)
            {
                best = right;
            }

            if !self
                .order
                .is_better(&self.entries[best].key, &self.entries[position].key)
            {
                break;
            }
            self.exchange(position, best);
            position = best;
        }
    }

    #[cfg(feature = "check-invariants")]
    fn check(&self) {
        if let Err(violation) = self.verify() {
            panic!("heap invariant broken: {}", violation);
        }
    }

    #[cfg(not(feature = "check-invariants"))]
    #[inline]
    fn check(&self) {}
}

impl<K, V: PartialEq, O: KeyOrder<K>> ArrayHeap<K, V, O> {
    /// Returns the array position of the first entry holding `payload`
    ///
    /// # Time Complexity
    /// O(n)
    pub fn position_of(&self, payload: &V) -> Option<usize> {
        self.entries.iter().position(|entry| entry.payload == *payload)
    }

    /// Gives the first entry holding `payload` a strictly better key
    ///
    /// # Errors
    /// - [`HeapError::NotFound`] if no entry holds `payload`
    /// - [`HeapError::InvalidKeyChange`] if `new_key` is not strictly better
    ///
    /// # Time Complexity
    /// O(n) to find the payload, then O(log n) to restore order
    pub fn decrease_key(&mut self, payload: &V, new_key: K) -> Result<(), HeapError> {
        let position = self.position_of(payload).ok_or(HeapError::NotFound)?;
        self.update_key_at(position, new_key, KeyChange::Decrease).map(drop)
    }

    /// Gives the first entry holding `payload` a strictly worse key
    ///
    /// # Errors
    /// - [`HeapError::NotFound`] if no entry holds `payload`
    /// - [`HeapError::InvalidKeyChange`] if `new_key` is not strictly worse
    ///
    /// # Time Complexity
    /// O(n) to find the payload, then O(log n) to restore order
    pub fn increase_key(&mut self, payload: &V, new_key: K) -> Result<(), HeapError> {
        let position = self.position_of(payload).ok_or(HeapError::NotFound)?;
        self.update_key_at(position, new_key, KeyChange::Increase).map(drop)
    }
}

impl<K: Ord, V> Default for ArrayHeap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Lists payloads in array order, e.g. `[d, b, a, c]`
impl<K, V: fmt::Display, O, T> fmt::Display for ArrayHeap<K, V, O, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", entry.payload)?;
        }
        f.write_str("]")
    }
}

impl<'a, K, V, O: KeyOrder<K>, T: PositionTracker<V>> IntoIterator for &'a ArrayHeap<K, V, O, T> {
    type Item = &'a Entry<K, V>;
    type IntoIter = std::slice::Iter<'a, Entry<K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, O: KeyOrder<K>> Heap<K, V> for ArrayHeap<K, V, O> {
    fn is_empty(&self) -> bool {
        ArrayHeap::is_empty(self)
    }

    fn len(&self) -> usize {
        ArrayHeap::len(self)
    }

    fn push(&mut self, key: K, payload: V) -> Result<(), HeapError> {
        self.insert(key, payload);
        Ok(())
    }

    fn peek(&self) -> Option<(&K, &V)> {
        self.peek_min()
            .ok()
            .map(|entry| (&entry.key, &entry.payload))
    }

    fn pop(&mut self) -> Option<(K, V)> {
        self.extract_min().ok().map(Entry::into_parts)
    }
}

impl<K, V: PartialEq, O: KeyOrder<K>> DecreaseKeyHeap<K, V> for ArrayHeap<K, V, O> {
    fn decrease_key(&mut self, payload: &V, new_key: K) -> Result<(), HeapError> {
        ArrayHeap::decrease_key(self, payload, new_key)
    }

    fn increase_key(&mut self, payload: &V, new_key: K) -> Result<(), HeapError> {
        ArrayHeap::increase_key(self, payload, new_key)
    }
}
