//! Index-tracked binary min-heap
//!
//! [`IndexedHeap`] is an [`ArrayHeap`] whose position tracker is a reverse
//! index from payload to array position. Because the array heap reports every
//! relocation through one exchange primitive, the index stays exact through
//! insertion, extraction and every step of both sift directions. Key updates
//! then find their entry in O(1) instead of scanning.
//!
//! Payloads are the identity of an entry, so they must be unique within one
//! heap: inserting a payload that is already present fails with
//! [`HeapError::DuplicatePayload`].
//!
//! # Time Complexity
//!
//! | Operation      | Complexity         |
//! |----------------|--------------------|
//! | `insert`       | O(log n) amortized |
//! | `extract_min`  | O(log n)           |
//! | `peek_min`     | O(1)               |
//! | `decrease_key` | O(log n)           |
//! | `increase_key` | O(log n)           |
//! | `change_key`   | O(log n)           |
//! | `contains`     | O(1)               |
//!
//! # Example
//!
//! ```rust
//! use indexed_heaps::indexed::IndexedHeap;
//! use indexed_heaps::HeapError;
//!
//! let mut heap = IndexedHeap::new();
//! heap.insert(10, "x")?;
//! heap.decrease_key(&"x", 2)?;
//! heap.insert(5, "y")?;
//!
//! let min = heap.extract_min()?;
//! assert_eq!((min.key, min.payload), (2, "x"));
//! assert!(!heap.contains(&"x"));
//! # Ok::<(), HeapError>(())
//! ```

use crate::binary::{ArrayHeap, Entry, PositionTracker};
use crate::order::{FnOrder, KeyOrder, Natural, ThreeWay};
use crate::traits::{DecreaseKeyHeap, Heap, HeapError, InvariantViolation, KeyChange};
use log::debug;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;

/// Reverse index from payload to the array position currently holding it
#[derive(Debug, Clone)]
pub struct PositionIndex<V> {
    positions: FxHashMap<V, usize>,
}

impl<V: Hash + Eq> PositionIndex<V> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Returns the position of `payload`, if it is in the heap
    pub fn get(&self, payload: &V) -> Option<usize> {
        self.positions.get(payload).copied()
    }

    /// Returns the number of indexed payloads
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if no payload is indexed
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl<V: Hash + Eq + Clone> PositionTracker<V> for PositionIndex<V> {
    #[inline]
    fn placed(&mut self, payload: &V, position: usize) {
        // Only a fresh insertion clones the payload
        match self.positions.get_mut(payload) {
            Some(slot) => *slot = position,
            None => {
                self.positions.insert(payload.clone(), position);
            }
        }
    }

    #[inline]
    fn removed(&mut self, payload: &V) {
        self.positions.remove(payload);
    }

    fn clear(&mut self) {
        self.positions.clear();
    }

    fn audit<K>(&self, entries: &[Entry<K, V>]) -> Result<(), InvariantViolation> {
        if self.positions.len() != entries.len() {
            return Err(InvariantViolation::IndexSize {
                indexed: self.positions.len(),
                len: entries.len(),
            });
        }
        for (position, entry) in entries.iter().enumerate() {
            let indexed = self.get(&entry.payload);
            if indexed != Some(position) {
                return Err(InvariantViolation::IndexMismatch { position, indexed });
            }
        }
        Ok(())
    }
}

/// A binary min-heap with O(log n) key updates addressed by payload
///
/// The heap is single-threaded; it provides no internal synchronization.
#[derive(Debug, Clone)]
pub struct IndexedHeap<K, V, O = Natural> {
    heap: ArrayHeap<K, V, O, PositionIndex<V>>,
}

impl<K: Ord, V: Hash + Eq + Clone> IndexedHeap<K, V> {
    /// Creates an empty heap ordered by `K`'s [`Ord`] implementation
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty heap with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_order(capacity, Natural)
    }
}

impl<K, V: Hash + Eq + Clone, F> IndexedHeap<K, V, FnOrder<F>>
where
    F: Fn(&K, &K) -> Ordering,
{
    /// Creates an empty heap ordered by `cmp`, which must be a total order
    pub fn with_comparator(capacity: usize, cmp: F) -> Self {
        Self::with_order(capacity, FnOrder::new(cmp))
    }
}

impl<K, V: Hash + Eq + Clone, F> IndexedHeap<K, V, ThreeWay<F>>
where
    F: Fn(&K, &K) -> i32,
{
    /// Creates an empty heap ordered by a -1/0/1 comparator
    pub fn with_three_way(capacity: usize, cmp: F) -> Self {
        Self::with_order(capacity, ThreeWay::new(cmp))
    }
}

impl<K, V: Hash + Eq + Clone, O: KeyOrder<K>> IndexedHeap<K, V, O> {
    /// Creates an empty heap using `order` to compare keys
    pub fn with_order(capacity: usize, order: O) -> Self {
        Self {
            heap: ArrayHeap::from_parts(capacity, order, PositionIndex::with_capacity(capacity)),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.heap.capacity()
    }

    pub fn order(&self) -> &O {
        self.heap.order()
    }

    /// Returns true if `payload` is currently in the heap
    pub fn contains(&self, payload: &V) -> bool {
        self.index().get(payload).is_some()
    }

    /// Returns the array position of `payload`
    pub fn position_of(&self, payload: &V) -> Option<usize> {
        self.index().get(payload)
    }

    /// Returns the current key of `payload`
    pub fn key_of(&self, payload: &V) -> Option<&K> {
        self.position_of(payload)
            .map(|position| &self.heap.entry_at(position).key)
    }

    /// Returns the reverse index
    pub fn index(&self) -> &PositionIndex<V> {
        self.heap.tracker()
    }

    /// Returns the best entry without removing it
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if the heap holds no entries.
    pub fn peek_min(&self) -> Result<&Entry<K, V>, HeapError> {
        self.heap.peek_min()
    }

    /// Iterates over the entries in array order
    pub fn iter(&self) -> std::slice::Iter<'_, Entry<K, V>> {
        self.heap.iter()
    }

    /// Inserts a new entry
    ///
    /// # Errors
    /// [`HeapError::DuplicatePayload`] if `payload` is already in the heap;
    /// the heap is unchanged.
    pub fn insert(&mut self, key: K, payload: V) -> Result<(), HeapError> {
        if let Some(position) = self.position_of(&payload) {
            debug!("rejected duplicate payload already at position {}", position);
            return Err(HeapError::DuplicatePayload);
        }
        self.heap.insert(key, payload);
        Ok(())
    }

    /// Removes and returns the best entry, dropping it from the index
    ///
    /// # Errors
    /// [`HeapError::EmptyHeap`] if the heap holds no entries.
    pub fn extract_min(&mut self) -> Result<Entry<K, V>, HeapError> {
        self.heap.extract_min()
    }

    /// Gives `payload` a strictly better key and sifts it up
    ///
    /// # Errors
    /// - [`HeapError::NotFound`] if `payload` is not in the heap
    /// - [`HeapError::InvalidKeyChange`] if `new_key` is not strictly better
    ///   than the current key
    ///
    /// The heap and its index are unchanged on error.
    pub fn decrease_key(&mut self, payload: &V, new_key: K) -> Result<(), HeapError> {
        let position = self.locate(payload)?;
        self.heap.update_key_at(position, new_key, KeyChange::Decrease).map(drop)
    }

    /// Gives `payload` a strictly worse key and sifts it down
    ///
    /// # Errors
    /// - [`HeapError::NotFound`] if `payload` is not in the heap
    /// - [`HeapError::InvalidKeyChange`] if `new_key` is not strictly worse
    ///   than the current key
    ///
    /// The heap and its index are unchanged on error.
    pub fn increase_key(&mut self, payload: &V, new_key: K) -> Result<(), HeapError> {
        let position = self.locate(payload)?;
        self.heap.update_key_at(position, new_key, KeyChange::Increase).map(drop)
    }

    /// Sets the key of `payload` in whichever direction `new_key` lies
    ///
    /// A key that compares equal to the current one replaces it without
    /// moving the entry. Returns the previous key.
    ///
    /// # Errors
    /// [`HeapError::NotFound`] if `payload` is not in the heap.
    pub fn change_key(&mut self, payload: &V, new_key: K) -> Result<K, HeapError> {
        let position = self.locate(payload)?;
        let current = &self.heap.entry_at(position).key;
        match self.heap.order().compare(&new_key, current) {
            Ordering::Less => self
                .heap
                .update_key_at(position, new_key, KeyChange::Decrease),
            Ordering::Greater => self
                .heap
                .update_key_at(position, new_key, KeyChange::Increase),
            Ordering::Equal => Ok(self.heap.replace_equal_key_at(position, new_key)),
        }
    }

    /// Removes every entry and clears the index
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Drains the heap into a vector in extraction order
    pub fn into_sorted_vec(self) -> Vec<Entry<K, V>> {
        self.heap.into_sorted_vec()
    }

    /// Checks heap order, that every entry's index slot points back at it,
    /// and that the index holds exactly one slot per entry
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        self.heap.verify()
    }

    fn locate(&self, payload: &V) -> Result<usize, HeapError> {
        self.position_of(payload).ok_or_else(|| {
            debug!("key update for a payload that is not in the heap");
            HeapError::NotFound
        })
    }
}

impl<K: Ord, V: Hash + Eq + Clone> Default for IndexedHeap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Lists payloads in array order, e.g. `[d, b, a, c]`
impl<K, V: fmt::Display, O> fmt::Display for IndexedHeap<K, V, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.heap, f)
    }
}

impl<'a, K, V: Hash + Eq + Clone, O: KeyOrder<K>> IntoIterator for &'a IndexedHeap<K, V, O> {
    type Item = &'a Entry<K, V>;
    type IntoIter = std::slice::Iter<'a, Entry<K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V: Hash + Eq + Clone, O: KeyOrder<K>> Heap<K, V> for IndexedHeap<K, V, O> {
    fn is_empty(&self) -> bool {
        IndexedHeap::is_empty(self)
    }

    fn len(&self) -> usize {
        IndexedHeap::len(self)
    }

    fn push(&mut self, key: K, payload: V) -> Result<(), HeapError> {
        self.insert(key, payload)
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

impl<K, V: Hash + Eq + Clone, O: KeyOrder<K>> DecreaseKeyHeap<K, V> for IndexedHeap<K, V, O> {
    fn decrease_key(&mut self, payload: &V, new_key: K) -> Result<(), HeapError> {
        IndexedHeap::decrease_key(self, payload, new_key)
    }

    fn increase_key(&mut self, payload: &V, new_key: K) -> Result<(), HeapError> {
        IndexedHeap::increase_key(self, payload, new_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_consistent<K, V: Hash + Eq + Clone, O: KeyOrder<K>>(heap: &IndexedHeap<K, V, O>) {
        assert_eq!(heap.verify(), Ok(()));
        assert_eq!(heap.index().len(), heap.len());
        for (position, entry) in heap.iter().enumerate() {
            assert_eq!(heap.position_of(&entry.payload), Some(position));
        }
    }

    #[test]
    fn test_extraction_order() {
        let mut heap = IndexedHeap::new();
        for (key, payload) in [(5, "a"), (3, "b"), (8, "c"), (1, "d")] {
            heap.insert(key, payload).unwrap();
            assert_consistent(&heap);
        }

        let mut extracted = Vec::new();
        while let Ok(entry) = heap.extract_min() {
            assert_consistent(&heap);
            extracted.push((entry.key, entry.payload));
        }
        assert_eq!(extracted, [(1, "d"), (3, "b"), (5, "a"), (8, "c")]);
        assert!(heap.index().is_empty());
    }

    #[test]
    fn test_decrease_key_then_insert() {
        let mut heap = IndexedHeap::new();
        heap.insert(10, "x").unwrap();
        heap.decrease_key(&"x", 2).unwrap();
        heap.insert(5, "y").unwrap();
        assert_eq!(heap.extract_min(), Ok(Entry::new(2, "x")));
    }

    #[test]
    fn test_decrease_key_rejects_worse_key() {
        let mut heap = IndexedHeap::new();
        heap.insert(10, "x").unwrap();
        assert_eq!(
            heap.decrease_key(&"x", 20),
            Err(HeapError::InvalidKeyChange {
                change: KeyChange::Decrease
            })
        );
        assert_eq!(heap.key_of(&"x"), Some(&10));
    }

    #[test]
    fn test_equal_key_is_rejected() {
        let mut heap = IndexedHeap::new();
        heap.insert(7, 'k').unwrap();
        assert!(matches!(
            heap.decrease_key(&'k', 7),
            Err(HeapError::InvalidKeyChange { .. })
        ));
        assert!(matches!(
            heap.increase_key(&'k', 7),
            Err(HeapError::InvalidKeyChange { .. })
        ));
    }

    #[test]
    fn test_duplicate_payload_leaves_heap_unchanged() {
        let mut heap = IndexedHeap::new();
        heap.insert(4, "a").unwrap();
        heap.insert(2, "b").unwrap();
        assert_eq!(heap.insert(1, "a"), Err(HeapError::DuplicatePayload));
        assert_eq!(heap.len(), 2);
        assert_eq!(heap.key_of(&"a"), Some(&4));
        assert_eq!(heap.peek_min(), Ok(&Entry::new(2, "b")));
        assert_consistent(&heap);
    }

    #[test]
    fn test_missing_payload() {
        let mut heap: IndexedHeap<i32, &str> = IndexedHeap::new();
        assert_eq!(heap.decrease_key(&"ghost", 1), Err(HeapError::NotFound));
        assert_eq!(heap.increase_key(&"ghost", 1), Err(HeapError::NotFound));
        assert_eq!(heap.change_key(&"ghost", 1), Err(HeapError::NotFound));

        heap.insert(3, "gone").unwrap();
        heap.extract_min().unwrap();
        assert_eq!(heap.decrease_key(&"gone", 1), Err(HeapError::NotFound));
    }

    #[test]
    fn test_payload_can_be_reinserted_after_extraction() {
        let mut heap = IndexedHeap::new();
        heap.insert(1, 42).unwrap();
        assert_eq!(heap.extract_min(), Ok(Entry::new(1, 42)));
        heap.insert(9, 42).unwrap();
        assert_eq!(heap.key_of(&42), Some(&9));
    }

    #[test]
    fn test_increase_key_sinks_root() {
        let mut heap = IndexedHeap::new();
        for i in 0..31 {
            heap.insert(i, i).unwrap();
        }
        heap.increase_key(&0, 1000).unwrap();
        assert_consistent(&heap);
        assert_eq!(heap.peek_min(), Ok(&Entry::new(1, 1)));

        let sorted = heap.into_sorted_vec();
        assert_eq!(sorted.last(), Some(&Entry::new(1000, 0)));
    }

    #[test]
    fn test_change_key_dispatches() {
        let mut heap = IndexedHeap::new();
        for (key, payload) in [(50, 'a'), (40, 'b'), (30, 'c'), (20, 'd')] {
            heap.insert(key, payload).unwrap();
        }

        assert_eq!(heap.change_key(&'a', 10), Ok(50));
        assert_eq!(heap.peek_min().map(|e| e.payload), Ok('a'));

        assert_eq!(heap.change_key(&'a', 60), Ok(10));
        assert_eq!(heap.peek_min().map(|e| e.payload), Ok('d'));

        let before = heap.to_string();
        assert_eq!(heap.change_key(&'c', 30), Ok(30));
        assert_eq!(heap.to_string(), before);
        assert_consistent(&heap);
    }

    #[test]
    fn test_comparator_heap_tracks_positions() {
        let mut heap = IndexedHeap::with_comparator(8, |a: &i32, b: &i32| b.cmp(a));
        for i in 0..20 {
            heap.insert(i, format!("n{}", i)).unwrap();
        }
        assert_consistent(&heap);
        assert_eq!(heap.peek_min().map(|e| e.key), Ok(19));

        // "better" is larger here, so decreasing means raising the number
        heap.decrease_key(&"n3".to_string(), 100).unwrap();
        assert_eq!(heap.peek_min().map(|e| e.payload.as_str()), Ok("n3"));
        assert!(heap.decrease_key(&"n4".to_string(), 1).is_err());
        assert_consistent(&heap);
    }

    #[test]
    fn test_three_way_heap() {
        let mut heap = IndexedHeap::with_three_way(0, |a: &u32, b: &u32| {
            if a < b {
                -1
            } else if a > b {
                1
            } else {
                0
            }
        });
        heap.insert(3, "c").unwrap();
        heap.insert(1, "a").unwrap();
        heap.insert(2, "b").unwrap();
        heap.increase_key(&"a", 9).unwrap();
        let order: Vec<_> = heap.into_sorted_vec().into_iter().map(|e| e.payload).collect();
        assert_eq!(order, ["b", "c", "a"]);
    }

    #[test]
    fn test_clear_resets_index() {
        let mut heap = IndexedHeap::with_capacity(4);
        for i in 0..10u8 {
            heap.insert(i, i).unwrap();
        }
        heap.clear();
        assert!(heap.is_empty());
        assert!(heap.index().is_empty());
        assert!(!heap.contains(&3));
        heap.insert(1, 3).unwrap();
        assert_consistent(&heap);
    }

    #[test]
    fn test_display_lists_array_order() {
        let mut heap = IndexedHeap::new();
        for (key, payload) in [(5, "a"), (3, "b"), (8, "c"), (1, "d")] {
            heap.insert(key, payload).unwrap();
        }
        assert_eq!(heap.to_string(), "[d, b, c, a]");
    }
}
