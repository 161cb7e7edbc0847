//! Helpers shared by the integration tests

#![allow(dead_code)]

use indexed_heaps::binary::ArrayHeap;
use indexed_heaps::indexed::IndexedHeap;
use indexed_heaps::order::KeyOrder;
use std::hash::Hash;

/// Routes `log` output through env_logger; safe to call from every test
pub fn init_test() {
    drop(env_logger::try_init());
}

/// Panics unless heap order holds and every payload's index slot points at it
pub fn assert_indexed_consistent<K, V, O>(heap: &IndexedHeap<K, V, O>)
where
    V: Hash + Eq + Clone + std::fmt::Debug,
    O: KeyOrder<K>,
{
    if let Err(violation) = heap.verify() {
        panic!("{}", violation);
    }
    assert_eq!(heap.index().len(), heap.len());
    for (position, entry) in heap.iter().enumerate() {
        assert_eq!(
            heap.position_of(&entry.payload),
            Some(position),
            "payload {:?} indexed at the wrong position",
            entry.payload
        );
    }
}

/// Panics unless heap order holds
pub fn assert_heap_order<K, V, O: KeyOrder<K>>(heap: &ArrayHeap<K, V, O>) {
    if let Err(violation) = heap.verify() {
        panic!("{}", violation);
    }
}
