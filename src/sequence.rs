//! Sequence view - Array-style reads over the map's entries.
//!
//! Positions, searches, transformations and folds treat the map as the
//! virtual array of its values (callbacks also get the key). None of
//! these mutate the receiver or emit events.
//!
//! "Not found" is `None` where an array API would answer `-1`.

use std::fmt;
use std::hash::Hash;

use crate::flat::Flatten;
use crate::map::OrderedEventMap;
use crate::position::{resolve, resolve_exact};
use crate::store::EntryStore;

impl<K: Hash + Eq + Clone, V> OrderedEventMap<K, V> {
    // ========================================================================
    // Index-Based Access
    // ========================================================================

    /// Value at `index`; negative indices count from the end (`-1` is last).
    #[inline]
    pub fn at(&self, index: isize) -> Option<&V> {
        self.entry_at(index).map(|(_, v)| v)
    }

    /// Key and value at `index`, with the same indexing rules as [`at`](Self::at).
    #[inline]
    pub fn entry_at(&self, index: isize) -> Option<(&K, &V)> {
        let pos = resolve_exact(index, self.len())?;
        self.store.entry(pos).map(|e| (&e.key, &e.value))
    }

    /// First position at or after `from_index` whose value equals `value`.
    ///
    /// A negative `from_index` counts from the end.
    pub fn index_of(&self, value: &V, from_index: isize) -> Option<usize>
    where
        V: PartialEq,
    {
        let from = resolve(from_index, self.len());
        self.store.entries()[from..]
            .iter()
            .position(|e| e.value == *value)
            .map(|offset| from + offset)
    }

    /// Last position at or before `from_index` whose value equals `value`.
    ///
    /// `None` for `from_index` starts at the last entry.
    pub fn last_index_of(&self, value: &V, from_index: Option<isize>) -> Option<usize>
    where
        V: PartialEq,
    {
        let len = self.len();
        let last = len.checked_sub(1)?;
        let from = match from_index {
            None => last,
            Some(i) if i >= 0 => (i as usize).min(last),
            Some(i) => len.checked_sub(i.unsigned_abs())?,
        };
        self.store.entries()[..=from].iter().rposition(|e| e.value == *value)
    }

    /// First position whose `(value, key)` satisfies `predicate`.
    pub fn find_index<F>(&self, mut predicate: F) -> Option<usize>
    where
        F: FnMut(&V, &K) -> bool,
    {
        self.store.entries().iter().position(|e| predicate(&e.value, &e.key))
    }

    /// Last position whose `(value, key)` satisfies `predicate`.
    pub fn find_last_index<F>(&self, mut predicate: F) -> Option<usize>
    where
        F: FnMut(&V, &K) -> bool,
    {
        self.store.entries().iter().rposition(|e| predicate(&e.value, &e.key))
    }

    // ========================================================================
    // Search & Predicates
    // ========================================================================

    pub fn find<F>(&self, mut predicate: F) -> Option<&V>
    where
        F: FnMut(&V, &K) -> bool,
    {
        self.store
            .entries()
            .iter()
            .find(|e| predicate(&e.value, &e.key))
            .map(|e| &e.value)
    }

    pub fn find_last<F>(&self, mut predicate: F) -> Option<&V>
    where
        F: FnMut(&V, &K) -> bool,
    {
        self.store
            .entries()
            .iter()
            .rev()
            .find(|e| predicate(&e.value, &e.key))
            .map(|e| &e.value)
    }

    /// `true` if every entry passes; `true` for an empty map.
    pub fn every<F>(&self, mut predicate: F) -> bool
    where
        F: FnMut(&V, &K) -> bool,
    {
        self.store.entries().iter().all(|e| predicate(&e.value, &e.key))
    }

    /// `true` if any entry passes; `false` for an empty map.
    pub fn some<F>(&self, mut predicate: F) -> bool
    where
        F: FnMut(&V, &K) -> bool,
    {
        self.store.entries().iter().any(|e| predicate(&e.value, &e.key))
    }

    /// Key membership.
    ///
    /// Unlike an array's `includes`, this tests keys, not values. Use
    /// [`index_of`](Self::index_of) to test for a value.
    #[inline]
    pub fn includes<Q>(&self, key: &Q) -> bool
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.has(key)
    }

    // ========================================================================
    // Transformation
    // ========================================================================

    /// One result per entry, in order.
    pub fn map<T, F>(&self, mut f: F) -> Vec<T>
    where
        F: FnMut(&V, &K) -> T,
    {
        self.store.entries().iter().map(|e| f(&e.value, &e.key)).collect()
    }

    /// A new map with only the entries that pass, keys and order kept.
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        V: Clone,
        F: FnMut(&V, &K) -> bool,
    {
        let mut store = EntryStore::new();
        for e in self.store.entries() {
            if predicate(&e.value, &e.key) {
                store.insert(e.key.clone(), e.value.clone());
            }
        }
        Self::from_store(store)
    }

    /// Values flattened `depth` levels deep. Keys are discarded.
    pub fn flat(&self, depth: usize) -> Vec<V>
    where
        V: Flatten + Clone,
    {
        let mut out = Vec::with_capacity(self.len());
        for value in self.values() {
            value.flatten_into(depth, &mut out);
        }
        out
    }

    /// Map each entry to zero or more results and concatenate them.
    pub fn flat_map<I, F>(&self, mut f: F) -> Vec<I::Item>
    where
        I: IntoIterator,
        F: FnMut(&V, &K) -> I,
    {
        self.store.entries().iter().flat_map(|e| f(&e.value, &e.key)).collect()
    }

    /// Left-to-right fold over `(accumulator, value, key)`.
    pub fn reduce<A, F>(&self, initial: A, mut f: F) -> A
    where
        F: FnMut(A, &V, &K) -> A,
    {
        self.store.entries().iter().fold(initial, |acc, e| f(acc, &e.value, &e.key))
    }

    /// Right-to-left fold over `(accumulator, value, key)`.
    pub fn reduce_right<A, F>(&self, initial: A, mut f: F) -> A
    where
        F: FnMut(A, &V, &K) -> A,
    {
        self.store.entries().iter().rfold(initial, |acc, e| f(acc, &e.value, &e.key))
    }

    // ========================================================================
    // String Forms
    // ========================================================================

    /// Values rendered with `Display`, separated by `separator`.
    pub fn join(&self, separator: &str) -> String
    where
        V: fmt::Display,
    {
        let mut out = String::new();
        for (i, value) in self.values().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            out.push_str(&value.to_string());
        }
        out
    }

    /// Comma-joined values. There is no locale support, so this is the
    /// same text as `to_string()`.
    pub fn to_locale_string(&self) -> String
    where
        V: fmt::Display,
    {
        self.join(",")
    }
}

/// Comma-joined values, like an array's `toString`.
impl<K: Hash + Eq + Clone, V: fmt::Display> fmt::Display for OrderedEventMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(","))
    }
}
