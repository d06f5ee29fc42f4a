//! Entry Store - The canonical ordered entry sequence plus its key index.
//!
//! Entries live in a `Vec` whose order *is* the iteration order. A
//! `FxHashMap` from key to position gives O(1) key lookup and is kept in
//! sync on every structural change.

use std::borrow::Borrow;
use std::hash::Hash;

use rustc_hash::FxHashMap;

/// Mapping from key to position in the entry vector
pub type KeyIndex<K> = FxHashMap<K, usize>;

/// A single key/value pair at a position in the map.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Entry<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> Entry<K, V> {
    #[inline]
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    /// Split the entry back into a `(key, value)` tuple.
    #[inline]
    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K, V> From<(K, V)> for Entry<K, V> {
    #[inline]
    fn from((key, value): (K, V)) -> Self {
        Self { key, value }
    }
}

/// Ordered entries with O(1) key lookup.
///
/// The store knows nothing about events. Every method is a raw storage
/// primitive; notification is layered on top by the map.
#[derive(Clone)]
pub struct EntryStore<K, V> {
    /// Entries in iteration order
    entries: Vec<Entry<K, V>>,
    /// Key lookup: key -> position in `entries`
    index: KeyIndex<K>,
}

impl<K: Hash + Eq + Clone, V> EntryStore<K, V> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Create a store with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of `key` in iteration order.
    #[inline]
    pub fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).copied()
    }

    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let pos = self.position(key)?;
        Some(&self.entries[pos].value)
    }

    /// Entry at an absolute position.
    #[inline]
    pub fn entry(&self, pos: usize) -> Option<&Entry<K, V>> {
        self.entries.get(pos)
    }

    /// Value at an absolute position. Keys are never handed out mutably.
    #[inline]
    pub(crate) fn value_mut(&mut self, pos: usize) -> Option<&mut V> {
        self.entries.get_mut(pos).map(|e| &mut e.value)
    }

    /// All entries in iteration order
    #[inline]
    pub fn entries(&self) -> &[Entry<K, V>] {
        &self.entries
    }

    // ========================================================================
    // Single-Entry Mutation
    // ========================================================================

    /// Insert or update.
    ///
    /// A new key is appended at the end. An existing key keeps its
    /// position and only its value is replaced.
    ///
    /// # Returns
    /// The previous value, if the key already existed
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&pos) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[pos].value, value));
        }

        self.index.insert(key.clone(), self.entries.len());
        self.entries.push(Entry::new(key, value));
        None
    }

    /// Remove a key, shifting every later entry one position forward.
    ///
    /// # Complexity
    /// O(n) in the number of entries after the removed one
    pub fn shift_remove<Q>(&mut self, key: &Q) -> Option<Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let pos = self.index.remove(key)?;
        let entry = self.entries.remove(pos);
        self.reindex_from(pos);
        Some(entry)
    }

    /// Remove the last entry.
    ///
    /// # Complexity
    /// O(1)
    pub fn pop_back(&mut self) -> Option<Entry<K, V>> {
        let entry = self.entries.pop()?;
        self.index.remove(&entry.key);
        Some(entry)
    }

    /// Remove the first entry.
    ///
    /// # Complexity
    /// O(n) - every remaining position shifts down by one
    pub fn pop_front(&mut self) -> Option<Entry<K, V>> {
        if self.entries.is_empty() {
            return None;
        }
        let entry = self.entries.remove(0);
        self.index.remove(&entry.key);
        self.reindex_from(0);
        Some(entry)
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    // ========================================================================
    // Bulk Reordering
    // ========================================================================

    /// Reverse iteration order.
    pub fn reverse(&mut self) {
        self.entries.reverse();
        self.reindex_from(0);
    }

    /// Stable sort by a comparator over entries.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&Entry<K, V>, &Entry<K, V>) -> std::cmp::Ordering,
    {
        self.entries.sort_by(|a, b| compare(a, b));
        self.reindex_from(0);
    }

    /// Stable sort by a derived key, computing it once per entry.
    pub fn sort_by_cached_key<T, F>(&mut self, f: F)
    where
        T: Ord,
        F: FnMut(&Entry<K, V>) -> T,
    {
        self.entries.sort_by_cached_key(f);
        self.reindex_from(0);
    }

    /// Move all entries out, leaving the store empty.
    pub(crate) fn take_entries(&mut self) -> Vec<Entry<K, V>> {
        self.index.clear();
        std::mem::take(&mut self.entries)
    }

    /// Replace the contents with `entries`, replayed with insert semantics.
    ///
    /// A key that occurs more than once keeps the position of its first
    /// occurrence and the value of its last one.
    pub(crate) fn rebuild<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = Entry<K, V>>,
    {
        self.clear();
        for entry in entries {
            self.insert(entry.key, entry.value);
        }
    }

    /// Consume the store, yielding entries in iteration order.
    pub fn into_entries(self) -> Vec<Entry<K, V>> {
        self.entries
    }

    // ========================================================================
    // Index Maintenance
    // ========================================================================

    /// Rewrite index slots for every entry at or after `start`.
    fn reindex_from(&mut self, start: usize) {
        for (offset, entry) in self.entries[start..].iter().enumerate() {
            if let Some(slot) = self.index.get_mut(&entry.key) {
                *slot = start + offset;
            }
        }
        debug_assert_eq!(self.index.len(), self.entries.len(), "Key index out of sync");
    }
}

impl<K: Hash + Eq + Clone, V> Default for EntryStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> std::fmt::Debug for EntryStore<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryStore")
            .field("len", &self.entries.len())
            .field("indexed", &self.index.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_of(pairs: &[(&'static str, i32)]) -> EntryStore<&'static str, i32> {
        let mut store = EntryStore::new();
        for &(k, v) in pairs {
            store.insert(k, v);
        }
        store
    }

    fn keys(store: &EntryStore<&'static str, i32>) -> Vec<&'static str> {
        store.entries().iter().map(|e| e.key).collect()
    }

    fn assert_index_consistent(store: &EntryStore<&'static str, i32>) {
        for (pos, entry) in store.entries().iter().enumerate() {
            assert_eq!(store.position(entry.key), Some(pos), "stale slot for {}", entry.key);
        }
    }

    #[test]
    fn test_empty_store() {
        let store: EntryStore<&str, i32> = EntryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert_eq!(store.get("a"), None);
        assert!(store.entry(0).is_none());
    }

    #[test]
    fn test_insert_appends_in_order() {
        let store = store_of(&[("a", 1), ("b", 2), ("c", 3)]);

        assert_eq!(keys(&store), vec!["a", "b", "c"]);
        assert_eq!(store.position("c"), Some(2));
        assert_index_consistent(&store);
    }

    #[test]
    fn test_insert_existing_keeps_position() {
        let mut store = store_of(&[("a", 1), ("b", 2), ("c", 3)]);

        let previous = store.insert("a", 10);

        assert_eq!(previous, Some(1));
        assert_eq!(keys(&store), vec!["a", "b", "c"]);
        assert_eq!(store.get("a"), Some(&10));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_shift_remove_middle() {
        let mut store = store_of(&[("a", 1), ("b", 2), ("c", 3), ("d", 4)]);

        let removed = store.shift_remove("b");

        assert_eq!(removed, Some(Entry::new("b", 2)));
        assert_eq!(keys(&store), vec!["a", "c", "d"]);
        assert_index_consistent(&store);
    }

    #[test]
    fn test_shift_remove_missing() {
        let mut store = store_of(&[("a", 1)]);
        assert!(store.shift_remove("zzz").is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_pop_back_and_front() {
        let mut store = store_of(&[("a", 1), ("b", 2), ("c", 3)]);

        assert_eq!(store.pop_back().map(Entry::into_pair), Some(("c", 3)));
        assert_eq!(store.pop_front().map(Entry::into_pair), Some(("a", 1)));
        assert_eq!(keys(&store), vec!["b"]);
        assert_eq!(store.position("b"), Some(0));

        store.pop_back();
        assert!(store.pop_back().is_none());
        assert!(store.pop_front().is_none());
    }

    #[test]
    fn test_reverse_reindexes() {
        let mut store = store_of(&[("a", 1), ("b", 2), ("c", 3)]);

        store.reverse();

        assert_eq!(keys(&store), vec!["c", "b", "a"]);
        assert_index_consistent(&store);
    }

    #[test]
    fn test_sort_by_is_stable() {
        let mut store = store_of(&[("a", 2), ("b", 1), ("c", 2), ("d", 1)]);

        store.sort_by(|x, y| x.value.cmp(&y.value));

        assert_eq!(keys(&store), vec!["b", "d", "a", "c"]);
        assert_index_consistent(&store);
    }

    #[test]
    fn test_rebuild_first_position_last_value() {
        let mut store = store_of(&[("x", 0)]);

        store.rebuild(vec![
            Entry::new("a", 1),
            Entry::new("b", 2),
            Entry::new("a", 3),
        ]);

        assert_eq!(keys(&store), vec!["a", "b"]);
        assert_eq!(store.get("a"), Some(&3));
        assert_eq!(store.get("x"), None);
        assert_index_consistent(&store);
    }

    #[test]
    fn test_take_entries_empties_store() {
        let mut store = store_of(&[("a", 1), ("b", 2)]);

        let taken = store.take_entries();

        assert_eq!(taken.len(), 2);
        assert!(store.is_empty());
        assert!(!store.contains_key("a"));
    }

    #[test]
    fn test_clear() {
        let mut store = store_of(&[("a", 1), ("b", 2)]);
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.position("a"), None);
    }
}
