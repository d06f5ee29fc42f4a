//! OrderedEventMap - The observable, insertion-ordered map.
//!
//! Wraps an [`EntryStore`] with an [`Emitter`]. `set` and `delete` notify
//! listeners *before* they touch storage; everything else goes straight
//! to the store.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use crate::emitter::Emitter;
use crate::error::{ListenerError, Result};
use crate::event::{EventKind, ListenerId, MapEvent};
use crate::store::{Entry, EntryStore};

/// An insertion-ordered map that can be addressed like an array and
/// observed for `set`/`delete` events.
///
/// Re-setting an existing key updates its value in place; the key keeps
/// its original position.
///
/// Derived containers (`filter`, `slice`, `clone`, ...) own a copy of the
/// entries and start with no listeners. Store `Rc`/`Arc` values to share
/// them instead of copying.
pub struct OrderedEventMap<K, V> {
    /// Canonical entry order plus key index
    pub(crate) store: EntryStore<K, V>,
    /// Listener registry
    pub(crate) emitter: Emitter<K, V>,
}

impl<K: Hash + Eq + Clone, V> OrderedEventMap<K, V> {
    /// Create an empty map
    pub fn new() -> Self {
        Self {
            store: EntryStore::new(),
            emitter: Emitter::new(),
        }
    }

    /// Create an empty map with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            store: EntryStore::with_capacity(capacity),
            emitter: Emitter::new(),
        }
    }

    /// Build a map from pairs, before any listener can be attached.
    ///
    /// Duplicate keys keep the first position and the last value.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = Self::new();
        map.store.rebuild(pairs.into_iter().map(Entry::from));
        map
    }

    pub(crate) fn from_store(store: EntryStore<K, V>) -> Self {
        Self {
            store,
            emitter: Emitter::new(),
        }
    }

    // ========================================================================
    // Subscription
    // ========================================================================

    /// Register a listener for every `kind` event.
    ///
    /// Listeners run synchronously, in registration order, before the
    /// mutation is committed. They cannot reach the map itself.
    pub fn on<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&MapEvent<'_, K, V>) -> std::result::Result<(), ListenerError> + 'static,
    {
        self.emitter.on(kind, listener)
    }

    /// Register a listener for the next `kind` event only.
    pub fn once<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&MapEvent<'_, K, V>) -> std::result::Result<(), ListenerError> + 'static,
    {
        self.emitter.once(kind, listener)
    }

    /// Unregister a listener. Returns `false` if it was not registered.
    pub fn off(&mut self, id: ListenerId) -> bool {
        self.emitter.off(id)
    }

    pub fn remove_all_listeners(&mut self, kind: EventKind) -> usize {
        self.emitter.remove_all(kind)
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.emitter.listener_count(kind)
    }

    // ========================================================================
    // Core Mutation
    // ========================================================================

    /// Insert or update `key`.
    ///
    /// Emits [`MapEvent::Set`] first, then writes. The write happens even
    /// if a listener fails; the failure is returned afterwards.
    ///
    /// # Returns
    /// `self` for chaining
    pub fn set(&mut self, key: K, value: V) -> Result<&mut Self> {
        let delivered = self.emitter.emit(&MapEvent::Set {
            key: &key,
            value: &value,
        });
        self.store.insert(key, value);
        delivered?;
        Ok(self)
    }

    /// Remove `key`.
    ///
    /// Emits [`MapEvent::Delete`] with the current value (or `None`) first,
    /// whether or not the key exists, then removes it.
    ///
    /// # Returns
    /// `true` if an entry was removed
    pub fn delete(&mut self, key: &K) -> Result<bool> {
        let delivered = self.emitter.emit(&MapEvent::Delete {
            key,
            previous: self.store.get(key),
        });
        let removed = self.store.shift_remove(key).is_some();
        delivered?;
        Ok(removed)
    }

    /// Remove every entry. Emits nothing.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    // ========================================================================
    // Key Access
    // ========================================================================

    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.get(key)
    }

    #[inline]
    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.contains_key(key)
    }

    /// Position of `key` in iteration order
    #[inline]
    pub fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.position(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Alias of [`len`](Self::len)
    #[inline]
    pub fn size(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

// ============================================================================
// Iteration
// ============================================================================

/// Borrowing iterator over `(key, value)` in map order.
pub struct Iter<'a, K, V> {
    inner: std::slice::Iter<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| (&e.key, &e.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|e| (&e.key, &e.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K: Hash + Eq + Clone, V> OrderedEventMap<K, V> {
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.store.entries().iter(),
        }
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator + '_ {
        self.store.entries().iter().map(|e| &e.key)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator + '_ {
        self.store.entries().iter().map(|e| &e.value)
    }

    /// Entries in iteration order
    pub fn entries(&self) -> &[Entry<K, V>] {
        self.store.entries()
    }
}

impl<'a, K: Hash + Eq + Clone, V> IntoIterator for &'a OrderedEventMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Hash + Eq + Clone, V> IntoIterator for OrderedEventMap<K, V> {
    type Item = (K, V);
    type IntoIter = std::iter::Map<std::vec::IntoIter<Entry<K, V>>, fn(Entry<K, V>) -> (K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.store.into_entries().into_iter().map(Entry::into_pair as fn(_) -> _)
    }
}

// ============================================================================
// Construction & Standard Traits
// ============================================================================

impl<K: Hash + Eq + Clone, V> FromIterator<(K, V)> for OrderedEventMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl<K: Hash + Eq + Clone, V, const N: usize> From<[(K, V); N]> for OrderedEventMap<K, V> {
    fn from(pairs: [(K, V); N]) -> Self {
        Self::from_pairs(pairs)
    }
}

impl<K: Hash + Eq + Clone, V> Default for OrderedEventMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies the entries; listeners are not carried over.
impl<K: Hash + Eq + Clone, V: Clone> Clone for OrderedEventMap<K, V> {
    fn clone(&self) -> Self {
        Self::from_store(self.store.clone())
    }
}

/// Equal when both hold the same entries in the same order.
impl<K: Hash + Eq + Clone, V: PartialEq> PartialEq for OrderedEventMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.store.entries() == other.store.entries()
    }
}

impl<K: Hash + Eq + Clone, V: Eq> Eq for OrderedEventMap<K, V> {}

impl<K: Hash + Eq + Clone + fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedEventMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn abc() -> OrderedEventMap<&'static str, i32> {
        OrderedEventMap::from([("a", 1), ("b", 2), ("c", 3)])
    }

    #[test]
    fn test_empty_map() {
        let map: OrderedEventMap<String, i32> = OrderedEventMap::new();
        assert!(map.is_empty());
        assert_eq!(map.size(), 0);
        assert_eq!(map.get("x"), None);
        assert!(!map.has("x"));
    }

    #[test]
    fn test_set_preserves_insertion_order() {
        let mut map = OrderedEventMap::new();
        map.set("b", 2).unwrap().set("a", 1).unwrap().set("c", 3).unwrap();

        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_reset_keeps_position() {
        let mut map = abc();
        map.set("a", 10).unwrap();

        assert_eq!(map.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(), vec![("a", 10), ("b", 2), ("c", 3)]);
        assert_eq!(map.position("a"), Some(0));
    }

    #[test]
    fn test_delete_present_and_absent() {
        let mut map = abc();

        assert!(map.delete(&"b").unwrap());
        assert!(!map.delete(&"b").unwrap());
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(map.position("c"), Some(1));
    }

    #[test]
    fn test_clear_idempotent() {
        let mut map = abc();
        map.clear();
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.iter().count(), 0);
    }

    #[test]
    fn test_set_event_carries_new_pair() {
        let mut map = abc();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        map.on(EventKind::Set, move |event| {
            sink.borrow_mut().push((*event.key(), event.value().copied()));
            Ok(())
        });

        map.set("d", 4).unwrap();

        assert_eq!(*RefCell::borrow(&seen), vec![("d", Some(4))]);
        assert_eq!(map.get("d"), Some(&4));
    }

    #[test]
    fn test_listener_failure_still_commits() {
        let mut map = abc();
        map.on(EventKind::Delete, |_| Err("rejected".into()));

        let err = map.delete(&"a").unwrap_err();

        assert!(err.is_listener_error());
        assert!(!map.has("a"), "delete must commit despite listener failure");
    }

    #[test]
    fn test_clone_drops_listeners() {
        let mut map = abc();
        map.on(EventKind::Set, |_| Ok(()));

        let copy = map.clone();

        assert_eq!(copy, map);
        assert_eq!(copy.listener_count(EventKind::Set), 0);
        assert_eq!(map.listener_count(EventKind::Set), 1);
    }

    #[test]
    fn test_from_pairs_duplicates() {
        let map = OrderedEventMap::from_pairs(vec![("a", 1), ("b", 2), ("a", 3)]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some(&3));
        assert_eq!(map.position("a"), Some(0));
    }

    #[test]
    fn test_owned_and_reverse_iteration() {
        let map = abc();
        assert_eq!(map.values().rev().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
        assert_eq!(map.iter().len(), 3);

        let pairs: Vec<(&str, i32)> = map.into_iter().collect();
        assert_eq!(pairs, vec![("a", 1), ("b", 2), ("c", 3)]);
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", abc()), r#"{"a": 1, "b": 2, "c": 3}"#);
    }
}
