//! Reordering - In-place restructuring and the copying views built on it.
//!
//! In-place operations rewrite the entry order directly in the store and
//! emit no events. The exception is [`push`](OrderedEventMap::push), which
//! is a sequence of `set` calls and notifies accordingly.
//!
//! Operations that can produce duplicate keys (`copy_within`, `splice`,
//! `unshift`) compute the new pair sequence and replay it into empty
//! storage: a repeated key keeps its first position and its last value.

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;

use tracing::debug;

use crate::error::Result;
use crate::map::OrderedEventMap;
use crate::position::{resolve, resolve_exact, resolve_range};
use crate::store::{Entry, EntryStore};

impl<K: Hash + Eq + Clone, V> OrderedEventMap<K, V> {
    // ========================================================================
    // Order
    // ========================================================================

    /// Reverse iteration order in place.
    pub fn reverse(&mut self) -> &mut Self {
        self.store.reverse();
        self
    }

    /// Stable sort by the default comparator.
    ///
    /// Entries compare by the text `"{key},{value}"` as UTF-16 code units,
    /// which is how a two-element array stringifies and compares under a
    /// default array sort. `10` therefore sorts before `9`, and characters
    /// above U+FFFF (surrogate pairs) sort before U+E000..=U+FFFF.
    pub fn sort(&mut self) -> &mut Self
    where
        K: fmt::Display,
        V: fmt::Display,
    {
        self.store
            .sort_by_cached_key(|e| format!("{},{}", e.key, e.value).encode_utf16().collect::<Vec<u16>>());
        self
    }

    /// Stable sort by a comparator over `(key, value)` pairs.
    pub fn sort_by<F>(&mut self, mut compare: F) -> &mut Self
    where
        F: FnMut((&K, &V), (&K, &V)) -> Ordering,
    {
        self.store
            .sort_by(|a, b| compare((&a.key, &a.value), (&b.key, &b.value)));
        self
    }

    // ========================================================================
    // Overwrites
    // ========================================================================

    /// Copy the entries in `start..end` over the entries starting at `target`.
    ///
    /// Indices are relative (negative counts from the end) and clamped; the
    /// copied run is truncated at the end of the map. The source range is
    /// read before anything is written, so overlapping ranges are safe.
    ///
    /// The copied entries carry their keys, so the result is replayed with
    /// set semantics and may hold fewer entries than before.
    pub fn copy_within(&mut self, target: isize, start: isize, end: Option<isize>) -> &mut Self
    where
        V: Clone,
    {
        let len = self.len();
        let to = resolve(target, len);
        let source = resolve_range(start, end, len);
        let count = source.len().min(len - to);
        if count == 0 {
            return self;
        }

        let mut entries = self.store.take_entries();
        let copied: Vec<Entry<K, V>> = entries[source.start..source.start + count].to_vec();
        for (slot, entry) in entries[to..to + count].iter_mut().zip(copied) {
            *slot = entry;
        }
        self.store.rebuild(entries);

        debug!(operation = "copy_within", before = len, after = self.len(), "entries rebuilt");
        self
    }

    /// Overwrite the values in `start..end` with clones of `value`. Keys stay.
    pub fn fill(&mut self, value: V, start: isize, end: Option<isize>) -> &mut Self
    where
        V: Clone,
    {
        for pos in resolve_range(start, end, self.len()) {
            if let Some(slot) = self.store.value_mut(pos) {
                *slot = value.clone();
            }
        }
        self
    }

    // ========================================================================
    // Splicing
    // ========================================================================

    /// Remove `delete_count` entries at `start` and insert `items` there.
    ///
    /// `start` is relative and clamped. `None` for `delete_count` removes
    /// everything from `start` onward.
    ///
    /// # Returns
    /// A new map with exactly the removed entries, in their original order
    pub fn splice<I>(&mut self, start: isize, delete_count: Option<usize>, items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let len = self.len();
        let from = resolve(start, len);
        let count = delete_count.map_or(len - from, |n| n.min(len - from));

        let mut entries = self.store.take_entries();
        let removed: EntryStore<K, V> = {
            let mut store = EntryStore::with_capacity(count);
            let drained = entries.splice(from..from + count, items.into_iter().map(Entry::from));
            for entry in drained {
                store.insert(entry.key, entry.value);
            }
            store
        };
        self.store.rebuild(entries);

        debug!(
            operation = "splice",
            before = len,
            removed = removed.len(),
            after = self.len(),
            "entries rebuilt"
        );
        Self::from_store(removed)
    }

    /// Insert `items` at the front.
    ///
    /// An item whose key already exists takes the front position, but the
    /// existing (later) value wins.
    ///
    /// # Returns
    /// The resulting size
    pub fn unshift<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let before = self.len();
        let existing = self.store.take_entries();
        self.store
            .rebuild(items.into_iter().map(Entry::from).chain(existing));

        debug!(operation = "unshift", before, after = self.len(), "entries rebuilt");
        self.len()
    }

    /// Append `items` with `set`, emitting one `Set` event per item.
    ///
    /// Stops at the first listener failure; items after it are not added.
    ///
    /// # Returns
    /// The resulting size
    pub fn push<I>(&mut self, items: I) -> Result<usize>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in items {
            self.set(key, value)?;
        }
        Ok(self.len())
    }

    /// Remove and return the last value.
    ///
    /// Removal by position emits no `Delete` event; use `delete` to notify.
    pub fn pop(&mut self) -> Option<V> {
        self.store.pop_back().map(|e| e.value)
    }

    /// Remove and return the first value.
    ///
    /// Like [`pop`](Self::pop), this is silent: no `Delete` event is emitted.
    pub fn shift(&mut self) -> Option<V> {
        self.store.pop_front().map(|e| e.value)
    }

    // ========================================================================
    // Copying Views
    // ========================================================================

    /// A new map over `start..end` (relative, clamped).
    pub fn slice(&self, start: isize, end: Option<isize>) -> Self
    where
        V: Clone,
    {
        let range = resolve_range(start, end, self.len());
        let mut store = EntryStore::with_capacity(range.len());
        for e in &self.store.entries()[range] {
            store.insert(e.key.clone(), e.value.clone());
        }
        Self::from_store(store)
    }

    pub fn to_reversed(&self) -> Self
    where
        V: Clone,
    {
        let mut copy = self.clone();
        copy.reverse();
        copy
    }

    pub fn to_sorted(&self) -> Self
    where
        K: fmt::Display,
        V: Clone + fmt::Display,
    {
        let mut copy = self.clone();
        copy.sort();
        copy
    }

    pub fn to_sorted_by<F>(&self, compare: F) -> Self
    where
        V: Clone,
        F: FnMut((&K, &V), (&K, &V)) -> Ordering,
    {
        let mut copy = self.clone();
        copy.sort_by(compare);
        copy
    }

    /// What [`splice`](Self::splice) would leave behind, without touching `self`.
    pub fn to_spliced<I>(&self, start: isize, delete_count: Option<usize>, items: I) -> Self
    where
        V: Clone,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut copy = self.clone();
        copy.splice(start, delete_count, items);
        copy
    }

    /// A copy with the value at `index` replaced.
    ///
    /// An out-of-range `index` yields an unmodified copy.
    pub fn with(&self, index: isize, value: V) -> Self
    where
        V: Clone,
    {
        let mut copy = self.clone();
        if let Some(slot) = resolve_exact(index, copy.len()).and_then(|pos| copy.store.value_mut(pos)) {
            *slot = value;
        }
        copy
    }

    /// A new map holding this map's entries followed by each of `others`,
    /// as if every pair had been `set` in turn.
    ///
    /// The result starts without listeners, so the replay notifies no one.
    pub fn concat<'a, I>(&self, others: I) -> Self
    where
        K: 'a,
        V: Clone + 'a,
        I: IntoIterator<Item = &'a OrderedEventMap<K, V>>,
    {
        let mut result = self.clone();
        for other in others {
            for e in other.store.entries() {
                result.store.insert(e.key.clone(), e.value.clone());
            }
        }
        result
    }
}
