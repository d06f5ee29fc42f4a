//! Event types for the map's notification channel.
//!
//! Mutations describe themselves as a [`MapEvent`] before they are
//! applied. Listeners are keyed by [`EventKind`].

use std::fmt;

/// The two observable mutation kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EventKind {
    /// A key/value pair is about to be written (insert or update)
    Set = 0,
    /// A key is about to be removed (whether or not it exists)
    Delete = 1,
}

impl EventKind {
    /// Both kinds, in slot order
    pub const ALL: [EventKind; 2] = [EventKind::Set, EventKind::Delete];

    /// Event name as used by conventional emitters
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            EventKind::Set => "set",
            EventKind::Delete => "delete",
        }
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload delivered to listeners.
///
/// Borrows from the map: the value in `Set` is the one about to be
/// committed, and `previous` in `Delete` is looked up before removal.
#[derive(Debug)]
pub enum MapEvent<'a, K, V> {
    /// Fired before `key` is written with `value`
    Set { key: &'a K, value: &'a V },
    /// Fired before `key` is removed; `previous` is `None` for an absent key
    Delete { key: &'a K, previous: Option<&'a V> },
}

impl<'a, K, V> MapEvent<'a, K, V> {
    #[inline]
    pub fn kind(&self) -> EventKind {
        match self {
            MapEvent::Set { .. } => EventKind::Set,
            MapEvent::Delete { .. } => EventKind::Delete,
        }
    }

    #[inline]
    pub fn key(&self) -> &'a K {
        match *self {
            MapEvent::Set { key, .. } | MapEvent::Delete { key, .. } => key,
        }
    }

    /// The new value for `Set`, the pre-removal value for `Delete`.
    #[inline]
    pub fn value(&self) -> Option<&'a V> {
        match *self {
            MapEvent::Set { value, .. } => Some(value),
            MapEvent::Delete { previous, .. } => previous,
        }
    }
}

// Manual impls: the payload is references, so no bounds on K/V are needed.
impl<K, V> Clone for MapEvent<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for MapEvent<'_, K, V> {}

/// Handle returned by listener registration, used to unsubscribe
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

impl ListenerId {
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
