//! Emitter - Ordered, synchronous, multi-listener event delivery.
//!
//! Listeners are kept per [`EventKind`] in registration order. Delivery
//! runs on the caller's stack before the mutation it describes is
//! committed.

use tracing::{trace, warn};

use crate::error::{ListenerError, MapError};
use crate::event::{EventKind, ListenerId, MapEvent};

/// A registered listener callback.
///
/// Returning `Err` stops delivery to later listeners for that emission and
/// is reported to the caller of the mutating method.
pub type Listener<K, V> = Box<dyn FnMut(&MapEvent<'_, K, V>) -> Result<(), ListenerError>>;

struct Registration<K, V> {
    id: ListenerId,
    once: bool,
    callback: Listener<K, V>,
}

/// The map's notification channel.
///
/// Owned by exactly one map and never shared or copied: cloning a map
/// produces a fresh, empty channel.
pub struct Emitter<K, V> {
    /// One ordered listener list per event kind, indexed by `EventKind::slot`
    slots: [Vec<Registration<K, V>>; 2],
    /// Next id to hand out
    next_id: u64,
}

impl<K, V> Emitter<K, V> {
    /// Create a channel with no listeners
    pub fn new() -> Self {
        Self {
            slots: [Vec::new(), Vec::new()],
            next_id: 0,
        }
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a listener that fires on every `kind` event.
    pub fn on<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&MapEvent<'_, K, V>) -> Result<(), ListenerError> + 'static,
    {
        self.register(kind, false, Box::new(listener))
    }

    /// Register a listener that fires on the next `kind` event only.
    pub fn once<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&MapEvent<'_, K, V>) -> Result<(), ListenerError> + 'static,
    {
        self.register(kind, true, Box::new(listener))
    }

    fn register(&mut self, kind: EventKind, once: bool, callback: Listener<K, V>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.slots[kind.slot()].push(Registration { id, once, callback });
        trace!(%kind, listener = %id, once, "listener registered");
        id
    }

    /// Remove a listener by id.
    ///
    /// # Returns
    /// `true` if the listener was registered, `false` otherwise
    pub fn off(&mut self, id: ListenerId) -> bool {
        for kind in EventKind::ALL {
            let slot = &mut self.slots[kind.slot()];
            if let Some(pos) = slot.iter().position(|r| r.id == id) {
                slot.remove(pos);
                trace!(%kind, listener = %id, "listener removed");
                return true;
            }
        }
        false
    }

    /// Remove every listener for `kind`, returning how many were dropped.
    pub fn remove_all(&mut self, kind: EventKind) -> usize {
        let removed = self.slots[kind.slot()].len();
        self.slots[kind.slot()].clear();
        removed
    }

    /// Number of listeners currently registered for `kind`
    #[inline]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.slots[kind.slot()].len()
    }

    // ========================================================================
    // Delivery
    // ========================================================================

    /// Deliver `event` to its listeners in registration order.
    ///
    /// One-shot listeners are unregistered before they run, so they never
    /// fire twice even when they fail.
    ///
    /// # Returns
    /// The first listener failure, after which no further listeners run
    pub fn emit(&mut self, event: &MapEvent<'_, K, V>) -> Result<(), MapError> {
        let kind = event.kind();
        let slot = &mut self.slots[kind.slot()];
        if slot.is_empty() {
            return Ok(());
        }
        trace!(%kind, listeners = slot.len(), "emitting");

        let mut i = 0;
        while i < slot.len() {
            let (id, outcome) = if slot[i].once {
                let mut registration = slot.remove(i);
                (registration.id, (registration.callback)(event))
            } else {
                let registration = &mut slot[i];
                i += 1;
                (registration.id, (registration.callback)(event))
            };

            if let Err(source) = outcome {
                warn!(%kind, listener = %id, error = %source, "listener failed");
                return Err(MapError::Listener {
                    event: kind,
                    listener: id,
                    source,
                });
            }
        }

        Ok(())
    }
}

impl<K, V> Default for Emitter<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> std::fmt::Debug for Emitter<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("set_listeners", &self.listener_count(EventKind::Set))
            .field("delete_listeners", &self.listener_count(EventKind::Delete))
            .finish()
    }
}
