//! Error types for the map.
//!
//! Map operations themselves never fail: out-of-range positions and
//! missing keys are answered with `Option`s or unmodified copies. The only
//! error a caller can see is a listener reporting failure during
//! synchronous event delivery.

use crate::event::{EventKind, ListenerId};

/// Error returned by a listener. Boxed so closures can `?` any error type.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by mutating map operations.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// A listener failed while being notified.
    ///
    /// The mutation that triggered the event has already been committed
    /// when this is returned.
    #[error("{event} listener {listener} failed: {source}")]
    Listener {
        /// Which event was being delivered
        event: EventKind,
        /// The failing listener
        listener: ListenerId,
        /// What the listener returned
        source: ListenerError,
    },
}

impl MapError {
    /// Check if this error came from listener code
    pub fn is_listener_error(&self) -> bool {
        matches!(self, MapError::Listener { .. })
    }

    /// The event kind being delivered when the error occurred
    pub fn event(&self) -> EventKind {
        match self {
            MapError::Listener { event, .. } => *event,
        }
    }
}

/// Result alias for fallible map operations
pub type Result<T, E = MapError> = std::result::Result<T, E>;
