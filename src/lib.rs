//! # Event-Map
//!
//! An insertion-ordered key/value map with an array-style API and a
//! synchronous notification channel for mutations.
//!
//! ## Design Principles
//!
//! - **Single Source of Order**: One entry vector defines iteration order;
//!   a `FxHashMap` key index is kept in sync with it
//! - **Emit Before Mutate**: `set`/`delete` notify listeners first, then
//!   commit, even if a listener fails
//! - **Silent Edges**: Out-of-range positions give `None` or an unchanged
//!   copy, never an error
//! - **Single-Threaded**: No locks; callers synchronize externally
//!
//! ## Architecture
//!
//! ```text
//! set / delete --> [Emitter] --> listeners (registration order)
//!       |
//!       v
//! [EntryStore: Vec<Entry> + FxHashMap<K, usize>]
//!       ^
//!       |
//! at / find / map / splice / sort / ...  (no events)
//! ```
//!
//! ## Example
//!
//! ```
//! use event_map::{EventKind, OrderedEventMap};
//!
//! let mut map: OrderedEventMap<&str, i32> = OrderedEventMap::new();
//! map.on(EventKind::Set, |event| {
//!     println!("set {:?}", event.key());
//!     Ok(())
//! });
//!
//! map.set("a", 1)?.set("b", 2)?.set("c", 3)?;
//!
//! assert_eq!(map.map(|v, _| v * 2), vec![2, 4, 6]);
//! assert_eq!(map.at(-1), Some(&3));
//! # Ok::<(), event_map::MapError>(())
//! ```

pub mod emitter;
pub mod error;
pub mod event;
pub mod flat;
pub mod map;
pub mod position;
pub mod reorder;
pub mod sequence;
pub mod serde_impl;
pub mod store;

// Re-exports for convenience
pub use emitter::{Emitter, Listener};
pub use error::{ListenerError, MapError, Result};
pub use event::{EventKind, ListenerId, MapEvent};
pub use flat::{Flatten, Nested};
pub use map::{Iter, OrderedEventMap};
pub use store::Entry;
