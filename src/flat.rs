//! Nested values for `flat`.
//!
//! A map value can only be flattened if it knows whether it is itself a
//! sequence. [`Flatten`] answers that; [`Nested`] is a ready-made value
//! type that is either a single item or a list of nested values.

use serde::{Deserialize, Serialize};

/// Values that may contain a sequence of values of the same type.
pub trait Flatten: Sized {
    /// The inner sequence, or `None` for a leaf value
    fn as_sequence(&self) -> Option<&[Self]>;

    /// Push `self` into `out`, expanding sequences up to `depth` levels.
    fn flatten_into(&self, depth: usize, out: &mut Vec<Self>)
    where
        Self: Clone,
    {
        match self.as_sequence() {
            Some(items) if depth > 0 => {
                for item in items {
                    item.flatten_into(depth - 1, out);
                }
            }
            _ => out.push(self.clone()),
        }
    }
}

/// An item, or a list of nested items.
///
/// Serializes untagged: `Item(1)` is `1`, `List([..])` is a JSON array.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Nested<T> {
    Item(T),
    List(Vec<Nested<T>>),
}

impl<T> Nested<T> {
    pub fn item(value: T) -> Self {
        Nested::Item(value)
    }

    pub fn list<I: IntoIterator<Item = Nested<T>>>(items: I) -> Self {
        Nested::List(items.into_iter().collect())
    }

    /// The leaf value, if this is not a list
    pub fn as_item(&self) -> Option<&T> {
        match self {
            Nested::Item(value) => Some(value),
            Nested::List(_) => None,
        }
    }
}

impl<T> From<T> for Nested<T> {
    fn from(value: T) -> Self {
        Nested::Item(value)
    }
}

impl<T> Flatten for Nested<T> {
    fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Nested::Item(_) => None,
            Nested::List(items) => Some(items),
        }
    }
}
