//! Serde support: the map serializes as a map, in iteration order.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::map::OrderedEventMap;
use crate::store::EntryStore;

impl<K, V> Serialize for OrderedEventMap<K, V>
where
    K: Serialize + Hash + Eq + Clone,
    V: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct OrderedEventMapVisitor<K, V> {
    marker: PhantomData<fn() -> OrderedEventMap<K, V>>,
}

impl<'de, K, V> Visitor<'de> for OrderedEventMapVisitor<K, V>
where
    K: Deserialize<'de> + Hash + Eq + Clone,
    V: Deserialize<'de>,
{
    type Value = OrderedEventMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        // Duplicate keys follow set semantics: first position, last value
        let mut store = EntryStore::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry()? {
            store.insert(key, value);
        }
        Ok(OrderedEventMap::from_store(store))
    }
}

impl<'de, K, V> Deserialize<'de> for OrderedEventMap<K, V>
where
    K: Deserialize<'de> + Hash + Eq + Clone,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedEventMapVisitor {
            marker: PhantomData,
        })
    }
}
