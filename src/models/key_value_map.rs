//! Ordered string key/value storage with overwrite-merge semantics.
//!
//! [`KeyValueMap`] backs every layer of configuration the builder carries:
//! variable overwrites, framework-property overwrites and the per-handler
//! configuration blocks. All of them follow the same law when layered:
//! [`KeyValueMap::put_all`] overwrites keys present in the source and leaves
//! every other key alone.
//!
//! # Examples
//!
//! ```rust
//! use feature_builder::models::KeyValueMap;
//!
//! let mut target = KeyValueMap::from([("a", "1"), ("b", "2")]);
//! let source = KeyValueMap::from([("b", "20"), ("c", "30")]);
//!
//! target.put_all(&source);
//!
//! assert_eq!(target.get("a"), Some("1"));
//! assert_eq!(target.get("b"), Some("20"));
//! assert_eq!(target.get("c"), Some("30"));
//! ```

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An insertion-ordered map of unique string keys to string values.
///
/// Iteration yields entries in the order their keys were first inserted;
/// overwriting a value keeps the key's original position. Cloning copies the
/// entries, so two owners never share one container for writes.
///
/// Entries live in a `Vec` and every lookup is a linear scan, so
/// [`put_all`](Self::put_all) costs O(n·m). Variable, framework property and
/// handler configuration maps hold a handful of keys, where this beats hashing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValueMap {
    entries: Vec<(String, String)>,
}

impl KeyValueMap {
    /// Create an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Look up the value stored for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.position(key).map(|idx| self.entries[idx].1.as_str())
    }

    /// Insert or overwrite a single entry, returning the previous value.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Copy every entry of `source` into this map.
    ///
    /// Keys present in `source` take the source's value; keys absent from
    /// `source` keep whatever value they had. The copy is one-directional and
    /// `source` is never modified.
    pub fn put_all(&mut self, source: &KeyValueMap) {
        for (key, value) in source.iter() {
            self.put(key, value);
        }
    }

    /// Remove `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.position(key).map(|idx| self.entries.remove(idx).1)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KeyValueMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for KeyValueMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for KeyValueMap {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl IntoIterator for KeyValueMap {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for KeyValueMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct KeyValueMapVisitor;

impl<'de> Visitor<'de> for KeyValueMapVisitor {
    type Value = KeyValueMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of string keys to string values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = KeyValueMap::new();
        while let Some((key, value)) = access.next_entry::<String, String>()? {
            map.put(key, value);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for KeyValueMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(KeyValueMapVisitor)
    }
}
