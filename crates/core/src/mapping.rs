//! Ordered mapping with unique value keys
//!
//! A [`Mapping`] keeps entries in insertion order, which is also the order
//! they are written on the wire. Keys are arbitrary [`Value`]s and must be
//! unique: inserting an existing key fails instead of overwriting.
//!
//! Equality ignores entry order, like a map. Two equal mappings built in
//! different orders encode to different (but individually deterministic)
//! byte sequences.

use crate::error::CodecError;
use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Ordered mapping of value keys to values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(Value, Value)>", into = "Vec<(Value, Value)>")]
pub struct Mapping {
    entries: IndexMap<Value, Value>,
}

impl Mapping {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty mapping with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Mapping {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Build a mapping from entries, rejecting repeated keys
    pub fn from_entries<I>(entries: I) -> Result<Self, CodecError>
    where
        I: IntoIterator<Item = (Value, Value)>,
    {
        let iter = entries.into_iter();
        let mut mapping = Mapping::with_capacity(iter.size_hint().0);
        for (k, v) in iter {
            mapping.insert(k, v)?;
        }
        Ok(mapping)
    }

    /// Insert a new entry at the end
    ///
    /// Fails with [`CodecError::DuplicateKey`] if `key` is already present;
    /// the mapping is left unchanged.
    pub fn insert(&mut self, key: Value, value: Value) -> Result<(), CodecError> {
        if self.entries.contains_key(&key) {
            return Err(CodecError::DuplicateKey {
                kind: key.kind(),
                offset: None,
            });
        }
        self.entries.insert(key, value);
        Ok(())
    }

    /// Look up a value by key
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Look up a value by string key
    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.entries.get(&Value::String(key.to_string()))
    }

    /// Check if a key is present
    pub fn contains_key(&self, key: &Value) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the mapping has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter()
    }

    /// Iterate keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.keys()
    }

    /// Iterate values in insertion order
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }
}

// Order-insensitive so that it agrees with `Eq`.
impl Hash for Mapping {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut combined = 0u64;
        for (k, v) in &self.entries {
            let mut entry = DefaultHasher::new();
            k.hash(&mut entry);
            v.hash(&mut entry);
            combined = combined.wrapping_add(entry.finish());
        }
        self.entries.len().hash(state);
        combined.hash(state);
    }
}

impl TryFrom<Vec<(Value, Value)>> for Mapping {
    type Error = CodecError;

    fn try_from(entries: Vec<(Value, Value)>) -> Result<Self, Self::Error> {
        Mapping::from_entries(entries)
    }
}

impl From<Mapping> for Vec<(Value, Value)> {
    fn from(m: Mapping) -> Self {
        m.entries.into_iter().collect()
    }
}

impl IntoIterator for Mapping {
    type Item = (Value, Value);
    type IntoIter = indexmap::map::IntoIter<Value, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = (&'a Value, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Value, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
