//! [`FrozenMap`]: immutable, hashable mapping.

use std::cell::OnceCell;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::Value;

/// An immutable mapping usable as a map key or set member.
///
/// Equality ignores entry order. The hash is derived from the unordered set
/// of entries and computed once, on first use.
#[derive(Debug, Clone, Default)]
pub struct FrozenMap {
    entries: Vec<(Value, Value)>,
    hash: OnceCell<u64>,
}

impl FrozenMap {
    /// Builds the mapping; a repeated key keeps its position and takes the
    /// later value.
    pub fn new<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Value>,
        V: Into<Value>,
    {
        let mut unique: Vec<(Value, Value)> = Vec::new();
        for (key, value) in entries {
            let (key, value) = (key.into(), value.into());
            match unique.iter_mut().find(|(existing, _)| *existing == key) {
                Some(slot) => slot.1 = value,
                None => unique.push((key, value)),
            }
        }
        Self {
            entries: unique,
            hash: OnceCell::new(),
        }
    }

    pub fn entries(&self) -> &[(Value, Value)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    fn content_hash(&self) -> u64 {
        *self.hash.get_or_init(|| {
            self.entries.iter().fold(0u64, |acc, (key, value)| {
                let mut hasher = DefaultHasher::new();
                key.hash(&mut hasher);
                value.hash(&mut hasher);
                acc ^ hasher.finish()
            })
        })
    }
}

impl PartialEq for FrozenMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl Eq for FrozenMap {}

impl Hash for FrozenMap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.content_hash());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash_of(map: &FrozenMap) -> u64 {
        let mut h = DefaultHasher::new();
        map.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_order_insensitive_equality_and_hash() {
        let a = FrozenMap::new([("a", 1), ("b", 2)]);
        let b = FrozenMap::new([("b", 2), ("a", 1)]);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_repeated_key_takes_later_value() {
        let map = FrozenMap::new([("a", 1), ("b", 2), ("a", 3)]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&Value::from("a")), Some(&Value::from(3)));
        assert_eq!(map.entries()[0].0, Value::from("a"));
    }

    #[test]
    fn test_hash_is_cached() {
        let map = FrozenMap::new([(1, "x")]);
        assert!(map.hash.get().is_none());
        let first = hash_of(&map);
        assert_eq!(map.hash.get().copied().map(|_| hash_of(&map)), Some(first));
    }

    #[test]
    fn test_different_values_differ() {
        let a = FrozenMap::new([("a", 1)]);
        let b = FrozenMap::new([("a", 2)]);
        assert_ne!(a, b);
        assert!(FrozenMap::default().is_empty());
    }
}
