//! Ordered state table.
//!
//! [`StateMap`] keeps insertion order so a ranked table can be handed to a
//! renderer as-is. Replacing the value of an existing key keeps its position.

use std::collections::HashMap;

use cloudstate_model::ItemKey;

/// Insertion-ordered mapping from [`ItemKey`] to value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateMap {
    entries: Vec<(ItemKey, String)>,
    index: HashMap<ItemKey, usize>,
}

impl StateMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value, returning the previous value if any.
    pub fn insert(&mut self, key: ItemKey, value: impl Into<String>) -> Option<String> {
        let value = value.into();
        if let Some(&pos) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[pos].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    /// Look up a value.
    #[must_use]
    pub fn get(&self, key: &ItemKey) -> Option<&str> {
        self.index.get(key).map(|&pos| self.entries[pos].1.as_str())
    }

    /// Whether the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &ItemKey) -> bool {
        self.index.contains_key(key)
    }

    /// Remove a key, shifting later entries up by one.
    pub fn remove(&mut self, key: &ItemKey) -> Option<String> {
        let pos = self.index.remove(key)?;
        let (_, value) = self.entries.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(value)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemKey, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Iterate keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &ItemKey> {
        self.entries.iter().map(|(k, _)| k)
    }
}

impl FromIterator<(ItemKey, String)> for StateMap {
    fn from_iter<I: IntoIterator<Item = (ItemKey, String)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl Extend<(ItemKey, String)> for StateMap {
    fn extend<I: IntoIterator<Item = (ItemKey, String)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for StateMap {
    type Item = (ItemKey, String);
    type IntoIter = std::vec::IntoIter<(ItemKey, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(local: &str) -> ItemKey {
        ItemKey::unscoped(local)
    }

    #[test]
    fn test_should_preserve_insertion_order() {
        let mut map = StateMap::new();
        map.insert(key("b"), "1");
        map.insert(key("a"), "2");
        map.insert(key("c"), "3");

        let keys: Vec<_> = map.keys().map(ItemKey::local_key).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_should_replace_value_in_place() {
        let mut map = StateMap::new();
        map.insert(key("a"), "1");
        map.insert(key("b"), "2");

        assert_eq!(map.insert(key("a"), "9"), Some("1".to_owned()));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&key("a")), Some("9"));
        assert_eq!(map.keys().next().unwrap().local_key(), "a");
    }

    #[test]
    fn test_should_reindex_after_remove() {
        let mut map: StateMap = [("a", "1"), ("b", "2"), ("c", "3")]
            .into_iter()
            .map(|(k, v)| (key(k), v.to_owned()))
            .collect();

        assert_eq!(map.remove(&key("a")), Some("1".to_owned()));
        assert_eq!(map.get(&key("c")), Some("3"));
        assert!(!map.contains_key(&key("a")));

        map.insert(key("c"), "4");
        let entries: Vec<_> = map.iter().map(|(k, v)| (k.local_key(), v)).collect();
        assert_eq!(entries, vec![("b", "2"), ("c", "4")]);
    }
}
