use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::node::{Node, NodeKind};

/// A string-keyed mapping.
///
/// Both flavors iterate in insertion order. An unordered mapping compares
/// equal to another unordered mapping with the same entries in any order;
/// an ordered mapping only equals one with the same entries in the same
/// order. The two flavors are distinct container kinds.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Mapping {
    ordered: bool,
    entries: IndexMap<String, Node>,
}

impl Mapping {
    /// An empty unordered mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty ordered mapping.
    pub fn ordered() -> Self {
        Self {
            ordered: true,
            entries: IndexMap::new(),
        }
    }

    /// An empty mapping of the same flavor as `self`.
    pub fn empty_like(&self) -> Self {
        Self {
            ordered: self.ordered,
            entries: IndexMap::new(),
        }
    }

    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    pub fn kind(&self) -> NodeKind {
        if self.ordered {
            NodeKind::OrderedMapping
        } else {
            NodeKind::Mapping
        }
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or overwrite an entry. Overwrites keep the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Node>) -> Option<Node> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove an entry, preserving the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.entries.shift_remove(key)
    }

    /// Get the entry for `key`, inserting the result of `default` if absent.
    pub fn entry_or_insert_with(&mut self, key: &str, default: impl FnOnce() -> Node) -> &mut Node {
        self.entries.entry(key.to_string()).or_insert_with(default)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Node> {
        self.entries.iter()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Node> {
        self.entries.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, String, Node> {
        self.entries.values()
    }

    fn sorted_entries(&self) -> Vec<(&String, &Node)> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl Ord for Mapping {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordered.cmp(&other.ordered).then_with(|| {
            if self.ordered {
                self.entries.iter().cmp(other.entries.iter())
            } else {
                self.sorted_entries().cmp(&other.sorted_entries())
            }
        })
    }
}

impl PartialOrd for Mapping {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Mapping {}

impl<K: Into<String>, V: Into<Node>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (k, v) in iter {
            mapping.insert(k, v);
        }
        mapping
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = (&'a String, &'a Node);
    type IntoIter = indexmap::map::Iter<'a, String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Node);
    type IntoIter = indexmap::map::IntoIter<String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unordered_equality_ignores_order() {
        let a: Mapping = [("x", 1), ("y", 2)].into_iter().collect();
        let b: Mapping = [("y", 2), ("x", 1)].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn ordered_equality_respects_order() {
        let mut a = Mapping::ordered();
        a.insert("x", 1);
        a.insert("y", 2);
        let mut b = Mapping::ordered();
        b.insert("y", 2);
        b.insert("x", 1);
        assert_ne!(a, b);
    }

    #[test]
    fn flavors_never_compare_equal() {
        let mut ordered = Mapping::ordered();
        ordered.insert("x", 1);
        let unordered: Mapping = [("x", 1)].into_iter().collect();
        assert_ne!(ordered, unordered);
        assert_eq!(ordered.kind(), NodeKind::OrderedMapping);
        assert_eq!(unordered.kind(), NodeKind::Mapping);
    }

    #[test]
    fn iteration_follows_insertion() {
        let m: Mapping = [("b", 1), ("a", 2), ("c", 3)].into_iter().collect();
        let keys: Vec<&str> = m.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn remove_preserves_order() {
        let mut m: Mapping = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        m.remove("a");
        let keys: Vec<&str> = m.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[test]
    fn empty_like_keeps_flavor() {
        assert!(Mapping::ordered().empty_like().is_ordered());
        assert!(!Mapping::new().empty_like().is_ordered());
    }
}
