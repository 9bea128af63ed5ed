//! Encounter-ordered grouping
//!
//! Hash maps alone lose the order in which groups first appear. Result tables
//! list groups in that order (and sort stably on top of it), so every
//! calculator assigns group slots through `GroupIndex`.

use rustc_hash::{FxHashMap, FxHashSet};
use std::hash::Hash;

/// Maps group keys to dense slots `0..len` in first-seen order
#[derive(Debug, Clone)]
pub struct GroupIndex<K> {
    slots: FxHashMap<K, usize>,
    keys: Vec<K>,
}

impl<K: Hash + Eq + Copy> GroupIndex<K> {
    pub fn new() -> Self {
        Self {
            slots: FxHashMap::default(),
            keys: Vec::new(),
        }
    }

    /// Slot for `key`, registering it if unseen
    pub fn slot(&mut self, key: K) -> usize {
        if let Some(&slot) = self.slots.get(&key) {
            return slot;
        }
        let slot = self.keys.len();
        self.slots.insert(key, slot);
        self.keys.push(key);
        slot
    }

    pub fn get(&self, key: &K) -> Option<usize> {
        self.slots.get(key).copied()
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<K: Hash + Eq + Copy> Default for GroupIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-group counter of distinct members
///
/// `counts[slot]` is the number of distinct members seen for that group.
/// Groups may be single keys or tuples such as `(taxon, use)`.
#[derive(Debug, Clone)]
pub struct DistinctCounter<'a, G> {
    pub groups: GroupIndex<G>,
    seen: FxHashSet<(usize, &'a str)>,
    pub counts: Vec<usize>,
}

impl<'a, G: Hash + Eq + Copy> DistinctCounter<'a, G> {
    pub fn new() -> Self {
        Self {
            groups: GroupIndex::new(),
            seen: Default::default(),
            counts: Vec::new(),
        }
    }

    pub fn add(&mut self, group: G, member: &'a str) {
        let slot = self.groups.slot(group);
        if slot == self.counts.len() {
            self.counts.push(0);
        }
        if self.seen.insert((slot, member)) {
            self.counts[slot] += 1;
        }
    }

    /// `(group, distinct count)` in first-seen order
    pub fn into_counts(self) -> Vec<(G, usize)> {
        self.groups.keys().iter().copied().zip(self.counts).collect()
    }
}

impl<G: Hash + Eq + Copy> Default for DistinctCounter<'_, G> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_follow_first_seen_order() {
        let mut index = GroupIndex::new();
        assert_eq!(index.slot("b"), 0);
        assert_eq!(index.slot("a"), 1);
        assert_eq!(index.slot("b"), 0);
        assert_eq!(index.keys(), &["b", "a"]);
        assert_eq!(index.get(&"a"), Some(1));
        assert_eq!(index.get(&"z"), None);
    }

    #[test]
    fn test_distinct_counter_ignores_repeats() {
        let mut counter = DistinctCounter::new();
        counter.add("s1", "A");
        counter.add("s2", "B");
        counter.add("s1", "A");
        counter.add("s1", "C");

        assert_eq!(counter.into_counts(), vec![("s1", 2), ("s2", 1)]);
    }
}
