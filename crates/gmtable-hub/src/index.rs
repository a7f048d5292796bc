//! Subscription index keyed by a composite `(tag, id)` key.
//!
//! Invariant: no key maps to an empty list. A key is created by the first
//! insert and removed by the removal that empties its list, so an absent key
//! is the only representation of "no subscribers".

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// Ordered lists of shared entries, grouped by key.
///
/// Entries are compared by `Arc` identity.
#[derive(Debug)]
pub(crate) struct SubscriptionIndex<K, V> {
    entries: HashMap<K, Vec<Arc<V>>>,
}

impl<K: Eq + Hash, V> SubscriptionIndex<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Appends `entry` under `key`, creating the key if needed.
    pub(crate) fn insert(&mut self, key: K, entry: Arc<V>) {
        self.entries.entry(key).or_default().push(entry);
    }

    /// Removes `entry` from under `key`, pruning the key if it empties.
    ///
    /// Returns `false` if the key or the entry was absent.
    pub(crate) fn remove(&mut self, key: &K, entry: &Arc<V>) -> bool {
        let Some(list) = self.entries.get_mut(key) else {
            return false;
        };
        let before = list.len();
        list.retain(|e| !Arc::ptr_eq(e, entry));
        let removed = list.len() != before;
        if list.is_empty() {
            self.entries.remove(key);
        }
        removed
    }

    /// Returns a copy of the entries under `key`, in insertion order.
    pub(crate) fn snapshot(&self, key: &K) -> Option<Vec<Arc<V>>> {
        self.entries.get(key).cloned()
    }

    pub(crate) fn count(&self, key: &K) -> usize {
        self.entries.get(key).map_or(0, Vec::len)
    }

    pub(crate) fn key_count(&self) -> usize {
        self.entries.len()
    }
}
