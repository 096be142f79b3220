//! Memoized view cache keyed by input fingerprints

use std::collections::VecDeque;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use ahash::{AHashMap, AHasher};
use parking_lot::RwLock;

/// Hash any input tuple into a cache key.
///
/// Equal inputs give equal keys within one process; keys are not stable
/// across runs and must not be persisted.
pub fn fingerprint<H: Hash + ?Sized>(inputs: &H) -> u64 {
    let mut hasher = AHasher::default();
    inputs.hash(&mut hasher);
    hasher.finish()
}

struct Entries<V> {
    map: AHashMap<u64, Arc<V>>,
    order: VecDeque<u64>,
}

/// Bounded cache of computed views, evicting the oldest entry first
pub struct ViewCache<V> {
    entries: RwLock<Entries<V>>,
    capacity: usize,
}

impl<V> ViewCache<V> {
    /// A capacity of zero disables caching
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(Entries {
                map: AHashMap::with_capacity(capacity),
                order: VecDeque::with_capacity(capacity),
            }),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, key: u64) -> Option<Arc<V>> {
        self.entries.read().map.get(&key).cloned()
    }

    pub fn put(&self, key: u64, value: V) -> Arc<V> {
        let value = Arc::new(value);
        if self.capacity == 0 {
            return value;
        }
        let mut entries = self.entries.write();
        if entries.map.insert(key, Arc::clone(&value)).is_none() {
            entries.order.push_back(key);
        }
        while entries.order.len() > self.capacity {
            if let Some(oldest) = entries.order.pop_front() {
                entries.map.remove(&oldest);
            }
        }
        value
    }

    /// Cached value for `key`, computing and storing it on a miss
    pub fn get_or_insert_with(&self, key: u64, compute: impl FnOnce() -> V) -> Arc<V> {
        if let Some(hit) = self.get(key) {
            tracing::trace!(key, "view cache hit");
            return hit;
        }
        tracing::trace!(key, "view cache miss");
        self.put(key, compute())
    }

    pub fn len(&self) -> usize {
        self.entries.read().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write();
        entries.map.clear();
        entries.order.clear();
    }
}
