//! Bounded memo cache keyed by raw input text.
//!
//! Holds provider outputs that are pure functions of their input (facet
//! embeddings). Ranking state never goes in here.

use moka::sync::Cache;

/// In-memory cache with TinyLFU admission and LRU eviction.
///
/// Frequently read keys survive a stream of one-off inserts.
pub struct MemoCache<V> {
    capacity: usize,
    cache: Cache<String, V>,
}

impl<V: Clone + Send + Sync + 'static> MemoCache<V> {
    /// Create a cache holding at most `capacity` entries (0 disables it).
    pub fn new(capacity: usize) -> Self {
        let cache = Cache::builder().max_capacity(capacity as u64).build();

        Self { capacity, cache }
    }

    /// Cached value for `key`.
    pub fn get(&self, key: &str) -> Option<V> {
        self.cache.get(key)
    }

    /// Store a value; the cache evicts on its own once over capacity.
    pub fn insert(&self, key: impl Into<String>, value: V) {
        if self.capacity == 0 {
            return;
        }
        self.cache.insert(key.into(), value);
    }

    /// Number of cached entries, after pending evictions are applied.
    pub fn len(&self) -> usize {
        self.cache.run_pending_tasks();
        self.cache.entry_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invalidate all entries.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
