//! Thread-safe envelope around [`LruCache`](crate::lru::LruCache).
//!
//! This is a thin synchronization layer, not a sharded/segmented cache: the
//! group coordinator needs one globally-consistent recency ordering per
//! namespace, so every access goes through a single [`parking_lot::Mutex`].
//! Construction of the inner [`LruCache`](crate::lru::LruCache) is deferred to
//! the first `add`, so declaring a namespace costs nothing until it is
//! actually written to.

use crate::entry::Weighted;
use crate::lru::LruCache;
use parking_lot::Mutex;
use std::borrow::Borrow;
use std::hash::Hash;

/// A [`LruCache`] guarded by a mutex, with lazy construction.
pub struct ConcurrentCache<K, V> {
    cache_bytes: usize,
    inner: Mutex<Option<LruCache<K, V>>>,
}

impl<K, V> ConcurrentCache<K, V>
where
    K: Hash + Eq + Weighted + Clone,
    V: Weighted + Clone,
{
    /// Creates an empty, unconstructed cache with the given byte capacity
    /// (`0` means unbounded).
    pub fn new(cache_bytes: usize) -> Self {
        ConcurrentCache {
            cache_bytes,
            inner: Mutex::new(None),
        }
    }

    /// Creates a cache from a [`crate::config::LruCacheConfig`].
    pub fn from_config(config: crate::config::LruCacheConfig) -> Self {
        ConcurrentCache::new(config.max_bytes)
    }

    /// Looks up `key`, promoting it to MRU on a hit. Returns a clone of the
    /// value rather than a reference, since the lock cannot outlive the call.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let mut guard = self.inner.lock();
        guard.as_mut()?.get(key).cloned()
    }

    /// Inserts or updates `key`, constructing the inner LRU on first use.
    pub fn add(&self, key: K, value: V) {
        let mut guard = self.inner.lock();
        guard
            .get_or_insert_with(|| LruCache::new(self.cache_bytes, None))
            .add(key, value);
    }

    /// Number of resident entries, or 0 if the inner cache was never
    /// constructed.
    pub fn len(&self) -> usize {
        self.inner.lock().as_ref().map_or(0, LruCache::len)
    }

    /// `true` if the cache is empty or not yet constructed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> std::fmt::Debug for ConcurrentCache<K, V>
where
    K: Hash + Eq + Weighted + Clone,
    V: Weighted + Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConcurrentCache")
            .field("cache_bytes", &self.cache_bytes)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn lazily_constructed_until_first_add() {
        let cache: ConcurrentCache<String, String> = ConcurrentCache::new(1024);
        assert_eq!(cache.get(&"missing".to_string()), None);
        assert_eq!(cache.len(), 0);
        cache.add("k".to_string(), "v".to_string());
        assert_eq!(cache.get(&"k".to_string()), Some("v".to_string()));
    }

    #[test]
    fn concurrent_writers_do_not_corrupt_state() {
        let cache: Arc<ConcurrentCache<String, String>> = Arc::new(ConcurrentCache::new(0));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..200 {
                        cache.add(format!("k{t}-{i}"), "v".to_string());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(cache.len(), 8 * 200);
    }
}
