//! Least Recently Used (LRU) cache with byte-weighted capacity.
//!
//! This is the bottom layer of the stack: a bounded, recency-ordered map from
//! keys to values, with O(1) `get`/`add`/eviction using a hash map combined
//! with a doubly-linked list (see [`crate::list`]).
//!
//! # Dual accounting
//!
//! Capacity is tracked in bytes, not entry count: `max_bytes == 0` means
//! unbounded. Each resident entry's contribution to `used_bytes` is
//! `key.weight() + value.weight()` (see [`crate::entry::Weighted`]), which for
//! the `(String, ByteView)` pair this crate uses elsewhere reduces to
//! `key.len() + value.len()`.
//!
//! # Example
//!
//! ```
//! use groupcache_rs::lru::LruCache;
//!
//! let mut cache: LruCache<String, String> = LruCache::new(10, None);
//! cache.add("k1".to_string(), "v1".to_string()); // weight 4
//! cache.add("k2".to_string(), "vv2".to_string()); // weight 5, used = 9
//! cache.get(&"k1".to_string()); // promote k1 to MRU
//! cache.add("k3".to_string(), "v3".to_string()); // weight 4, evicts k2
//! assert!(cache.get(&"k2".to_string()).is_none());
//! assert!(cache.get(&"k1".to_string()).is_some());
//! ```

use crate::entry::{Entry, Weighted};
use crate::list::{List, Node};
use std::borrow::Borrow;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;
use std::hash::Hash;

#[cfg(feature = "hashbrown")]
type Map<K, V> = hashbrown::HashMap<K, V>;
#[cfg(not(feature = "hashbrown"))]
type Map<K, V> = HashMap<K, V>;

/// A bounded-byte, recency-ordered cache. Not safe for concurrent access —
/// see [`crate::concurrent_cache::ConcurrentCache`] for a thread-safe wrapper.
pub struct LruCache<K, V> {
    max_bytes: usize,
    used_bytes: usize,
    list: List<Entry<K, V>>,
    map: Map<K, *mut Node<Entry<K, V>>>,
    on_evicted: Option<Box<dyn FnMut(&K, &V) + Send>>,
}

// SAFETY: LruCache owns every node reachable from `map`/`list` exclusively;
// sharing across threads requires an external lock (see ConcurrentCache),
// which only requires this type to be `Send`, not `Sync`.
unsafe impl<K: Send, V: Send> Send for LruCache<K, V> {}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Weighted,
    V: Weighted,
{
    /// Creates a cache with the given byte capacity (`0` means unbounded) and
    /// an optional callback invoked with the key and value of every evicted
    /// entry.
    pub fn new(max_bytes: usize, on_evicted: Option<Box<dyn FnMut(&K, &V) + Send>>) -> Self {
        LruCache {
            max_bytes,
            used_bytes: 0,
            list: List::new(),
            map: Map::default(),
            on_evicted,
        }
    }

    /// Creates a cache from a [`crate::config::LruCacheConfig`], with no
    /// eviction callback.
    pub fn from_config(config: crate::config::LruCacheConfig) -> Self {
        LruCache::new(config.max_bytes, None)
    }

    /// Number of resident entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Total byte weight of all resident entries.
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    /// Looks up `key`, promoting it to most-recently-used on a hit.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = *self.map.get(key)?;
        // SAFETY: node came from `map` and is therefore live and part of `list`.
        unsafe {
            self.list.move_to_front(node);
            Some(&self.list.value(node).value)
        }
    }

    /// Inserts or updates `key`. If `key` already exists, its value is
    /// replaced and it is promoted to MRU; otherwise a new MRU entry is
    /// created. Evicts from the LRU end until `used_bytes <= max_bytes`
    /// (when `max_bytes > 0`).
    pub fn add(&mut self, key: K, value: V)
    where
        K: Clone,
    {
        if let Some(&node) = self.map.get(&key) {
            // SAFETY: node came from `map` and is therefore live and part of `list`.
            unsafe {
                self.list.move_to_front(node);
                let entry = self.list.value_mut(node);
                self.used_bytes -= entry.weight();
                entry.value = value;
                self.used_bytes += entry.weight();
            }
        } else {
            let entry = Entry::new(key.clone(), value);
            self.used_bytes += entry.weight();
            let node = self.list.push_front(entry);
            self.map.insert(key, node);
        }

        while self.max_bytes > 0 && self.used_bytes > self.max_bytes {
            self.remove_oldest();
        }
    }

    /// Evicts the least-recently-used entry, if any, invoking the eviction
    /// callback if one was configured.
    pub fn remove_oldest(&mut self) {
        let Some(entry) = self.list.remove_last() else {
            return;
        };
        self.used_bytes -= entry.weight();
        self.map.remove(&entry.key);
        if let Some(cb) = self.on_evicted.as_mut() {
            cb(&entry.key, &entry.value);
        }
    }

    /// Removes `key` unconditionally, without invoking the eviction callback.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.map.remove(key)?;
        // SAFETY: node came from `map` and is therefore live and part of `list`.
        let entry = unsafe { self.list.remove(node) };
        self.used_bytes -= entry.weight();
        Some(entry.value)
    }

    /// Removes every entry without invoking the eviction callback.
    pub fn clear(&mut self) {
        self.map.clear();
        self.list.clear();
        self.used_bytes = 0;
    }
}

impl<K, V> std::fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.list.len())
            .field("used_bytes", &self.used_bytes)
            .field("max_bytes", &self.max_bytes)
            .finish()
    }
}
