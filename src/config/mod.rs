//! Configuration structs for the crate's constructible components.
//!
//! Each component takes a small, explicit config struct instead of a long
//! constructor argument list, so adding a field later does not break
//! existing callers.
//!
//! | Config | Component |
//! |--------|-----------|
//! | [`LruCacheConfig`] | [`crate::lru::LruCache`] / [`crate::concurrent_cache::ConcurrentCache`] |
//! | [`RingConfig`] | [`crate::ring::Ring`] / [`crate::ring::RingPeerPicker`] |
//! | [`GroupConfig`] | [`crate::group::Group`] |

/// Byte capacity for an [`crate::lru::LruCache`] or
/// [`crate::concurrent_cache::ConcurrentCache`]. `0` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LruCacheConfig {
    pub max_bytes: usize,
}

impl LruCacheConfig {
    pub fn new(max_bytes: usize) -> Self {
        LruCacheConfig { max_bytes }
    }

    pub fn unbounded() -> Self {
        LruCacheConfig { max_bytes: 0 }
    }
}

/// Virtual-node replica count for a [`crate::ring::Ring`]. The original
/// source's tutorial default is 50; the spec leaves the exact value up to
/// the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingConfig {
    pub replicas: usize,
}

impl RingConfig {
    pub fn new(replicas: usize) -> Self {
        RingConfig { replicas }
    }
}

impl Default for RingConfig {
    fn default() -> Self {
        RingConfig { replicas: 50 }
    }
}

/// Construction parameters for a [`crate::group::Group`].
#[derive(Debug, Clone)]
pub struct GroupConfig {
    pub name: String,
    pub cache_bytes: usize,
}

impl GroupConfig {
    pub fn new(name: impl Into<String>, cache_bytes: usize) -> Self {
        GroupConfig {
            name: name.into(),
            cache_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_config_default_is_fifty_replicas() {
        assert_eq!(RingConfig::default().replicas, 50);
    }

    #[test]
    fn lru_cache_config_unbounded_is_zero() {
        assert_eq!(LruCacheConfig::unbounded().max_bytes, 0);
    }
}
