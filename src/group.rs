//! A named cache namespace: the coordinator that ties together a local
//! [`ConcurrentCache`], an optional [`PeerPicker`], a [`SingleFlightGroup`],
//! and a user-supplied [`Loader`].
//!
//! A `Group` is the only type application code talks to directly. Its `get`
//! pipeline is, in order: reject empty keys, check the local cache, and on a
//! miss run a single-flight-coalesced load that tries a remote peer (if one
//! is configured and owns the key) before falling back to the local loader.

use crate::byte_view::ByteView;
use crate::concurrent_cache::ConcurrentCache;
use crate::error::CacheError;
use crate::metrics::{GroupMetricsCounters, GroupMetricsSnapshot};
use crate::peer::PeerPicker;
use crate::singleflight::SingleFlightGroup;
use parking_lot::RwLock;
use std::sync::Arc;

/// Loads the source value for a key on a cache miss.
///
/// Implemented on `Fn(&str) -> Result<Vec<u8>, CacheError>` closures via a
/// blanket impl, mirroring the original `GetterFunc` adapter, so most callers
/// never need to name this trait.
pub trait Loader: Send + Sync {
    fn load(&self, key: &str) -> Result<Vec<u8>, CacheError>;
}

impl<F> Loader for F
where
    F: Fn(&str) -> Result<Vec<u8>, CacheError> + Send + Sync,
{
    fn load(&self, key: &str) -> Result<Vec<u8>, CacheError> {
        self(key)
    }
}

/// A cache namespace: a unique name, a loader, a local cache, and an
/// optional peer picker.
pub struct Group {
    name: String,
    loader: Box<dyn Loader>,
    main_cache: ConcurrentCache<String, ByteView>,
    peers: RwLock<Option<Arc<dyn PeerPicker>>>,
    flight: SingleFlightGroup<ByteView, CacheError>,
    metrics: GroupMetricsCounters,
}

impl Group {
    /// Creates a group named `name` with the given byte capacity (`0` means
    /// unbounded) and loader.
    pub fn new(name: impl Into<String>, cache_bytes: usize, loader: Box<dyn Loader>) -> Self {
        Group {
            name: name.into(),
            loader,
            main_cache: ConcurrentCache::new(cache_bytes),
            peers: RwLock::new(None),
            flight: SingleFlightGroup::new(),
            metrics: GroupMetricsCounters::new(),
        }
    }

    /// Creates a group from a [`crate::config::GroupConfig`].
    pub fn from_config(config: crate::config::GroupConfig, loader: Box<dyn Loader>) -> Self {
        Group::new(config.name, config.cache_bytes, loader)
    }

    /// This group's unique namespace name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// A point-in-time snapshot of this group's hit/miss/loader/peer counters.
    pub fn metrics(&self) -> GroupMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Installs a [`PeerPicker`] for this group.
    ///
    /// # Panics
    ///
    /// Panics if called more than once: the peer topology is meant to be
    /// set up once at startup, and changing it later would race with
    /// in-flight `get`s reading the old picker mid-load.
    pub fn register_peers(&self, picker: Arc<dyn PeerPicker>) {
        let mut slot = self.peers.write();
        assert!(slot.is_none(), "register_peers called more than once");
        *slot = Some(picker);
    }

    /// Resolves `key`, consulting the local cache, then a remote peer (if
    /// any owns the key), then the loader.
    pub fn get(&self, key: &str) -> Result<ByteView, CacheError> {
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }

        if let Some(value) = self.main_cache.get(key) {
            log::debug!("[group {}] cache hit for {key:?}", self.name);
            self.metrics.record_hit(value.len() as u64);
            return Ok(value);
        }
        self.metrics.record_miss();

        self.load(key)
    }

    /// Registers `key`/`value` directly in the local cache, bypassing the
    /// loader. Used by callers that already have an authoritative value
    /// (e.g. a peer response, or a write-through caller).
    pub fn populate_cache(&self, key: impl Into<String>, value: ByteView) {
        self.main_cache.add(key.into(), value);
    }

    fn load(&self, key: &str) -> Result<ByteView, CacheError> {
        self.flight.call(key, || {
            let picker = self.peers.read().clone();
            if let Some(picker) = picker {
                if let Some(peer) = picker.pick_peer(key) {
                    self.metrics.record_peer_attempt();
                    match self.get_from_peer(peer.as_ref(), key) {
                        Ok(value) => return Ok(value),
                        Err(err) => {
                            self.metrics.record_peer_failure();
                            log::warn!("[group {}] peer fetch for {key:?} failed: {err}", self.name);
                        }
                    }
                }
            }
            self.get_locally(key)
        })
    }

    fn get_from_peer(
        &self,
        peer: &dyn crate::peer::PeerGetter,
        key: &str,
    ) -> Result<ByteView, CacheError> {
        let bytes = peer.get(&self.name, key)?;
        // The owning peer is the source of truth: we do not populate our own
        // cache here, or every node would end up storing every key.
        Ok(ByteView::from_vec(bytes))
    }

    fn get_locally(&self, key: &str) -> Result<ByteView, CacheError> {
        self.metrics.record_loader_call();
        let bytes = self.loader.load(key).map_err(|err| {
            self.metrics.record_loader_failure();
            err
        })?;
        let value = ByteView::from_vec(bytes);
        self.populate_cache(key, value.clone());
        self.metrics.record_bytes_served(value.len() as u64);
        Ok(value)
    }
}

impl std::fmt::Debug for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group").field("name", &self.name).finish()
    }
}
