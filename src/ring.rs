//! Consistent hashing ring used to assign keys to peer nodes.
//!
//! Mirrors the `consistenthash.Map` this crate's spec was distilled from:
//! each real node is replicated onto `replicas` virtual nodes placed on a
//! sorted hash ring, and a key's owner is the first virtual node whose hash
//! is `>=` the key's hash, wrapping around to the start of the ring.

use std::collections::HashMap;

/// A pluggable hash function for the ring. Default is CRC32 (IEEE), matching
/// the original `crc32.ChecksumIEEE`.
pub trait RingHasher {
    fn hash(&self, data: &[u8]) -> u32;
}

/// The default [`RingHasher`], backed by [`crc32fast`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Crc32Hasher;

impl RingHasher for Crc32Hasher {
    fn hash(&self, data: &[u8]) -> u32 {
        crc32fast::hash(data)
    }
}

/// A consistent-hash ring mapping keys to node names.
///
/// Not internally synchronized: callers that mutate the ring after
/// publishing it concurrently (e.g. [`RingPeerPicker`]) must serialize
/// updates with lookups themselves.
pub struct Ring<H: RingHasher = Crc32Hasher> {
    hasher: H,
    replicas: usize,
    /// Sorted virtual-node hashes.
    keys: Vec<u32>,
    /// Virtual-node hash -> real node name.
    hash_map: HashMap<u32, String>,
}

impl Ring<Crc32Hasher> {
    /// Creates a ring using the default CRC32 hash function.
    pub fn new(replicas: usize) -> Self {
        Ring::with_hasher(replicas, Crc32Hasher)
    }

    /// Creates a ring from a [`crate::config::RingConfig`], using the
    /// default CRC32 hash function.
    pub fn from_config(config: crate::config::RingConfig) -> Self {
        Ring::new(config.replicas)
    }
}

impl<H: RingHasher> Ring<H> {
    /// Creates a ring with `replicas` virtual nodes per real node, using a
    /// custom hash function.
    pub fn with_hasher(replicas: usize, hasher: H) -> Self {
        Ring {
            hasher,
            replicas,
            keys: Vec::new(),
            hash_map: HashMap::new(),
        }
    }

    fn virtual_node_hash(&self, replica: usize, name: &str) -> u32 {
        let label = format!("{replica}{name}");
        self.hasher.hash(label.as_bytes())
    }

    /// Adds zero or more real node names to the ring, each replicated onto
    /// `replicas` virtual nodes.
    pub fn add(&mut self, names: &[&str]) {
        for name in names {
            for replica in 0..self.replicas {
                let hash = self.virtual_node_hash(replica, name);
                self.keys.push(hash);
                self.hash_map.insert(hash, (*name).to_string());
            }
        }
        self.keys.sort_unstable();
    }

    /// Removes a real node and all of its virtual nodes from the ring.
    pub fn remove(&mut self, name: &str) {
        for replica in 0..self.replicas {
            let hash = self.virtual_node_hash(replica, name);
            if let Ok(idx) = self.keys.binary_search(&hash) {
                self.keys.remove(idx);
            }
            self.hash_map.remove(&hash);
        }
    }

    /// Returns the name of the node that owns `key`, or `None` if the ring
    /// has no nodes.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.keys.is_empty() {
            return None;
        }
        let hash = self.hasher.hash(key.as_bytes());
        let idx = match self.keys.binary_search(&hash) {
            Ok(i) => i,
            Err(i) => i % self.keys.len(),
        };
        self.hash_map.get(&self.keys[idx]).map(String::as_str)
    }

    /// `true` if the ring has no nodes.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<H: RingHasher> std::fmt::Debug for Ring<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ring")
            .field("replicas", &self.replicas)
            .field("nodes", &self.hash_map.len())
            .finish()
    }
}

use crate::peer::{PeerGetter, PeerPicker};
use parking_lot::Mutex;
use std::sync::Arc;

/// Adapts a [`Ring`] plus a table of registered [`PeerGetter`]s into a
/// [`PeerPicker`], extracting the identity-exclusion rule (never recurse to
/// self) out of any particular transport.
///
/// Registering a transport's [`PeerGetter`] implementations with this
/// adapter is all a transport needs to do; it never has to re-derive the
/// self-exclusion check.
pub struct RingPeerPicker {
    self_name: String,
    state: Mutex<RingPeerPickerState>,
}

struct RingPeerPickerState {
    ring: Ring,
    getters: HashMap<String, Arc<dyn PeerGetter>>,
}

impl RingPeerPicker {
    /// Creates a picker for the node named `self_name`, with `replicas`
    /// virtual nodes per peer.
    pub fn new(self_name: impl Into<String>, replicas: usize) -> Self {
        RingPeerPicker {
            self_name: self_name.into(),
            state: Mutex::new(RingPeerPickerState {
                ring: Ring::new(replicas),
                getters: HashMap::new(),
            }),
        }
    }

    /// Creates a picker for the node named `self_name` from a
    /// [`crate::config::RingConfig`].
    pub fn from_config(self_name: impl Into<String>, config: crate::config::RingConfig) -> Self {
        RingPeerPicker::new(self_name, config.replicas)
    }

    /// Registers or replaces the full set of peers, including the
    /// self-exclusion entry's backing ring membership. `self_name` does not
    /// need its own [`PeerGetter`] — lookups that resolve to it return
    /// `None` regardless of whether a getter was registered for it.
    pub fn set_peers(&self, peers: Vec<(String, Arc<dyn PeerGetter>)>) {
        let mut state = self.state.lock();
        state.ring = Ring::new(state.ring.replicas);
        state.getters.clear();
        let names: Vec<&str> = peers.iter().map(|(name, _)| name.as_str()).collect();
        state.ring.add(&names);
        for (name, getter) in peers {
            state.getters.insert(name, getter);
        }
    }
}

impl PeerPicker for RingPeerPicker {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let state = self.state.lock();
        let owner = state.ring.get(key)?;
        if owner == self.self_name {
            return None;
        }
        state.getters.get(owner).cloned()
    }
}

impl std::fmt::Debug for RingPeerPicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RingPeerPicker")
            .field("self_name", &self.self_name)
            .finish()
    }
}
