//! Capability contracts a [`crate::group::Group`] uses to fetch a key from a
//! remote node before falling back to its local loader.
//!
//! These are deliberately small trait objects rather than a trait hierarchy:
//! any transport (HTTP, gRPC, an in-memory channel for tests) implements
//! [`PeerGetter`] and is registered with a [`PeerPicker`] such as
//! [`crate::ring::RingPeerPicker`]; the group never depends on the transport
//! directly.

use crate::error::CacheError;
use std::sync::Arc;

/// Selects which peer, if any, owns a key.
///
/// Implementations MUST return `None` when the owning node is the picker's
/// own identity — otherwise a node could issue a recursive fetch to itself.
/// `None` also covers "no peers configured", in which case the group falls
/// back to its local loader.
pub trait PeerPicker: Send + Sync {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}

/// Fetches a key from a specific remote peer.
///
/// Implementors own the transport (HTTP, gRPC, ...); a failure is reported
/// as a [`CacheError::PeerFailure`] and the caller falls back to its loader.
/// Peer failures are not retried by the peer itself.
pub trait PeerGetter: Send + Sync {
    fn get(&self, namespace: &str, key: &str) -> Result<Vec<u8>, CacheError>;
}
