//! Error types shared across the cache coordination layer.
//!
//! [`CacheError`] is [`Clone`] because single-flight coalescing
//! (see [`crate::singleflight`]) must hand the identical error to every
//! waiter on a failed load, not just the leader that performed it.

use thiserror::Error;

/// An error produced while resolving a key through a [`crate::group::Group`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// `Get` was called with an empty key.
    #[error("key is required")]
    EmptyKey,

    /// Neither the cache, a peer, nor the loader produced a value for the key.
    #[error("value not found for key")]
    NotFound,

    /// The registered [`crate::group::Loader`] returned an error.
    #[error("loader failed: {0}")]
    LoaderFailure(String),

    /// A remote peer's [`crate::peer::PeerGetter::get`] returned an error.
    #[error("peer fetch failed: {0}")]
    PeerFailure(String),

    /// The group or registry was used in a way that violates its setup
    /// invariants (e.g. registering peers twice, duplicate group names).
    #[error("misconfiguration: {0}")]
    Misconfiguration(String),
}
