#![doc = include_str!("../README.md")]
//!
//! ## Modules
//!
//! - [`byte_view`]: immutable, cheaply-cloneable byte buffer returned from reads
//! - [`lru`]: byte-weighted LRU eviction, the bottom of the stack
//! - [`concurrent_cache`]: a mutex-guarded [`lru::LruCache`] for shared access
//! - [`ring`]: consistent hashing for peer placement
//! - [`singleflight`]: duplicate-suppression for concurrent loads
//! - [`peer`]: `PeerPicker`/`PeerGetter` capability contracts
//! - [`group`]: the `Group` coordinator applications talk to
//! - [`registry`]: process-wide lookup of named groups
//! - [`config`]: construction parameters for each component
//! - [`metrics`]: per-group hit/miss/loader/peer counters
//! - [`error`]: the `CacheError` type shared across the crate

pub mod byte_view;
pub mod entry;
pub(crate) mod list;

pub mod config;
pub mod lru;

pub mod concurrent_cache;
pub mod error;
pub mod group;
pub mod metrics;
pub mod peer;
pub mod registry;
pub mod ring;
pub mod singleflight;

pub use byte_view::ByteView;
pub use error::CacheError;
pub use group::{Group, Loader};
pub use registry::{get_group, new_group};
pub use ring::{Ring, RingPeerPicker};
