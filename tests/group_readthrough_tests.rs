//! End-to-end `Group` scenarios spanning the cache, single-flight, and peer
//! fallback layers together.

use groupcache_rs::error::CacheError;
use groupcache_rs::group::{Group, Loader};
use groupcache_rs::peer::{PeerGetter, PeerPicker};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

fn counting_loader(calls: Arc<AtomicUsize>, value: &'static str) -> Box<dyn Loader> {
    Box::new(move |_: &str| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok::<_, CacheError>(value.as_bytes().to_vec())
    })
}

#[test]
fn missing_key_returns_not_found_without_panicking() {
    let group = Group::new(
        "namespace",
        0,
        Box::new(|_: &str| Err(CacheError::NotFound)) as Box<dyn Loader>,
    );
    assert_eq!(group.get("ghost"), Err(CacheError::NotFound));
}

#[test]
fn repeated_concurrent_misses_across_many_keys_each_load_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let group = Arc::new(Group::new("ns", 0, counting_loader(Arc::clone(&calls), "v")));
    let barrier = Arc::new(Barrier::new(16));

    let handles: Vec<_> = (0..16)
        .map(|t| {
            let group = Arc::clone(&group);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                // Each thread hits the same 4 keys, so each key should load once.
                group.get(&format!("k{}", t % 4)).unwrap();
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

struct FlakyPeer {
    fail: bool,
}

impl PeerGetter for FlakyPeer {
    fn get(&self, _namespace: &str, key: &str) -> Result<Vec<u8>, CacheError> {
        if self.fail {
            Err(CacheError::PeerFailure("timeout".to_string()))
        } else {
            Ok(format!("from-peer-{key}").into_bytes())
        }
    }
}

struct SinglePeerPicker(Arc<dyn PeerGetter>);
impl PeerPicker for SinglePeerPicker {
    fn pick_peer(&self, _key: &str) -> Option<Arc<dyn PeerGetter>> {
        Some(Arc::clone(&self.0))
    }
}

#[test]
fn peer_fallback_populates_local_cache_from_loader_not_peer() {
    let calls = Arc::new(AtomicUsize::new(0));
    let group = Group::new("ns", 0, counting_loader(Arc::clone(&calls), "local-value"));
    group.register_peers(Arc::new(SinglePeerPicker(Arc::new(FlakyPeer { fail: true }))));

    let value = group.get("k").unwrap();
    assert_eq!(value.as_str(), "local-value");
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Second get is served from the cache the loader populated, not the peer.
    let value2 = group.get("k").unwrap();
    assert_eq!(value2.as_str(), "local-value");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn healthy_peer_short_circuits_the_loader() {
    let calls = Arc::new(AtomicUsize::new(0));
    let group = Group::new("ns", 0, counting_loader(Arc::clone(&calls), "unused"));
    group.register_peers(Arc::new(SinglePeerPicker(Arc::new(FlakyPeer { fail: false }))));

    let value = group.get("widget").unwrap();
    assert_eq!(value.as_str(), "from-peer-widget");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
