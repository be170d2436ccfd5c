//! Three in-process "nodes" sharing a scores dataset, demonstrating that a
//! lookup for the same key always resolves through the same owning node
//! regardless of which node's `Group` the caller happens to ask.
//!
//! Grounded in the original tutorial's `main.go`, which starts three HTTP
//! cache servers behind a ring and an API server in front of them; this
//! demo collapses the transport into in-memory `PeerGetter`s since the wire
//! protocol is out of scope for this crate.

use groupcache_rs::error::CacheError;
use groupcache_rs::group::{Group, Loader};
use groupcache_rs::ring::RingPeerPicker;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A source of truth shared by all nodes, standing in for a database.
fn scores() -> HashMap<&'static str, &'static str> {
    HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")])
}

fn scores_loader() -> Box<dyn Loader> {
    Box::new(|key: &str| {
        scores()
            .get(key)
            .map(|v| v.as_bytes().to_vec())
            .ok_or(CacheError::NotFound)
    })
}

/// Routes a `get` to another node's `Group` in-process, standing in for an
/// HTTP client.
struct InProcessPeer {
    group: Arc<Group>,
}

impl groupcache_rs::peer::PeerGetter for InProcessPeer {
    fn get(&self, _namespace: &str, key: &str) -> Result<Vec<u8>, CacheError> {
        self.group.get(key).map(|view| view.bytes())
    }
}

fn main() {
    env_logger::init();

    let node_names = ["node-a", "node-b", "node-c"];
    let groups: HashMap<&str, Arc<Group>> = node_names
        .iter()
        .map(|&name| (name, Arc::new(Group::new("scores", 2 << 10, scores_loader()))))
        .collect();

    for &name in &node_names {
        let picker = Arc::new(RingPeerPicker::new(name, 50));
        let peers = node_names
            .iter()
            .filter(|&&peer_name| peer_name != name)
            .map(|&peer_name| {
                let getter: Arc<dyn groupcache_rs::peer::PeerGetter> = Arc::new(InProcessPeer {
                    group: Arc::clone(&groups[peer_name]),
                });
                (peer_name.to_string(), getter)
            })
            .collect();
        picker.set_peers(peers);
        groups[name].register_peers(picker);
    }

    // Every node can resolve every key, converging on whichever node the
    // ring says owns it.
    let seen_from: Arc<Mutex<Vec<(&str, String)>>> = Arc::new(Mutex::new(Vec::new()));
    for &name in &node_names {
        for key in ["Tom", "Jack", "Sam"] {
            let value = groups[name].get(key).expect("key exists in the dataset");
            seen_from.lock().unwrap().push((name, value.as_str().into_owned()));
        }
    }

    for (node, value) in seen_from.lock().unwrap().iter() {
        println!("{node} resolved: {value}");
    }
}
