//! Cross-module behavior of the consistent-hash ring that isn't a property
//! of any single function in isolation.

use groupcache_rs::ring::Ring;
use std::collections::HashMap;

#[test]
fn removing_a_peer_only_moves_the_keys_it_owned() {
    let mut ring = Ring::new(50);
    ring.add(&["a", "b", "c", "d"]);

    let keys: Vec<String> = (0..500).map(|i| format!("k{i}")).collect();
    let owners_before: HashMap<&String, String> = keys
        .iter()
        .map(|k| (k, ring.get(k).unwrap().to_string()))
        .collect();

    ring.remove("b");

    let mut moved = 0;
    for key in &keys {
        let owner_after = ring.get(key).unwrap();
        assert_ne!(owner_after, "b");
        if owners_before[key] != "b" && owners_before[key] != owner_after {
            moved += 1;
        }
    }
    // Only keys owned by the removed node should have moved.
    assert_eq!(moved, 0);
}

#[test]
fn rebuilding_the_ring_from_scratch_is_deterministic() {
    let names = ["alpha", "beta", "gamma"];
    let mut first = Ring::new(30);
    first.add(&names);
    let mut second = Ring::new(30);
    second.add(&names);

    for i in 0..200 {
        let key = format!("key-{i}");
        assert_eq!(first.get(&key), second.get(&key));
    }
}
