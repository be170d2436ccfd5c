// Simple benchmarks using criterion instead of unstable test feature
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use groupcache_rs::error::CacheError;
use groupcache_rs::group::{Group, Loader};
use groupcache_rs::ring::Ring;

const CACHE_SIZE: usize = 1_000;
const NUM_OPERATIONS: usize = 10_000;

fn noop_loader() -> Box<dyn Loader> {
    Box::new(|key: &str| Ok::<_, CacheError>(key.as_bytes().to_vec()))
}

fn bench_group_cache_hits(c: &mut Criterion) {
    let group = Group::new("bench", 0, noop_loader());
    for i in 0..CACHE_SIZE {
        group.get(&format!("key-{i}")).unwrap();
    }

    c.bench_function("group_get_all_hits", |b| {
        b.iter(|| {
            for i in 0..NUM_OPERATIONS {
                let key = format!("key-{}", i % CACHE_SIZE);
                black_box(group.get(&key).unwrap());
            }
        });
    });
}

fn bench_group_cache_misses(c: &mut Criterion) {
    c.bench_function("group_get_all_misses", |b| {
        b.iter(|| {
            let group = Group::new("bench-miss", 0, noop_loader());
            for i in 0..NUM_OPERATIONS {
                black_box(group.get(&format!("miss-{i}")).unwrap());
            }
        });
    });
}

fn bench_ring_lookup(c: &mut Criterion) {
    let mut ring = Ring::new(50);
    let nodes: Vec<String> = (0..16).map(|i| format!("node-{i}")).collect();
    let node_refs: Vec<&str> = nodes.iter().map(String::as_str).collect();
    ring.add(&node_refs);

    c.bench_function("ring_get", |b| {
        b.iter(|| {
            for i in 0..NUM_OPERATIONS {
                black_box(ring.get(&format!("key-{i}")));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_group_cache_hits,
    bench_group_cache_misses,
    bench_ring_lookup
);
criterion_main!(benches);
