//! Group Metrics System
//!
//! Provides a metrics snapshot for [`crate::group::Group`], reported as a
//! `BTreeMap` for deterministic, reproducible ordering — useful whether the
//! consumer is a test assertion or a dashboard exporter.
//!
//! # Why BTreeMap over HashMap
//!
//! - Deterministic ordering: metrics always appear in the same order.
//! - Stable serialization: JSON/CSV exports have predictable key ordering.
//! - The performance difference (O(log n) vs O(1)) is negligible at this
//!   key count.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// A point-in-time copy of a [`GroupMetrics`]'s counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GroupMetricsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub loader_calls: u64,
    pub loader_failures: u64,
    pub peer_attempts: u64,
    pub peer_failures: u64,
    pub bytes_served: u64,
}

impl GroupMetricsSnapshot {
    /// Fraction of `get` calls served from the local cache, or `0.0` if
    /// there have been no requests yet.
    pub fn hit_rate(&self) -> f64 {
        let requests = self.hits + self.misses;
        if requests > 0 {
            self.hits as f64 / requests as f64
        } else {
            0.0
        }
    }
}

/// Uniform interface for retrieving metrics as key-value pairs in
/// deterministic order.
pub trait CacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64>;
    fn algorithm_name(&self) -> &'static str;
}

impl CacheMetrics for GroupMetricsSnapshot {
    fn metrics(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();
        metrics.insert("hits".to_string(), self.hits as f64);
        metrics.insert("misses".to_string(), self.misses as f64);
        metrics.insert("loader_calls".to_string(), self.loader_calls as f64);
        metrics.insert("loader_failures".to_string(), self.loader_failures as f64);
        metrics.insert("peer_attempts".to_string(), self.peer_attempts as f64);
        metrics.insert("peer_failures".to_string(), self.peer_failures as f64);
        metrics.insert("bytes_served".to_string(), self.bytes_served as f64);
        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics
    }

    fn algorithm_name(&self) -> &'static str {
        "Group"
    }
}

/// Live, lock-free counters backing a [`crate::group::Group`].
///
/// Every field is an independent [`AtomicU64`]; a snapshot is not
/// transactionally consistent across fields, which is an acceptable
/// trade-off for an observability side-channel that nothing in the `get`
/// pipeline depends on.
#[derive(Debug, Default)]
pub struct GroupMetricsCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    loader_calls: AtomicU64,
    loader_failures: AtomicU64,
    peer_attempts: AtomicU64,
    peer_failures: AtomicU64,
    bytes_served: AtomicU64,
}

impl GroupMetricsCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self, bytes: u64) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        self.bytes_served.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_loader_call(&self) {
        self.loader_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_loader_failure(&self) {
        self.loader_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_peer_attempt(&self) {
        self.peer_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_peer_failure(&self) {
        self.peer_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_bytes_served(&self, bytes: u64) {
        self.bytes_served.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> GroupMetricsSnapshot {
        GroupMetricsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            loader_calls: self.loader_calls.load(Ordering::Relaxed),
            loader_failures: self.loader_failures.load(Ordering::Relaxed),
            peer_attempts: self.peer_attempts.load(Ordering::Relaxed),
            peer_failures: self.peer_failures.load(Ordering::Relaxed),
            bytes_served: self.bytes_served.load(Ordering::Relaxed),
        }
    }
}
