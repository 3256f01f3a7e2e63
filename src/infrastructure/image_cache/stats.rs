//! Counters describing image cache behaviour.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters, updated without taking the cache lock.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    network_requests: AtomicU64,
    coalesced: AtomicU64,
    cancelled: AtomicU64,
}

impl Counters {
    pub(crate) fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn network_request(&self) {
        self.network_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn coalesced(&self) {
        self.coalesced.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn cancelled(&self, operations: u64) {
        self.cancelled.fetch_add(operations, Ordering::Relaxed);
    }

    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn snapshot(&self, cached: usize, in_flight: usize) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        CacheStats {
            hits,
            misses,
            hit_rate,
            network_requests: self.network_requests.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            cached,
            in_flight,
        }
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    /// Requests served from decoded images already in memory.
    pub hits: u64,
    /// Requests that had to join or start a network operation.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Network operations started.
    pub network_requests: u64,
    /// Requests attached to an operation that was already running.
    pub coalesced: u64,
    /// Network operations cancelled because no caller was left.
    pub cancelled: u64,
    /// Decoded images currently held.
    pub cached: usize,
    /// URLs with an outstanding network operation.
    pub in_flight: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {} images, {} in flight, {:.1}% hit rate ({} hits, {} misses, {} fetched, {} coalesced, {} cancelled)",
            self.cached,
            self.in_flight,
            self.hit_rate,
            self.hits,
            self.misses,
            self.network_requests,
            self.coalesced,
            self.cancelled
        )
    }
}
