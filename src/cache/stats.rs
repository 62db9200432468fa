//! Cache Statistics Module
//!
//! Tracks hits, misses, refreshes and upstream failures.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time snapshot of cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups served from a fresh entry
    pub hits: u64,
    /// Lookups for keys with no entry at all
    pub misses: u64,
    /// Lookups that found a stale entry and went upstream
    pub refreshes: u64,
    /// Upstream lookups that failed, timeouts included
    pub lookup_failures: u64,
    /// Upstream lookups that hit the deadline
    pub timeouts: u64,
    /// Current number of entries in the store
    pub total_entries: usize,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses + refreshes), or 0.0 if no lookups were made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses + self.refreshes;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Recorder ==
/// Lock-free counters shared by every caller of the cache.
#[derive(Debug, Default)]
pub struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    refreshes: AtomicU64,
    lookup_failures: AtomicU64,
    timeouts: AtomicU64,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a failed upstream lookup; `timed_out` also bumps the timeout counter.
    pub fn record_failure(&self, timed_out: bool) {
        self.lookup_failures.fetch_add(1, Ordering::Relaxed);
        if timed_out {
            self.timeouts.fetch_add(1, Ordering::Relaxed);
        }
    }

    // == Snapshot ==
    /// Reads all counters into a `CacheStats`.
    pub fn snapshot(&self, total_entries: usize) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            refreshes: self.refreshes.load(Ordering::Relaxed),
            lookup_failures: self.lookup_failures.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            total_entries,
        }
    }
}
