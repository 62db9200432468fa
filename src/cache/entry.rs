//! Cache Entry Module
//!
//! Defines a cached price together with the instant it was fetched.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A price produced by one successful upstream lookup.
///
/// Entries are never mutated; a refresh installs a new one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheEntry {
    /// The fetched price
    pub value: f64,
    /// When the upstream lookup completed
    pub created_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry stamped with the current time.
    pub fn new(value: f64) -> Self {
        Self {
            value,
            created_at: Instant::now(),
        }
    }

    // == Freshness ==
    /// Checks if the entry is still fresh for the given max age.
    ///
    /// Boundary condition: an entry is stale once `now >= created_at + max_age`,
    /// so a zero max age makes every entry stale immediately.
    pub fn is_fresh(&self, max_age: Duration) -> bool {
        self.is_fresh_at(Instant::now(), max_age)
    }

    /// Freshness evaluated at an explicit instant.
    pub fn is_fresh_at(&self, now: Instant, max_age: Duration) -> bool {
        now.saturating_duration_since(self.created_at) < max_age
    }

    // == Age ==
    /// Time elapsed since the entry was fetched.
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}
