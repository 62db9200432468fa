//! Price Store Module
//!
//! The key -> entry map shared by every lookup, guarded by a single RwLock.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::CacheEntry;

// == Lookup Outcome ==
/// What a read of the store found for a key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup {
    /// A fresh entry; its value can be served as-is
    Fresh(CacheEntry),
    /// An entry exists but its freshness window has passed
    Stale(CacheEntry),
    /// No entry has ever been stored for the key
    Missing,
}

// == Price Store ==
/// Map from item code to the last successfully fetched price.
///
/// Entries are copied out, never borrowed, so readers cannot observe a
/// half-replaced entry. There is no eviction: an entry lives until a newer
/// one replaces it.
#[derive(Debug, Default)]
pub struct PriceStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl PriceStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Lookup ==
    /// Classifies the entry for `key` against `max_age`.
    pub async fn lookup(&self, key: &str, max_age: Duration) -> Lookup {
        match self.get(key).await {
            Some(entry) if entry.is_fresh(max_age) => Lookup::Fresh(entry),
            Some(entry) => Lookup::Stale(entry),
            None => Lookup::Missing,
        }
    }

    // == Get ==
    /// Returns a copy of the entry for `key`, fresh or not.
    pub async fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.read().await.get(key).copied()
    }

    // == Insert ==
    /// Installs `entry` for `key`, replacing any previous entry.
    pub async fn insert(&self, key: &str, entry: CacheEntry) {
        let previous = {
            let mut entries = self.entries.write().await;
            entries.insert(key.to_string(), entry)
        };

        debug!(
            key,
            value = entry.value,
            replaced = previous.is_some(),
            "stored price"
        );
    }

    // == Length ==
    /// Returns the current number of entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    // == Is Empty ==
    /// Returns true if nothing has been stored yet.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
