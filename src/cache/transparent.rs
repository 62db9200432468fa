//! Transparent Cache Module
//!
//! Read-through cache in front of a `PriceService`, with a concurrent batch
//! lookup that fails fast on the first error.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, CacheStats, FlightGates, Lookup, PriceStore, StatsRecorder};
use crate::config::{CacheConfig, DEFAULT_LOOKUP_TIMEOUT_MS};
use crate::error::{CacheError, Result};
use crate::service::PriceService;
use crate::tasks::spawn_lookup_task;

// == Transparent Cache ==
/// Remembers prices fetched from the wrapped service and only returns them
/// while they are younger than `max_age`.
///
/// Cloning is cheap and every clone shares the same store.
pub struct TransparentCache<S: PriceService + ?Sized> {
    inner: Arc<Inner<S>>,
}

struct Inner<S: PriceService + ?Sized> {
    service: Arc<S>,
    store: PriceStore,
    stats: StatsRecorder,
    max_age: Duration,
    lookup_timeout: Duration,
    /// Present only in single-flight mode
    flights: Option<FlightGates>,
}

impl<S: PriceService + ?Sized> Clone for TransparentCache<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: PriceService + ?Sized> TransparentCache<S> {
    // == Constructors ==
    /// Creates a cache with the default lookup timeout and no single-flight.
    ///
    /// A zero `max_age` is accepted and makes every lookup go upstream.
    pub fn new(service: Arc<S>, max_age: Duration) -> Self {
        Self::build(
            service,
            max_age,
            Duration::from_millis(DEFAULT_LOOKUP_TIMEOUT_MS),
            false,
        )
    }

    /// Creates a cache from a validated `CacheConfig`.
    pub fn with_config(service: Arc<S>, config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(
            service,
            config.max_age(),
            config.lookup_timeout(),
            config.single_flight,
        ))
    }

    fn build(
        service: Arc<S>,
        max_age: Duration,
        lookup_timeout: Duration,
        single_flight: bool,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                service,
                store: PriceStore::new(),
                stats: StatsRecorder::new(),
                max_age,
                lookup_timeout,
                flights: single_flight.then(FlightGates::new),
            }),
        }
    }

    // == Get Price ==
    /// Gets the price for an item, from the cache if fresh, otherwise from
    /// the wrapped service.
    ///
    /// A failed lookup leaves any existing (stale) entry untouched. Without
    /// single-flight, concurrent callers for the same key may each go upstream
    /// and the last one to finish wins the store slot.
    ///
    /// A miss finishes within one lookup timeout, including any time spent
    /// waiting behind another caller in single-flight mode.
    pub async fn get_price_for(&self, item_code: &str) -> Result<f64> {
        let lookup = self.inner.store.lookup(item_code, self.inner.max_age).await;
        if let Lookup::Fresh(entry) = lookup {
            return Ok(self.serve_hit(item_code, entry));
        }

        let deadline = Instant::now() + self.inner.lookup_timeout;
        let Some(flights) = &self.inner.flights else {
            return self.refresh(item_code, lookup, deadline).await;
        };

        let _turn = match tokio::time::timeout_at(deadline, flights.enter(item_code)).await {
            Ok(turn) => turn,
            Err(_) => return Err(self.timed_out(item_code)),
        };
        // Whoever held the gate before us may have refreshed the entry
        let lookup = self.inner.store.lookup(item_code, self.inner.max_age).await;
        if let Lookup::Fresh(entry) = lookup {
            return Ok(self.serve_hit(item_code, entry));
        }
        self.refresh(item_code, lookup, deadline).await
    }

    fn serve_hit(&self, item_code: &str, entry: CacheEntry) -> f64 {
        self.inner.stats.record_hit();
        debug!(item_code, age_ms = entry.age().as_millis() as u64, "cache hit");
        entry.value
    }

    async fn refresh(&self, item_code: &str, previous: Lookup, deadline: Instant) -> Result<f64> {
        match previous {
            Lookup::Missing => {
                self.inner.stats.record_miss();
                debug!(item_code, "cache miss");
            }
            Lookup::Stale(entry) => {
                self.inner.stats.record_refresh();
                debug!(item_code, stale_value = entry.value, "refreshing stale price");
            }
            Lookup::Fresh(_) => {}
        }

        let outcome =
            tokio::time::timeout_at(deadline, self.inner.service.get_price_for(item_code)).await;

        let price = match outcome {
            Ok(Ok(price)) => price,
            Ok(Err(err)) => {
                self.inner.stats.record_failure(false);
                warn!(item_code, error = %err, "price service lookup failed");
                return Err(CacheError::service(item_code, err));
            }
            Err(_) => return Err(self.timed_out(item_code)),
        };

        self.inner.store.insert(item_code, CacheEntry::new(price)).await;
        Ok(price)
    }

    fn timed_out(&self, item_code: &str) -> CacheError {
        let timeout = self.inner.lookup_timeout;
        self.inner.stats.record_failure(true);
        warn!(item_code, ?timeout, "price service lookup timed out");
        CacheError::deadline_exceeded(item_code, timeout)
    }

    // == Get Prices ==
    /// Gets the prices for several items at once, one concurrent lookup per
    /// item code.
    ///
    /// Prices come back in completion order, not request order. The first
    /// failed lookup fails the whole call; the remaining lookups keep running
    /// in the background and still populate the cache, but their results are
    /// discarded.
    pub async fn get_prices_for<K: AsRef<str>>(&self, item_codes: &[K]) -> Result<Vec<f64>> {
        let expected = item_codes.len();
        if expected == 0 {
            return Ok(Vec::new());
        }

        let (tx, mut rx) = mpsc::channel(expected);
        for item_code in item_codes {
            spawn_lookup_task(self.clone(), item_code.as_ref().to_string(), tx.clone());
        }
        drop(tx);

        let mut prices = Vec::with_capacity(expected);
        while prices.len() < expected {
            match rx.recv().await {
                Some(Ok(price)) => prices.push(price),
                Some(Err(err)) => {
                    warn!(
                        requested = expected,
                        completed = prices.len(),
                        error = %err,
                        "batch lookup failed fast"
                    );
                    return Err(CacheError::BatchFailed(Box::new(err)));
                }
                None => {
                    return Err(CacheError::Internal(format!(
                        "{} lookup task(s) ended without reporting",
                        expected - prices.len()
                    )));
                }
            }
        }

        info!(count = expected, "batch lookup complete");
        Ok(prices)
    }

    // == Introspection ==
    /// Returns a copy of the stored entry for `item_code`, fresh or not.
    pub async fn entry(&self, item_code: &str) -> Option<CacheEntry> {
        self.inner.store.get(item_code).await
    }

    /// Returns the current number of cached prices.
    pub async fn len(&self) -> usize {
        self.inner.store.len().await
    }

    /// Returns true if nothing has been cached yet.
    pub async fn is_empty(&self) -> bool {
        self.inner.store.is_empty().await
    }

    /// Returns a snapshot of the cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let total_entries = self.inner.store.len().await;
        self.inner.stats.snapshot(total_entries)
    }

    /// Freshness window fixed at construction.
    pub fn max_age(&self) -> Duration {
        self.inner.max_age
    }

    /// Upper bound on a single lookup that misses the cache.
    pub fn lookup_timeout(&self) -> Duration {
        self.inner.lookup_timeout
    }

    /// Returns true if concurrent refreshes of one key share an upstream call.
    pub fn is_single_flight(&self) -> bool {
        self.inner.flights.is_some()
    }
}
