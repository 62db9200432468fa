//! Cache Module
//!
//! Provides a read-through price cache with time-based freshness and
//! concurrent batch lookups.

mod entry;
mod flight;
mod stats;
mod store;
mod transparent;


// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub(crate) use flight::FlightGates;
pub(crate) use stats::StatsRecorder;
pub(crate) use store::{Lookup, PriceStore};
pub use transparent::TransparentCache;
