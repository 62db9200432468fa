//! Price Cache - A read-through cache for an expensive price service
//!
//! Serves prices younger than a configured max age from memory and fans
//! batch lookups out across concurrent tasks, failing fast on the first error.

pub mod cache;
pub mod config;
pub mod error;
pub mod service;
pub mod tasks;

pub use cache::TransparentCache;
pub use config::CacheConfig;
pub use error::{CacheError, LookupCause};
pub use service::PriceService;
