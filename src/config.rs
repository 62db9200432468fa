//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Default freshness window in milliseconds
pub const DEFAULT_MAX_AGE_MS: u64 = 60_000;

/// Default bound on a single upstream lookup in milliseconds
pub const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 2_000;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long a fetched price stays fresh, in milliseconds
    pub max_age_ms: u64,
    /// Upper bound on each upstream lookup, in milliseconds
    pub lookup_timeout_ms: u64,
    /// Collapse concurrent refreshes of the same key into one upstream call
    pub single_flight: bool,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PRICE_CACHE_MAX_AGE_MS` - Freshness window (default: 60000)
    /// - `PRICE_CACHE_LOOKUP_TIMEOUT_MS` - Upstream lookup timeout (default: 2000)
    /// - `PRICE_CACHE_SINGLE_FLIGHT` - `true`/`1` to enable single-flight (default: false)
    pub fn from_env() -> Self {
        Self {
            max_age_ms: env::var("PRICE_CACHE_MAX_AGE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_AGE_MS),
            lookup_timeout_ms: env::var("PRICE_CACHE_LOOKUP_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_LOOKUP_TIMEOUT_MS),
            single_flight: env::var("PRICE_CACHE_SINGLE_FLIGHT")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }

    /// Freshness window as a `Duration`.
    pub fn max_age(&self) -> Duration {
        Duration::from_millis(self.max_age_ms)
    }

    /// Upstream lookup timeout as a `Duration`.
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    /// Rejects settings the cache cannot run with.
    ///
    /// A zero max age is allowed and disables caching; a zero lookup timeout
    /// would fail every upstream call and is refused.
    pub fn validate(&self) -> Result<()> {
        if self.lookup_timeout_ms == 0 {
            return Err(CacheError::InvalidConfig(
                "lookup timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_age_ms: DEFAULT_MAX_AGE_MS,
            lookup_timeout_ms: DEFAULT_LOOKUP_TIMEOUT_MS,
            single_flight: false,
        }
    }
}
