//! Error types for the price cache
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use thiserror::Error;

// == Lookup Cause ==
/// Why a single upstream lookup failed.
#[derive(Error, Debug)]
pub enum LookupCause {
    /// The upstream service returned an error
    #[error(transparent)]
    Service(anyhow::Error),

    /// The upstream call did not finish within the lookup timeout
    #[error("deadline exceeded after {0:?}")]
    DeadlineExceeded(Duration),
}

// == Cache Error Enum ==
/// Unified error type for the price cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The upstream lookup for a key failed or timed out
    #[error("getting price for {key}: {cause}")]
    LookupFailed {
        key: String,
        #[source]
        cause: LookupCause,
    },

    /// First failure observed while fanning out a batch lookup.
    ///
    /// Other keys of the same batch may have failed too.
    #[error("batch lookup failed: {0}")]
    BatchFailed(#[source] Box<CacheError>),

    /// Rejected configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A lookup task ended without reporting a result
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// Wraps an upstream service error for `key`.
    pub fn service(key: impl Into<String>, err: anyhow::Error) -> Self {
        CacheError::LookupFailed {
            key: key.into(),
            cause: LookupCause::Service(err),
        }
    }

    /// Builds the timeout flavour of `LookupFailed` for `key`.
    pub fn deadline_exceeded(key: impl Into<String>, after: Duration) -> Self {
        CacheError::LookupFailed {
            key: key.into(),
            cause: LookupCause::DeadlineExceeded(after),
        }
    }

    /// Returns true if this error, or the batch failure it wraps, is a lookup timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            CacheError::LookupFailed {
                cause: LookupCause::DeadlineExceeded(_),
                ..
            } => true,
            CacheError::BatchFailed(inner) => inner.is_timeout(),
            _ => false,
        }
    }

    /// Key named by the failed lookup, looking through batch failures.
    pub fn key(&self) -> Option<&str> {
        match self {
            CacheError::LookupFailed { key, .. } => Some(key),
            CacheError::BatchFailed(inner) => inner.key(),
            _ => None,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the price cache.
pub type Result<T> = std::result::Result<T, CacheError>;
