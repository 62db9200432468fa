//! Upstream Price Service
//!
//! The slow lookup the cache sits in front of.

use async_trait::async_trait;

// == Price Service ==
/// Source of truth for item prices.
///
/// Calls are assumed to be expensive. The cache treats each call as
/// independent: no retries, no assumptions about ordering or idempotence.
#[async_trait]
pub trait PriceService: Send + Sync + 'static {
    /// Fetches the current price for `item_code`.
    async fn get_price_for(&self, item_code: &str) -> anyhow::Result<f64>;
}
