//! Price Cache - demo wiring
//!
//! Puts a `TransparentCache` in front of a simulated slow price service and
//! runs the same batch twice, cold then warm.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use price_cache::{CacheConfig, PriceService, TransparentCache};

const ITEM_CODES: [&str; 5] = ["apple", "banana", "cherry", "durian", "elderberry"];

/// Stand-in for a remote pricing backend.
struct SimulatedPriceService {
    latency: Duration,
}

#[async_trait]
impl PriceService for SimulatedPriceService {
    async fn get_price_for(&self, item_code: &str) -> anyhow::Result<f64> {
        tokio::time::sleep(self.latency).await;
        let cents: u32 = item_code.bytes().map(u32::from).sum();
        Ok(f64::from(cents) / 100.0)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "price_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig::from_env();
    info!(
        "Configuration loaded: max_age={}ms, lookup_timeout={}ms, single_flight={}",
        config.max_age_ms, config.lookup_timeout_ms, config.single_flight
    );

    let service = Arc::new(SimulatedPriceService {
        latency: Duration::from_millis(300),
    });
    let cache = TransparentCache::with_config(service, &config)
        .context("building price cache")?;

    for pass in ["cold", "warm"] {
        let started = tokio::time::Instant::now();
        let prices = cache
            .get_prices_for(&ITEM_CODES)
            .await
            .with_context(|| format!("{pass} batch lookup"))?;
        info!(pass, elapsed = ?started.elapsed(), ?prices, "batch finished");
    }

    let stats = cache.stats().await;
    info!(
        "Cache stats: {}",
        serde_json::to_string(&stats).context("serializing stats")?
    );

    Ok(())
}
