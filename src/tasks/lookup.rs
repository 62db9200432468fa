//! Lookup Task
//!
//! One spawned task per item code of a batch lookup.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::TransparentCache;
use crate::error::{CacheError, Result};
use crate::service::PriceService;

/// Spawns a task that resolves `item_code` through the cache and sends the
/// outcome on `results`.
///
/// The task is detached from the batch that spawned it: if the receiver is
/// gone (the batch already failed fast), the outcome is dropped, but a
/// successful lookup has still been written to the cache. Every task ends
/// within the cache's lookup timeout.
///
/// The lookup itself runs in a nested task so that a panic in the price
/// service is reported on `results` as `CacheError::Internal` instead of
/// silently closing the channel.
///
/// # Arguments
/// * `cache` - Shared handle to the cache
/// * `item_code` - The key to resolve
/// * `results` - Sender half of the batch's result channel
///
/// # Returns
/// A JoinHandle for the spawned task. Batch lookups drop it without aborting.
pub fn spawn_lookup_task<S>(
    cache: TransparentCache<S>,
    item_code: String,
    results: mpsc::Sender<Result<f64>>,
) -> JoinHandle<()>
where
    S: PriceService + ?Sized,
{
    tokio::spawn(async move {
        let lookup = {
            let item_code = item_code.clone();
            tokio::spawn(async move { cache.get_price_for(&item_code).await })
        };

        let outcome = match lookup.await {
            Ok(outcome) => outcome,
            Err(join_err) => {
                warn!(item_code = %item_code, error = %join_err, "lookup task did not complete");
                Err(CacheError::Internal(format!(
                    "lookup for {item_code} did not complete: {join_err}"
                )))
            }
        };

        if results.send(outcome).await.is_err() {
            debug!(item_code = %item_code, "batch already finished, discarding lookup outcome");
        }
    })
}
