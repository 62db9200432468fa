//! Single-Flight Gates
//!
//! Per-key async locks used when single-flight mode is enabled, so that only
//! one caller at a time refreshes a given key.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

// == Flight Gates ==
/// One async mutex per key currently being refreshed.
#[derive(Debug, Default)]
pub struct FlightGates {
    gates: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl FlightGates {
    pub fn new() -> Self {
        Self::default()
    }

    // == Enter ==
    /// Waits for exclusive access to `key`.
    ///
    /// The gate is released when the returned guard is dropped.
    pub async fn enter(&self, key: &str) -> FlightGuard<'_> {
        let gate = {
            let mut gates = self.gates.lock().unwrap_or_else(PoisonError::into_inner);
            gates.entry(key.to_string()).or_default().clone()
        };

        let turn = gate.lock_owned().await;
        FlightGuard {
            gates: self,
            key: key.to_string(),
            _turn: turn,
        }
    }

    /// Number of keys with a live gate.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.gates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// == Flight Guard ==
/// Exclusive turn on one key's gate.
#[derive(Debug)]
pub struct FlightGuard<'a> {
    gates: &'a FlightGates,
    key: String,
    _turn: OwnedMutexGuard<()>,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        let mut gates = self
            .gates
            .gates
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // The map and this guard hold the only references: nobody is waiting.
        let idle = gates
            .get(&self.key)
            .is_some_and(|gate| Arc::strong_count(gate) == 2);
        if idle {
            gates.remove(&self.key);
        }
    }
}
