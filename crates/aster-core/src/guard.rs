//! Double-submit protection for order placement.
//!
//! Two taps on the same button produce two signed requests with distinct
//! timestamps, and the exchange happily accepts both. [`InFlightGuard`]
//! tracks which orders are currently being submitted and refuses a second
//! submission while the first is still in flight:
//!
//! 1. by `(symbol, side)` — the same intent fired twice;
//! 2. by client order id — the same idempotency token reused.
//!
//! Entries are released when the returned [`InFlightTicket`] is dropped, so a
//! failed or cancelled submission never leaves a stale entry behind.

use std::sync::{Arc, Mutex, MutexGuard};

use ahash::AHashSet;

use crate::error::{AsterError, Result};
use crate::types::Side;

#[derive(Default)]
struct InFlightState {
    intents: AHashSet<(String, Side)>,
    client_ids: AHashSet<String>,
}

/// Set of orders currently being submitted.
///
/// Cheap to clone; clones share state. Thread-safe.
#[derive(Clone, Default)]
pub struct InFlightGuard {
    state: Arc<Mutex<InFlightState>>,
}

impl InFlightGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an order as in flight.
    ///
    /// Returns [`AsterError::DuplicateOrder`] if the same `(symbol, side)` or the
    /// same `client_order_id` is already registered. Symbols compare
    /// case-insensitively.
    pub fn try_acquire(
        &self,
        symbol: &str,
        side: Side,
        client_order_id: &str,
    ) -> Result<InFlightTicket> {
        let intent = (symbol.to_ascii_uppercase(), side);
        let mut state = self.lock();

        if state.client_ids.contains(client_order_id) {
            return Err(AsterError::DuplicateOrder(format!(
                "order with client id {client_order_id} is already being submitted"
            )));
        }
        if state.intents.contains(&intent) {
            return Err(AsterError::DuplicateOrder(format!(
                "a {} order for {} is already being submitted",
                side, intent.0
            )));
        }

        state.intents.insert(intent.clone());
        state.client_ids.insert(client_order_id.to_string());

        Ok(InFlightTicket {
            state: Arc::clone(&self.state),
            intent,
            client_order_id: client_order_id.to_string(),
        })
    }

    /// Number of orders currently in flight.
    pub fn len(&self) -> usize {
        self.lock().client_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, InFlightState> {
        // a panic while holding the lock cannot leave the sets half-updated
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Proof that an order is registered as in flight. Dropping it releases the entry.
pub struct InFlightTicket {
    state: Arc<Mutex<InFlightState>>,
    intent: (String, Side),
    client_order_id: String,
}

impl InFlightTicket {
    pub fn client_order_id(&self) -> &str {
        &self.client_order_id
    }
}

impl Drop for InFlightTicket {
    fn drop(&mut self) {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        state.intents.remove(&self.intent);
        state.client_ids.remove(&self.client_order_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_intent_rejected_while_in_flight() {
        let guard = InFlightGuard::new();
        let _t = guard.try_acquire("BTCUSDT", Side::Buy, "a").unwrap();
        let err = guard.try_acquire("btcusdt", Side::Buy, "b").err().unwrap();
        assert!(matches!(err, AsterError::DuplicateOrder(_)));
    }

    #[test]
    fn same_client_id_rejected() {
        let guard = InFlightGuard::new();
        let _t = guard.try_acquire("BTCUSDT", Side::Buy, "a").unwrap();
        assert!(guard.try_acquire("ETHUSDT", Side::Sell, "a").is_err());
    }

    #[test]
    fn different_side_allowed() {
        let guard = InFlightGuard::new();
        let _t1 = guard.try_acquire("BTCUSDT", Side::Buy, "a").unwrap();
        let _t2 = guard.try_acquire("BTCUSDT", Side::Sell, "b").unwrap();
        assert_eq!(guard.len(), 2);
    }

    #[test]
    fn drop_releases_entry() {
        let guard = InFlightGuard::new();
        {
            let t = guard.try_acquire("BTCUSDT", Side::Buy, "a").unwrap();
            assert_eq!(t.client_order_id(), "a");
            assert_eq!(guard.len(), 1);
        }
        assert!(guard.is_empty());
        assert!(guard.try_acquire("BTCUSDT", Side::Buy, "a").is_ok());
    }
}
