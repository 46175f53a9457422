//! Event types emitted by TD modules to downstream consumers (UI, CLI).
//!
//! Every operation outcome, success or failure, is mirrored on this channel
//! with a message fit for display, so a front end can render alerts without
//! inspecting error types.

use aster_core::{AccountSnapshot, OrderAck};
use rust_decimal::Decimal;

/// A typed event emitted by a [`TdModule`](crate::TdModule) implementation.
#[derive(Debug, Clone)]
pub enum TdEvent {
    /// The exchange accepted an order.
    OrderPlaced(OrderAck),

    /// An order failed locally or was refused by the exchange.
    OrderRejected {
        symbol: String,
        /// Human-readable reason.
        message: String,
    },

    /// A fresh account snapshot was fetched.
    BalanceUpdated(AccountSnapshot),

    /// A wallet transfer completed.
    TransferCompleted {
        asset: String,
        amount: Decimal,
        tran_id: Option<u64>,
    },

    /// A non-order operation failed.
    Error {
        /// Operation name (`"account"`, `"transfer"`, ...).
        operation: &'static str,
        /// Human-readable reason.
        message: String,
    },
}

/// Sender half of the TD event channel.
pub type TdEventSender = tokio::sync::mpsc::UnboundedSender<TdEvent>;

/// Receiver half of the TD event channel.
pub type TdEventReceiver = tokio::sync::mpsc::UnboundedReceiver<TdEvent>;
