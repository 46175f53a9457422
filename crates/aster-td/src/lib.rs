//! # aster-td
//!
//! Trading module for the Aster futures exchange.
//!
//! [`TdModule`] is the single interface front ends program against: account
//! balance, order placement, wallet transfers, and the public market data an
//! order form needs. [`aster::AsterTd`] implements it over signed REST calls.
//!
//! | Exchange | Module  | Account           | Order channel |
//! |----------|---------|-------------------|---------------|
//! | Aster    | `aster` | USDT-M futures    | signed REST   |

pub mod aster;
pub mod event;

use async_trait::async_trait;
use aster_core::{
    AccountSnapshot, OrderAck, OrderBook, OrderRequest, Result, Ticker24hr, TransferDirection,
    TransferResult,
};
use rust_decimal::Decimal;

/// Trait implemented by trading modules.
///
/// All operations take `&self` and may be called concurrently. Each call is
/// a single attempt: nothing is retried.
#[async_trait]
pub trait TdModule: Send + Sync {
    /// Fetch balances and derive the USDT wallet balance.
    async fn fetch_account_info(&self) -> Result<AccountSnapshot>;

    /// Validate, sign, and submit an order.
    ///
    /// Orders below the minimum notional fail with a validation error before
    /// any request is made.
    async fn place_order(&self, req: &OrderRequest) -> Result<OrderAck>;

    /// Move `amount` of `asset` between the spot wallet and the futures
    /// account, then refresh the account snapshot.
    async fn transfer(
        &self,
        asset: &str,
        amount: Decimal,
        direction: TransferDirection,
    ) -> Result<TransferResult>;

    /// 24h statistics for one symbol, or all symbols.
    async fn fetch_ticker_24hr(&self, symbol: Option<&str>) -> Result<Vec<Ticker24hr>>;

    /// Order book snapshot with `limit` levels per side.
    async fn fetch_order_book(&self, symbol: &str, limit: u32) -> Result<OrderBook>;
}
