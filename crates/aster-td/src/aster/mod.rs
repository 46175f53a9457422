//! Aster trading module.
//!
//! Implements the [`TdModule`](crate::TdModule) trait for the Aster
//! USDT-margined futures exchange (`https://fapi.asterdex.com`), whose REST
//! API follows the Binance futures conventions.
//!
//! # Architecture
//!
//! ```text
//! AsterTd
//! ├── order::prepare_order   (field checks, precision, min notional)
//! ├── InFlightGuard          (rejects double-submits before signing)
//! ├── FuturesClient          (signing + REST transport)
//! └── TdEvent channel        (user-facing outcome of every call)
//! ```
//!
//! All methods take `&self` and are safe to call from multiple tasks
//! concurrently. The last account snapshot sits behind a
//! [`tokio::sync::Mutex`].

pub mod auth;
pub mod config;
pub mod futures;
pub mod order;

use std::time::Duration;

use async_trait::async_trait;
use aster_core::guard::InFlightGuard;
use aster_core::{
    AccountSnapshot, AsterError, Credentials, OrderAck, OrderBook, OrderKind, OrderRequest, Result,
    Ticker24hr, TransferDirection, TransferResult, time_util,
};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use self::config::AsterTdConfig;
use self::futures::FuturesClient;
use crate::TdModule;
use crate::event::{TdEvent, TdEventReceiver, TdEventSender};

/// Order book depths the exchange serves.
pub const VALID_DEPTH_LIMITS: [u32; 7] = [5, 10, 20, 50, 100, 500, 1000];

/// Aster trading module.
pub struct AsterTd {
    /// Module configuration.
    config: AsterTdConfig,
    /// REST transport.
    client: FuturesClient,
    /// Orders currently being submitted.
    guard: InFlightGuard,
    /// Channel for emitting events to the front end.
    event_tx: TdEventSender,
    /// Most recent successful account snapshot.
    last_snapshot: Mutex<Option<AccountSnapshot>>,
}

impl AsterTd {
    /// Create a new Aster TD module.
    ///
    /// Returns the module and a receiver for [`TdEvent`]s. Fails if the
    /// config does not validate.
    pub fn new(
        config: AsterTdConfig,
        credentials: Credentials,
    ) -> Result<(Self, TdEventReceiver)> {
        config.validate()?;
        let timeout = Duration::from_millis(config.request_timeout_ms);
        let client = FuturesClient::new(credentials, config.base_url(), timeout)?;
        info!(
            "[aster-td] client ready: url={}, key={}…",
            client.base_url(),
            client.credentials().key_hint()
        );

        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let td = Self {
            config,
            client,
            guard: InFlightGuard::new(),
            event_tx: tx,
            last_snapshot: Mutex::new(None),
        };
        Ok((td, rx))
    }

    pub fn config(&self) -> &AsterTdConfig {
        &self.config
    }

    /// Number of orders currently in flight.
    pub fn in_flight(&self) -> usize {
        self.guard.len()
    }

    /// The snapshot from the last successful
    /// [`fetch_account_info`](TdModule::fetch_account_info).
    pub async fn last_snapshot(&self) -> Option<AccountSnapshot> {
        self.last_snapshot.lock().await.clone()
    }

    fn emit(&self, event: TdEvent) {
        let _ = self.event_tx.send(event);
    }

    fn report_error(&self, operation: &'static str, err: &AsterError) {
        if err.is_local() {
            warn!("[aster-td] {operation} rejected locally: {err}");
        } else {
            error!("[aster-td] {operation} failed: {err}");
        }
        self.emit(TdEvent::Error {
            operation,
            message: err.user_message(),
        });
    }

    /// Price used for the notional check: the limit price, or the last
    /// traded price for MARKET orders (fetched when the caller has none).
    async fn notional_price(&self, req: &OrderRequest, symbol: &str) -> Result<Option<Decimal>> {
        match req.kind {
            OrderKind::Limit => Ok(req.price),
            OrderKind::Market => {
                if let Some(price) = req.reference_price {
                    return Ok(Some(price));
                }
                let tickers = self.client.get_ticker_24hr(Some(symbol)).await?;
                Ok(tickers.first().map(|t| t.last_price))
            }
        }
    }

    async fn submit_order(&self, req: &OrderRequest) -> Result<OrderAck> {
        order::validate_fields(req)?;
        let symbol = req.symbol.trim().to_ascii_uppercase();
        let client_order_id = req
            .client_order_id
            .clone()
            .unwrap_or_else(order::new_client_order_id);
        // held until this call returns
        let _ticket = self.guard.try_acquire(&symbol, req.side, &client_order_id)?;

        let rules = self.config.rules.for_symbol(&symbol);
        let price = self.notional_price(req, &symbol).await?;
        let prepared = order::prepare_order(req, &rules, price, client_order_id)?;

        let timestamp = time_util::timestamp_param();
        let params = prepared.params(self.config.recv_window, &timestamp);
        debug!(
            notional = %prepared.notional,
            "[aster-td] submitting {} {} {} qty={} coid={}",
            prepared.symbol,
            prepared.side,
            prepared.kind,
            prepared.quantity,
            prepared.client_order_id,
        );

        let body = self.client.post_order(&params).await?;
        Ok(OrderAck::from_response(
            body,
            &prepared.symbol,
            prepared.side,
            &prepared.client_order_id,
        ))
    }

    async fn load_account(&self) -> Result<AccountSnapshot> {
        let body = self.client.get_account().await?;
        AccountSnapshot::from_account_json(body)
    }

    async fn submit_transfer(
        &self,
        asset: &str,
        amount: Decimal,
        direction: TransferDirection,
    ) -> Result<TransferResult> {
        let asset = asset.trim().to_ascii_uppercase();
        if asset.is_empty() {
            return Err(AsterError::Validation("asset is required".into()));
        }
        if amount <= Decimal::ZERO {
            return Err(AsterError::Validation(
                "transfer amount must be greater than zero".into(),
            ));
        }

        let amount_str = amount.normalize().to_string();
        let body = self
            .client
            .post_transfer(&asset, &amount_str, direction.type_code())
            .await?;
        let tran_id = body.get("tranId").and_then(|v| v.as_u64());
        info!(
            "[aster-td] transfer done: {amount_str} {asset} ({direction:?}) tranId={tran_id:?}"
        );

        // the transfer itself succeeded; a failed refresh only costs the snapshot
        let snapshot = match self.fetch_account_info().await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("[aster-td] balance refresh after transfer failed: {e}");
                None
            }
        };

        Ok(TransferResult {
            tran_id,
            snapshot,
            raw: body,
        })
    }
}

#[async_trait]
impl TdModule for AsterTd {
    async fn fetch_account_info(&self) -> Result<AccountSnapshot> {
        match self.load_account().await {
            Ok(snapshot) => {
                info!(
                    "[aster-td] account refreshed: {} asset(s), USDT balance={}",
                    snapshot.assets.len(),
                    snapshot.total_wallet_balance,
                );
                *self.last_snapshot.lock().await = Some(snapshot.clone());
                self.emit(TdEvent::BalanceUpdated(snapshot.clone()));
                Ok(snapshot)
            }
            Err(e) => {
                self.report_error("account", &e);
                Err(e)
            }
        }
    }

    async fn place_order(&self, req: &OrderRequest) -> Result<OrderAck> {
        match self.submit_order(req).await {
            Ok(ack) => {
                info!(
                    "[aster-td] order placed: {} {} {} qty={} → id={} status={}",
                    ack.symbol,
                    ack.side,
                    req.kind,
                    req.quantity,
                    ack.order_id,
                    ack.status,
                );
                self.emit(TdEvent::OrderPlaced(ack.clone()));
                Ok(ack)
            }
            Err(e) => {
                if e.is_local() {
                    warn!(
                        "[aster-td] order rejected locally: {} {}: {e}",
                        req.symbol, req.side
                    );
                } else {
                    error!("[aster-td] order failed: {} {}: {e}", req.symbol, req.side);
                }
                self.emit(TdEvent::OrderRejected {
                    symbol: req.symbol.clone(),
                    message: e.user_message(),
                });
                Err(e)
            }
        }
    }

    async fn transfer(
        &self,
        asset: &str,
        amount: Decimal,
        direction: TransferDirection,
    ) -> Result<TransferResult> {
        match self.submit_transfer(asset, amount, direction).await {
            Ok(result) => {
                self.emit(TdEvent::TransferCompleted {
                    asset: asset.trim().to_ascii_uppercase(),
                    amount,
                    tran_id: result.tran_id,
                });
                Ok(result)
            }
            Err(e) => {
                self.report_error("transfer", &e);
                Err(e)
            }
        }
    }

    async fn fetch_ticker_24hr(&self, symbol: Option<&str>) -> Result<Vec<Ticker24hr>> {
        let symbol = symbol.map(str::trim).filter(|s| !s.is_empty());
        self.client
            .get_ticker_24hr(symbol)
            .await
            .inspect_err(|e| self.report_error("ticker", e))
    }

    async fn fetch_order_book(&self, symbol: &str, limit: u32) -> Result<OrderBook> {
        let result = if symbol.trim().is_empty() {
            Err(AsterError::Validation("symbol is required".into()))
        } else if !VALID_DEPTH_LIMITS.contains(&limit) {
            Err(AsterError::Validation(format!(
                "depth limit must be one of {VALID_DEPTH_LIMITS:?}, got {limit}"
            )))
        } else {
            self.client.get_depth(symbol.trim(), limit).await
        };
        result.inspect_err(|e| self.report_error("depth", e))
    }
}
