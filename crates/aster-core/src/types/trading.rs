//! Trading-related data structures — order intents, acknowledgements, and
//! account balances.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{OrderKind, Side, TimeInForce};
use crate::error::{AsterError, Result};

/// Asset whose balance is reported as the account's wallet balance.
pub const QUOTE_ASSET: &str = "USDT";

// ---------------------------------------------------------------------------
// Order request (caller → TD module)
// ---------------------------------------------------------------------------

/// A single order intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Exchange symbol (e.g. `"BTCUSDT"`).
    pub symbol: String,
    pub side: Side,
    pub kind: OrderKind,
    pub quantity: Decimal,
    /// Limit price. Required for LIMIT orders, ignored for MARKET.
    pub price: Option<Decimal>,
    /// Defaults to GTC for LIMIT orders.
    pub time_in_force: Option<TimeInForce>,
    /// Last traded price used for the MARKET notional check. Fetched from the
    /// ticker when absent.
    pub reference_price: Option<Decimal>,
    /// Idempotency token sent as `newClientOrderId`. Generated when absent.
    pub client_order_id: Option<String>,
}

impl OrderRequest {
    /// LIMIT order with GTC time-in-force.
    pub fn limit(symbol: impl Into<String>, side: Side, quantity: Decimal, price: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            kind: OrderKind::Limit,
            quantity,
            price: Some(price),
            time_in_force: Some(TimeInForce::Gtc),
            reference_price: None,
            client_order_id: None,
        }
    }

    /// MARKET order.
    pub fn market(symbol: impl Into<String>, side: Side, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            kind: OrderKind::Market,
            quantity,
            price: None,
            time_in_force: None,
            reference_price: None,
            client_order_id: None,
        }
    }

    pub fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = Some(tif);
        self
    }

    pub fn with_reference_price(mut self, price: Decimal) -> Self {
        self.reference_price = Some(price);
        self
    }

    pub fn with_client_order_id(mut self, id: impl Into<String>) -> Self {
        self.client_order_id = Some(id.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Order acknowledgement (exchange → caller)
// ---------------------------------------------------------------------------

/// The exchange's answer to an accepted order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderAck {
    pub symbol: String,
    /// Exchange-assigned order ID (0 if the response omitted it).
    pub order_id: u64,
    pub client_order_id: String,
    pub side: Side,
    /// Status string as reported (`NEW`, `FILLED`, ...).
    pub status: String,
    /// Full response body.
    pub raw: serde_json::Value,
}

impl OrderAck {
    /// Build an ack from the order endpoint's JSON body.
    ///
    /// `client_order_id` is the id we sent; the exchange's echo wins when present.
    pub fn from_response(
        body: serde_json::Value,
        symbol: &str,
        side: Side,
        client_order_id: &str,
    ) -> Self {
        let order_id = body.get("orderId").and_then(|v| v.as_u64()).unwrap_or(0);
        let client_order_id = str_field(&body, "clientOrderId").unwrap_or(client_order_id);
        let status = str_field(&body, "status").unwrap_or("UNKNOWN");
        let symbol = str_field(&body, "symbol").unwrap_or(symbol);
        Self {
            symbol: symbol.to_string(),
            order_id,
            client_order_id: client_order_id.to_string(),
            side,
            status: status.to_string(),
            raw: body,
        }
    }
}


// ---------------------------------------------------------------------------
// Account snapshot
// ---------------------------------------------------------------------------

/// One asset line of the futures account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetBalance {
    pub asset: String,
    pub wallet_balance: Decimal,
    pub available_balance: Decimal,
}

/// Exchange-reported balances, overwritten on every refresh.
#[derive(Debug, Clone, Serialize)]
pub struct AccountSnapshot {
    pub assets: Vec<AssetBalance>,
    /// USDT balance shown to the user (available preferred over wallet).
    pub total_wallet_balance: Decimal,
    /// Full response body.
    pub raw: serde_json::Value,
}

impl AccountSnapshot {
    /// Derive a snapshot from the account endpoint's JSON body.
    ///
    /// Balance resolution:
    /// 1. `assets` array present → the USDT entry (case-insensitive)
    ///    `availableBalance`, else its `walletBalance`; 0 if there is no USDT entry.
    /// 2. no `assets` array → top-level `totalWalletBalance`.
    /// 3. otherwise 0.
    pub fn from_account_json(body: serde_json::Value) -> Result<Self> {
        if !body.is_object() {
            return Err(AsterError::Parse(
                "account response is not a JSON object".into(),
            ));
        }

        let assets: Vec<AssetBalance> = body
            .get("assets")
            .and_then(|v| v.as_array())
            .map(|arr| arr.iter().filter_map(parse_asset).collect())
            .unwrap_or_default();

        let total_wallet_balance = match body.get("assets").and_then(|v| v.as_array()) {
            Some(arr) => arr
                .iter()
                .find(|a| {
                    str_field(a, "asset").is_some_and(|s| s.eq_ignore_ascii_case(QUOTE_ASSET))
                })
                .and_then(|a| {
                    decimal_field(a, "availableBalance")
                        .or_else(|| decimal_field(a, "walletBalance"))
                })
                .unwrap_or(Decimal::ZERO),
            None => decimal_field(&body, "totalWalletBalance").unwrap_or(Decimal::ZERO),
        };

        Ok(Self {
            assets,
            total_wallet_balance,
            raw: body,
        })
    }

    /// Look up an asset line (case-insensitive).
    pub fn asset(&self, name: &str) -> Option<&AssetBalance> {
        self.assets
            .iter()
            .find(|a| a.asset.eq_ignore_ascii_case(name))
    }
}

/// Result of a wallet transfer.
#[derive(Debug, Clone, Serialize)]
pub struct TransferResult {
    /// Exchange transaction id (`tranId`), when reported.
    pub tran_id: Option<u64>,
    /// Account snapshot fetched after the transfer, if the refresh succeeded.
    pub snapshot: Option<AccountSnapshot>,
    pub raw: serde_json::Value,
}

// ---------------------------------------------------------------------------
// JSON → typed helpers
// ---------------------------------------------------------------------------

fn parse_asset(v: &serde_json::Value) -> Option<AssetBalance> {
    Some(AssetBalance {
        asset: v.get("asset")?.as_str()?.to_string(),
        wallet_balance: decimal_field(v, "walletBalance").unwrap_or(Decimal::ZERO),
        available_balance: decimal_field(v, "availableBalance").unwrap_or(Decimal::ZERO),
    })
}

/// Read a decimal that the exchange may send as a string or a number.
///
/// Empty strings count as absent.
pub fn decimal_field(v: &serde_json::Value, key: &str) -> Option<Decimal> {
    match v.get(key)? {
        serde_json::Value::String(s) if !s.trim().is_empty() => s.trim().parse().ok(),
        serde_json::Value::Number(n) => {
            let text = n.to_string();
            // serde_json prints small and large floats in exponent form
            text.parse()
                .ok()
                .or_else(|| Decimal::from_scientific(&text).ok())
        }
        _ => None,
    }
}

fn str_field<'a>(v: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    v.get(key).and_then(|s| s.as_str())
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    #[test]
    fn prefers_available_balance() {
        let snap = AccountSnapshot::from_account_json(json!({
            "assets": [{"asset": "USDT", "availableBalance": "12.5", "walletBalance": "20.0"}]
        }))
        .unwrap();
        assert_eq!(snap.total_wallet_balance, dec!(12.5));
        assert_eq!(snap.asset("usdt").unwrap().wallet_balance, dec!(20.0));
    }

    #[test]
    fn falls_back_to_wallet_balance() {
        let snap = AccountSnapshot::from_account_json(json!({
            "assets": [{"asset": "usdt", "availableBalance": "", "walletBalance": "20.0"}]
        }))
        .unwrap();
        assert_eq!(snap.total_wallet_balance, dec!(20.0));
    }

    #[test]
    fn no_usdt_and_no_top_level_is_zero() {
        let snap = AccountSnapshot::from_account_json(json!({
            "assets": [{"asset": "BNB", "availableBalance": "3", "walletBalance": "3"}]
        }))
        .unwrap();
        assert_eq!(snap.total_wallet_balance, Decimal::ZERO);

        let empty = AccountSnapshot::from_account_json(json!({})).unwrap();
        assert_eq!(empty.total_wallet_balance, Decimal::ZERO);
    }

    #[test]
    fn top_level_balance_when_no_assets() {
        let snap =
            AccountSnapshot::from_account_json(json!({"totalWalletBalance": "42.75"})).unwrap();
        assert_eq!(snap.total_wallet_balance, dec!(42.75));
        assert!(snap.assets.is_empty());
    }

    #[test]
    fn non_object_is_parse_error() {
        assert!(matches!(
            AccountSnapshot::from_account_json(json!([1, 2])),
            Err(AsterError::Parse(_))
        ));
    }

    #[test]
    fn numeric_balances_in_exponent_form() {
        let asset = json!({"walletBalance": 1e-7, "availableBalance": 2.5});
        assert_eq!(decimal_field(&asset, "walletBalance"), Some(dec!(0.0000001)));
        assert_eq!(decimal_field(&asset, "availableBalance"), Some(dec!(2.5)));
        assert_eq!(decimal_field(&asset, "missing"), None);
    }

    #[test]
    fn ack_uses_exchange_echo() {
        let ack = OrderAck::from_response(
            json!({"orderId": 9876, "clientOrderId": "abc", "status": "NEW", "symbol": "ETHUSDT"}),
            "ETHUSDT",
            Side::Buy,
            "ours",
        );
        assert_eq!(ack.order_id, 9876);
        assert_eq!(ack.client_order_id, "abc");
        assert_eq!(ack.status, "NEW");

        let bare = OrderAck::from_response(json!({}), "ETHUSDT", Side::Sell, "ours");
        assert_eq!(bare.order_id, 0);
        assert_eq!(bare.client_order_id, "ours");
        assert_eq!(bare.status, "UNKNOWN");
    }
}
