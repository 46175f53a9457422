//! Order validation and wire formatting.
//!
//! Everything here runs before anything is signed or sent. An order that
//! fails these checks never produces a network call.
//!
//! Quantities and prices are rounded half away from zero to the symbol's
//! precision and then printed with exactly that many decimals (`1` →
//! `1.000000` at 6 dp). The minimum-notional check uses the same rounded
//! values, so the check sees exactly what the exchange will see.

use aster_core::config::ResolvedRules;
use aster_core::{AsterError, OrderKind, OrderRequest, Result, Side, TimeInForce};
use rust_decimal::{Decimal, RoundingStrategy};

/// Longest `newClientOrderId` the exchange accepts.
pub const MAX_CLIENT_ORDER_ID_LEN: usize = 36;

/// Round `value` to `dp` decimal places, half away from zero.
pub fn round_to(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Round and print `value` with exactly `dp` decimal places.
///
/// Fails when the value is too large to carry `dp` decimals.
pub fn format_fixed(value: Decimal, dp: u32) -> Result<String> {
    let mut rounded = round_to(value, dp);
    rounded.rescale(dp);
    if rounded.scale() != dp {
        return Err(AsterError::Validation(format!(
            "value {value} is too large to format with {dp} decimal places"
        )));
    }
    Ok(rounded.to_string())
}

/// Notional value: rounded quantity × rounded price.
pub fn notional(quantity: Decimal, price: Decimal, rules: &ResolvedRules) -> Result<Decimal> {
    round_to(quantity, rules.quantity_precision)
        .checked_mul(round_to(price, rules.price_precision))
        .ok_or_else(|| AsterError::Validation("order notional overflows".into()))
}

/// A fresh idempotency token for `newClientOrderId` (32 hex chars).
pub fn new_client_order_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Field checks that need neither a price lookup nor the clock.
pub fn validate_fields(req: &OrderRequest) -> Result<()> {
    if req.symbol.trim().is_empty() {
        return Err(AsterError::Validation("symbol is required".into()));
    }
    if req.quantity <= Decimal::ZERO {
        return Err(AsterError::Validation("quantity must be greater than zero".into()));
    }
    if req.kind == OrderKind::Limit && !req.price.is_some_and(|p| p > Decimal::ZERO) {
        return Err(AsterError::Validation("price is required for LIMIT orders".into()));
    }
    if let Some(ref id) = req.client_order_id {
        validate_client_order_id(id)?;
    }
    Ok(())
}

/// `newClientOrderId` must match `^[.A-Z:/a-z0-9_-]{1,36}$`.
pub fn validate_client_order_id(id: &str) -> Result<()> {
    let valid_chars = id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | ':' | '/' | '_' | '-'));
    if id.is_empty() || id.len() > MAX_CLIENT_ORDER_ID_LEN || !valid_chars {
        return Err(AsterError::Validation(format!(
            "client order id must be 1-{MAX_CLIENT_ORDER_ID_LEN} characters of [A-Za-z0-9.:/_-], \
             got {id:?}"
        )));
    }
    Ok(())
}

/// Minimum notional as shown to users: at least one decimal (`6` → `6.0`).
fn min_notional_text(min: Decimal) -> String {
    let mut shown = min;
    if shown.scale() == 0 {
        shown.rescale(1);
    }
    shown.to_string()
}

/// Current notional as shown to users, two decimals.
fn notional_text(notional: Decimal) -> String {
    let mut shown = round_to(notional, 2);
    shown.rescale(2);
    shown.to_string()
}

/// An order that passed validation, with its wire strings fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedOrder {
    pub symbol: String,
    pub side: Side,
    pub kind: OrderKind,
    /// Quantity at the symbol's precision.
    pub quantity: String,
    /// Price at the symbol's precision (LIMIT only).
    pub price: Option<String>,
    pub time_in_force: Option<TimeInForce>,
    pub client_order_id: String,
    pub notional: Decimal,
}

/// Validate `req` and fix its wire representation.
///
/// `notional_price` is the limit price for LIMIT orders and the last traded
/// price for MARKET orders. A missing price yields a zero notional, which
/// fails the minimum-notional check.
pub fn prepare_order(
    req: &OrderRequest,
    rules: &ResolvedRules,
    notional_price: Option<Decimal>,
    client_order_id: String,
) -> Result<PreparedOrder> {
    validate_fields(req)?;
    validate_client_order_id(&client_order_id)?;

    let price_for_check = match req.kind {
        OrderKind::Limit => req.price,
        OrderKind::Market => notional_price,
    }
    .unwrap_or(Decimal::ZERO);

    let notional = notional(req.quantity, price_for_check, rules)?;
    if notional < rules.min_notional {
        return Err(AsterError::Validation(format!(
            "order notional value must be at least {} USDT (current notional: {} USDT)",
            min_notional_text(rules.min_notional),
            notional_text(notional),
        )));
    }

    let (price, time_in_force) = match req.kind {
        OrderKind::Limit => (
            req.price
                .map(|p| format_fixed(p, rules.price_precision))
                .transpose()?,
            Some(req.time_in_force.unwrap_or_default()),
        ),
        OrderKind::Market => (None, None),
    };

    Ok(PreparedOrder {
        symbol: req.symbol.trim().to_ascii_uppercase(),
        side: req.side,
        kind: req.kind,
        quantity: format_fixed(req.quantity, rules.quantity_precision)?,
        price,
        time_in_force,
        client_order_id,
        notional,
    })
}

impl PreparedOrder {
    /// Signed-request parameters, in wire order:
    /// `symbol, side, type, quantity, recvWindow, timestamp`, then
    /// `price, timeInForce` for LIMIT, then `newClientOrderId`.
    pub fn params(&self, recv_window: u64, timestamp: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("symbol", self.symbol.clone()),
            ("side", self.side.as_str().to_string()),
            ("type", self.kind.as_str().to_string()),
            ("quantity", self.quantity.clone()),
            ("recvWindow", recv_window.to_string()),
            ("timestamp", timestamp.to_string()),
        ];
        if let Some(ref price) = self.price {
            params.push(("price", price.clone()));
            params.push((
                "timeInForce",
                self.time_in_force.unwrap_or_default().as_str().to_string(),
            ));
        }
        params.push(("newClientOrderId", self.client_order_id.clone()));
        params
    }
}

#[cfg(test)]
mod tests {
    use aster_core::config::TradingRules;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::aster::auth;

    fn rules() -> ResolvedRules {
        TradingRules::default().for_symbol("BTCUSDT")
    }

    #[test]
    fn quantity_always_six_decimals() {
        assert_eq!(format_fixed(dec!(1), 6).unwrap(), "1.000000");
        assert_eq!(format_fixed(dec!(0.1234567), 6).unwrap(), "0.123457");
        assert_eq!(format_fixed(dec!(2.5000000000), 6).unwrap(), "2.500000");
    }

    #[test]
    fn price_always_eight_decimals() {
        assert_eq!(format_fixed(dec!(10), 8).unwrap(), "10.00000000");
        assert_eq!(format_fixed(dec!(0.000000015), 8).unwrap(), "0.00000002");
        assert_eq!(format_fixed(dec!(65000.123), 8).unwrap(), "65000.12300000");
    }

    #[test]
    fn value_too_large_for_precision_is_rejected() {
        let huge = dec!(10000000000000000000000000);
        assert!(matches!(format_fixed(huge, 6), Err(AsterError::Validation(_))));
    }

    #[test]
    fn notional_overflow_is_validation_error() {
        let big = dec!(1000000000000000);
        let err = notional(big, big, &rules()).unwrap_err();
        assert!(matches!(err, AsterError::Validation(ref m) if m.contains("overflows")));

        let req = OrderRequest::limit("BTCUSDT", Side::Buy, big, big);
        let err = prepare_order(&req, &rules(), None, "cid1".into()).unwrap_err();
        assert!(err.is_local());
    }

    #[test]
    fn low_notional_rejected_with_minimum_in_message() {
        let req = OrderRequest::limit("BTCUSDT", Side::Buy, dec!(0.001), dec!(1000));
        let err = prepare_order(&req, &rules(), None, "cid1".into()).unwrap_err();
        match err {
            AsterError::Validation(msg) => {
                assert!(msg.contains("6.0"), "message was {msg}");
                assert!(msg.contains("1.00"), "message was {msg}");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn integer_minimum_shown_with_one_decimal() {
        let rules = ResolvedRules {
            min_notional: dec!(6),
            ..rules()
        };
        let req = OrderRequest::limit("BTCUSDT", Side::Buy, dec!(0.001), dec!(1000));
        let err = prepare_order(&req, &rules, None, "cid1".into()).unwrap_err();
        assert!(err.user_message().contains("at least 6.0 USDT"), "{err}");
    }

    #[test]
    fn sufficient_notional_builds_and_signs() {
        let req = OrderRequest::limit("btcusdt", Side::Buy, dec!(1), dec!(10));
        let order = prepare_order(&req, &rules(), None, "cid1".into()).unwrap();
        assert_eq!(order.notional, dec!(10));

        let params = order.params(5000, "1700000000000");
        let keys: Vec<&str> = params.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            [
                "symbol",
                "side",
                "type",
                "quantity",
                "recvWindow",
                "timestamp",
                "price",
                "timeInForce",
                "newClientOrderId"
            ]
        );
        let signed = auth::build_signed_query(&params, "secret");
        assert_eq!(
            signed.query(),
            "symbol=BTCUSDT&side=BUY&type=LIMIT&quantity=1.000000&recvWindow=5000\
             &timestamp=1700000000000&price=10.00000000&timeInForce=GTC&newClientOrderId=cid1"
        );
        assert_eq!(signed.signature().len(), 64);
    }

    #[test]
    fn market_order_has_no_price_params() {
        let req = OrderRequest::market("ETHUSDT", Side::Sell, dec!(0.01));
        let order = prepare_order(&req, &rules(), Some(dec!(3000)), "cid2".into()).unwrap();
        let params = order.params(5000, "1");
        assert!(params.iter().all(|(k, _)| *k != "price" && *k != "timeInForce"));
        assert_eq!(order.notional, dec!(30));
    }

    #[test]
    fn market_order_without_price_fails_notional() {
        let req = OrderRequest::market("ETHUSDT", Side::Sell, dec!(5));
        assert!(matches!(
            prepare_order(&req, &rules(), None, "c".into()),
            Err(AsterError::Validation(_))
        ));
    }

    #[test]
    fn notional_uses_rounded_inputs() {
        // 0.0000004 rounds to 0 at 6 dp
        let value = notional(dec!(0.0000004), dec!(1000000), &rules()).unwrap();
        assert_eq!(value, Decimal::ZERO);
    }

    #[test]
    fn missing_fields_rejected() {
        let mut req = OrderRequest::limit("BTCUSDT", Side::Buy, dec!(1), dec!(10));
        req.price = None;
        assert!(validate_fields(&req).is_err());

        let zero_qty = OrderRequest::limit("BTCUSDT", Side::Buy, Decimal::ZERO, dec!(10));
        assert!(validate_fields(&zero_qty).is_err());

        let no_symbol = OrderRequest::limit(" ", Side::Buy, dec!(1), dec!(10));
        assert!(validate_fields(&no_symbol).is_err());
    }

    #[test]
    fn client_order_id_rules() {
        assert!(validate_client_order_id("abc-123_x.y:z/w").is_ok());
        assert!(validate_client_order_id("").is_err());
        assert!(validate_client_order_id("has space").is_err());
        assert!(validate_client_order_id(&"a".repeat(37)).is_err());
        let generated = new_client_order_id();
        assert_eq!(generated.len(), 32);
        assert!(validate_client_order_id(&generated).is_ok());
    }

    #[test]
    fn per_symbol_precision_applies() {
        let rules: TradingRules = serde_json::from_str(
            r#"{"symbol_rules": {"BTCUSDT": {"quantity_precision": 3, "price_precision": 1}}}"#,
        )
        .unwrap();
        let req = OrderRequest::limit("BTCUSDT", Side::Buy, dec!(0.0015), dec!(65000.25));
        let order = prepare_order(&req, &rules.for_symbol("BTCUSDT"), None, "c".into()).unwrap();
        assert_eq!(order.quantity, "0.002");
        assert_eq!(order.price.as_deref(), Some("65000.3"));
    }
}
