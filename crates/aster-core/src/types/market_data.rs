//! Public market data returned by the unauthenticated futures endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 24h rolling statistics for one symbol (`GET /fapi/v1/ticker/24hr`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker24hr {
    pub symbol: String,
    pub last_price: Decimal,
    #[serde(default)]
    pub price_change_percent: Option<Decimal>,
    #[serde(default)]
    pub high_price: Option<Decimal>,
    #[serde(default)]
    pub low_price: Option<Decimal>,
    /// Base-asset volume.
    #[serde(default)]
    pub volume: Option<Decimal>,
    #[serde(default)]
    pub quote_volume: Option<Decimal>,
}

impl Ticker24hr {
    /// Symbol without a trailing `USDT`, as shown in listings.
    pub fn base_symbol(&self) -> &str {
        self.symbol.strip_suffix("USDT").unwrap_or(&self.symbol)
    }
}

/// One price level of the order book.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(Decimal, Decimal)")]
pub struct PriceLevel {
    pub price: Decimal,
    pub quantity: Decimal,
}

impl From<(Decimal, Decimal)> for PriceLevel {
    fn from((price, quantity): (Decimal, Decimal)) -> Self {
        Self { price, quantity }
    }
}

/// Order book snapshot (`GET /fapi/v1/depth`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBook {
    #[serde(default)]
    pub last_update_id: u64,
    /// Best bid first.
    pub bids: Vec<PriceLevel>,
    /// Best ask first.
    pub asks: Vec<PriceLevel>,
}

impl OrderBook {
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    /// Midpoint of best bid and best ask.
    pub fn mid_price(&self) -> Option<Decimal> {
        Some((self.best_bid()?.price + self.best_ask()?.price) / Decimal::TWO)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn depth_levels_parse_from_string_pairs() {
        let book: OrderBook = serde_json::from_str(
            r#"{"lastUpdateId": 7,
                "bids": [["100.5", "2"], ["100.0", "1"]],
                "asks": [["101.5", "3"]]}"#,
        )
        .unwrap();
        assert_eq!(book.last_update_id, 7);
        assert_eq!(book.best_bid().unwrap().price, dec!(100.5));
        assert_eq!(book.best_ask().unwrap().quantity, dec!(3));
        assert_eq!(book.mid_price(), Some(dec!(101.0)));
    }

    #[test]
    fn ticker_parses_and_strips_quote() {
        let t: Ticker24hr = serde_json::from_str(
            r#"{"symbol": "BTCUSDT", "lastPrice": "65000.10",
                "priceChangePercent": "-1.2", "volume": "10"}"#,
        )
        .unwrap();
        assert_eq!(t.last_price, dec!(65000.10));
        assert_eq!(t.base_symbol(), "BTC");
        assert_eq!(t.quote_volume, None);
    }
}
