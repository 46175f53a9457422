//! Configuration parsing shared by the trading module and the runner.
//!
//! Settings live in a single JSON file. This module holds the pieces that are
//! not tied to the HTTP transport: module metadata (name, log path) and the
//! order precision / minimum-notional rules, which can be overridden per
//! symbol because lot and tick sizes differ between books.
//!
//! # Example
//!
//! ```json
//! {
//!   "module_name": "aster_td",
//!   "log_path": "/tmp/log",
//!   "aster": {
//!     "min_notional": "6.0",
//!     "quantity_precision": 6,
//!     "price_precision": 8,
//!     "symbol_rules": { "BTCUSDT": { "quantity_precision": 3, "price_precision": 1 } }
//!   }
//! }
//! ```

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{AsterError, Result};

/// Largest number of decimal places accepted for quantity or price.
pub const MAX_PRECISION: u32 = 16;

/// Module metadata block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleMeta {
    pub module_name: Option<String>,
    pub log_path: Option<String>,
}

impl ModuleMeta {
    /// Module name, defaulting to `fallback`.
    pub fn module_name_or(&self, fallback: &str) -> String {
        self.module_name.clone().unwrap_or_else(|| fallback.to_string())
    }
}

/// Per-symbol overrides. Unset fields inherit the global value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SymbolRules {
    pub quantity_precision: Option<u32>,
    pub price_precision: Option<u32>,
    pub min_notional: Option<Decimal>,
}

/// Precision and minimum-notional rules applied before an order is signed.
#[derive(Debug, Clone, Deserialize)]
pub struct TradingRules {
    /// Minimum order notional in quote currency (default 6.0).
    #[serde(default = "default_min_notional")]
    pub min_notional: Decimal,

    /// Decimal places the quantity is rounded and formatted to (default 6).
    #[serde(default = "default_quantity_precision")]
    pub quantity_precision: u32,

    /// Decimal places the price is rounded and formatted to (default 8).
    #[serde(default = "default_price_precision")]
    pub price_precision: u32,

    /// Overrides keyed by symbol (e.g. `"BTCUSDT"`).
    #[serde(default)]
    pub symbol_rules: HashMap<String, SymbolRules>,
}

impl Default for TradingRules {
    fn default() -> Self {
        Self {
            min_notional: default_min_notional(),
            quantity_precision: default_quantity_precision(),
            price_precision: default_price_precision(),
            symbol_rules: HashMap::new(),
        }
    }
}

/// The rules in effect for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRules {
    pub min_notional: Decimal,
    pub quantity_precision: u32,
    pub price_precision: u32,
}

impl TradingRules {
    /// Merge the global rules with the overrides for `symbol`.
    pub fn for_symbol(&self, symbol: &str) -> ResolvedRules {
        let overrides = self
            .symbol_rules
            .get(symbol)
            .or_else(|| self.symbol_rules.get(&symbol.to_ascii_uppercase()));

        match overrides {
            Some(o) => ResolvedRules {
                min_notional: o.min_notional.unwrap_or(self.min_notional),
                quantity_precision: o.quantity_precision.unwrap_or(self.quantity_precision),
                price_precision: o.price_precision.unwrap_or(self.price_precision),
            },
            None => ResolvedRules {
                min_notional: self.min_notional,
                quantity_precision: self.quantity_precision,
                price_precision: self.price_precision,
            },
        }
    }

    /// Reject negative minimums and precisions beyond [`MAX_PRECISION`].
    pub fn validate(&self) -> Result<()> {
        check_rules(
            "global",
            self.min_notional,
            self.quantity_precision,
            self.price_precision,
        )?;
        for (symbol, o) in &self.symbol_rules {
            check_rules(
                symbol,
                o.min_notional.unwrap_or(self.min_notional),
                o.quantity_precision.unwrap_or(self.quantity_precision),
                o.price_precision.unwrap_or(self.price_precision),
            )?;
        }
        Ok(())
    }
}

fn check_rules(
    scope: &str,
    min_notional: Decimal,
    qty_precision: u32,
    price_precision: u32,
) -> Result<()> {
    if min_notional.is_sign_negative() {
        return Err(AsterError::Config(format!(
            "{scope}: min_notional must not be negative"
        )));
    }
    if qty_precision > MAX_PRECISION || price_precision > MAX_PRECISION {
        return Err(AsterError::Config(format!(
            "{scope}: precision must be at most {MAX_PRECISION} decimal places"
        )));
    }
    Ok(())
}

/// Load and parse a JSON config file into any deserializable config type.
pub fn load_json<T: DeserializeOwned>(path: &std::path::Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AsterError::Config(format!("failed to read {}: {e}", path.display())))?;
    serde_json::from_str(&content)
        .map_err(|e| AsterError::Config(format!("invalid config {}: {e}", path.display())))
}

// ---------------------------------------------------------------------------
// Defaults (used by serde)
// ---------------------------------------------------------------------------

fn default_min_notional() -> Decimal {
    Decimal::new(60, 1) // 6.0
}

fn default_quantity_precision() -> u32 {
    6
}

fn default_price_precision() -> u32 {
    8
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn defaults_match_exchange_lot_and_tick() {
        let rules = TradingRules::default();
        assert_eq!(rules.min_notional.to_string(), "6.0");
        let r = rules.for_symbol("ANYUSDT");
        assert_eq!(r.quantity_precision, 6);
        assert_eq!(r.price_precision, 8);
    }

    #[test]
    fn symbol_override_inherits_unset_fields() {
        let rules: TradingRules = serde_json::from_str(
            r#"{"min_notional": "5", "symbol_rules": {"BTCUSDT": {"quantity_precision": 3}}}"#,
        )
        .unwrap();
        let btc = rules.for_symbol("btcusdt");
        assert_eq!(btc.quantity_precision, 3);
        assert_eq!(btc.price_precision, 8);
        assert_eq!(btc.min_notional, dec!(5));
        assert_eq!(rules.for_symbol("ETHUSDT").quantity_precision, 6);
    }

    #[test]
    fn validate_rejects_bad_rules() {
        let mut rules = TradingRules::default();
        assert!(rules.validate().is_ok());
        rules.symbol_rules.insert(
            "X".into(),
            SymbolRules {
                price_precision: Some(40),
                ..Default::default()
            },
        );
        assert!(matches!(rules.validate(), Err(AsterError::Config(_))));

        let negative = TradingRules {
            min_notional: dec!(-1),
            ..Default::default()
        };
        assert!(negative.validate().is_err());
    }
}
