//! Enumerations used throughout the trading client.
//!
//! Each enum knows its exchange wire string (`as_str`) and parses
//! case-insensitively from user input (`FromStr`), which is what the CLI and
//! config layers feed it.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AsterError;

// ---------------------------------------------------------------------------
// Order side
// ---------------------------------------------------------------------------

/// Buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Wire value (always upper-case).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl FromStr for Side {
    type Err = AsterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            other => Err(AsterError::Validation(format!("unknown order side: {other}"))),
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Order type
// ---------------------------------------------------------------------------

/// Order type accepted by the futures order endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderKind {
    Limit,
    Market,
}

impl OrderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Limit => "LIMIT",
            Self::Market => "MARKET",
        }
    }
}

impl FromStr for OrderKind {
    type Err = AsterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LIMIT" => Ok(Self::Limit),
            "MARKET" => Ok(Self::Market),
            other => Err(AsterError::Validation(format!("unknown order type: {other}"))),
        }
    }
}

impl std::fmt::Display for OrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Time in force
// ---------------------------------------------------------------------------

/// Time-in-force for LIMIT orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    /// Good till cancelled.
    #[default]
    Gtc,
    /// Immediate or cancel.
    Ioc,
    /// Fill or kill.
    Fok,
}

impl TimeInForce {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gtc => "GTC",
            Self::Ioc => "IOC",
            Self::Fok => "FOK",
        }
    }
}

impl FromStr for TimeInForce {
    type Err = AsterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GTC" => Ok(Self::Gtc),
            "IOC" => Ok(Self::Ioc),
            "FOK" => Ok(Self::Fok),
            other => Err(AsterError::Validation(format!("unknown time in force: {other}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Transfer direction
// ---------------------------------------------------------------------------

/// Direction of a wallet transfer, encoded as the numeric `type` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TransferDirection {
    /// Spot wallet into the futures account (`type=1`).
    #[default]
    SpotToFutures,
    /// Futures account back to the spot wallet (`type=2`).
    FuturesToSpot,
}

impl TransferDirection {
    /// Wire value of the `type` parameter.
    pub fn type_code(self) -> &'static str {
        match self {
            Self::SpotToFutures => "1",
            Self::FuturesToSpot => "2",
        }
    }
}

impl FromStr for TransferDirection {
    type Err = AsterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "to-futures" | "spot-to-futures" => Ok(Self::SpotToFutures),
            "2" | "to-spot" | "futures-to-spot" => Ok(Self::FuturesToSpot),
            other => Err(AsterError::Validation(format!("unknown transfer direction: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_parses_case_insensitively() {
        assert_eq!("buy".parse::<Side>().unwrap(), Side::Buy);
        assert_eq!(" Sell ".parse::<Side>().unwrap(), Side::Sell);
        assert!("hold".parse::<Side>().is_err());
    }

    #[test]
    fn wire_strings() {
        assert_eq!(Side::Buy.as_str(), "BUY");
        assert_eq!(OrderKind::Market.as_str(), "MARKET");
        assert_eq!(TimeInForce::default().as_str(), "GTC");
        assert_eq!(TransferDirection::SpotToFutures.type_code(), "1");
        assert_eq!(TransferDirection::FuturesToSpot.type_code(), "2");
    }

    #[test]
    fn transfer_direction_aliases() {
        assert_eq!(
            "to-spot".parse::<TransferDirection>().unwrap(),
            TransferDirection::FuturesToSpot
        );
        assert_eq!("1".parse::<TransferDirection>().unwrap(), TransferDirection::SpotToFutures);
    }
}
