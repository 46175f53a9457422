//! Core data types shared between the trading module and its callers.
//!
//! Amounts are [`rust_decimal::Decimal`] throughout so that the rounding the
//! exchange applies (fixed decimal places) can be reproduced exactly.

pub mod credentials;
pub mod enums;
pub mod market_data;
pub mod trading;

pub use credentials::*;
pub use enums::*;
pub use market_data::*;
pub use trading::*;
