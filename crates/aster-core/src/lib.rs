//! # aster-core
//!
//! Core crate for the Aster trading client, providing:
//!
//! - **Types** (`types`) — enums, order/account structs, market data, credentials
//! - **Configuration** (`config`) — JSON config deserialization + per-symbol rules
//! - **Error types** (`error`) — the `AsterError` taxonomy via thiserror
//! - **In-flight guard** (`guard`) — double-submit protection for orders
//! - **Time utilities** (`time_util`) — millisecond timestamps for signed requests
//! - **Logging** (`logging`) — tracing-based structured logging

pub mod config;
pub mod error;
pub mod guard;
pub mod logging;
pub mod time_util;
pub mod types;

pub use error::{AsterError, Result};
// Re-export types at crate root for convenience.
pub use types::*;
