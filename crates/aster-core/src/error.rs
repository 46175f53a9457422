//! Typed error definitions for the Aster trading client.
//!
//! Every failure of a signed request lands in exactly one [`AsterError`]
//! variant so callers can tell a local validation failure (no request was
//! sent) from a transport failure or an order the exchange refused.

use thiserror::Error;

/// Result alias used across the workspace libraries.
pub type Result<T> = std::result::Result<T, AsterError>;

/// Domain-specific errors for the Aster trading client.
#[derive(Debug, Error)]
pub enum AsterError {
    /// Local validation failure. No network call was made.
    #[error("validation error: {0}")]
    Validation(String),

    /// An identical order is still in flight.
    #[error("duplicate order: {0}")]
    DuplicateOrder(String),

    /// DNS, timeout, connection, or body read failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The exchange answered with a non-2xx status.
    #[error("exchange rejected request (HTTP {status}, code {code:?}): {message}")]
    ExchangeRejection {
        /// HTTP status code.
        status: u16,
        /// Exchange error code from the body (`code`), when present.
        code: Option<i64>,
        /// Exchange message from the body (`msg`), or the raw body.
        message: String,
    },

    /// Response body did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// Configuration or credential loading error.
    #[error("config error: {0}")]
    Config(String),
}

impl AsterError {
    /// Short message suitable for showing to an end user.
    ///
    /// Exchange rejections surface the exchange's `msg` verbatim.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) | Self::DuplicateOrder(msg) => msg.clone(),
            Self::ExchangeRejection { message, .. } => message.clone(),
            Self::Transport(msg) => format!("network error: {msg}"),
            Self::Parse(msg) => format!("unexpected response: {msg}"),
            Self::Config(msg) => format!("configuration error: {msg}"),
        }
    }

    /// Whether the request never left the process.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::DuplicateOrder(_) | Self::Config(_))
    }
}

impl From<serde_json::Error> for AsterError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_user_message_is_verbatim() {
        let err = AsterError::ExchangeRejection {
            status: 400,
            code: Some(-4164),
            message: "Order's notional must be no smaller than 5.0".into(),
        };
        assert_eq!(err.user_message(), "Order's notional must be no smaller than 5.0");
        assert!(!err.is_local());
        assert!(err.to_string().contains("HTTP 400"));
    }

    #[test]
    fn validation_is_local() {
        assert!(AsterError::Validation("x".into()).is_local());
        assert!(AsterError::DuplicateOrder("x".into()).is_local());
        assert!(!AsterError::Transport("x".into()).is_local());
    }
}
