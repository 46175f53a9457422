//! API credentials.
//!
//! Credentials are injected when the client is built. The secret is held in a
//! [`SecretString`] so it never shows up in `Debug` output or logs.

use secrecy::{ExposeSecret, SecretString};

use crate::error::{AsterError, Result};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "ASTER_API_KEY";
/// Environment variable holding the API secret.
pub const API_SECRET_ENV: &str = "ASTER_API_SECRET";

/// API key + HMAC secret for the exchange.
#[derive(Clone, Debug)]
pub struct Credentials {
    api_key: String,
    secret_key: SecretString,
}

impl Credentials {
    /// Build credentials from explicit values. Both must be non-empty.
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        let secret_key = secret_key.into();
        if api_key.trim().is_empty() {
            return Err(AsterError::Config("api key is empty".into()));
        }
        if secret_key.trim().is_empty() {
            return Err(AsterError::Config("api secret is empty".into()));
        }
        Ok(Self {
            api_key,
            secret_key: SecretString::from(secret_key),
        })
    }

    /// Load credentials from `ASTER_API_KEY` / `ASTER_API_SECRET`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| AsterError::Config(format!("{API_KEY_ENV} is not set")))?;
        let secret_key = std::env::var(API_SECRET_ENV)
            .map_err(|_| AsterError::Config(format!("{API_SECRET_ENV} is not set")))?;
        Self::new(api_key, secret_key)
    }

    /// API key sent in the `X-MBX-APIKEY` header.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// HMAC secret. Only the signer should call this.
    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }

    /// First eight characters of the API key, for log lines.
    pub fn key_hint(&self) -> &str {
        let end = self
            .api_key
            .char_indices()
            .nth(8)
            .map_or(self.api_key.len(), |(i, _)| i);
        &self.api_key[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_does_not_leak_secret() {
        let creds = Credentials::new("key-123456789", "super-secret").unwrap();
        let dbg = format!("{creds:?}");
        assert!(!dbg.contains("super-secret"));
        assert_eq!(creds.secret_key(), "super-secret");
    }

    #[test]
    fn empty_values_rejected() {
        assert!(Credentials::new("", "s").is_err());
        assert!(Credentials::new("k", "  ").is_err());
    }

    #[test]
    fn key_hint_truncates() {
        let creds = Credentials::new("abcdefghijkl", "s").unwrap();
        assert_eq!(creds.key_hint(), "abcdefgh");
        let short = Credentials::new("abc", "s").unwrap();
        assert_eq!(short.key_hint(), "abc");
    }
}
