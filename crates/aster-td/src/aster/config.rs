//! Aster trading module configuration.
//!
//! Holds the endpoint URL, timing, and order rules. Every field has a
//! production default, so an empty `"aster": {}` block is valid. Credentials
//! are deliberately absent: they are injected as
//! [`Credentials`](aster_core::Credentials) when the module is built.

use aster_core::config::{ModuleMeta, TradingRules, load_json};
use aster_core::{AsterError, Result};
use serde::Deserialize;

/// Largest `recvWindow` the exchange accepts (milliseconds).
pub const MAX_RECV_WINDOW: u64 = 60_000;

/// Configuration for the Aster trading module.
#[derive(Debug, Clone, Deserialize)]
pub struct AsterTdConfig {
    /// Futures REST API base URL.
    #[serde(default = "default_rest_url")]
    pub rest_url: String,

    /// `recvWindow` sent with orders (milliseconds).
    #[serde(default = "default_recv_window")]
    pub recv_window: u64,

    /// Per-request HTTP timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Default number of levels fetched for order books.
    #[serde(default = "default_depth_limit")]
    pub depth_limit: u32,

    /// Precision and minimum-notional rules.
    #[serde(flatten)]
    pub rules: TradingRules,
}

impl Default for AsterTdConfig {
    fn default() -> Self {
        Self {
            rest_url: default_rest_url(),
            recv_window: default_recv_window(),
            request_timeout_ms: default_request_timeout_ms(),
            depth_limit: default_depth_limit(),
            rules: TradingRules::default(),
        }
    }
}

impl AsterTdConfig {
    /// Config pointing at another base URL (test servers, proxies).
    pub fn with_rest_url(mut self, url: impl Into<String>) -> Self {
        self.rest_url = url.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.rest_url.starts_with("https://") || self.rest_url.starts_with("http://")) {
            return Err(AsterError::Config(format!(
                "rest_url must be an http(s) URL, got {:?}",
                self.rest_url
            )));
        }
        if self.recv_window == 0 || self.recv_window > MAX_RECV_WINDOW {
            return Err(AsterError::Config(format!(
                "recv_window must be in 1..={MAX_RECV_WINDOW} ms"
            )));
        }
        if self.request_timeout_ms == 0 {
            return Err(AsterError::Config("request_timeout_ms must be positive".into()));
        }
        self.rules.validate()
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.rest_url.trim_end_matches('/')
    }
}

/// Top-level config file: module metadata plus the `aster` block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(flatten)]
    pub meta: ModuleMeta,

    #[serde(default)]
    pub aster: AsterTdConfig,
}

/// Load, parse, and validate a JSON config file.
pub fn load_config(path: &std::path::Path) -> Result<AppConfig> {
    let config: AppConfig = load_json(path)?;
    config.aster.validate()?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Defaults (used by serde)
// ---------------------------------------------------------------------------

fn default_rest_url() -> String {
    "https://fapi.asterdex.com".into()
}

fn default_recv_window() -> u64 {
    5000
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_depth_limit() -> u32 {
    10
}
