//! Aster futures REST transport.
//!
//! Thin wrapper over `reqwest` that knows how to sign, which header carries
//! the API key, and how to turn a non-2xx answer into an
//! [`AsterError::ExchangeRejection`]. Validation and bookkeeping live one
//! layer up in [`AsterTd`](super::AsterTd).
//!
//! # REST endpoints
//!
//! | Operation     | Method | Path                   | Signed |
//! |---------------|--------|------------------------|--------|
//! | Account info  | GET    | `/fapi/v1/account`     | yes    |
//! | Transfer      | POST   | `/fapi/v1/transfer`    | yes    |
//! | New order     | POST   | `/fapi/v1/order`       | yes    |
//! | 24h ticker    | GET    | `/fapi/v1/ticker/24hr` | no     |
//! | Order book    | GET    | `/fapi/v1/depth`       | no     |
//!
//! No request is ever retried: a timed-out order may or may not have reached
//! the book, and resending it could double-submit.

use std::time::Duration;

use aster_core::{AsterError, Credentials, OrderBook, Result, Ticker24hr, time_util};
use reqwest::Method;
use tracing::debug;

use super::auth;

/// Header carrying the API key on signed requests.
pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

const ACCOUNT_PATH: &str = "/fapi/v1/account";
const TRANSFER_PATH: &str = "/fapi/v1/transfer";
const ORDER_PATH: &str = "/fapi/v1/order";
const TICKER_24HR_PATH: &str = "/fapi/v1/ticker/24hr";
const DEPTH_PATH: &str = "/fapi/v1/depth";

/// Aster futures REST client.
pub struct FuturesClient {
    /// Shared HTTP client.
    http: reqwest::Client,
    credentials: Credentials,
    /// REST base URL (e.g. `https://fapi.asterdex.com`), no trailing slash.
    base_url: String,
}

impl FuturesClient {
    /// Create a client. No connection is opened until the first request.
    pub fn new(credentials: Credentials, base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AsterError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            credentials,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    // -----------------------------------------------------------------------
    // Signed endpoints
    // -----------------------------------------------------------------------

    /// `GET /fapi/v1/account?timestamp=&signature=`.
    pub async fn get_account(&self) -> Result<serde_json::Value> {
        let timestamp = time_util::timestamp_param();
        let params = [("timestamp", timestamp.as_str())];
        self.send_signed(Method::GET, ACCOUNT_PATH, &params).await
    }

    /// `POST /fapi/v1/transfer?asset=&amount=&type=&timestamp=&signature=`.
    pub async fn post_transfer(
        &self,
        asset: &str,
        amount: &str,
        type_code: &str,
    ) -> Result<serde_json::Value> {
        let timestamp = time_util::timestamp_param();
        let params = [
            ("asset", asset),
            ("amount", amount),
            ("type", type_code),
            ("timestamp", timestamp.as_str()),
        ];
        self.send_signed(Method::POST, TRANSFER_PATH, &params).await
    }

    /// `POST /fapi/v1/order` with already-ordered parameters (including `timestamp`).
    pub async fn post_order<K: AsRef<str>, V: AsRef<str>>(
        &self,
        params: &[(K, V)],
    ) -> Result<serde_json::Value> {
        self.send_signed(Method::POST, ORDER_PATH, params).await
    }

    // -----------------------------------------------------------------------
    // Public endpoints
    // -----------------------------------------------------------------------

    /// 24h statistics for one symbol, or for every symbol when `symbol` is `None`.
    pub async fn get_ticker_24hr(&self, symbol: Option<&str>) -> Result<Vec<Ticker24hr>> {
        let body = match symbol {
            Some(sym) => self.send_public(TICKER_24HR_PATH, &[("symbol", sym)]).await?,
            None => self.send_public::<&str, &str>(TICKER_24HR_PATH, &[]).await?,
        };
        // a single-symbol query answers with an object, the full list with an array
        if body.is_array() {
            Ok(serde_json::from_value(body)?)
        } else {
            Ok(vec![serde_json::from_value(body)?])
        }
    }

    /// `GET /fapi/v1/depth?symbol=&limit=`.
    pub async fn get_depth(&self, symbol: &str, limit: u32) -> Result<OrderBook> {
        let limit = limit.to_string();
        let params = [("symbol", symbol), ("limit", limit.as_str())];
        let body = self.send_public(DEPTH_PATH, &params).await?;
        Ok(serde_json::from_value(body)?)
    }

    // -----------------------------------------------------------------------
    // Plumbing
    // -----------------------------------------------------------------------

    async fn send_signed<K: AsRef<str>, V: AsRef<str>>(
        &self,
        method: Method,
        path: &str,
        params: &[(K, V)],
    ) -> Result<serde_json::Value> {
        let signed = auth::build_signed_query(params, self.credentials.secret_key());
        let url = format!("{}{path}?{signed}", self.base_url);
        debug!("[aster-td] {method} {path} (signed)");

        let resp = self
            .http
            .request(method, &url)
            .header(API_KEY_HEADER, self.credentials.api_key())
            .send()
            .await
            .map_err(transport_error)?;

        read_response(resp).await
    }

    async fn send_public<K: AsRef<str>, V: AsRef<str>>(
        &self,
        path: &str,
        params: &[(K, V)],
    ) -> Result<serde_json::Value> {
        let query = auth::encode_query(params);
        let url = if query.is_empty() {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}{path}?{query}", self.base_url)
        };
        debug!("[aster-td] GET {path}");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(transport_error)?;
        read_response(resp).await
    }
}

/// Turn a response into JSON, or into a rejection for non-2xx statuses.
async fn read_response(resp: reqwest::Response) -> Result<serde_json::Value> {
    let status = resp.status();
    let body = resp.text().await.map_err(transport_error)?;

    if !status.is_success() {
        return Err(rejection_from_body(status.as_u16(), &body));
    }
    if body.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_str(&body)
        .map_err(|e| AsterError::Parse(format!("invalid JSON body: {e}")))
}

/// Build an [`AsterError::ExchangeRejection`] from an error body.
///
/// Uses the body's `msg` (and `code`) when it is the exchange's JSON error
/// shape; otherwise falls back to a generic status message.
pub fn rejection_from_body(status: u16, body: &str) -> AsterError {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let code = parsed
        .as_ref()
        .and_then(|v| v.get("code"))
        .and_then(|c| c.as_i64());
    let message = parsed
        .as_ref()
        .and_then(|v| v.get("msg"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("request failed with status code {status}"));

    AsterError::ExchangeRejection { status, code, message }
}

/// The URL carries the signed query; keep it out of error text.
fn transport_error(e: reqwest::Error) -> AsterError {
    AsterError::Transport(e.without_url().to_string())
}
