//! Request signing for the Aster futures REST API.
//!
//! Aster uses the Binance-style **HMAC-SHA256** scheme: the literal query
//! string (parameters in the order they were added, joined with `&`) is
//! signed with the API secret as key, and the lowercase hex digest is
//! appended as a final `signature` parameter. The API key travels separately
//! in the `X-MBX-APIKEY` header.
//!
//! Because the signature covers the exact bytes of the query, the query sent
//! on the wire must be the one that was signed. [`SignedQuery`] keeps the two
//! together.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute an HMAC-SHA256 signature of `query` and return it as lowercase hex.
///
/// Pure and deterministic: the same `(query, secret)` pair always yields the
/// same 64-character digest.
pub fn sign(query: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(query.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// A canonicalized query string together with its signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedQuery {
    query: String,
    signature: String,
}

impl SignedQuery {
    /// The query string that was signed (without the signature).
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Lowercase hex HMAC-SHA256 of [`query`](Self::query).
    pub fn signature(&self) -> &str {
        &self.signature
    }
}

impl std::fmt::Display for SignedQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.query.is_empty() {
            write!(f, "signature={}", self.signature)
        } else {
            write!(f, "{}&signature={}", self.query, self.signature)
        }
    }
}

/// Join `params` in insertion order into a URL-encoded query string.
pub fn encode_query<K: AsRef<str>, V: AsRef<str>>(params: &[(K, V)]) -> String {
    params
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                urlencoding::encode(k.as_ref()),
                urlencoding::encode(v.as_ref())
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Build a URL-encoded, HMAC-SHA256–signed query.
///
/// `params` must already include `timestamp`. Order is preserved exactly;
/// reordering the same parameters produces a different signature.
///
/// # Example
///
/// ```ignore
/// let params = [("symbol", "BTCUSDT"), ("timestamp", "1234567890")];
/// let signed = build_signed_query(&params, "my_secret");
/// assert!(signed.to_string().starts_with("symbol=BTCUSDT&timestamp=1234567890&signature="));
/// ```
pub fn build_signed_query<K: AsRef<str>, V: AsRef<str>>(
    params: &[(K, V)],
    secret: &str,
) -> SignedQuery {
    let query = encode_query(params);
    let signature = sign(&query, secret);
    SignedQuery { query, signature }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BINANCE_SECRET: &str = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";

    #[test]
    fn known_vector_from_binance_docs() {
        let query = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1\
                     &recvWindow=5000&timestamp=1499827319559";
        assert_eq!(
            sign(query, BINANCE_SECRET),
            "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
        );
    }

    #[test]
    fn sign_is_deterministic_lowercase_hex() {
        let a = sign("timestamp=1700000000000", "secret");
        let b = sign("timestamp=1700000000000", "secret");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn parameter_order_changes_signature() {
        let forward = build_signed_query(&[("symbol", "BTCUSDT"), ("side", "BUY")], "secret");
        let reversed = build_signed_query(&[("side", "BUY"), ("symbol", "BTCUSDT")], "secret");
        assert_ne!(forward.signature(), reversed.signature());
    }

    #[test]
    fn signed_query_appends_signature() {
        let params = [("symbol", "BTCUSDT"), ("timestamp", "1234567890")];
        let signed = build_signed_query(&params, "test_secret");
        let s = signed.to_string();
        assert!(s.starts_with("symbol=BTCUSDT&timestamp=1234567890&signature="));
        assert_eq!(
            signed.signature(),
            sign("symbol=BTCUSDT&timestamp=1234567890", "test_secret")
        );
    }

    #[test]
    fn values_are_url_encoded_before_signing() {
        let signed = build_signed_query(&[("note", "a b&c")], "s");
        assert_eq!(signed.query(), "note=a%20b%26c");
    }

    #[test]
    fn empty_params_still_sign() {
        let signed = build_signed_query::<&str, &str>(&[], "s");
        assert!(signed.to_string().starts_with("signature="));
    }
}
