//! Wall-clock helpers for signed requests.
//!
//! Signed endpoints take a `timestamp` in milliseconds since the Unix epoch;
//! the exchange rejects requests whose timestamp falls outside `recvWindow`.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time as **milliseconds** since Unix epoch.
#[inline]
pub fn now_ms() -> u64 {
    let d = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    d.as_secs() * 1_000 + u64::from(d.subsec_millis())
}

/// Current time in milliseconds, formatted for a query parameter.
#[inline]
pub fn timestamp_param() -> String {
    now_ms().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_ms_is_after_2020() {
        assert!(now_ms() > 1_577_836_800_000);
    }

    #[test]
    fn timestamp_param_is_numeric() {
        let ts = timestamp_param();
        assert!(ts.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(ts.len(), 13);
    }
}
