//! JSON-over-HTTP access to upstream APIs.
//!
//! Every upstream call in this crate goes through [`JsonFetcher`], which turns
//! transport errors, non-success statuses and unparsable bodies into `None`.
//! Callers check for absence explicitly and decide what it means for them.

mod http;

pub use http::{HttpJsonClient, DEFAULT_TIMEOUT};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Fetches a JSON document, or nothing.
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    /// Issue a GET request with the given query parameters and headers.
    ///
    /// Returns `None` on any failure; never panics or errors.
    async fn fetch_json(
        &self,
        url: &str,
        query: &[(&str, String)],
        headers: &[(&'static str, String)],
    ) -> Option<Value>;
}

/// Parse a fetched document into a typed response, or nothing.
pub fn decode<T: DeserializeOwned>(value: Value) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::debug!("Discarding response with unexpected shape: {}", e);
            None
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Ticker {
        price: String,
    }

    #[test]
    fn test_decode_typed_payload() {
        let ticker: Option<Ticker> = decode(json!({"symbol": "BTCUSDT", "price": "50000.10"}));
        assert_eq!(ticker.unwrap().price, "50000.10");
    }

    #[test]
    fn test_decode_wrong_shape_is_absent() {
        let ticker: Option<Ticker> = decode(json!({"code": -1121, "msg": "Invalid symbol."}));
        assert!(ticker.is_none());
    }
}
