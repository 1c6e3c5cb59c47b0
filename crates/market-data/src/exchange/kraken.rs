use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::price::PriceField;
use super::SpotPriceProvider;
use crate::client::{decode, JsonFetcher};
use crate::errors::MarketDataError;
use crate::models::{Exchange, SpotPrice};

const DEFAULT_BASE_URL: &str = "https://api.kraken.com/0/public";

#[derive(Debug, Deserialize)]
struct TickerResponse {
    #[serde(default)]
    error: Vec<String>,
    #[serde(default)]
    result: BTreeMap<String, PairTicker>,
}

#[derive(Debug, Deserialize)]
struct PairTicker {
    /// Last trade closed: `[price, lot volume]`
    c: Vec<PriceField>,
}

/// Kraken names bitcoin XBT: `BTCUSDT` → `XBTUSDT`.
pub(crate) fn translate_symbol(symbol: &str) -> String {
    match symbol.strip_prefix("BTC") {
        Some(rest) => format!("XBT{}", rest),
        None => symbol.to_string(),
    }
}

/// Kraken public `Ticker`, last trade price of the first returned pair.
pub struct KrakenSpot {
    fetcher: Arc<dyn JsonFetcher>,
    base_url: String,
}

impl KrakenSpot {
    pub fn new(fetcher: Arc<dyn JsonFetcher>) -> Self {
        Self::with_base_url(fetcher, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(fetcher: Arc<dyn JsonFetcher>, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SpotPriceProvider for KrakenSpot {
    fn exchange(&self) -> Exchange {
        Exchange::Kraken
    }

    async fn spot_price(&self, symbol: &str) -> Result<SpotPrice, MarketDataError> {
        let provider = self.exchange().as_str();
        let pair = translate_symbol(symbol);
        debug!("Fetching {} from Kraken as {}", symbol, pair);

        let body = self
            .fetcher
            .fetch_json(
                &format!("{}/Ticker", self.base_url),
                &[("pair", pair.clone())],
                &[],
            )
            .await
            .ok_or_else(|| MarketDataError::unavailable(provider))?;
        let response: TickerResponse = decode(body)
            .ok_or_else(|| MarketDataError::unexpected(provider, "malformed ticker"))?;

        if !response.error.is_empty() {
            warn!("Kraken rejected {}: {:?}", pair, response.error);
            if response.error.iter().any(|e| e.contains("Unknown asset pair")) {
                return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
            }
            return Err(MarketDataError::unexpected(provider, response.error.join("; ")));
        }

        let last = response
            .result
            .into_values()
            .next()
            .and_then(|ticker| ticker.c.into_iter().next())
            .ok_or_else(|| MarketDataError::unexpected(provider, "empty result"))?;

        Ok(SpotPrice::new(symbol, self.exchange(), last.to_decimal(provider)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::FakeFetcher;
    use rust_decimal_macros::dec;
    use serde_json::json;

    const URL: &str = "https://kraken.test/Ticker";

    #[test]
    fn test_translate_symbol() {
        assert_eq!(translate_symbol("BTCUSDT"), "XBTUSDT");
        assert_eq!(translate_symbol("BTCUSD"), "XBTUSD");
        assert_eq!(translate_symbol("ETHUSDT"), "ETHUSDT");
    }

    #[tokio::test]
    async fn test_last_trade_price() {
        let fetcher = Arc::new(FakeFetcher::new().respond(
            URL,
            json!({
                "error": [],
                "result": {
                    "XBTUSDT": {"a": ["50001.0", "1", "1.000"], "c": ["50000.50000", "0.01"]}
                }
            }),
        ));
        let spot = KrakenSpot::with_base_url(fetcher.clone(), "https://kraken.test")
            .spot_price("BTCUSDT")
            .await
            .unwrap();

        assert_eq!(spot.price, dec!(50000.5));
        assert_eq!(spot.symbol, "BTCUSDT");
        assert_eq!(fetcher.calls()[0].param("pair"), Some("XBTUSDT"));
    }

    #[tokio::test]
    async fn test_unknown_pair() {
        let fetcher = Arc::new(FakeFetcher::new().respond(
            URL,
            json!({"error": ["EQuery:Unknown asset pair"]}),
        ));
        let result = KrakenSpot::with_base_url(fetcher, "https://kraken.test")
            .spot_price("NOPEUSDT")
            .await;
        assert!(matches!(result, Err(MarketDataError::SymbolNotFound(s)) if s == "NOPEUSDT"));
    }

    #[tokio::test]
    async fn test_empty_result() {
        let fetcher = Arc::new(FakeFetcher::new().respond(URL, json!({"error": [], "result": {}})));
        let result = KrakenSpot::with_base_url(fetcher, "https://kraken.test")
            .spot_price("ETHUSDT")
            .await;
        assert!(matches!(
            result,
            Err(MarketDataError::UnexpectedResponse { .. })
        ));
    }
}
