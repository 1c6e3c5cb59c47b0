use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::price::PriceField;
use super::SpotPriceProvider;
use crate::client::{decode, JsonFetcher};
use crate::errors::MarketDataError;
use crate::models::{Exchange, SpotPrice};

const DEFAULT_BASE_URL: &str = "https://api.coinbase.com/v2";

#[derive(Debug, Deserialize)]
struct SpotResponse {
    data: SpotData,
}

#[derive(Debug, Deserialize)]
struct SpotData {
    amount: PriceField,
}

/// Coinbase quotes against USD with dashed pairs: `BTCUSDT` → `BTC-USD`.
pub(crate) fn translate_symbol(symbol: &str) -> String {
    match symbol.strip_suffix("USDT") {
        Some(base) => format!("{}-USD", base),
        None => symbol.to_string(),
    }
}

/// Coinbase `/prices/{pair}/spot`.
pub struct CoinbaseSpot {
    fetcher: Arc<dyn JsonFetcher>,
    base_url: String,
}

impl CoinbaseSpot {
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
impl SpotPriceProvider for CoinbaseSpot {
    fn exchange(&self) -> Exchange {
        Exchange::Coinbase
    }

    async fn spot_price(&self, symbol: &str) -> Result<SpotPrice, MarketDataError> {
        let provider = self.exchange().as_str();
        let pair = translate_symbol(symbol);
        debug!("Fetching {} from Coinbase as {}", symbol, pair);

        let url = format!(
            "{}/prices/{}/spot",
            self.base_url,
            urlencoding::encode(&pair)
        );
        let body = self
            .fetcher
            .fetch_json(&url, &[], &[])
            .await
            .ok_or_else(|| MarketDataError::unavailable(provider))?;
        let response: SpotResponse = decode(body)
            .ok_or_else(|| MarketDataError::unexpected(provider, "missing data.amount"))?;

        Ok(SpotPrice::new(
            symbol,
            self.exchange(),
            response.data.amount.to_decimal(provider)?,
        ))
    }
}
