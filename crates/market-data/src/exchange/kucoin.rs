use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::price::PriceField;
use super::SpotPriceProvider;
use crate::client::{decode, JsonFetcher};
use crate::errors::MarketDataError;
use crate::models::{Exchange, SpotPrice};

const DEFAULT_BASE_URL: &str = "https://api.kucoin.com/api/v1";

#[derive(Debug, Deserialize)]
struct Level1Response {
    /// `null` for unknown symbols
    data: Option<Level1>,
}

#[derive(Debug, Deserialize)]
struct Level1 {
    price: PriceField,
}

/// KuCoin uses dashed pairs: `BTCUSDT` → `BTC-USDT`.
pub(crate) fn translate_symbol(symbol: &str) -> String {
    if symbol.contains('-') {
        return symbol.to_string();
    }
    match symbol.strip_suffix("USDT") {
        Some(base) => format!("{}-USDT", base),
        None => symbol.to_string(),
    }
}

/// KuCoin `market/orderbook/level1`.
pub struct KucoinSpot {
    fetcher: Arc<dyn JsonFetcher>,
    base_url: String,
}

impl KucoinSpot {
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
impl SpotPriceProvider for KucoinSpot {
    fn exchange(&self) -> Exchange {
        Exchange::Kucoin
    }

    async fn spot_price(&self, symbol: &str) -> Result<SpotPrice, MarketDataError> {
        let provider = self.exchange().as_str();
        let pair = translate_symbol(symbol);
        debug!("Fetching {} from KuCoin as {}", symbol, pair);

        let body = self
            .fetcher
            .fetch_json(
                &format!("{}/market/orderbook/level1", self.base_url),
                &[("symbol", pair)],
                &[],
            )
            .await
            .ok_or_else(|| MarketDataError::unavailable(provider))?;
        let response: Level1Response = decode(body)
            .ok_or_else(|| MarketDataError::unexpected(provider, "malformed level1"))?;
        let level1 = response
            .data
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?;

        Ok(SpotPrice::new(
            symbol,
            self.exchange(),
            level1.price.to_decimal(provider)?,
        ))
    }
}
