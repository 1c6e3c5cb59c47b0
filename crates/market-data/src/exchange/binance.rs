use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::price::PriceField;
use super::SpotPriceProvider;
use crate::client::{decode, JsonFetcher};
use crate::errors::MarketDataError;
use crate::models::{Exchange, SpotPrice};

const DEFAULT_BASE_URL: &str = "https://api.binance.com/api/v3";

#[derive(Debug, Deserialize)]
struct TickerPrice {
    price: PriceField,
}

/// Binance `/ticker/price`. Symbols are used as-is.
pub struct BinanceSpot {
    fetcher: Arc<dyn JsonFetcher>,
    base_url: String,
}

impl BinanceSpot {
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
impl SpotPriceProvider for BinanceSpot {
    fn exchange(&self) -> Exchange {
        Exchange::Binance
    }

    async fn spot_price(&self, symbol: &str) -> Result<SpotPrice, MarketDataError> {
        let provider = self.exchange().as_str();
        debug!("Fetching {} from Binance", symbol);

        let body = self
            .fetcher
            .fetch_json(
                &format!("{}/ticker/price", self.base_url),
                &[("symbol", symbol.to_string())],
                &[],
            )
            .await
            .ok_or_else(|| MarketDataError::unavailable(provider))?;
        let ticker: TickerPrice = decode(body)
            .ok_or_else(|| MarketDataError::unexpected(provider, "missing price"))?;

        Ok(SpotPrice::new(
            symbol,
            self.exchange(),
            ticker.price.to_decimal(provider)?,
        ))
    }
}
