use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use super::{BinanceSpot, CoinbaseSpot, KrakenSpot, KucoinSpot, SpotPriceProvider};
use crate::client::JsonFetcher;
use crate::errors::MarketDataError;
use crate::models::{Exchange, SpotPrice};

/// Spot price providers by exchange.
#[derive(Clone, Default)]
pub struct ExchangeRegistry {
    providers: HashMap<Exchange, Arc<dyn SpotPriceProvider>>,
}

impl ExchangeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every supported exchange, sharing one fetcher.
    pub fn with_defaults(fetcher: Arc<dyn JsonFetcher>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(BinanceSpot::new(fetcher.clone())));
        registry.register(Arc::new(CoinbaseSpot::new(fetcher.clone())));
        registry.register(Arc::new(KrakenSpot::new(fetcher.clone())));
        registry.register(Arc::new(KucoinSpot::new(fetcher)));
        registry
    }

    /// Add or replace the provider for its exchange.
    pub fn register(&mut self, provider: Arc<dyn SpotPriceProvider>) {
        self.providers.insert(provider.exchange(), provider);
    }

    pub fn exchanges(&self) -> Vec<Exchange> {
        Exchange::ALL
            .into_iter()
            .filter(|exchange| self.providers.contains_key(exchange))
            .collect()
    }

    /// Look up `symbol` on the exchange named `exchange` (case-insensitive).
    pub async fn spot_price(
        &self,
        exchange: &str,
        symbol: &str,
    ) -> Result<SpotPrice, MarketDataError> {
        let exchange: Exchange = exchange.parse()?;
        let provider = self
            .providers
            .get(&exchange)
            .ok_or_else(|| MarketDataError::UnsupportedExchange(exchange.to_string()))?;

        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(MarketDataError::SymbolNotFound(symbol));
        }

        debug!("Spot price for {} on {}", symbol, exchange);
        provider.spot_price(&symbol).await
    }
}
