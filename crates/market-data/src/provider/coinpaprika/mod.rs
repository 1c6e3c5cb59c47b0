//! CoinPaprika provider.
//!
//! CoinPaprika has no search endpoint, so identifiers are resolved from the
//! `/coins` listing (active coins only). Prices come from `/tickers/{id}`, one
//! request per identifier, issued concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::client::{decode, JsonFetcher};
use crate::models::{PriceQuote, ProviderId};
use crate::provider::{AssetCandidate, PricingProvider};

/// Provider ID constant
pub const PROVIDER_ID: ProviderId = "coinpaprika";

/// Public API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.coinpaprika.com/v1";

#[derive(Debug, Deserialize)]
struct PaprikaCoin {
    #[serde(default)]
    id: String,
    #[serde(default)]
    symbol: String,
    /// Zero for unranked coins
    #[serde(default)]
    rank: u32,
    #[serde(default)]
    is_active: bool,
}

#[derive(Debug, Deserialize)]
struct PaprikaTicker {
    #[serde(default)]
    quotes: HashMap<String, PaprikaQuote>,
}

#[derive(Debug, Deserialize)]
struct PaprikaQuote {
    price: Option<f64>,
}

pub struct CoinPaprikaProvider {
    fetcher: Arc<dyn JsonFetcher>,
    base_url: String,
}

impl CoinPaprikaProvider {
    pub fn new(fetcher: Arc<dyn JsonFetcher>) -> Self {
        Self::with_base_url(fetcher, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(fetcher: Arc<dyn JsonFetcher>, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn ticker(&self, id: &str, quotes: &str) -> Option<PaprikaTicker> {
        let url = format!("{}/tickers/{}", self.base_url, urlencoding::encode(id));
        let body = self
            .fetcher
            .fetch_json(&url, &[("quotes", quotes.to_string())], &[])
            .await?;
        decode(body)
    }
}

#[async_trait]
impl PricingProvider for CoinPaprikaProvider {
    fn id(&self) -> ProviderId {
        PROVIDER_ID
    }

    async fn listing(&self) -> Option<Vec<AssetCandidate>> {
        debug!("Fetching CoinPaprika coin list");
        let body = self
            .fetcher
            .fetch_json(&format!("{}/coins", self.base_url), &[], &[])
            .await?;
        let coins: Vec<PaprikaCoin> = decode(body)?;
        Some(
            coins
                .into_iter()
                .filter(|coin| coin.is_active)
                .map(|coin| {
                    let rank = (coin.rank > 0).then_some(coin.rank);
                    AssetCandidate::new(coin.id, coin.symbol, rank)
                })
                .collect(),
        )
    }

    /// Fails as a whole if any ticker is missing, so a partial batch is
    /// never cached.
    async fn prices(&self, ids: &[String], currencies: &[String]) -> Option<PriceQuote> {
        let quotes = currencies
            .iter()
            .map(|currency| currency.to_uppercase())
            .collect::<Vec<_>>()
            .join(",");

        let tickers = join_all(ids.iter().map(|id| self.ticker(id, &quotes))).await;

        let mut quote = PriceQuote::new();
        for (id, ticker) in ids.iter().zip(tickers) {
            let Some(ticker) = ticker else {
                warn!("No CoinPaprika ticker for {}", id);
                return None;
            };
            for (currency, entry) in ticker.quotes {
                if let Some(price) = entry.price {
                    quote.insert(id.clone(), &currency, price);
                }
            }
        }
        Some(quote)
    }
}
