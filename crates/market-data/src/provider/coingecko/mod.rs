//! CoinGecko provider.
//!
//! Uses three public endpoints:
//! - `/search?query=` for fast symbol lookup (candidates carry a market-cap rank)
//! - `/coins/list` as the full listing fallback
//! - `/simple/price?ids=&vs_currencies=` for batched prices
//!
//! An optional demo API key is sent as `x-cg-demo-api-key`.

mod models;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::client::{decode, JsonFetcher};
use crate::models::{PriceQuote, ProviderId};
use crate::provider::{AssetCandidate, PricingProvider};

use models::{ListedCoin, SearchResponse};

/// Provider ID constant
pub const PROVIDER_ID: ProviderId = "coingecko";

/// Public API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

const API_KEY_HEADER: &str = "x-cg-demo-api-key";

pub struct CoinGeckoProvider {
    fetcher: Arc<dyn JsonFetcher>,
    base_url: String,
    api_key: Option<String>,
}

impl CoinGeckoProvider {
    pub fn new(fetcher: Arc<dyn JsonFetcher>) -> Self {
        Self::with_base_url(fetcher, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(fetcher: Arc<dyn JsonFetcher>, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn headers(&self) -> Vec<(&'static str, String)> {
        self.api_key
            .iter()
            .map(|key| (API_KEY_HEADER, key.clone()))
            .collect()
    }
}

#[async_trait]
impl PricingProvider for CoinGeckoProvider {
    fn id(&self) -> ProviderId {
        PROVIDER_ID
    }

    async fn search(&self, query: &str) -> Option<Vec<AssetCandidate>> {
        debug!("Searching CoinGecko for '{}'", query);
        let body = self
            .fetcher
            .fetch_json(
                &self.url("/search"),
                &[("query", query.to_string())],
                &self.headers(),
            )
            .await?;
        let response: SearchResponse = decode(body)?;
        Some(response.coins.into_iter().map(AssetCandidate::from).collect())
    }

    async fn listing(&self) -> Option<Vec<AssetCandidate>> {
        debug!("Fetching full CoinGecko coin list");
        let body = self
            .fetcher
            .fetch_json(&self.url("/coins/list"), &[], &self.headers())
            .await?;
        let coins: Vec<ListedCoin> = decode(body)?;
        Some(coins.into_iter().map(AssetCandidate::from).collect())
    }

    async fn prices(&self, ids: &[String], currencies: &[String]) -> Option<PriceQuote> {
        let query = [
            ("ids", ids.join(",")),
            ("vs_currencies", currencies.join(",")),
        ];
        let body = self
            .fetcher
            .fetch_json(&self.url("/simple/price"), &query, &self.headers())
            .await?;
        PriceQuote::from_json(&body)
    }
}
