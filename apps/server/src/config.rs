use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{anyhow, Context};
use coinbridge_market_data::{
    provider::{coingecko, coinmarketcap, coinpaprika},
    CacheConfig, IdentifierCache, PriceCache,
};

/// Pricing provider behind the conversion engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SecondaryProvider {
    CoinGecko,
    CoinPaprika,
}

impl FromStr for SecondaryProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coingecko" => Ok(Self::CoinGecko),
            "coinpaprika" => Ok(Self::CoinPaprika),
            other => Err(anyhow!("Unknown secondary provider: {}", other)),
        }
    }
}

pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Enables CoinMarketCap as the primary converter when set.
    pub coinmarketcap_api_key: Option<String>,
    pub coinmarketcap_base_url: String,
    pub coingecko_base_url: String,
    pub coingecko_api_key: Option<String>,
    pub coinpaprika_base_url: String,
    pub secondary_provider: SecondaryProvider,
    pub upstream_timeout: Duration,
    pub price_cache: CacheConfig,
    pub id_cache: CacheConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unset or blank variables take
    /// their defaults; unparsable numbers fall back to the default too.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let number = |key: &str, default: u64| {
            var(key)
                .and_then(|value| value.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };

        let listen_addr: SocketAddr = var("CB_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid CB_LISTEN_ADDR")?;
        let cors_allow = var("CB_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let secondary_provider = match var("CB_SECONDARY_PROVIDER") {
            Some(name) => name.parse().context("Invalid CB_SECONDARY_PROVIDER")?,
            None => SecondaryProvider::CoinGecko,
        };

        let price_defaults = PriceCache::DEFAULT_CONFIG;
        let id_defaults = IdentifierCache::DEFAULT_CONFIG;

        Ok(Self {
            listen_addr,
            cors_allow,
            request_timeout: Duration::from_millis(number("CB_REQUEST_TIMEOUT_MS", 30000)),
            coinmarketcap_api_key: var("MARKETCAP_APIKEY"),
            coinmarketcap_base_url: var("CB_COINMARKETCAP_BASE_URL")
                .unwrap_or_else(|| coinmarketcap::DEFAULT_BASE_URL.to_string()),
            coingecko_base_url: var("CB_COINGECKO_BASE_URL")
                .unwrap_or_else(|| coingecko::DEFAULT_BASE_URL.to_string()),
            coingecko_api_key: var("CB_COINGECKO_API_KEY"),
            coinpaprika_base_url: var("COINPAPRIKA_API")
                .unwrap_or_else(|| coinpaprika::DEFAULT_BASE_URL.to_string()),
            secondary_provider,
            upstream_timeout: Duration::from_secs(number("CB_UPSTREAM_TIMEOUT_SECS", 10)),
            price_cache: CacheConfig::new(
                Duration::from_secs(number(
                    "CB_PRICE_CACHE_TTL_SECS",
                    price_defaults.ttl.as_secs(),
                )),
                number("CB_PRICE_CACHE_CAPACITY", price_defaults.capacity),
            ),
            id_cache: CacheConfig::new(
                Duration::from_secs(number("CB_ID_CACHE_TTL_SECS", id_defaults.ttl.as_secs())),
                number("CB_ID_CACHE_CAPACITY", id_defaults.capacity),
            ),
        })
    }
}
