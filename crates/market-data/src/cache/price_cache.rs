//! Short-lived cache of provider price payloads.

use std::fmt;
use std::time::Duration;

use log::debug;
use moka::future::Cache;

use super::CacheConfig;
use crate::models::PriceQuote;

/// Deterministic key of a price request.
///
/// Identifiers and currencies are lower-cased, sorted and de-duplicated, so
/// `{bitcoin, ethereum}` and `{ethereum, bitcoin}` map to the same entry.
/// The provider id is part of the key: payloads from different providers are
/// never shared.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PriceKey(String);

impl PriceKey {
    pub fn new<I, C>(provider: &str, ids: I, currencies: C) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        Self(format!(
            "{}:{}|{}",
            provider,
            canonical_set(ids),
            canonical_set(currencies)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PriceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn canonical_set<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut items: Vec<String> = items
        .into_iter()
        .map(|item| item.as_ref().trim().to_lowercase())
        .collect();
    items.sort();
    items.dedup();
    items.join(",")
}

/// Cache of price payloads keyed by [`PriceKey`].
///
/// Only successful fetches are stored; a miss is always backed by a live call.
#[derive(Clone)]
pub struct PriceCache {
    cache: Cache<PriceKey, PriceQuote>,
}

impl PriceCache {
    pub const DEFAULT_CONFIG: CacheConfig = CacheConfig::new(Duration::from_secs(20), 2000);

    /// Create a price cache with the default TTL (20s) and capacity (2000).
    pub fn new() -> Self {
        Self::with_config(Self::DEFAULT_CONFIG)
    }

    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            cache: Cache::builder()
                .time_to_live(config.ttl)
                .max_capacity(config.capacity)
                .build(),
        }
    }

    pub async fn get(&self, key: &PriceKey) -> Option<PriceQuote> {
        let hit = self.cache.get(key).await;
        if hit.is_some() {
            debug!("Price cache hit for {}", key);
        }
        hit
    }

    pub async fn insert(&self, key: PriceKey, quote: PriceQuote) {
        self.cache.insert(key, quote).await;
    }

    /// Drop every entry.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

impl Default for PriceCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_order_and_case_insensitive() {
        let a = PriceKey::new("coingecko", ["bitcoin", "ethereum"], ["usd"]);
        let b = PriceKey::new("coingecko", ["Ethereum", "bitcoin"], ["USD"]);
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "coingecko:bitcoin,ethereum|usd");
    }

    #[test]
    fn test_key_deduplicates() {
        let a = PriceKey::new("coingecko", ["bitcoin", "bitcoin"], ["usd", "eur", "usd"]);
        assert_eq!(a.as_str(), "coingecko:bitcoin|eur,usd");
    }

    #[test]
    fn test_key_separates_providers() {
        let a = PriceKey::new("coingecko", ["bitcoin"], ["usd"]);
        let b = PriceKey::new("coinpaprika", ["bitcoin"], ["usd"]);
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_get_after_insert() {
        let cache = PriceCache::new();
        let key = PriceKey::new("coingecko", ["bitcoin"], ["usd"]);
        assert!(cache.get(&key).await.is_none());

        let quote = PriceQuote::new().with_price("bitcoin", "usd", 50000.0);
        cache.insert(key.clone(), quote.clone()).await;
        assert_eq!(cache.get(&key).await, Some(quote));
    }

    #[tokio::test]
    async fn test_entries_expire_after_ttl() {
        let cache = PriceCache::with_config(CacheConfig::new(Duration::from_millis(50), 10));
        let key = PriceKey::new("coingecko", ["bitcoin"], ["usd"]);
        cache
            .insert(key.clone(), PriceQuote::new().with_price("bitcoin", "usd", 1.0))
            .await;

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let cache = PriceCache::new();
        let key = PriceKey::new("coingecko", ["bitcoin"], ["usd"]);
        cache
            .insert(key.clone(), PriceQuote::new().with_price("bitcoin", "usd", 1.0))
            .await;
        cache.invalidate_all();
        assert!(cache.get(&key).await.is_none());
    }
}
