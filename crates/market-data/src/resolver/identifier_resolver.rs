//! Symbol → provider identifier resolution.
//!
//! Lookup order:
//! 1. The provider's [`IdentifierCache`]
//! 2. The provider's search endpoint, picking a candidate with [`select_candidate`]
//! 3. The provider's full listing, first case-insensitive symbol match
//!
//! A successful lookup is written back to the cache. Exhausting every tier
//! yields `None`; the caller treats that as "cannot convert this symbol".

use std::sync::Arc;

use log::debug;

use crate::cache::IdentifierCache;
use crate::models::{CanonicalId, Symbol};
use crate::provider::{AssetCandidate, PricingProvider};

/// Where a resolved identifier came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolutionSource {
    Cache,
    Search,
    Listing,
}

impl ResolutionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionSource::Cache => "cache",
            ResolutionSource::Search => "search",
            ResolutionSource::Listing => "listing",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedId {
    pub id: CanonicalId,
    pub source: ResolutionSource,
}

/// Pick the best search candidate for `symbol`.
///
/// Among candidates whose symbol matches case-insensitively, the first one
/// without a rank wins outright; otherwise the smallest rank wins, ties going
/// to the earlier candidate. With no exact match, the first candidate is used.
pub fn select_candidate<'a>(
    candidates: &'a [AssetCandidate],
    symbol: &str,
) -> Option<&'a AssetCandidate> {
    let mut best: Option<&AssetCandidate> = None;
    for candidate in candidates.iter().filter(|c| c.matches(symbol)) {
        let Some(rank) = candidate.rank else {
            return Some(candidate);
        };
        let better = match best.and_then(|b| b.rank) {
            Some(best_rank) => rank < best_rank,
            None => true,
        };
        if better {
            best = Some(candidate);
        }
    }
    best.or_else(|| candidates.first())
}

/// Resolves symbols against a single provider's identifier space.
#[derive(Clone)]
pub struct IdentifierResolver {
    provider: Arc<dyn PricingProvider>,
    cache: IdentifierCache,
}

impl IdentifierResolver {
    pub fn new(provider: Arc<dyn PricingProvider>, cache: IdentifierCache) -> Self {
        Self { provider, cache }
    }

    pub async fn resolve(&self, symbol: &Symbol) -> Option<ResolvedId> {
        if symbol.is_empty() {
            return None;
        }
        let key = symbol.key();

        if let Some(id) = self.cache.get(key).await {
            return Some(ResolvedId {
                id,
                source: ResolutionSource::Cache,
            });
        }

        let resolved = match self.from_search(key).await {
            Some(id) => ResolvedId {
                id,
                source: ResolutionSource::Search,
            },
            None => ResolvedId {
                id: self.from_listing(key).await?,
                source: ResolutionSource::Listing,
            },
        };

        debug!(
            "Resolved '{}' to '{}' on {} via {}",
            key,
            resolved.id,
            self.provider.id(),
            resolved.source.as_str()
        );
        self.cache.insert(key, resolved.id.clone()).await;
        Some(resolved)
    }

    async fn from_search(&self, key: &str) -> Option<CanonicalId> {
        let candidates = self.provider.search(key).await?;
        select_candidate(&candidates, key)
            .filter(|candidate| !candidate.id.is_empty())
            .map(|candidate| candidate.id.clone())
    }

    async fn from_listing(&self, key: &str) -> Option<CanonicalId> {
        debug!("Falling back to full listing on {} for '{}'", self.provider.id(), key);
        let listing = self.provider.listing().await?;
        listing
            .into_iter()
            .find(|candidate| candidate.matches(key) && !candidate.id.is_empty())
            .map(|candidate| candidate.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::models::PriceQuote;

    fn candidate(id: &str, symbol: &str, rank: Option<u32>) -> AssetCandidate {
        AssetCandidate::new(id, symbol, rank)
    }

    #[test]
    fn test_select_smallest_rank() {
        let candidates = vec![
            candidate("wrapped", "BTC", Some(40)),
            candidate("bitcoin", "btc", Some(1)),
            candidate("other", "BTC", Some(900)),
        ];
        assert_eq!(select_candidate(&candidates, "btc").unwrap().id, "bitcoin");
    }

    #[test]
    fn test_first_unranked_match_wins() {
        let candidates = vec![
            candidate("bitcoin", "BTC", Some(1)),
            candidate("unranked-a", "BTC", None),
            candidate("unranked-b", "BTC", None),
        ];
        assert_eq!(
            select_candidate(&candidates, "btc").unwrap().id,
            "unranked-a"
        );
    }

    #[test]
    fn test_equal_ranks_keep_earlier() {
        let candidates = vec![
            candidate("first", "ABC", Some(5)),
            candidate("second", "ABC", Some(5)),
        ];
        assert_eq!(select_candidate(&candidates, "abc").unwrap().id, "first");
    }

    #[test]
    fn test_no_exact_match_uses_first_candidate() {
        let candidates = vec![
            candidate("bitcoin-cash", "BCH", Some(20)),
            candidate("bitcoin", "BTC", Some(1)),
        ];
        assert_eq!(
            select_candidate(&candidates, "bitc").unwrap().id,
            "bitcoin-cash"
        );
        assert!(select_candidate(&[], "btc").is_none());
    }

    /// Provider with canned search/listing results and call counters.
    #[derive(Default)]
    struct FakeProvider {
        search: Option<Vec<AssetCandidate>>,
        listing: Option<Vec<AssetCandidate>>,
        search_calls: AtomicUsize,
        listing_calls: AtomicUsize,
    }

    #[async_trait]
    impl PricingProvider for FakeProvider {
        fn id(&self) -> &'static str {
            "fake"
        }

        async fn search(&self, _query: &str) -> Option<Vec<AssetCandidate>> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            self.search.clone()
        }

        async fn listing(&self) -> Option<Vec<AssetCandidate>> {
            self.listing_calls.fetch_add(1, Ordering::SeqCst);
            self.listing.clone()
        }

        async fn prices(&self, _ids: &[String], _currencies: &[String]) -> Option<PriceQuote> {
            None
        }
    }

    fn resolver(provider: Arc<FakeProvider>) -> IdentifierResolver {
        IdentifierResolver::new(provider, IdentifierCache::new())
    }

    #[tokio::test]
    async fn test_second_resolve_hits_cache() {
        let provider = Arc::new(FakeProvider {
            search: Some(vec![candidate("bitcoin", "BTC", Some(1))]),
            ..Default::default()
        });
        let resolver = resolver(provider.clone());

        let first = resolver.resolve(&Symbol::parse("BTC")).await.unwrap();
        assert_eq!(first.id, "bitcoin");
        assert_eq!(first.source, ResolutionSource::Search);

        let second = resolver.resolve(&Symbol::parse("btc")).await.unwrap();
        assert_eq!(second.id, "bitcoin");
        assert_eq!(second.source, ResolutionSource::Cache);
        assert_eq!(provider.search_calls.load(Ordering::SeqCst), 1);
        assert_eq!(provider.listing_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_listing_used_only_after_search_fails() {
        let provider = Arc::new(FakeProvider {
            search: None,
            listing: Some(vec![
                candidate("tether", "usdt", None),
                candidate("ethereum", "eth", None),
                candidate("ethereum-clone", "eth", None),
            ]),
            ..Default::default()
        });
        let resolved = resolver(provider.clone())
            .resolve(&Symbol::parse("ETH"))
            .await
            .unwrap();

        assert_eq!(resolved.id, "ethereum");
        assert_eq!(resolved.source, ResolutionSource::Listing);
        assert_eq!(provider.search_calls.load(Ordering::SeqCst), 1);
        assert_eq!(provider.listing_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_search_falls_back_to_listing() {
        let provider = Arc::new(FakeProvider {
            search: Some(vec![]),
            listing: Some(vec![candidate("solana", "SOL", None)]),
            ..Default::default()
        });
        let resolved = resolver(provider).resolve(&Symbol::parse("sol")).await;
        assert_eq!(resolved.unwrap().id, "solana");
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_not_cached() {
        let provider = Arc::new(FakeProvider {
            search: Some(vec![]),
            listing: Some(vec![]),
            ..Default::default()
        });
        let resolver = resolver(provider.clone());

        assert!(resolver.resolve(&Symbol::parse("nope")).await.is_none());
        assert!(resolver.resolve(&Symbol::parse("nope")).await.is_none());
        assert_eq!(provider.search_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_symbol_makes_no_calls() {
        let provider = Arc::new(FakeProvider::default());
        assert!(resolver(provider.clone())
            .resolve(&Symbol::parse("   "))
            .await
            .is_none());
        assert_eq!(provider.search_calls.load(Ordering::SeqCst), 0);
    }
}
