use std::time::Duration;

use moka::future::Cache;

use super::CacheConfig;
use crate::models::CanonicalId;

/// Symbol → provider identifier mappings for one provider.
///
/// Keys are lower-cased symbols. Each provider owns its own instance since
/// identifiers are meaningless outside the provider that issued them.
#[derive(Clone)]
pub struct IdentifierCache {
    cache: Cache<String, CanonicalId>,
}

impl IdentifierCache {
    pub const DEFAULT_CONFIG: CacheConfig = CacheConfig::new(Duration::from_secs(3600), 10_000);

    /// Create an identifier cache with the default TTL (1h) and capacity (10000).
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

    pub async fn get(&self, symbol: &str) -> Option<CanonicalId> {
        self.cache.get(&symbol.to_lowercase()).await
    }

    pub async fn insert(&self, symbol: &str, id: CanonicalId) {
        self.cache.insert(symbol.to_lowercase(), id).await;
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

impl Default for IdentifierCache {
    fn default() -> Self {
        Self::new()
    }
}
