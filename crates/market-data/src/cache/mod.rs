//! Process-wide caches shared across conversion requests.
//!
//! Both caches are `moka` caches with per-entry TTL and bounded capacity.
//! They are constructed once at startup and handed to the components that
//! use them; entries expire on their own.

mod identifier_cache;
mod price_cache;

pub use identifier_cache::IdentifierCache;
pub use price_cache::{PriceCache, PriceKey};

use std::time::Duration;

/// TTL and capacity of a cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub capacity: u64,
}

impl CacheConfig {
    pub const fn new(ttl: Duration, capacity: u64) -> Self {
        Self { ttl, capacity }
    }
}
