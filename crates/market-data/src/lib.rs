//! Coinbridge Market Data Crate
//!
//! Price aggregation for crypto assets: exchange spot prices and currency
//! conversion between crypto assets and fiat currencies.
//!
//! # Overview
//!
//! - Spot prices from Binance, Coinbase, Kraken and KuCoin
//! - Conversion in any direction between crypto and fiat (fiat to fiat excluded)
//! - Per-provider identifier resolution with a search-then-listing fallback
//! - Short-lived price caching shared across requests
//! - Native conversion on a primary provider with a single fallback
//!
//! # Architecture
//!
//! ```text
//!   convert(from, to, amount)
//!            |
//!            v
//! +----------------------+   failure   +----------------------+
//! |  NativeConverter     | ----------> |  ConversionEngine    |
//! |  (CoinMarketCap)     |             |  (CoinGecko/Paprika) |
//! +----------------------+             +----------------------+
//!                                         |             |
//!                                         v             v
//!                              +----------------+ +--------------+
//!                              | Identifier     | | PriceCache   |
//!                              | Resolver+Cache | |              |
//!                              +----------------+ +--------------+
//!                                         |             |
//!                                         v             v
//!                              +-------------------------------+
//!                              |  JsonFetcher (absent on fail) |
//!                              +-------------------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Symbol`] / [`PairKind`] - Normalized codes and pair classification
//! - [`PriceQuote`] - Provider price payload
//! - [`ConversionOutcome`] - Result or structured failure, never a fault
//! - [`DebugTrace`] - Diagnostics attached on request
//! - [`SpotPrice`] - Latest exchange price

pub mod cache;
pub mod client;
pub mod conversion;
pub mod errors;
pub mod exchange;
pub mod models;
pub mod provider;
pub mod resolver;

// Re-export all public types from models
pub use models::{
    CanonicalId, ConversionFailure, ConversionOutcome, ConversionResult, DebugTrace, Exchange,
    PairKind, PriceQuote, ProviderId, SpotPrice, Symbol, FIAT_CURRENCIES, REFERENCE_CURRENCY,
};

pub use cache::{CacheConfig, IdentifierCache, PriceCache, PriceKey};
pub use client::{HttpJsonClient, JsonFetcher};
pub use conversion::{ConversionEngine, CurrencyConverter, FallbackConverter, Priced};
pub use errors::{ConversionError, ErrorCategory, MarketDataError};
pub use exchange::{ExchangeRegistry, SpotPriceProvider};
pub use provider::coingecko::CoinGeckoProvider;
pub use provider::coinmarketcap::CoinMarketCapConverter;
pub use provider::coinpaprika::CoinPaprikaProvider;
pub use provider::{AssetCandidate, NativeConverter, PricingProvider};
pub use resolver::{select_candidate, IdentifierResolver, ResolutionSource, ResolvedId};
