//! Pricing provider trait definitions.
//!
//! Two kinds of upstream exist:
//! - [`PricingProvider`]: resolves symbols to its own identifiers and prices
//!   identifiers against currencies. The conversion engine runs on top of it.
//! - [`NativeConverter`]: performs the whole conversion in a single call.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{PriceQuote, ProviderId, Symbol};

/// An asset as listed by a provider's search or listing endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetCandidate {
    /// Provider-specific identifier (e.g. "bitcoin", "btc-bitcoin").
    pub id: String,
    pub symbol: String,
    /// Market-cap rank, lower is larger. Not every asset has one.
    pub rank: Option<u32>,
}

impl AssetCandidate {
    pub fn new(id: impl Into<String>, symbol: impl Into<String>, rank: Option<u32>) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            rank,
        }
    }

    pub fn matches(&self, symbol: &str) -> bool {
        self.symbol.eq_ignore_ascii_case(symbol)
    }
}

/// Upstream that can list assets and price them.
///
/// Every method returns `None` when the upstream could not be reached or
/// answered with an unusable payload.
#[async_trait]
pub trait PricingProvider: Send + Sync {
    /// Unique identifier, also reported as the conversion `source`.
    fn id(&self) -> ProviderId;

    /// Fuzzy search by free text.
    ///
    /// Providers without a search endpoint keep the default, which sends
    /// resolution straight to [`listing`](Self::listing).
    async fn search(&self, _query: &str) -> Option<Vec<AssetCandidate>> {
        None
    }

    /// Full listing of known assets. Expensive; only used after search.
    async fn listing(&self) -> Option<Vec<AssetCandidate>>;

    /// Prices of `ids` in each of `currencies` (lower-case codes).
    async fn prices(&self, ids: &[String], currencies: &[String]) -> Option<PriceQuote>;
}

/// Upstream with a one-shot conversion endpoint.
#[async_trait]
pub trait NativeConverter: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Convert `amount` of `from` into `to`, returning the converted amount.
    async fn convert(&self, amount: f64, from: &Symbol, to: &Symbol)
        -> Result<f64, MarketDataError>;
}
