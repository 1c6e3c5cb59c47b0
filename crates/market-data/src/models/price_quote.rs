use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

/// Prices keyed by provider identifier, then by lower-cased currency code.
///
/// Shaped like CoinGecko's `/simple/price` payload:
/// `{"bitcoin": {"usd": 50000.0}}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PriceQuote {
    prices: HashMap<String, HashMap<String, f64>>,
}

impl PriceQuote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, currency: &str, price: f64) {
        self.prices
            .entry(id.into())
            .or_default()
            .insert(currency.to_lowercase(), price);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_price(mut self, id: impl Into<String>, currency: &str, price: f64) -> Self {
        self.insert(id, currency, price);
        self
    }

    /// Whether the provider returned any entry for `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.prices.contains_key(id)
    }

    pub fn price(&self, id: &str, currency: &str) -> Option<f64> {
        self.prices
            .get(id)
            .and_then(|by_currency| by_currency.get(&currency.to_lowercase()))
            .copied()
    }

    /// Validate a `{id: {currency: number}}` payload.
    ///
    /// Returns `None` when the payload is not an object. Entries that are not
    /// objects and prices that are not numbers are dropped, so a missing price
    /// reads the same as an absent one.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut quote = Self::new();
        for (id, by_currency) in object {
            let Some(by_currency) = by_currency.as_object() else {
                continue;
            };
            let entry = quote.prices.entry(id.clone()).or_default();
            for (currency, price) in by_currency {
                if let Some(price) = price.as_f64() {
                    entry.insert(currency.to_lowercase(), price);
                }
            }
        }
        Some(quote)
    }
}
