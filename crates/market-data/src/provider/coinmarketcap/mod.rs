//! CoinMarketCap native price conversion.
//!
//! Calls `/v2/tools/price-conversion?amount=&symbol=&convert=` with the API key
//! in `X-CMC_PRO_API_KEY` and trusts the returned converted amount.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::client::JsonFetcher;
use crate::errors::MarketDataError;
use crate::models::{ProviderId, Symbol};
use crate::provider::NativeConverter;

/// Provider ID constant
pub const PROVIDER_ID: ProviderId = "coinmarketcap";

/// Pro API base URL
pub const DEFAULT_BASE_URL: &str = "https://pro-api.coinmarketcap.com";

const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";

#[derive(Debug, Deserialize)]
struct ConversionResponse {
    data: ConversionData,
}

/// v2 answers with a list when a symbol maps to several assets.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ConversionData {
    Many(Vec<Conversion>),
    One(Conversion),
}

#[derive(Debug, Deserialize)]
struct Conversion {
    #[serde(default)]
    quote: HashMap<String, ConvertedQuote>,
}

#[derive(Debug, Deserialize)]
struct ConvertedQuote {
    price: Option<f64>,
}

pub struct CoinMarketCapConverter {
    fetcher: Arc<dyn JsonFetcher>,
    base_url: String,
    api_key: String,
}

impl CoinMarketCapConverter {
    pub fn new(fetcher: Arc<dyn JsonFetcher>, api_key: impl Into<String>) -> Self {
        Self::with_base_url(fetcher, api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        fetcher: Arc<dyn JsonFetcher>,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

/// Extract the converted amount for `to` from a price-conversion payload.
///
/// A list is accepted only when it holds exactly one conversion; anything
/// else is ambiguous and rejected.
fn parse_conversion(body: Value, to: &str) -> Result<f64, MarketDataError> {
    let response: ConversionResponse = serde_json::from_value(body)
        .map_err(|e| MarketDataError::unexpected(PROVIDER_ID, e.to_string()))?;

    let conversion = match response.data {
        ConversionData::One(conversion) => conversion,
        ConversionData::Many(mut conversions) if conversions.len() == 1 => conversions.remove(0),
        ConversionData::Many(conversions) => {
            return Err(MarketDataError::unexpected(
                PROVIDER_ID,
                format!("{} conversions returned", conversions.len()),
            ))
        }
    };

    let price = conversion
        .quote
        .get(to)
        .ok_or_else(|| MarketDataError::unexpected(PROVIDER_ID, format!("no quote for {}", to)))?
        .price
        .ok_or_else(|| MarketDataError::unexpected(PROVIDER_ID, "quote without price"))?;

    if !price.is_finite() || price < 0.0 {
        return Err(MarketDataError::InvalidPrice {
            provider: PROVIDER_ID.to_string(),
            value: price.to_string(),
        });
    }
    Ok(price)
}

#[async_trait]
impl NativeConverter for CoinMarketCapConverter {
    fn id(&self) -> ProviderId {
        PROVIDER_ID
    }

    async fn convert(
        &self,
        amount: f64,
        from: &Symbol,
        to: &Symbol,
    ) -> Result<f64, MarketDataError> {
        let to_code = to.display();
        debug!("Converting {} {} to {} on CoinMarketCap", amount, from, to_code);

        let body = self
            .fetcher
            .fetch_json(
                &format!("{}/v2/tools/price-conversion", self.base_url),
                &[
                    ("amount", amount.to_string()),
                    ("symbol", from.display()),
                    ("convert", to_code.clone()),
                ],
                &[(API_KEY_HEADER, self.api_key.clone())],
            )
            .await
            .ok_or_else(|| MarketDataError::unavailable(PROVIDER_ID))?;

        parse_conversion(body, &to_code)
    }
}
