use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::MarketDataError;

/// A price as exchanges send it: usually a decimal string, sometimes a number.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum PriceField {
    Text(String),
    Number(f64),
}

impl PriceField {
    /// Parse into a strictly positive decimal.
    pub(crate) fn to_decimal(&self, provider: &str) -> Result<Decimal, MarketDataError> {
        let invalid = |value: String| MarketDataError::InvalidPrice {
            provider: provider.to_string(),
            value,
        };

        let price = match self {
            PriceField::Text(text) => {
                let text = text.trim();
                Decimal::from_str(text)
                    .or_else(|_| Decimal::from_scientific(text))
                    .map_err(|_| invalid(text.to_string()))?
            }
            PriceField::Number(number) => {
                Decimal::try_from(*number).map_err(|_| invalid(number.to_string()))?
            }
        };

        if price <= Decimal::ZERO {
            return Err(invalid(price.to_string()));
        }
        Ok(price)
    }
}
