use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::MarketDataError;

/// Exchanges with a spot price fetcher.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Exchange {
    #[default]
    Binance,
    Coinbase,
    Kraken,
    Kucoin,
}

impl Exchange {
    pub const ALL: [Exchange; 4] = [
        Exchange::Binance,
        Exchange::Coinbase,
        Exchange::Kraken,
        Exchange::Kucoin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Exchange::Binance => "binance",
            Exchange::Coinbase => "coinbase",
            Exchange::Kraken => "kraken",
            Exchange::Kucoin => "kucoin",
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Exchange {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Exchange::ALL
            .into_iter()
            .find(|exchange| exchange.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| MarketDataError::UnsupportedExchange(name.to_string()))
    }
}

/// Latest traded price of a symbol on one exchange.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SpotPrice {
    /// Symbol as requested (e.g. "BTCUSDT"), not the exchange's own format.
    pub symbol: String,
    pub exchange: Exchange,
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl SpotPrice {
    pub fn new(symbol: impl Into<String>, exchange: Exchange, price: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            exchange,
            price,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_parse_is_case_insensitive() {
        assert_eq!("binance".parse::<Exchange>().unwrap(), Exchange::Binance);
        assert_eq!(" KuCoin ".parse::<Exchange>().unwrap(), Exchange::Kucoin);
        assert_eq!("KRAKEN".parse::<Exchange>().unwrap(), Exchange::Kraken);
    }

    #[test]
    fn test_unknown_exchange_is_rejected() {
        let err = "bitstamp".parse::<Exchange>().unwrap_err();
        assert!(matches!(err, MarketDataError::UnsupportedExchange(name) if name == "bitstamp"));
    }

    #[test]
    fn test_default_exchange_is_binance() {
        assert_eq!(Exchange::default(), Exchange::Binance);
        assert_eq!(Exchange::Coinbase.to_string(), "coinbase");
    }
}
