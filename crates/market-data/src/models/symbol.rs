//! Symbol normalization and pair classification.

use std::fmt;

use serde::Serialize;

/// Fiat currency codes recognized by the conversion engine.
///
/// Anything outside this set is treated as a crypto asset.
pub const FIAT_CURRENCIES: &[&str] = &[
    "usd", "eur", "mxn", "cop", "ars", "pen", "brl", "clp", "gbp", "jpy", "cad", "aud",
];

/// Currency used to cross two crypto assets.
pub const REFERENCE_CURRENCY: &str = "usd";

/// Case-insensitive asset or currency code.
///
/// Stored trimmed and lower-cased; [`Symbol::display`] gives the upper-cased
/// form used in responses.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Symbol {
    key: String,
}

impl Symbol {
    pub fn parse(raw: &str) -> Self {
        Self {
            key: raw.trim().to_lowercase(),
        }
    }

    /// Lower-cased form, used for comparisons and cache keys.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Upper-cased form, used in results.
    pub fn display(&self) -> String {
        self.key.to_uppercase()
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }

    pub fn is_fiat(&self) -> bool {
        FIAT_CURRENCIES.contains(&self.key.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Conversion strategy for a (from, to) pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PairKind {
    CryptoToCrypto,
    CryptoToFiat,
    FiatToCrypto,
    /// Not supported by the engine.
    FiatToFiat,
}

impl PairKind {
    pub fn classify(from: &Symbol, to: &Symbol) -> Self {
        match (from.is_fiat(), to.is_fiat()) {
            (false, false) => PairKind::CryptoToCrypto,
            (false, true) => PairKind::CryptoToFiat,
            (true, false) => PairKind::FiatToCrypto,
            (true, true) => PairKind::FiatToFiat,
        }
    }

    pub fn is_supported(self) -> bool {
        self != PairKind::FiatToFiat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_is_trimmed_and_case_folded() {
        let symbol = Symbol::parse("  BtC ");
        assert_eq!(symbol.key(), "btc");
        assert_eq!(symbol.display(), "BTC");
        assert_eq!(symbol.to_string(), "BTC");
    }

    #[test]
    fn test_fiat_detection() {
        assert!(Symbol::parse("USD").is_fiat());
        assert!(Symbol::parse("cop").is_fiat());
        assert!(!Symbol::parse("BTC").is_fiat());
        assert!(!Symbol::parse("USDT").is_fiat());
        assert!(!Symbol::parse("").is_fiat());
    }

    #[test]
    fn test_classify_all_kinds() {
        let btc = Symbol::parse("BTC");
        let eth = Symbol::parse("ETH");
        let usd = Symbol::parse("USD");
        let eur = Symbol::parse("EUR");

        assert_eq!(PairKind::classify(&btc, &eth), PairKind::CryptoToCrypto);
        assert_eq!(PairKind::classify(&btc, &usd), PairKind::CryptoToFiat);
        assert_eq!(PairKind::classify(&usd, &btc), PairKind::FiatToCrypto);
        assert_eq!(PairKind::classify(&usd, &eur), PairKind::FiatToFiat);
        assert!(!PairKind::FiatToFiat.is_supported());
        assert!(PairKind::FiatToCrypto.is_supported());
    }
}
