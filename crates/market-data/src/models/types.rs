/// Provider identifier (e.g. "coingecko", "coinmarketcap")
pub type ProviderId = &'static str;

/// Provider-issued asset identifier (e.g. "bitcoin" on CoinGecko,
/// "btc-bitcoin" on CoinPaprika). Meaningless outside the issuing provider.
pub type CanonicalId = String;
