//! CoinGecko API response models.

use serde::Deserialize;

use crate::provider::AssetCandidate;

/// Response of `/search`.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub coins: Vec<SearchCoin>,
}

#[derive(Debug, Deserialize)]
pub struct SearchCoin {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    pub market_cap_rank: Option<u32>,
}

/// Entry of `/coins/list`.
#[derive(Debug, Deserialize)]
pub struct ListedCoin {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub symbol: String,
}

impl From<SearchCoin> for AssetCandidate {
    fn from(coin: SearchCoin) -> Self {
        AssetCandidate::new(coin.id, coin.symbol, coin.market_cap_rank)
    }
}

impl From<ListedCoin> for AssetCandidate {
    fn from(coin: ListedCoin) -> Self {
        AssetCandidate::new(coin.id, coin.symbol, None)
    }
}
