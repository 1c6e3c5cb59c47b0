//! Exchange spot prices.
//!
//! One [`SpotPriceProvider`] per exchange, each translating the requested
//! symbol (e.g. `BTCUSDT`) into the exchange's own pair format. The
//! [`ExchangeRegistry`] dispatches by exchange name.

mod binance;
mod coinbase;
mod kraken;
mod kucoin;
mod price;
mod registry;

pub use binance::BinanceSpot;
pub use coinbase::CoinbaseSpot;
pub use kraken::KrakenSpot;
pub use kucoin::KucoinSpot;
pub use registry::ExchangeRegistry;

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{Exchange, SpotPrice};

/// Fetches the latest price of a trading pair on one exchange.
#[async_trait]
pub trait SpotPriceProvider: Send + Sync {
    fn exchange(&self) -> Exchange;

    /// `symbol` is upper-cased, in the `BASEQUOTE` form (e.g. `ETHUSDT`).
    async fn spot_price(&self, symbol: &str) -> Result<SpotPrice, MarketDataError>;
}
