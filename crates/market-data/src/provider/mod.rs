//! Pricing providers.
//!
//! - [`coingecko`]: search, listing and batched `/simple/price`
//! - [`coinpaprika`]: listing and per-asset tickers
//! - [`coinmarketcap`]: native price conversion

pub mod coingecko;
pub mod coinmarketcap;
pub mod coinpaprika;
mod traits;

pub use traits::{AssetCandidate, NativeConverter, PricingProvider};
