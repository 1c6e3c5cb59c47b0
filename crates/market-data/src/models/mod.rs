//! Market data models
//!
//! This module contains the core data types:
//! - `types` - Type aliases for identifiers (ProviderId, CanonicalId)
//! - `symbol` - Symbol normalization, the fiat set and pair classification
//! - `price_quote` - Provider price payloads (PriceQuote)
//! - `conversion` - Conversion results, failures and the debug trace
//! - `spot` - Exchange spot prices (Exchange, SpotPrice)

mod conversion;
mod price_quote;
mod spot;
mod symbol;
mod types;

pub use conversion::{ConversionFailure, ConversionOutcome, ConversionResult, DebugTrace};
pub use price_quote::PriceQuote;
pub use spot::{Exchange, SpotPrice};
pub use symbol::{PairKind, Symbol, FIAT_CURRENCIES, REFERENCE_CURRENCY};
pub use types::{CanonicalId, ProviderId};
