//! Identifier resolution for pricing providers.
//!
//! Each provider names assets in its own identifier space ("bitcoin" on
//! CoinGecko, "btc-bitcoin" on CoinPaprika). An [`IdentifierResolver`] maps
//! symbols into exactly one of those spaces; identifiers are never carried
//! across providers.
//!
//! ```text
//! symbol ──► cache ──hit──────────────────────────────► id
//!              │ miss
//!              ▼
//!           search ──select_candidate──────────────────► id (cached)
//!              │ nothing usable
//!              ▼
//!           listing ──first symbol match───────────────► id (cached)
//!              │ no match
//!              ▼
//!            None
//! ```

mod identifier_resolver;

pub use identifier_resolver::{select_candidate, IdentifierResolver, ResolutionSource, ResolvedId};
