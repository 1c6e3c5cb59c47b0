//! Error types for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: Errors raised by spot price fetchers and native converters
//! - [`ConversionError`]: Stable failure codes reported by the conversion engine
//! - [`ErrorCategory`]: Coarse classification shared by both

mod conversion;

pub use conversion::{ConversionError, ErrorCategory};

use thiserror::Error;

/// Errors that can occur while talking to a single upstream.
///
/// The conversion engine never surfaces these directly; they are folded into a
/// [`ConversionError`] or a debug note. Spot price lookups return them as-is.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The upstream does not know the requested symbol or pair.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The requested exchange has no spot price fetcher.
    #[error("Unsupported exchange: {0}")]
    UnsupportedExchange(String),

    /// Transport failure, timeout or non-success status.
    #[error("Provider unavailable: {provider}")]
    ProviderUnavailable {
        /// The provider that could not be reached
        provider: String,
    },

    /// The upstream answered, but not in the expected shape.
    #[error("Unexpected response from {provider}: {message}")]
    UnexpectedResponse {
        /// The provider that returned the payload
        provider: String,
        /// What was missing or malformed
        message: String,
    },

    /// The upstream reported a price that is not a positive finite number.
    #[error("Invalid price from {provider}: {value}")]
    InvalidPrice {
        /// The provider that returned the price
        provider: String,
        /// The offending value, as received
        value: String,
    },
}

impl MarketDataError {
    pub fn unexpected(provider: &str, message: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub fn unavailable(provider: &str) -> Self {
        Self::ProviderUnavailable {
            provider: provider.to_string(),
        }
    }

    /// Returns the category of this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use coinbridge_market_data::errors::{ErrorCategory, MarketDataError};
    ///
    /// let error = MarketDataError::SymbolNotFound("FOO".to_string());
    /// assert_eq!(error.category(), ErrorCategory::IdentifierNotFound);
    /// ```
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SymbolNotFound(_) => ErrorCategory::IdentifierNotFound,
            Self::UnsupportedExchange(_) => ErrorCategory::InvalidRequest,
            Self::ProviderUnavailable { .. } | Self::UnexpectedResponse { .. } => {
                ErrorCategory::ProviderUnavailable
            }
            Self::InvalidPrice { .. } => ErrorCategory::MissingPriceData,
        }
    }
}
