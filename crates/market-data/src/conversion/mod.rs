//! Currency conversion.
//!
//! - [`ConversionEngine`]: classifies the pair, resolves identifiers and
//!   prices them against a single [`PricingProvider`](crate::provider::PricingProvider)
//! - [`FallbackConverter`]: tries a [`NativeConverter`](crate::provider::NativeConverter)
//!   first and falls back to a [`ConversionEngine`] exactly once
//!
//! Both implement [`CurrencyConverter`], whose `convert` always returns a
//! [`ConversionOutcome`]: failures are values with a stable code, never faults.

mod engine;
mod fallback;

pub use engine::ConversionEngine;
pub use fallback::FallbackConverter;

use async_trait::async_trait;

use crate::errors::ConversionError;
use crate::models::{ConversionFailure, ConversionOutcome, ConversionResult, DebugTrace, Symbol};

/// Converts an amount between two symbols.
#[async_trait]
pub trait CurrencyConverter: Send + Sync {
    /// Name reported when this converter produces a result.
    fn name(&self) -> &'static str;

    /// Convert `amount` of `from` into `to`.
    ///
    /// Symbols are case-insensitive. The debug trace is attached to the
    /// outcome only when `debug` is set.
    async fn convert(&self, from: &str, to: &str, amount: f64, debug: bool) -> ConversionOutcome;
}

/// Rate and converted amount of a successful conversion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Priced {
    pub rate: f64,
    pub converted: f64,
}

impl Priced {
    /// `rate` units of `to` per `from`.
    pub fn from_rate(amount: f64, rate: f64) -> Self {
        Self {
            rate,
            converted: amount * rate,
        }
    }

    /// Both numbers finite, or [`ConversionError::NonFiniteResult`].
    pub fn ensure_finite(self) -> Result<Self, ConversionError> {
        if self.rate.is_finite() && self.converted.is_finite() {
            Ok(self)
        } else {
            Err(ConversionError::NonFiniteResult)
        }
    }
}

/// Amounts must be finite and non-negative.
pub(crate) fn validate_amount(amount: f64) -> Result<(), ConversionError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(ConversionError::InvalidAmount)
    }
}

pub(crate) fn success(
    from: &Symbol,
    to: &Symbol,
    amount: f64,
    priced: Priced,
    source: &str,
    trace: DebugTrace,
    debug: bool,
) -> ConversionOutcome {
    ConversionOutcome::Success(ConversionResult {
        from: from.display(),
        to: to.display(),
        amount,
        rate: priced.rate,
        converted: priced.converted,
        source: source.to_string(),
        debug: debug.then_some(trace),
    })
}

pub(crate) fn failure(
    error: ConversionError,
    providers_attempted: Vec<String>,
    trace: DebugTrace,
    debug: bool,
) -> ConversionOutcome {
    ConversionOutcome::Failure(ConversionFailure {
        error,
        providers_attempted,
        debug: debug.then_some(trace),
    })
}
