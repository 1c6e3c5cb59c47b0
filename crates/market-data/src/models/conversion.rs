//! Conversion results, structured failures and the diagnostic trace.

use serde::Serialize;

use super::price_quote::PriceQuote;
use super::symbol::{PairKind, Symbol};
use crate::errors::ConversionError;

/// A successful conversion.
///
/// `rate` is the number of `to` units per one `from` unit and
/// `converted == amount * rate` up to float rounding.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConversionResult {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub rate: f64,
    pub converted: f64,
    /// Provider that produced the numbers.
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugTrace>,
}

/// A conversion that could not be completed.
///
/// Serializes as `{"error": "<code>", ...}` and is safe to return as-is.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConversionFailure {
    pub error: ConversionError,
    /// Providers tried, in order. Only filled by the fallback converter.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub providers_attempted: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugTrace>,
}

/// Either a result or a failure; never a fault.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConversionOutcome {
    Success(ConversionResult),
    Failure(ConversionFailure),
}

impl ConversionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ConversionOutcome::Success(_))
    }

    pub fn result(&self) -> Option<&ConversionResult> {
        match self {
            ConversionOutcome::Success(result) => Some(result),
            ConversionOutcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ConversionFailure> {
        match self {
            ConversionOutcome::Success(_) => None,
            ConversionOutcome::Failure(failure) => Some(failure),
        }
    }

    /// Error code of a failure, `None` on success.
    pub fn error_code(&self) -> Option<&'static str> {
        self.failure().map(|failure| failure.error.code())
    }
}

/// Diagnostic record of a single conversion.
///
/// Always collected; only attached to the outcome when the caller asks for it.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DebugTrace {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub from_is_fiat: bool,
    pub to_is_fiat: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pair_kind: Option<PairKind>,
    pub from_id: Option<String>,
    pub to_id: Option<String>,
    /// Price payload the rate was computed from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<PriceQuote>,
    pub notes: Vec<String>,
    pub attempts: Vec<String>,
    pub fallback_used: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_error: Option<String>,
}

impl DebugTrace {
    pub fn new(from: &Symbol, to: &Symbol, amount: f64) -> Self {
        Self {
            from: from.display(),
            to: to.display(),
            amount,
            from_is_fiat: from.is_fiat(),
            to_is_fiat: to.is_fiat(),
            ..Self::default()
        }
    }

    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }
}
