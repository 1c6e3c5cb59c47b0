use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};

use super::{failure, success, validate_amount, ConversionEngine, CurrencyConverter, Priced};
use crate::errors::ConversionError;
use crate::models::{ConversionOutcome, DebugTrace, PairKind, Symbol};
use crate::provider::NativeConverter;

/// Native conversion on a primary provider, then the secondary engine.
///
/// The secondary runs at most once per request and resolves identifiers in
/// its own space. When both fail the outcome is `conversion_not_available`
/// with the providers attempted, in order.
pub struct FallbackConverter {
    primary: Arc<dyn NativeConverter>,
    secondary: Arc<ConversionEngine>,
}

impl FallbackConverter {
    pub fn new(primary: Arc<dyn NativeConverter>, secondary: Arc<ConversionEngine>) -> Self {
        Self { primary, secondary }
    }

    async fn try_primary(
        &self,
        from: &Symbol,
        to: &Symbol,
        amount: f64,
        trace: &mut DebugTrace,
    ) -> Option<Priced> {
        if amount == 0.0 {
            trace.note(format!(
                "Skipped {}: rate is undefined for a zero amount.",
                self.primary.id()
            ));
            trace.primary_error = Some("zero amount".to_string());
            return None;
        }

        trace.attempts.push(self.primary.id().to_string());
        let priced = match self.primary.convert(amount, from, to).await {
            Ok(converted) => Priced {
                rate: converted / amount,
                converted,
            },
            Err(e) => {
                warn!("{} conversion {} -> {} failed: {}", self.primary.id(), from, to, e);
                trace.primary_error = Some(e.to_string());
                return None;
            }
        };

        match priced.ensure_finite() {
            Ok(priced) => Some(priced),
            Err(error) => {
                warn!(
                    "{} returned a non-finite result for {} -> {}",
                    self.primary.id(),
                    from,
                    to
                );
                trace.primary_error = Some(error.code().to_string());
                None
            }
        }
    }
}

#[async_trait]
impl CurrencyConverter for FallbackConverter {
    fn name(&self) -> &'static str {
        self.primary.id()
    }

    async fn convert(&self, from: &str, to: &str, amount: f64, debug: bool) -> ConversionOutcome {
        let from = Symbol::parse(from);
        let to = Symbol::parse(to);
        let mut trace = DebugTrace::new(&from, &to, amount);

        if let Err(error) = validate_amount(amount) {
            trace.note("Amount must be a finite, non-negative number.");
            return failure(error, Vec::new(), trace, debug);
        }

        let kind = PairKind::classify(&from, &to);
        trace.pair_kind = Some(kind);
        if !kind.is_supported() {
            trace.note("Both sides are fiat; fiat->fiat is not supported.");
            return failure(ConversionError::FiatToFiatUnsupported, Vec::new(), trace, debug);
        }

        if let Some(priced) = self.try_primary(&from, &to, amount, &mut trace).await {
            return success(&from, &to, amount, priced, self.primary.id(), trace, debug);
        }

        let secondary = self.secondary.source();
        info!("Falling back to {} for {} -> {}", secondary, from, to);
        trace.fallback_used = true;
        trace.attempts.push(secondary.to_string());

        match self
            .secondary
            .convert_traced(&from, &to, amount, &mut trace)
            .await
        {
            Ok(priced) => success(&from, &to, amount, priced, secondary, trace, debug),
            Err(error) => {
                warn!("{} fallback {} -> {} failed: {}", secondary, from, to, error);
                trace.secondary_error = Some(error.code().to_string());
                let attempted = trace.attempts.clone();
                failure(ConversionError::NotAvailable, attempted, trace, debug)
            }
        }
    }
}
