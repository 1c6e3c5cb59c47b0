use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};

use super::{failure, success, validate_amount, CurrencyConverter, Priced};
use crate::cache::{IdentifierCache, PriceCache, PriceKey};
use crate::errors::ConversionError;
use crate::models::{
    ConversionOutcome, DebugTrace, PairKind, PriceQuote, Symbol, REFERENCE_CURRENCY,
};
use crate::provider::PricingProvider;
use crate::resolver::{IdentifierResolver, ResolvedId};

/// Conversion against a single pricing provider.
///
/// - crypto → crypto: both priced in USD, `rate = from_usd / to_usd`
/// - crypto → fiat: `rate = price(from, fiat)`
/// - fiat → crypto: `rate = 1 / price(to, fiat)`
/// - fiat → fiat: rejected
pub struct ConversionEngine {
    provider: Arc<dyn PricingProvider>,
    identifiers: IdentifierResolver,
    prices: PriceCache,
}

impl ConversionEngine {
    pub fn new(
        provider: Arc<dyn PricingProvider>,
        identifiers: IdentifierCache,
        prices: PriceCache,
    ) -> Self {
        Self {
            identifiers: IdentifierResolver::new(provider.clone(), identifiers),
            provider,
            prices,
        }
    }

    /// Provider the numbers come from.
    pub fn source(&self) -> &'static str {
        self.provider.id()
    }

    /// Run the conversion, recording every step in `trace`.
    pub async fn convert_traced(
        &self,
        from: &Symbol,
        to: &Symbol,
        amount: f64,
        trace: &mut DebugTrace,
    ) -> Result<Priced, ConversionError> {
        let kind = PairKind::classify(from, to);
        trace.pair_kind = Some(kind);

        if !kind.is_supported() {
            trace.note("Both sides are fiat; fiat->fiat is not supported.");
            return Err(ConversionError::FiatToFiatUnsupported);
        }

        let (from_resolved, to_resolved) = futures::join!(
            self.resolve_side(from, trace.from_is_fiat),
            self.resolve_side(to, trace.to_is_fiat)
        );
        for (symbol, is_fiat, resolved) in [
            (from, trace.from_is_fiat, &from_resolved),
            (to, trace.to_is_fiat, &to_resolved),
        ] {
            match resolved {
                Some(resolved) => trace.note(format!(
                    "Resolved '{}' to '{}' via {}",
                    symbol,
                    resolved.id,
                    resolved.source.as_str()
                )),
                None if !is_fiat => trace.note(format!(
                    "Could not resolve {} identifier for '{}'",
                    self.source(),
                    symbol
                )),
                None => {}
            }
        }
        let from_id = from_resolved.map(|resolved| resolved.id);
        let to_id = to_resolved.map(|resolved| resolved.id);
        trace.from_id = from_id.clone();
        trace.to_id = to_id.clone();

        let priced = match kind {
            PairKind::CryptoToCrypto => {
                let (Some(from_id), Some(to_id)) = (from_id, to_id) else {
                    return Err(ConversionError::MissingIds);
                };
                self.crypto_to_crypto(&from_id, &to_id, amount, trace).await
            }
            PairKind::CryptoToFiat => {
                let from_id = from_id.ok_or(ConversionError::MissingFromId)?;
                self.crypto_to_fiat(&from_id, to, amount, trace).await
            }
            PairKind::FiatToCrypto => {
                let to_id = to_id.ok_or(ConversionError::MissingToId)?;
                self.fiat_to_crypto(from, &to_id, amount, trace).await
            }
            PairKind::FiatToFiat => Err(ConversionError::FiatToFiatUnsupported),
        }?;

        priced.ensure_finite().inspect_err(|_| {
            trace.note(format!(
                "Rate {} and converted {} are not both finite.",
                priced.rate, priced.converted
            ));
        })
    }

    async fn resolve_side(&self, symbol: &Symbol, is_fiat: bool) -> Option<ResolvedId> {
        if is_fiat {
            return None;
        }
        self.identifiers.resolve(symbol).await
    }

    async fn crypto_to_crypto(
        &self,
        from_id: &str,
        to_id: &str,
        amount: f64,
        trace: &mut DebugTrace,
    ) -> Result<Priced, ConversionError> {
        let mut ids = vec![from_id.to_string(), to_id.to_string()];
        ids.dedup();
        let quote = self
            .quote(&ids, &[REFERENCE_CURRENCY.to_string()], trace)
            .await
            .filter(|quote| quote.contains(from_id) && quote.contains(to_id))
            .ok_or(ConversionError::NoPriceUsd)?;

        let from_usd = positive(quote.price(from_id, REFERENCE_CURRENCY));
        let to_usd = positive(quote.price(to_id, REFERENCE_CURRENCY));
        let (Some(from_usd), Some(to_usd)) = (from_usd, to_usd) else {
            return Err(ConversionError::MissingUsdPrices);
        };

        Ok(Priced::from_rate(amount, from_usd / to_usd))
    }

    async fn crypto_to_fiat(
        &self,
        from_id: &str,
        fiat: &Symbol,
        amount: f64,
        trace: &mut DebugTrace,
    ) -> Result<Priced, ConversionError> {
        let rate = self
            .quote(&[from_id.to_string()], &[fiat.key().to_string()], trace)
            .await
            .and_then(|quote| quote.price(from_id, fiat.key()))
            .filter(|rate| rate.is_finite() && *rate >= 0.0)
            .ok_or(ConversionError::NoRateCryptoToFiat)?;

        Ok(Priced::from_rate(amount, rate))
    }

    async fn fiat_to_crypto(
        &self,
        fiat: &Symbol,
        to_id: &str,
        amount: f64,
        trace: &mut DebugTrace,
    ) -> Result<Priced, ConversionError> {
        // One unit of the crypto asset, in the source fiat.
        let price = self
            .quote(&[to_id.to_string()], &[fiat.key().to_string()], trace)
            .await
            .and_then(|quote| quote.price(to_id, fiat.key()))
            .filter(|price| price.is_finite() && *price >= 0.0)
            .ok_or(ConversionError::NoRateFiatToCrypto)?;

        if price == 0.0 {
            return Err(ConversionError::ZeroPrice);
        }

        Ok(Priced {
            rate: 1.0 / price,
            converted: amount / price,
        })
    }

    /// Fetch prices through the cache. Failed fetches are not cached.
    async fn quote(
        &self,
        ids: &[String],
        currencies: &[String],
        trace: &mut DebugTrace,
    ) -> Option<PriceQuote> {
        let key = PriceKey::new(self.source(), ids, currencies);

        let quote = match self.prices.get(&key).await {
            Some(cached) => {
                trace.note(format!("Price cache hit for {}", key));
                Some(cached)
            }
            None => {
                debug!("Fetching prices for {} from {}", key, self.source());
                let fetched = self.provider.prices(ids, currencies).await;
                match &fetched {
                    Some(quote) => self.prices.insert(key, quote.clone()).await,
                    None => warn!("No price data from {} for {}", self.source(), key),
                }
                fetched
            }
        };

        trace.raw = quote.clone();
        quote
    }
}

/// Present and usable as a divisor.
fn positive(price: Option<f64>) -> Option<f64> {
    price.filter(|p| p.is_finite() && *p > 0.0)
}

#[async_trait]
impl CurrencyConverter for ConversionEngine {
    fn name(&self) -> &'static str {
        self.source()
    }

    async fn convert(&self, from: &str, to: &str, amount: f64, debug: bool) -> ConversionOutcome {
        let from = Symbol::parse(from);
        let to = Symbol::parse(to);
        let mut trace = DebugTrace::new(&from, &to, amount);

        if let Err(error) = validate_amount(amount) {
            trace.note("Amount must be a finite, non-negative number.");
            return failure(error, Vec::new(), trace, debug);
        }

        trace.attempts.push(self.source().to_string());
        match self.convert_traced(&from, &to, amount, &mut trace).await {
            Ok(priced) => success(&from, &to, amount, priced, self.source(), trace, debug),
            Err(error) => {
                debug!("Conversion {} -> {} failed: {}", from, to, error);
                failure(error, Vec::new(), trace, debug)
            }
        }
    }
}
