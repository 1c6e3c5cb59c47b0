use serde::{Serialize, Serializer};

/// Coarse classification of a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// A symbol could not be mapped to a provider identifier.
    IdentifierNotFound,
    /// Fiat to fiat conversion.
    UnsupportedPairKind,
    /// A required price was absent, or zero where it is used as a divisor.
    MissingPriceData,
    /// Transport failure or malformed upstream payload.
    ProviderUnavailable,
    /// Primary and secondary providers both failed.
    AllProvidersExhausted,
    /// The request itself was malformed (bad amount, unknown exchange).
    InvalidRequest,
}

/// Failure codes of a conversion.
///
/// Serialized as the bare [`code`](Self::code) string, which is part of the
/// public response contract and must not change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConversionError {
    FiatToFiatUnsupported,
    MissingIds,
    NoPriceUsd,
    MissingUsdPrices,
    MissingFromId,
    NoRateCryptoToFiat,
    MissingToId,
    NoRateFiatToCrypto,
    ZeroPrice,
    NotAvailable,
    InvalidAmount,
    /// Rate or converted amount overflowed to a non-finite value.
    NonFiniteResult,
}

impl ConversionError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::FiatToFiatUnsupported => "fiat->fiat not supported",
            Self::MissingIds => "missing_ids",
            Self::NoPriceUsd => "no_price_usd",
            Self::MissingUsdPrices => "missing_usd_prices",
            Self::MissingFromId => "missing_from_id",
            Self::NoRateCryptoToFiat => "no_rate_crypto_to_fiat",
            Self::MissingToId => "missing_to_id",
            Self::NoRateFiatToCrypto => "no_rate_fiat_to_crypto",
            Self::ZeroPrice => "zero_price",
            Self::NotAvailable => "conversion_not_available",
            Self::InvalidAmount => "invalid_amount",
            Self::NonFiniteResult => "non_finite_result",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FiatToFiatUnsupported => ErrorCategory::UnsupportedPairKind,
            Self::MissingIds | Self::MissingFromId | Self::MissingToId => {
                ErrorCategory::IdentifierNotFound
            }
            Self::NoPriceUsd
            | Self::MissingUsdPrices
            | Self::NoRateCryptoToFiat
            | Self::NoRateFiatToCrypto
            | Self::ZeroPrice
            | Self::NonFiniteResult => ErrorCategory::MissingPriceData,
            Self::NotAvailable => ErrorCategory::AllProvidersExhausted,
            Self::InvalidAmount => ErrorCategory::InvalidRequest,
        }
    }
}

impl std::fmt::Display for ConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::error::Error for ConversionError {}

impl Serialize for ConversionError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}
