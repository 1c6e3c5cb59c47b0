use std::sync::Arc;

use coinbridge_market_data::{
    CoinGeckoProvider, CoinMarketCapConverter, CoinPaprikaProvider, ConversionEngine,
    CurrencyConverter, ExchangeRegistry, FallbackConverter, HttpJsonClient, IdentifierCache,
    JsonFetcher, NativeConverter, PriceCache, PricingProvider,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{Config, SecondaryProvider};

pub struct AppState {
    pub converter: Arc<dyn CurrencyConverter>,
    pub exchanges: Arc<ExchangeRegistry>,
}

pub fn init_tracing() {
    let log_format = std::env::var("CB_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let fetcher: Arc<dyn JsonFetcher> =
        Arc::new(HttpJsonClient::with_timeout(config.upstream_timeout));

    let pricing: Arc<dyn PricingProvider> = match config.secondary_provider {
        SecondaryProvider::CoinGecko => Arc::new(
            CoinGeckoProvider::with_base_url(fetcher.clone(), &config.coingecko_base_url)
                .with_api_key(config.coingecko_api_key.clone()),
        ),
        SecondaryProvider::CoinPaprika => Arc::new(CoinPaprikaProvider::with_base_url(
            fetcher.clone(),
            &config.coinpaprika_base_url,
        )),
    };
    let engine = Arc::new(ConversionEngine::new(
        pricing,
        IdentifierCache::with_config(config.id_cache),
        PriceCache::with_config(config.price_cache),
    ));

    let converter: Arc<dyn CurrencyConverter> = match &config.coinmarketcap_api_key {
        Some(api_key) => {
            let primary = Arc::new(CoinMarketCapConverter::with_base_url(
                fetcher.clone(),
                api_key.clone(),
                &config.coinmarketcap_base_url,
            ));
            tracing::info!(
                "Conversions: {} with fallback to {}",
                primary.id(),
                engine.source()
            );
            Arc::new(FallbackConverter::new(primary, engine))
        }
        None => {
            tracing::info!(
                "MARKETCAP_APIKEY not set; conversions served by {}",
                engine.source()
            );
            engine
        }
    };

    let exchanges = Arc::new(ExchangeRegistry::with_defaults(fetcher));
    tracing::info!("Spot prices available from {:?}", exchanges.exchanges());

    Ok(Arc::new(AppState {
        converter,
        exchanges,
    }))
}
