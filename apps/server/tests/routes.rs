use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use coinbridge_market_data::{
    ConversionError, ConversionFailure, ConversionOutcome, ConversionResult, CurrencyConverter,
    Exchange, ExchangeRegistry, MarketDataError, SpotPrice, SpotPriceProvider,
};
use coinbridge_server::{api::app_router, config::Config, AppState};
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

/// Converts BTC at a fixed rate and fails everything else.
struct FixedConverter {
    calls: Mutex<Vec<(String, String, f64, bool)>>,
}

#[async_trait]
impl CurrencyConverter for FixedConverter {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn convert(&self, from: &str, to: &str, amount: f64, debug: bool) -> ConversionOutcome {
        self.calls
            .lock()
            .unwrap()
            .push((from.to_string(), to.to_string(), amount, debug));

        if !from.eq_ignore_ascii_case("btc") {
            return ConversionOutcome::Failure(ConversionFailure {
                error: ConversionError::NotAvailable,
                providers_attempted: vec!["coinmarketcap".to_string(), "coingecko".to_string()],
                debug: None,
            });
        }
        ConversionOutcome::Success(ConversionResult {
            from: from.to_uppercase(),
            to: to.to_uppercase(),
            amount,
            rate: 50000.0,
            converted: amount * 50000.0,
            source: self.name().to_string(),
            debug: None,
        })
    }
}

/// Knows BTCUSDT, reports the exchange as down for anything else.
struct FixedSpot;

#[async_trait]
impl SpotPriceProvider for FixedSpot {
    fn exchange(&self) -> Exchange {
        Exchange::Binance
    }

    async fn spot_price(&self, symbol: &str) -> Result<SpotPrice, MarketDataError> {
        if symbol == "BTCUSDT" {
            Ok(SpotPrice::new(symbol, Exchange::Binance, Decimal::new(6512345, 2)))
        } else {
            Err(MarketDataError::unavailable("binance"))
        }
    }
}

fn build_test_router() -> (Router, Arc<FixedConverter>) {
    let converter = Arc::new(FixedConverter {
        calls: Mutex::new(Vec::new()),
    });
    let mut exchanges = ExchangeRegistry::new();
    exchanges.register(Arc::new(FixedSpot));

    let state = Arc::new(AppState {
        converter: converter.clone(),
        exchanges: Arc::new(exchanges),
    });
    let config = Config::from_lookup(|_| None).unwrap();
    (app_router(state, &config), converter)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn root_lists_endpoints() {
    let (app, _) = build_test_router();
    let (status, body) = get(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    let endpoints = body["available_endpoints"].as_array().unwrap();
    assert!(endpoints
        .iter()
        .any(|e| e.as_str().unwrap().starts_with("/convert")));
}

#[tokio::test]
async fn healthz_is_ok() {
    let (app, _) = build_test_router();
    let response = app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn caller_request_id_is_echoed() {
    let (app, _) = build_test_router();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn convert_returns_result() {
    let (app, converter) = build_test_router();
    let (status, body) = get(app, "/convert?from_symbol=btc&to_symbol=usd&amount=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["from"], "BTC");
    assert_eq!(body["to"], "USD");
    assert_eq!(body["rate"], 50000.0);
    assert_eq!(body["converted"], 100000.0);
    assert_eq!(body["source"], "fixed");
    assert!(body.get("error").is_none());

    let calls = converter.calls.lock().unwrap();
    assert_eq!(calls.as_slice(), [("btc".to_string(), "usd".to_string(), 2.0, false)]);
}

#[tokio::test]
async fn convert_accepts_short_names_and_defaults() {
    let (app, converter) = build_test_router();
    let (status, _) = get(app, "/convert?from=BTC&to=EUR&debug=true").await;

    assert_eq!(status, StatusCode::OK);
    let calls = converter.calls.lock().unwrap();
    assert_eq!(calls.as_slice(), [("BTC".to_string(), "EUR".to_string(), 1.0, true)]);
}

#[tokio::test]
async fn convert_failure_is_a_structured_body() {
    let (app, _) = build_test_router();
    let (status, body) = get(app, "/convert?from_symbol=ETH&to_symbol=USD").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "conversion_not_available");
    assert_eq!(
        body["providers_attempted"],
        serde_json::json!(["coinmarketcap", "coingecko"])
    );
}

#[tokio::test]
async fn convert_without_symbols_is_rejected() {
    let (app, converter) = build_test_router();
    let (status, body) = get(app, "/convert?amount=3").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    assert!(body["message"].as_str().unwrap().contains("from_symbol"));
    assert!(converter.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn convert_with_unparsable_amount_is_rejected() {
    let (app, converter) = build_test_router();
    let (status, body) = get(app, "/convert?from_symbol=BTC&to_symbol=USD&amount=abc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    assert!(body["message"].is_string());
    assert!(converter.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn price_defaults_to_binance() {
    let (app, _) = build_test_router();
    let (status, body) = get(app, "/price/btcusdt").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "BTCUSDT");
    assert_eq!(body["exchange"], "binance");
    assert_eq!(body["price"], 65123.45);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn price_on_unknown_exchange_is_bad_request() {
    let (app, _) = build_test_router();
    let (status, body) = get(app, "/price/BTCUSDT?exchange=bitstamp").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn price_on_unregistered_exchange_is_bad_request() {
    let (app, _) = build_test_router();
    let (status, _) = get(app, "/price/BTCUSDT?exchange=kraken").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn price_upstream_failure_is_bad_gateway() {
    let (app, _) = build_test_router();
    let (status, body) = get(app, "/price/DOGEUSDT").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], 502);
}
