use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::main_lib::AppState;

/// Welcome message with the available endpoints.
async fn root() -> Json<Value> {
    Json(json!({
        "message": "Coinbridge price API",
        "available_endpoints": [
            "/price/{symbol}?exchange=binance|coinbase|kraken|kucoin",
            "/convert?from_symbol=BTC&to_symbol=USD&amount=1",
            "/healthz"
        ]
    }))
}

async fn healthz() -> &'static str {
    "ok"
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
}
