use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use coinbridge_market_data::{Exchange, SpotPrice};
use serde::Deserialize;

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
struct PriceQuery {
    exchange: Option<String>,
}

/// Latest price of `symbol` (e.g. BTCUSDT) on the selected exchange.
async fn get_price(
    Path(symbol): Path<String>,
    Query(query): Query<PriceQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<SpotPrice>> {
    let exchange = query
        .exchange
        .unwrap_or_else(|| Exchange::default().to_string());
    let spot = state.exchanges.spot_price(&exchange, &symbol).await?;
    Ok(Json(spot))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/price/{symbol}", get(get_price))
}
