use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use coinbridge_market_data::ConversionOutcome;
use serde::Deserialize;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

fn default_amount() -> f64 {
    1.0
}

#[derive(Deserialize)]
struct ConvertQuery {
    #[serde(alias = "from")]
    from_symbol: String,
    #[serde(alias = "to")]
    to_symbol: String,
    #[serde(default = "default_amount")]
    amount: f64,
    #[serde(default)]
    debug: bool,
}

/// Conversion outcome as-is; structured failures are returned with 200.
///
/// Only a malformed query string is an error response.
async fn convert(
    query: Result<Query<ConvertQuery>, QueryRejection>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ConversionOutcome>> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let outcome = state
        .converter
        .convert(&query.from_symbol, &query.to_symbol, query.amount, query.debug)
        .await;
    if let Some(code) = outcome.error_code() {
        tracing::info!(
            "Conversion {} -> {} failed: {}",
            query.from_symbol,
            query.to_symbol,
            code
        );
    }
    Ok(Json(outcome))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/convert", get(convert))
}
