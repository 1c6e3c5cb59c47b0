use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use coinbridge_market_data::{ErrorCategory, MarketDataError};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Market(#[from] MarketDataError),
    #[error("{0}")]
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Market(e) => match e.category() {
                ErrorCategory::InvalidRequest | ErrorCategory::UnsupportedPairKind => {
                    StatusCode::BAD_REQUEST
                }
                ErrorCategory::IdentifierNotFound => StatusCode::NOT_FOUND,
                ErrorCategory::ProviderUnavailable
                | ErrorCategory::MissingPriceData
                | ErrorCategory::AllProvidersExhausted => StatusCode::BAD_GATEWAY,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!("Request failed with {}: {}", status, self);
        }
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
