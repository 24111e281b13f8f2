use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use nexplay_catalog::CatalogError;
use nexplay_core::error::{ApiError, ErrorEnvelope};

use crate::player::PlayerError;

/// Newtype wrapper so we can implement `IntoResponse` in this crate.
#[derive(Debug)]
pub struct AppError(pub ApiError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let envelope = ErrorEnvelope::from(&self.0);
        (status, Json(envelope)).into_response()
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        Self(e)
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        let api = match e {
            CatalogError::NotFound => ApiError::NotFound("title not found".into()),
            CatalogError::Unsupported(msg) => ApiError::BadRequest(msg),
            other => ApiError::BadGateway(other.to_string()),
        };
        Self(api)
    }
}

impl From<PlayerError> for AppError {
    fn from(e: PlayerError) -> Self {
        let api = match e {
            PlayerError::InvalidBaseUrl(_) => ApiError::Internal(e.to_string()),
            _ => ApiError::BadRequest(e.to_string()),
        };
        Self(api)
    }
}
