//! Application error types and Axum response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sprinkle_core::PlantError;
use tracing::warn;

/// Application-level errors with HTTP status code mapping.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl From<PlantError> for AppError {
    fn from(err: PlantError) -> Self {
        warn!("Rejected request: {}", err);
        AppError::BadRequest(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
