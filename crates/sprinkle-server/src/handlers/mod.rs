//! HTTP route handlers for the mock controller.

pub mod plants;

use crate::error::AppError;

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}

/// JSON 404 for paths under `/api` that match no endpoint.
pub async fn unknown_api() -> AppError {
    AppError::NotFound("Unknown endpoint".into())
}
