//! Movies API: error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use movies_core::error::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Startup errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Applying the bundled schema migrations failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The seed file could not be loaded or applied.
    #[error("seed error: {0}")]
    Seed(String),

    /// The tracing pipeline could not be installed.
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer error that implements `IntoResponse`.
#[derive(Debug)]
pub enum ApiError {
    /// A failure reported by the movie service.
    Domain(DomainError),
    /// The request body was not a JSON movie.
    InvalidBody(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidBody(_) => (StatusCode::BAD_REQUEST, "invalid_body"),
            Self::Domain(err) => match err {
                DomainError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
                DomainError::InvalidId => (StatusCode::BAD_REQUEST, "invalid_id"),
                DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
                DomainError::DuplicateConflict(_) => (StatusCode::CONFLICT, "duplicate_conflict"),
                DomainError::SeedEmpty => (StatusCode::BAD_REQUEST, "seed_empty"),
                DomainError::BulkInsert { .. }
                | DomainError::Seed { .. }
                | DomainError::Infrastructure(_) => (StatusCode::BAD_GATEWAY, "upstream_failure"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();
        let message = match self {
            Self::Domain(err) => err.to_string(),
            Self::InvalidBody(detail) => format!("invalid body: {detail}"),
        };

        if status.is_server_error() {
            tracing::warn!(error = %message, "upstream failure");
        }

        let body = ErrorBody {
            error: error_code,
            message,
        };

        (status, Json(body)).into_response()
    }
}
