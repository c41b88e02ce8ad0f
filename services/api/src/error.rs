//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and its mapping
//! onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::error;

use crate::config::ConfigError;
use intake_core::ports::PortError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core store ports.
    #[error("Store Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    /// Maps the typed error taxonomy onto a status code and an
    /// `{ "error": ... }` body, without inspecting message text.
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Port(PortError::Unauthorized) => (
                StatusCode::UNAUTHORIZED,
                "Authentication required".to_string(),
            ),
            ApiError::Port(PortError::Validation(message)) => {
                (StatusCode::BAD_REQUEST, message.clone())
            }
            ApiError::Port(PortError::NotFound(message)) => {
                (StatusCode::NOT_FOUND, message.clone())
            }
            ApiError::Port(PortError::Conflict(message)) => {
                (StatusCode::CONFLICT, message.clone())
            }
            _ => {
                error!("Internal error while handling request: {:?}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
