// Error handling module
// Defines error types and the envelope they render to

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::Envelope;

/// API errors that can occur during request processing
#[derive(Error, Debug)]
pub enum ApiError {
    /// Access token could not be obtained from the platform
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// Error from the AI platform, or the transport failed before one arrived
    #[error("{}", upstream_message(.status, .message))]
    UpstreamError { status: Option<u16>, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Request validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// No route matched
    #[error("Endpoint not found")]
    NotFound,

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

fn upstream_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(status) => format!("Upstream API error: {} - {}", status, message),
        None => format!("Upstream request failed: {}", message),
    }
}

impl ApiError {
    /// HTTP status this error is rendered with
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::AuthError(_)
            | ApiError::UpstreamError { .. }
            | ApiError::ConfigError(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            ApiError::Internal(err) => {
                tracing::error!("Internal error: {:?}", err);
                "Internal server error".to_string()
            }
            ApiError::ValidationError(_) | ApiError::NotFound => {
                tracing::warn!("{}", self);
                self.to_string()
            }
            _ => {
                tracing::error!("{}", self);
                self.to_string()
            }
        };

        (status, Json(Envelope::failure(message))).into_response()
    }
}
