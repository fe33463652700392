//! Error types for the Bugtrack server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bugtrack_core::{FieldError, InvalidTransition, ValidationError};
use serde::Serialize;

/// Message sent to callers for any 500-class failure.
const SERVER_ERROR_MESSAGE: &str = "Server Error";

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Validation error: {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.errors)
    }
}

impl From<InvalidTransition> for AppError {
    fn from(err: InvalidTransition) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Body of every failed response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl ErrorBody {
    fn new(message: impl Into<String>, errors: Option<Vec<FieldError>>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new(SERVER_ERROR_MESSAGE, None),
                )
            }
            AppError::NotFound(msg) => {
                tracing::info!(status = 404, "{}", msg);
                (StatusCode::NOT_FOUND, ErrorBody::new(msg, None))
            }
            AppError::BadRequest(msg) => {
                tracing::info!(status = 400, "{}", msg);
                (StatusCode::BAD_REQUEST, ErrorBody::new(msg, None))
            }
            AppError::Validation(errors) => {
                tracing::info!(status = 400, fields = errors.len(), "Validation Error");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorBody::new("Validation Error", Some(errors)),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new(SERVER_ERROR_MESSAGE, None),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
