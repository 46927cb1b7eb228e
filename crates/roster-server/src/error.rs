use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roster_core::CoreError;
use roster_store::error::{StoreError, StoreErrorKind};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub const DUPLICATE_EMAIL_MESSAGE: &str = "this email address is already registered";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("validation failed")]
    Validation(Vec<String>),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal(err: impl std::fmt::Display) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err.kind() {
            StoreErrorKind::DuplicateEmail => {
                ApiError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string())
            }
            StoreErrorKind::NotFound => ApiError::NotFound(err.to_string()),
            StoreErrorKind::Core | StoreErrorKind::InvalidTableName => {
                ApiError::BadRequest(err.to_string())
            }
            _ => ApiError::internal(err),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "error": message }),
            ),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "error": "validation failed", "errors": errors }),
            ),
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                json!({ "success": false, "error": message }),
            ),
            ApiError::Conflict(message) => (
                StatusCode::CONFLICT,
                json!({ "success": false, "error": message }),
            ),
            ApiError::Internal(message) => {
                error!(error = %message, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "error": "internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
