use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::pointing::{FeedError, PointingError};
use crate::web::config::Permission;

#[derive(Debug)]
pub enum ApiError {
    Unauthorized(&'static str),
    Forbidden(Permission),
    Validation(String),
    FeedNotConfigured,
    FeedNotLoaded,
    Feed(FeedError),
    Internal(PointingError),
}

impl From<FeedError> for ApiError {
    fn from(e: FeedError) -> Self {
        ApiError::Feed(e)
    }
}

impl From<PointingError> for ApiError {
    fn from(e: PointingError) -> Self {
        ApiError::Internal(e)
    }
}

impl ApiError {
    fn status_and_body(&self) -> (StatusCode, ErrorResponse) {
        match self {
            ApiError::Unauthorized(reason) => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::with_message("unauthorized", reason),
            ),
            ApiError::Forbidden(permission) => (
                StatusCode::FORBIDDEN,
                ErrorResponse::with_message(
                    "forbidden",
                    &format!("missing permission {}", permission.as_str()),
                ),
            ),
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_message("validation_failed", msg),
            ),
            ApiError::FeedNotConfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorResponse::new("feed_not_configured"),
            ),
            ApiError::FeedNotLoaded => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorResponse::with_message(
                    "feed_not_loaded",
                    "the feed snapshot could not be read; reload it once fixed",
                ),
            ),
            ApiError::Feed(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::with_message("feed_error", &e.to_string()),
            ),
            ApiError::Internal(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::with_message("internal_invariant", &e.to_string()),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(e) = &self {
            log::error!("pointing invariant violated: {}", e);
        }
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: None,
        }
    }

    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}
