use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

/// Every failure a handler can surface. The `Display` text is the exact
/// `error` string clients see, so storage details stay in `Internal`'s
/// payload and only reach the log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Title and content are required")]
    MissingFields,
    /// Carries the decoder's reason for the log.
    #[error("Invalid JSON body")]
    InvalidBody(String),
    #[error("Article not found")]
    NotFound,
    #[error("Route not found")]
    RouteNotFound,
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFields | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        if e.is_validation() {
            return ApiError::MissingFields;
        }
        ApiError::Internal(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::InvalidBody(e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Internal(detail) => error!(error = %detail, "storage fault"),
            ApiError::InvalidBody(reason) => warn!(error = %reason, "rejected request body"),
            _ => {}
        }
        (status, Json(serde_json::json!({"error": self.to_string()}))).into_response()
    }
}
