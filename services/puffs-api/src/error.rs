//! HTTP error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::orchestrator::PlaceNotFound;

/// Errors returned by the inbound endpoints.
///
/// Every variant renders as `{"error": "..."}` except
/// [`ApiError::MethodNotAllowed`], which keeps its own body shape.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::MethodNotAllowed => json!({ "message": self.to_string() }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<PlaceNotFound> for ApiError {
    fn from(e: PlaceNotFound) -> Self {
        ApiError::NotFound(e.to_string())
    }
}

/// Fallback for routes that exist but not for the request's method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
