// ABOUTME: HTTP-facing error type for the castline API.
// ABOUTME: Maps domain errors to status codes and renders them as {"error": "..."} bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use castline_feed::FeedError;
use serde_json::json;
use thiserror::Error;

use crate::book::BookError;
use crate::youtube::LookupError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    /// A third-party service failed (502).
    #[error("{0}")]
    Upstream(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<FeedError> for ApiError {
    fn from(err: FeedError) -> Self {
        ApiError::Internal(format!("Failed to fetch feed: {err}"))
    }
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::InvalidUrl(_) => ApiError::BadRequest(err.to_string()),
            LookupError::Upstream(msg) => ApiError::Upstream(format!("YouTube lookup failed: {msg}")),
        }
    }
}

impl From<BookError> for ApiError {
    fn from(err: BookError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
