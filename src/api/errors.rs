//! API error types mapped to HTTP status codes.
//!
//! Each [`ApiError`] variant maps to a status code and produces a JSON
//! response body `{"error": "message"}`. Core errors are converted at the
//! handler boundary: an empty query is the caller's mistake (400), a
//! well-formed query with zero matches is a normal empty result (200),
//! and a failed corpus reload leaves the old snapshot serving (503).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Application-level error type that implements `IntoResponse`.
#[derive(Debug)]
pub enum ApiError {
    /// Invalid request parameters, including empty queries (400).
    BadRequest(String),
    /// Resource not found (404).
    NotFound(String),
    /// The service cannot satisfy the request right now, e.g. a reload
    /// source is unavailable (503).
    ServiceUnavailable(String),
    /// Unexpected server error (500).
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = axum::Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
