//! Request and response data transfer objects for the REST API.
//!
//! All types derive `Serialize` and/or `Deserialize` for JSON marshalling
//! via Axum.

use crate::engine::SearchMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Request body for `POST /search`.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub mode: SearchMode,
    /// Ranked-result limit override; ignored in filter mode.
    pub k: Option<usize>,
}

/// A document in a search or lookup response: identifier plus raw fields.
#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub id: String,
    pub fields: HashMap<String, String>,
}

/// Response body for `POST /search`.
///
/// `scores` is present only for ranked searches and is parallel to
/// `documents`. `count == 0` with HTTP 200 means a well-formed query
/// matched nothing — distinct from the 400 an empty query produces.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub documents: Vec<DocumentResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<Vec<f32>>,
    pub count: usize,
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub document_count: usize,
}

/// Response body for `POST /admin/reload`.
#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub message: String,
    pub document_count: usize,
}
