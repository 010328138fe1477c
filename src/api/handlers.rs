//! HTTP request handlers and application state.

use crate::api::errors::ApiError;
use crate::api::models::{
    DocumentResponse, HealthResponse, ReloadResponse, SearchRequest, SearchResponse,
};
use crate::config;
use crate::corpus::{Corpus, CorpusConfig};
use crate::document::Document;
use crate::engine::SearchEngine;
use axum::extract::{Path, State};
use axum::Json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
    /// CSV source for `/admin/reload`; `None` when the corpus was supplied
    /// in memory and cannot be re-read.
    pub corpus_path: Option<PathBuf>,
    pub corpus_config: CorpusConfig,
    pub start_time: Instant,
}

fn document_response(doc: &Document) -> DocumentResponse {
    DocumentResponse {
        id: doc.id.clone(),
        fields: doc.fields.clone(),
    }
}

/// `POST /search` — run a boolean filter or ranked search.
pub async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    if req.query.len() > config::MAX_QUERY_LEN {
        return Err(ApiError::BadRequest(format!(
            "query exceeds {} bytes",
            config::MAX_QUERY_LEN
        )));
    }

    let results = state
        .engine
        .search(&req.query, req.mode, req.k)
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let documents: Vec<DocumentResponse> = results
        .documents
        .iter()
        .map(|doc| document_response(doc))
        .collect();
    let count = documents.len();

    Ok(Json(SearchResponse {
        documents,
        scores: results.scores,
        count,
    }))
}

/// `GET /documents/:id` — fetch a single document by identifier.
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DocumentResponse>, ApiError> {
    state
        .engine
        .document(&id)
        .map(|doc| Json(document_response(&doc)))
        .ok_or_else(|| ApiError::NotFound(format!("no document with id '{}'", id)))
}

/// `GET /health` — liveness and corpus summary.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        document_count: state.engine.document_count(),
    })
}

/// `POST /admin/reload` — re-read the corpus source and publish a new
/// snapshot. On failure the previous snapshot stays in service.
pub async fn reload(State(state): State<AppState>) -> Result<Json<ReloadResponse>, ApiError> {
    let path = state.corpus_path.as_ref().ok_or_else(|| {
        ApiError::ServiceUnavailable("no corpus source configured for reload".to_string())
    })?;

    let corpus = Corpus::from_csv_path(
        path,
        state.corpus_config.clone(),
        state.engine.normalizer(),
    )
    .map_err(|e| {
        tracing::error!(error = %e, "corpus reload failed; keeping current snapshot");
        ApiError::ServiceUnavailable(format!("reload failed: {}", e))
    })?;

    let document_count = corpus.len();
    state.engine.reload(corpus);
    tracing::info!(documents = document_count, "corpus snapshot reloaded");

    Ok(Json(ReloadResponse {
        message: "corpus reloaded".to_string(),
        document_count,
    }))
}
