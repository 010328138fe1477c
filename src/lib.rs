//! # mediquery
//!
//! An in-memory boolean-query document search service: free-text queries
//! are normalized, converted into a flat AND-of-OR boolean expression, and
//! evaluated against a document corpus either as an exact membership
//! filter or as a TF-IDF cosine-similarity ranked search.
//!
//! ## Pipeline
//!
//! ```text
//! HTTP API (Axum) → SearchEngine → { Parser + Evaluator  (mode: filter)
//!                                  { TF-IDF Ranker       (mode: rank)
//! Corpus: CSV → Documents → normalized text → TF-IDF snapshot
//! Enrichment: term-expansion collaborator (OAuth2, cached token, best-effort)
//! ```
//!
//! The corpus and its index are built once and published as an immutable
//! snapshot behind a swappable reference; reloads replace it atomically so
//! concurrent queries never observe a partially built index.

/// REST API layer: Axum router, HTTP handlers, request/response models.
pub mod api;
/// Global configuration constants: limits, defaults, and tuning parameters.
pub mod config;
/// Corpus loading and the in-memory document collection.
pub mod corpus;
/// Core document type.
pub mod document;
/// The query orchestrator and swappable corpus snapshot.
pub mod engine;
/// Error types for corpus loading, query parsing, and term expansion.
pub mod error;
/// Boolean evaluation: exact membership filtering.
pub mod evaluate;
/// Client for the external term-expansion collaborator.
pub mod expand;
/// Text normalization: case folding, stopword removal, lemmatization.
pub mod normalize;
/// Boolean query parsing into AND-of-OR expressions.
pub mod query;
/// TF-IDF vector space and cosine-similarity ranking.
pub mod rank;
