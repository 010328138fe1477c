//! Global configuration constants for mediquery.
//!
//! Tuning parameters, input validation limits, and server defaults are defined here.
//! Runtime configuration (corpus path, field selection, ports, credentials) is
//! handled via CLI arguments and environment variables in `main.rs`.

/// Default number of results returned by ranked search.
pub const DEFAULT_TOP_K: usize = 50;

/// Maximum number of results (`k`) per search request.
pub const MAX_K: usize = 1_000;

/// Default HTTP server port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default comma-separated raw fields scanned by the boolean evaluator.
pub const DEFAULT_SEARCH_FIELDS: &str = "title,abstract";

/// Default comma-separated fields concatenated into the normalized text
/// that feeds the TF-IDF index.
pub const DEFAULT_TEXT_FIELDS: &str = "title,abstract";

/// Maximum length of a raw query string in bytes.
pub const MAX_QUERY_LEN: usize = 1_024;

/// Per-request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of concurrent in-flight requests.
pub const MAX_CONCURRENT_REQUESTS: usize = 256;

/// Maximum HTTP request body size in bytes (64 KB).
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Timeout for a single call to the term-expansion collaborator, in seconds.
///
/// Expansion is best-effort enrichment; a timed-out call falls back to the
/// unexpanded query rather than failing the search.
pub const EXPANSION_TIMEOUT_SECS: u64 = 5;

/// Maximum number of term-expansion lookups issued per search request.
pub const EXPANSION_MAX_TERMS: usize = 8;
