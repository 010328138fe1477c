//! Error types for corpus loading, query parsing, and term expansion.
//!
//! Corpus errors are fatal at startup: the service must not begin serving
//! with no corpus. Query errors are reported to the caller. Expansion errors
//! never abort a search; the orchestrator degrades to the unexpanded terms.

use std::fmt;

/// Failure to load or parse the document corpus.
#[derive(Debug)]
pub enum CorpusError {
    /// The data source could not be opened or read.
    Unreadable { path: String, reason: String },
    /// The data source was read but its contents could not be parsed.
    Malformed(String),
    /// The data source parsed cleanly but contained zero documents.
    Empty,
}

impl fmt::Display for CorpusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorpusError::Unreadable { path, reason } => {
                write!(f, "cannot read corpus '{}': {}", path, reason)
            }
            CorpusError::Malformed(msg) => write!(f, "malformed corpus record: {}", msg),
            CorpusError::Empty => write!(f, "corpus contains no documents"),
        }
    }
}

impl std::error::Error for CorpusError {}

/// Failure to turn a raw query string into a usable boolean expression.
#[derive(Debug, PartialEq, Eq)]
pub enum QueryError {
    /// Every term normalized to nothing; the query has no searchable content.
    /// Distinct from "no matches" — an empty query is a caller error, not an
    /// empty result set, and is never coerced into a match-all.
    Empty,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::Empty => write!(
                f,
                "query contains no searchable terms after normalization; \
                 enter at least one keyword that is not a stopword"
            ),
        }
    }
}

impl std::error::Error for QueryError {}

/// Failure of the external term-expansion collaborator.
#[derive(Debug)]
pub enum ExpansionError {
    /// The collaborator could not be reached, timed out, or returned an
    /// unusable response.
    Unavailable(String),
    /// The collaborator rejected our credentials. The cached token is
    /// invalidated and one re-acquisition is attempted before this
    /// surfaces to the caller.
    Unauthorized,
}

impl fmt::Display for ExpansionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpansionError::Unavailable(msg) => write!(f, "term expansion unavailable: {}", msg),
            ExpansionError::Unauthorized => {
                write!(f, "term expansion rejected credentials after token refresh")
            }
        }
    }
}

impl std::error::Error for ExpansionError {}
