//! Core document type.
//!
//! A `Document` is a record ingested from the corpus source: a stable
//! identifier, a map of named raw text fields, and a derived normalized-text
//! field used by the TF-IDF ranker. Documents are immutable once ingested
//! and live as long as the corpus snapshot that owns them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An immutable corpus record.
///
/// The field set is determined at corpus-load time; columns the core does
/// not know about are carried opaquely in `fields` and returned to callers
/// untouched. The boolean evaluator matches against the raw field values,
/// the ranker against `normalized_text`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier: the source's explicit `id` column when present,
    /// otherwise the zero-based row position at ingest.
    pub id: String,
    /// Raw field name → raw text value.
    pub fields: HashMap<String, String>,
    /// Space-joined normalized tokens of the configured text fields.
    pub normalized_text: String,
}

impl Document {
    /// Creates a document from already-normalized parts.
    pub fn new(id: String, fields: HashMap<String, String>, normalized_text: String) -> Self {
        Self {
            id,
            fields,
            normalized_text,
        }
    }

    /// Returns a raw field value, or `None` when the field is absent.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}
