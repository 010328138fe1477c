//! Corpus loading and the in-memory document collection.
//!
//! A [`Corpus`] is built once from a CSV source (or from in-memory records)
//! and is read-only for the rest of its lifetime: a reload constructs a new
//! `Corpus` wholesale and the engine swaps it in atomically, never mutating
//! one in place. A missing, unreadable, or empty source is a fatal
//! [`CorpusError`] — the service must not start serving with no corpus.

use crate::document::Document;
use crate::error::CorpusError;
use crate::normalize::Normalizer;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Field selection for search.
///
/// Which fields participate in matching is explicit configuration, not a
/// scan of every column: `search_fields` are the raw fields the boolean
/// evaluator substring-matches, `text_fields` are concatenated and
/// normalized into each document's `normalized_text` for the ranker.
/// All configured fields are treated uniformly — no field carries implicit
/// priority over another.
#[derive(Debug, Clone)]
pub struct CorpusConfig {
    pub search_fields: Vec<String>,
    pub text_fields: Vec<String>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            search_fields: vec!["title".to_string(), "abstract".to_string()],
            text_fields: vec!["title".to_string(), "abstract".to_string()],
        }
    }
}

/// The ordered, immutable document collection.
#[derive(Debug)]
pub struct Corpus {
    /// Documents in ingest order. `Arc` so result sets can share them
    /// without copying text.
    pub documents: Vec<Arc<Document>>,
    pub config: CorpusConfig,
}

impl Corpus {
    /// Loads a corpus from a CSV file with a header row.
    ///
    /// Header names are lowercased. A column named `id` supplies document
    /// identifiers; otherwise the zero-based row position is used.
    pub fn from_csv_path(
        path: &Path,
        config: CorpusConfig,
        normalizer: &Normalizer,
    ) -> Result<Self, CorpusError> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| CorpusError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| CorpusError::Malformed(e.to_string()))?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|e| CorpusError::Malformed(e.to_string()))?;
            let fields: HashMap<String, String> = headers
                .iter()
                .cloned()
                .zip(row.iter().map(|v| v.to_string()))
                .collect();
            records.push(fields);
        }

        Self::from_records(records, config, normalizer)
    }

    /// Builds a corpus from in-memory field maps, assigning identifiers and
    /// deriving each document's normalized text.
    pub fn from_records(
        records: Vec<HashMap<String, String>>,
        config: CorpusConfig,
        normalizer: &Normalizer,
    ) -> Result<Self, CorpusError> {
        if records.is_empty() {
            return Err(CorpusError::Empty);
        }

        let documents = records
            .into_iter()
            .enumerate()
            .map(|(row, fields)| {
                let id = match fields.get("id") {
                    Some(explicit) if !explicit.trim().is_empty() => explicit.trim().to_string(),
                    _ => row.to_string(),
                };
                let raw_text: String = config
                    .text_fields
                    .iter()
                    .filter_map(|name| fields.get(name).map(String::as_str))
                    .collect::<Vec<_>>()
                    .join(" ");
                let normalized_text = normalizer.normalize_joined(Some(&raw_text));
                Arc::new(Document::new(id, fields, normalized_text))
            })
            .collect();

        Ok(Self { documents, config })
    }

    /// Number of documents in the corpus.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns `true` if the corpus holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Looks up a document by identifier.
    pub fn get(&self, id: &str) -> Option<&Arc<Document>> {
        self.documents.iter().find(|doc| doc.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn record(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // ── Record ingest ──────────────────────────────────────────────────

    #[test]
    fn test_from_records_assigns_row_ids() {
        let corpus = Corpus::from_records(
            vec![
                record(&[("title", "Fever study")]),
                record(&[("title", "Cough study")]),
            ],
            CorpusConfig::default(),
            &Normalizer::default(),
        )
        .unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.documents[0].id, "0");
        assert_eq!(corpus.documents[1].id, "1");
    }

    #[test]
    fn test_from_records_prefers_explicit_id() {
        let corpus = Corpus::from_records(
            vec![record(&[("id", "doc-42"), ("title", "Fever")])],
            CorpusConfig::default(),
            &Normalizer::default(),
        )
        .unwrap();
        assert_eq!(corpus.documents[0].id, "doc-42");
        assert!(corpus.get("doc-42").is_some());
        assert!(corpus.get("0").is_none());
    }

    #[test]
    fn test_normalized_text_spans_configured_fields() {
        let corpus = Corpus::from_records(
            vec![record(&[
                ("title", "Fever in patients"),
                ("abstract", "Running a cough study."),
                ("notes", "ignored column"),
            ])],
            CorpusConfig::default(),
            &Normalizer::default(),
        )
        .unwrap();
        let text = &corpus.documents[0].normalized_text;
        assert!(text.contains("fever"));
        assert!(text.contains("patient"));
        assert!(text.contains("run"));
        assert!(!text.contains("ignored"));
    }

    #[test]
    fn test_empty_records_is_an_error() {
        let err = Corpus::from_records(
            Vec::new(),
            CorpusConfig::default(),
            &Normalizer::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CorpusError::Empty));
    }

    // ── CSV ingest ─────────────────────────────────────────────────────

    #[test]
    fn test_from_csv_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Title,Abstract").unwrap();
        writeln!(file, "Fever and cough,Symptoms in patients").unwrap();
        writeln!(file, "Healthy controls,Control group data").unwrap();
        file.flush().unwrap();

        let corpus = Corpus::from_csv_path(
            file.path(),
            CorpusConfig::default(),
            &Normalizer::default(),
        )
        .unwrap();
        assert_eq!(corpus.len(), 2);
        // Headers are lowercased on ingest.
        assert_eq!(corpus.documents[0].field("title"), Some("Fever and cough"));
        assert!(corpus.documents[0].normalized_text.contains("fever"));
    }

    #[test]
    fn test_missing_csv_is_unreadable() {
        let err = Corpus::from_csv_path(
            Path::new("/nonexistent/corpus.csv"),
            CorpusConfig::default(),
            &Normalizer::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CorpusError::Unreadable { .. }));
    }
}
