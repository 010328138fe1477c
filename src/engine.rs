//! The query orchestrator: normalizer → parser → evaluator or ranker.
//!
//! [`SearchEngine`] owns the corpus and its TF-IDF index as one immutable
//! [`Snapshot`] behind a swappable reference. Queries clone the current
//! `Arc` and run against it unsynchronized; a reload builds a complete new
//! snapshot and publishes it atomically, so in-flight queries observe
//! either the fully-old or fully-new index, never a partially built one.
//! The engine is stateless across requests apart from that snapshot and
//! the optional term-expansion client.

use crate::config;
use crate::corpus::Corpus;
use crate::document::Document;
use crate::error::QueryError;
use crate::evaluate::evaluate;
use crate::expand::ExpansionClient;
use crate::normalize::Normalizer;
use crate::query::{parse, BooleanQuery};
use crate::rank::TfIdfIndex;
use parking_lot::RwLock;
use serde::Deserialize;
use std::sync::Arc;

/// Which retrieval path a search request takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Boolean parse + exact membership filter; unscored, corpus order.
    Filter,
    /// TF-IDF cosine ranking; scored, descending, top-k.
    Rank,
}

/// Search output: documents plus, for ranked mode, parallel scores.
#[derive(Debug)]
pub struct SearchResults {
    pub documents: Vec<Arc<Document>>,
    /// `Some` iff the search ran in [`SearchMode::Rank`].
    pub scores: Option<Vec<f32>>,
}

/// One immutable generation of the corpus and its derived index state.
#[derive(Debug)]
pub struct Snapshot {
    pub corpus: Corpus,
    pub tfidf: TfIdfIndex,
}

impl Snapshot {
    fn build(corpus: Corpus) -> Self {
        let tfidf = TfIdfIndex::build(&corpus);
        Self { corpus, tfidf }
    }
}

/// Stateless request orchestrator over a swappable corpus snapshot.
#[derive(Debug)]
pub struct SearchEngine {
    normalizer: Normalizer,
    snapshot: RwLock<Arc<Snapshot>>,
    expansion: Option<Arc<ExpansionClient>>,
    top_k: usize,
}

impl SearchEngine {
    pub fn new(
        corpus: Corpus,
        normalizer: Normalizer,
        expansion: Option<ExpansionClient>,
        top_k: usize,
    ) -> Self {
        Self {
            normalizer,
            snapshot: RwLock::new(Arc::new(Snapshot::build(corpus))),
            expansion: expansion.map(Arc::new),
            top_k: top_k.min(config::MAX_K),
        }
    }

    /// Rebuilds the snapshot from a freshly loaded corpus and publishes it
    /// atomically. Never mutates the previous snapshot; readers that
    /// already cloned it finish against the old generation.
    pub fn reload(&self, corpus: Corpus) {
        let next = Arc::new(Snapshot::build(corpus));
        *self.snapshot.write() = next;
    }

    /// The normalizer shared by ingest and querying.
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Clones the currently published snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.read().clone()
    }

    /// Number of documents in the current snapshot.
    pub fn document_count(&self) -> usize {
        self.snapshot().corpus.len()
    }

    /// Looks up a document by identifier in the current snapshot.
    pub fn document(&self, id: &str) -> Option<Arc<Document>> {
        self.snapshot().corpus.get(id).cloned()
    }

    /// Runs a search. `k` overrides the configured ranked-result limit and
    /// is ignored in filter mode.
    ///
    /// Term expansion, when configured, runs before either path and is
    /// best-effort: a failed or timed-out lookup logs a warning and the
    /// search proceeds with the unexpanded terms.
    pub async fn search(
        &self,
        raw_query: &str,
        mode: SearchMode,
        k: Option<usize>,
    ) -> Result<SearchResults, QueryError> {
        let snapshot = self.snapshot();
        match mode {
            SearchMode::Filter => {
                let mut query = parse(raw_query, &self.normalizer)?;
                self.expand_query(&mut query).await;
                let documents = evaluate(&query, &snapshot.corpus)
                    .into_iter()
                    .map(|index| snapshot.corpus.documents[index].clone())
                    .collect();
                Ok(SearchResults {
                    documents,
                    scores: None,
                })
            }
            SearchMode::Rank => {
                let mut terms = self.normalizer.normalize(Some(raw_query));
                if terms.is_empty() {
                    return Err(QueryError::Empty);
                }
                self.expand_terms(&mut terms).await;
                let k = k.unwrap_or(self.top_k).min(config::MAX_K);
                let ranked = snapshot.tfidf.rank(&terms, k);
                let mut documents = Vec::with_capacity(ranked.len());
                let mut scores = Vec::with_capacity(ranked.len());
                for (index, score) in ranked {
                    documents.push(snapshot.corpus.documents[index].clone());
                    scores.push(score);
                }
                Ok(SearchResults {
                    documents,
                    scores: Some(scores),
                })
            }
        }
    }

    /// Filter-mode expansion: each OR-group is broadened with the canonical
    /// codes of its own terms, so expansion can only widen a group and the
    /// AND-of-OR semantics stay monotonic. Fan-out is capped per search.
    async fn expand_query(&self, query: &mut BooleanQuery) {
        let client = match &self.expansion {
            Some(client) => client.clone(),
            None => return,
        };
        let mut budget = config::EXPANSION_MAX_TERMS;
        for group in &mut query.groups {
            let mut codes = Vec::new();
            for term in &group.terms {
                // Exhausting the budget stops further lookups but must not
                // discard codes already fetched for this group.
                if budget == 0 {
                    break;
                }
                budget -= 1;
                match client.expand(term).await {
                    Ok(found) => codes.extend(found.into_iter().map(|c| c.to_lowercase())),
                    Err(e) => {
                        tracing::warn!(term = %term, error = %e, "term expansion skipped");
                    }
                }
            }
            group.terms.extend(codes);
        }
    }

    /// Rank-mode expansion: codes extend the flat query term list. Codes are
    /// normalized before extending, since the ranker's vocabulary is built
    /// from normalized text where punctuated codes like "CA40.Z" became
    /// "ca40z" — an unnormalized code would never overlap the vector space.
    async fn expand_terms(&self, terms: &mut Vec<String>) {
        let client = match &self.expansion {
            Some(client) => client.clone(),
            None => return,
        };
        let mut codes = Vec::new();
        for term in terms.iter().take(config::EXPANSION_MAX_TERMS) {
            match client.expand(term).await {
                Ok(found) => {
                    for code in &found {
                        codes.extend(self.normalizer.normalize(Some(code)));
                    }
                }
                Err(e) => {
                    tracing::warn!(term = %term, error = %e, "term expansion skipped");
                }
            }
        }
        terms.extend(codes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CorpusConfig;
    use std::collections::HashMap;

    fn corpus_of(titles: &[&str]) -> Corpus {
        let records = titles
            .iter()
            .map(|t| {
                let mut fields = HashMap::new();
                fields.insert("title".to_string(), t.to_string());
                fields
            })
            .collect();
        Corpus::from_records(records, CorpusConfig::default(), &Normalizer::default()).unwrap()
    }

    fn engine_of(titles: &[&str]) -> SearchEngine {
        SearchEngine::new(
            corpus_of(titles),
            Normalizer::default(),
            None,
            config::DEFAULT_TOP_K,
        )
    }

    // ── Mode dispatch ──────────────────────────────────────────────────

    #[tokio::test]
    async fn test_filter_mode_returns_unscored_subset() {
        let engine = engine_of(&["Fever and cough in patients", "Healthy control group"]);
        let results = engine
            .search("FEVER AND COUGH", SearchMode::Filter, None)
            .await
            .unwrap();
        assert_eq!(results.documents.len(), 1);
        assert_eq!(results.documents[0].id, "0");
        assert!(results.scores.is_none());
    }

    #[tokio::test]
    async fn test_rank_mode_returns_scored_descending() {
        let engine = engine_of(&[
            "fever cough headache study",
            "fever gardening",
            "unrelated topic entirely",
        ]);
        let results = engine
            .search("fever cough headache", SearchMode::Rank, None)
            .await
            .unwrap();
        assert_eq!(results.documents.len(), 2);
        assert_eq!(results.documents[0].id, "0");
        let scores = results.scores.unwrap();
        assert!(scores[0] > scores[1]);
    }

    #[tokio::test]
    async fn test_rank_mode_honors_k() {
        let engine = engine_of(&["fever a", "fever b", "fever c"]);
        let results = engine
            .search("fever", SearchMode::Rank, Some(2))
            .await
            .unwrap();
        assert_eq!(results.documents.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_query_is_reported_in_both_modes() {
        let engine = engine_of(&["Fever"]);
        for mode in [SearchMode::Filter, SearchMode::Rank] {
            let err = engine.search("the of", mode, None).await.unwrap_err();
            assert_eq!(err, QueryError::Empty);
        }
    }

    // ── Snapshot lifecycle ─────────────────────────────────────────────

    #[tokio::test]
    async fn test_reload_replaces_snapshot_wholesale() {
        let engine = engine_of(&["fever one", "fever two"]);
        assert_eq!(engine.document_count(), 2);

        engine.reload(corpus_of(&["fever one", "fever two", "fever three"]));
        assert_eq!(engine.document_count(), 3);
        let results = engine.search("fever", SearchMode::Filter, None).await.unwrap();
        assert_eq!(results.documents.len(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_queries_see_old_or_new_index_never_mixed() {
        let engine = Arc::new(engine_of(&["fever one", "fever two"]));

        let mut workers = Vec::new();
        for _ in 0..8 {
            let engine = engine.clone();
            workers.push(tokio::spawn(async move {
                let mut seen = Vec::new();
                for _ in 0..200 {
                    let results = engine
                        .search("fever", SearchMode::Filter, None)
                        .await
                        .unwrap();
                    seen.push(results.documents.len());
                }
                seen
            }));
        }

        let reloader = {
            let engine = engine.clone();
            tokio::spawn(async move {
                for i in 0..50 {
                    let titles: Vec<String> = if i % 2 == 0 {
                        (0..5).map(|n| format!("fever doc {}", n)).collect()
                    } else {
                        (0..2).map(|n| format!("fever doc {}", n)).collect()
                    };
                    let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
                    engine.reload(
                        Corpus::from_records(
                            refs.iter()
                                .map(|t| {
                                    let mut fields = HashMap::new();
                                    fields.insert("title".to_string(), t.to_string());
                                    fields
                                })
                                .collect(),
                            CorpusConfig::default(),
                            &Normalizer::default(),
                        )
                        .unwrap(),
                    );
                    tokio::task::yield_now().await;
                }
            })
        };

        for worker in workers {
            // Every observation is one complete generation: 2 docs, 5 docs,
            // or the original 2 — never a partial index.
            for count in worker.await.unwrap() {
                assert!(count == 2 || count == 5, "mixed snapshot: {} docs", count);
            }
        }
        reloader.await.unwrap();
    }
}
