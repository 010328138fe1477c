//! TF-IDF vector space and cosine-similarity ranking.
//!
//! [`TfIdfIndex::build`] computes a sparse tf·idf vector per document over
//! the corpus's normalized text, L2-normalized at build time so that ranking
//! reduces to a sparse dot product. The index is immutable after build —
//! queries never mutate it, making unsynchronized concurrent reads safe —
//! and is rebuilt wholesale when the corpus changes.

use crate::corpus::Corpus;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::HashMap;

/// Immutable term-vector space over a corpus snapshot.
#[derive(Debug)]
pub struct TfIdfIndex {
    /// term → dense vocabulary id.
    vocabulary: HashMap<String, u32>,
    /// Inverse document frequency per vocabulary id, smoothed as
    /// `ln((1 + N) / (1 + df)) + 1` so terms in every document (or a
    /// freshly unseen df) never divide by zero.
    idf: Vec<f32>,
    /// Per-document sparse vectors, sorted by vocabulary id and
    /// L2-normalized. Indexed by corpus position.
    doc_vectors: Vec<Vec<(u32, f32)>>,
}

impl TfIdfIndex {
    /// Builds the vector space over `corpus.documents[*].normalized_text`.
    pub fn build(corpus: &Corpus) -> Self {
        let mut vocabulary: HashMap<String, u32> = HashMap::new();
        let mut doc_frequency: Vec<u32> = Vec::new();
        let mut doc_terms: Vec<HashMap<u32, u32>> = Vec::with_capacity(corpus.len());

        for doc in &corpus.documents {
            let mut counts: HashMap<u32, u32> = HashMap::new();
            for token in doc.normalized_text.split_whitespace() {
                let next_id = vocabulary.len() as u32;
                let id = *vocabulary.entry(token.to_string()).or_insert(next_id);
                if id as usize >= doc_frequency.len() {
                    doc_frequency.push(0);
                }
                *counts.entry(id).or_insert(0) += 1;
            }
            for &id in counts.keys() {
                doc_frequency[id as usize] += 1;
            }
            doc_terms.push(counts);
        }

        let n = corpus.len() as f32;
        let idf: Vec<f32> = doc_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f32)).ln() + 1.0)
            .collect();

        let doc_vectors = doc_terms
            .into_iter()
            .map(|counts| {
                let mut vector: Vec<(u32, f32)> = counts
                    .into_iter()
                    .map(|(id, tf)| (id, tf as f32 * idf[id as usize]))
                    .collect();
                vector.sort_unstable_by_key(|&(id, _)| id);
                l2_normalize(&mut vector);
                vector
            })
            .collect();

        Self {
            vocabulary,
            idf,
            doc_vectors,
        }
    }

    /// Number of distinct terms in the vector space.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Scores every document against `query_terms` by cosine similarity and
    /// returns up to `k` `(corpus index, score)` pairs, descending by score,
    /// ties broken by original corpus order.
    ///
    /// Terms absent from the corpus vocabulary contribute zero weight. A
    /// query with no overlapping vocabulary produces a zero vector and an
    /// empty result — a zero score is not a match and is never returned.
    pub fn rank(&self, query_terms: &[String], k: usize) -> Vec<(usize, f32)> {
        let query = self.query_vector(query_terms);
        if query.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = self
            .doc_vectors
            .iter()
            .enumerate()
            .filter_map(|(index, doc)| {
                let score = sparse_dot(&query, doc);
                (score > 0.0).then_some((index, score))
            })
            .collect();

        scored.sort_by_key(|&(index, score)| (Reverse(OrderedFloat(score)), index));
        scored.truncate(k);
        scored
    }

    /// Projects query terms into the corpus term space: tf·idf weighted,
    /// L2-normalized, sorted by vocabulary id. Multi-word terms (flattened
    /// OR-terms) are split back into their tokens.
    fn query_vector(&self, query_terms: &[String]) -> Vec<(u32, f32)> {
        let mut counts: HashMap<u32, u32> = HashMap::new();
        for term in query_terms {
            for token in term.split_whitespace() {
                if let Some(&id) = self.vocabulary.get(token) {
                    *counts.entry(id).or_insert(0) += 1;
                }
            }
        }
        let mut vector: Vec<(u32, f32)> = counts
            .into_iter()
            .map(|(id, tf)| (id, tf as f32 * self.idf[id as usize]))
            .collect();
        vector.sort_unstable_by_key(|&(id, _)| id);
        l2_normalize(&mut vector);
        vector
    }
}

/// Scales a sparse vector to unit length. A zero vector is left untouched.
fn l2_normalize(vector: &mut [(u32, f32)]) {
    let norm = vector.iter().map(|&(_, w)| w * w).sum::<f32>().sqrt();
    if norm > 0.0 {
        for (_, w) in vector.iter_mut() {
            *w /= norm;
        }
    }
}

/// Dot product of two sparse vectors sorted by vocabulary id.
fn sparse_dot(a: &[(u32, f32)], b: &[(u32, f32)]) -> f32 {
    let (mut i, mut j, mut sum) = (0, 0, 0.0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CorpusConfig;
    use crate::normalize::Normalizer;
    use std::collections::HashMap;

    fn corpus(titles: &[&str]) -> Corpus {
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

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    // ── Ranking ────────────────────────────────────────────────────────

    #[test]
    fn test_full_overlap_outranks_partial_and_none_is_excluded() {
        let c = corpus(&[
            "fever cough headache", // shares all query vocabulary
            "fever gardening soil", // shares part
            "quantum chromodynamics lattice", // shares none
        ]);
        let index = TfIdfIndex::build(&c);
        let results = index.rank(&terms(&["fever", "cough", "headache"]), 10);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, 0);
        assert_eq!(results[1].0, 1);
        assert!(results[0].1 > results[1].1);
    }

    #[test]
    fn test_zero_vector_query_is_empty() {
        let c = corpus(&["fever cough", "headache nausea"]);
        let index = TfIdfIndex::build(&c);
        assert!(index.rank(&terms(&["spaceship"]), 10).is_empty());
    }

    #[test]
    fn test_unknown_terms_contribute_zero_not_error() {
        let c = corpus(&["fever cough"]);
        let index = TfIdfIndex::build(&c);
        let results = index.rank(&terms(&["fever", "spaceship"]), 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, 0);
    }

    #[test]
    fn test_ties_preserve_corpus_order() {
        // Identical documents score identically against any query.
        let c = corpus(&["fever cough", "fever cough", "fever cough"]);
        let index = TfIdfIndex::build(&c);
        let results = index.rank(&terms(&["fever"]), 10);
        let order: Vec<usize> = results.iter().map(|&(i, _)| i).collect();
        assert_eq!(order, vec![0, 1, 2]);
        assert_eq!(results[0].1, results[1].1);
    }

    #[test]
    fn test_k_truncates() {
        let c = corpus(&["fever a", "fever b", "fever c", "fever d"]);
        let index = TfIdfIndex::build(&c);
        assert_eq!(index.rank(&terms(&["fever"]), 2).len(), 2);
    }

    #[test]
    fn test_multiword_terms_are_split() {
        let c = corpus(&["chest pain radiating", "ankle sprain"]);
        let index = TfIdfIndex::build(&c);
        let results = index.rank(&terms(&["chest pain"]), 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, 0);
    }

    #[test]
    fn test_rare_term_weighs_more_than_common() {
        // "fever" appears everywhere; "sepsis" in one document. A query for
        // both should put the sepsis document first.
        let c = corpus(&["fever sepsis", "fever chills", "fever cough"]);
        let index = TfIdfIndex::build(&c);
        let results = index.rank(&terms(&["fever", "sepsis"]), 10);
        assert_eq!(results[0].0, 0);
    }
}
