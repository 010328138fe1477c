//! Boolean evaluation: exact membership filtering of the corpus.
//!
//! A document is included iff every OR-group in the expression has at least
//! one term occurring as a case-insensitive substring of at least one
//! configured search field. Matching runs against the raw field text, not
//! the normalized form, so exact substrings users type — including domain
//! codes like "J06.9" reduced to "j069" by normalization — still hit the
//! raw text they came from. Results preserve original corpus order and
//! carry no score.

use crate::corpus::Corpus;
use crate::document::Document;
use crate::query::{BooleanQuery, OrGroup};

/// Evaluates `query` against `corpus`, returning matching document indices
/// in corpus order.
///
/// Adding an AND-group can only narrow the result (monotonicity). The
/// parser guarantees at least one group, so a full-corpus result can only
/// come from every document genuinely matching. Complexity is
/// O(documents × fields × OR-terms); the corpus is in memory and this
/// evaluation mode trades index-build cost for query-time scanning.
pub fn evaluate(query: &BooleanQuery, corpus: &Corpus) -> Vec<usize> {
    let fields = &corpus.config.search_fields;
    corpus
        .documents
        .iter()
        .enumerate()
        .filter(|(_, doc)| {
            query
                .groups
                .iter()
                .all(|group| group_matches(group, doc, fields))
        })
        .map(|(index, _)| index)
        .collect()
}

fn group_matches(group: &OrGroup, doc: &Document, fields: &[String]) -> bool {
    group.terms.iter().any(|term| {
        fields.iter().any(|field| {
            doc.field(field)
                .is_some_and(|value| value.to_lowercase().contains(term.as_str()))
        })
    })
}
