//! Boolean query parsing.
//!
//! Grammar: the raw query splits on whitespace-delimited, case-insensitive
//! `AND` into AND-parts; each AND-part splits on `OR` into OR-terms; each
//! OR-term is normalized and flattened into a single matchable string. The
//! expression is the AND of its OR-groups — a flat two-level grammar with
//! no negation, nesting, or precedence. Parentheses are not operators; they
//! are stripped as punctuation during normalization.

use crate::error::QueryError;
use crate::normalize::Normalizer;

/// A non-empty set of alternatives: the group matches when any term matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrGroup {
    /// Normalized, space-flattened terms in query order.
    pub terms: Vec<String>,
}

/// A parsed query: the logical AND of its OR-groups.
///
/// Invariant: every group holds at least one non-empty normalized term.
/// An expression with zero groups is never constructed — parsing reports
/// [`QueryError::Empty`] instead of treating it as "match everything".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanQuery {
    pub groups: Vec<OrGroup>,
}

/// Parses a raw query string into a [`BooleanQuery`].
///
/// OR-terms that normalize to nothing are dropped; an AND-part whose terms
/// all normalize to nothing is dropped; a query left with zero groups fails
/// with [`QueryError::Empty`]. A query with no separators yields a single
/// group with a single term.
pub fn parse(raw: &str, normalizer: &Normalizer) -> Result<BooleanQuery, QueryError> {
    let mut groups = Vec::new();

    for and_part in split_on_keyword(raw, "AND") {
        let mut terms = Vec::new();
        for or_term in split_on_keyword(and_part, "OR") {
            let flat = normalizer.normalize_joined(Some(or_term.trim()));
            if !flat.is_empty() {
                terms.push(flat);
            }
        }
        if !terms.is_empty() {
            groups.push(OrGroup { terms });
        }
    }

    if groups.is_empty() {
        return Err(QueryError::Empty);
    }
    Ok(BooleanQuery { groups })
}

/// Splits `text` on standalone occurrences of `keyword` (case-insensitive,
/// surrounded by whitespace or string boundaries). The keyword must be a
/// whole whitespace-delimited word: "android" does not contain a separator.
fn split_on_keyword<'a>(text: &'a str, keyword: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut part_start = 0;
    let mut word_start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(ws) = word_start.take() {
                if text[ws..i].eq_ignore_ascii_case(keyword) {
                    parts.push(&text[part_start..ws]);
                    part_start = i;
                }
            }
        } else if word_start.is_none() {
            word_start = Some(i);
        }
    }
    if let Some(ws) = word_start {
        if text[ws..].eq_ignore_ascii_case(keyword) {
            parts.push(&text[part_start..ws]);
            part_start = text.len();
        }
    }

    parts.push(&text[part_start..]);
    parts
}
