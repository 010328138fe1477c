//! Text normalization: case folding, punctuation and stopword removal,
//! and rule-based lemmatization.
//!
//! Every stage is a pure function of its input. Identical input always
//! yields the identical token sequence regardless of call order; the
//! normalizer holds no mutable state. Missing or empty input yields an
//! empty sequence, never an error.

use std::collections::{HashMap, HashSet};

/// English stopwords dropped during normalization.
///
/// Includes the inflected forms of auxiliary verbs so that lemmatization
/// output stays closed under the stopword filter.
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "an", "and", "any", "are", "as", "at", "be",
    "because", "been", "being", "below", "between", "both", "but", "by", "did", "do", "does",
    "doing", "down", "during", "each", "few", "for", "from", "further", "had", "has", "have",
    "having", "he", "her", "here", "him", "his", "how", "i", "if", "in", "into", "is", "it",
    "its", "just", "more", "most", "no", "nor", "not", "of", "off", "on", "once", "only", "or",
    "other", "our", "out", "over", "own", "same", "she", "so", "some", "such", "than", "that",
    "the", "their", "them", "then", "there", "these", "they", "this", "those", "through", "to",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "why", "will", "with", "you", "your",
];

/// Irregular plural and inflection forms that the suffix rules cannot reach.
const LEMMA_EXCEPTIONS: &[(&str, &str)] = &[
    ("analyses", "analysis"),
    ("bacteria", "bacterium"),
    ("children", "child"),
    ("criteria", "criterion"),
    ("diagnoses", "diagnosis"),
    ("feet", "foot"),
    ("men", "man"),
    ("mice", "mouse"),
    ("teeth", "tooth"),
    ("women", "woman"),
];

/// Deterministic text → token-sequence transform.
///
/// The stopword set and lemma exception table are constructor inputs; the
/// defaults cover common English. Construction is the only place behavior
/// is configured — `normalize` itself is stateless.
#[derive(Debug, Clone)]
pub struct Normalizer {
    stop_words: HashSet<String>,
    lemma_exceptions: HashMap<String, String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(
            STOP_WORDS.iter().map(|w| w.to_string()),
            LEMMA_EXCEPTIONS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }
}

impl Normalizer {
    /// Creates a normalizer with an explicit stopword set and lemma
    /// exception table.
    pub fn new(
        stop_words: impl IntoIterator<Item = String>,
        lemma_exceptions: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self {
            stop_words: stop_words.into_iter().collect(),
            lemma_exceptions: lemma_exceptions.into_iter().collect(),
        }
    }

    /// Normalizes text into an ordered token sequence.
    ///
    /// Steps, in order: discard characters outside the alphanumeric /
    /// whitespace set, fold to lowercase, split on whitespace, drop
    /// stopwords, lemmatize. `None` yields an empty sequence.
    pub fn normalize(&self, text: Option<&str>) -> Vec<String> {
        let text = match text {
            Some(t) => t,
            None => return Vec::new(),
        };

        let cleaned: String = text
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .flat_map(|c| c.to_lowercase())
            .collect();

        cleaned
            .split_whitespace()
            .filter(|token| !self.stop_words.contains(*token))
            .map(|token| self.lemmatize(token))
            // A lemma may itself be a stopword ("being" → "be"); dropping it
            // here keeps normalization idempotent.
            .filter(|lemma| !self.stop_words.contains(lemma))
            .collect()
    }

    /// Normalizes text and joins the tokens with single spaces.
    ///
    /// Used to derive a document's searchable normalized-text field and to
    /// flatten an OR-term into one matchable string.
    pub fn normalize_joined(&self, text: Option<&str>) -> String {
        self.normalize(text).join(" ")
    }

    /// Reduces a lowercase token to its canonical lemma.
    ///
    /// Exception table first, then fixed suffix rules: plural stripping
    /// ("studies" → "study", "viruses" → "virus", "patients" → "patient")
    /// and inflection stripping with consonant undoubling ("running" →
    /// "run", "infected" → "infect"). A token the rules cannot shorten
    /// safely is returned unchanged.
    fn lemmatize(&self, token: &str) -> String {
        if let Some(lemma) = self.lemma_exceptions.get(token) {
            return lemma.clone();
        }
        if token.len() <= 3 || !token.is_ascii() {
            return token.to_string();
        }

        if let Some(stem) = token.strip_suffix("ies") {
            if !stem.is_empty() {
                return format!("{}y", stem);
            }
        }
        // Only strip "es" after suffixes English pluralizes that way
        // ("classes", "viruses", "boxes", "branches"); a bare trailing "s"
        // ("diseases") is the plain plural and must fall through to the
        // `s` rule so the lemma is stable under re-normalization.
        if let Some(stem) = token.strip_suffix("es") {
            if stem.ends_with("ss")
                || stem.ends_with("us")
                || stem.ends_with("is")
                || stem.ends_with('x')
                || stem.ends_with('z')
                || stem.ends_with("ch")
                || stem.ends_with("sh")
            {
                return stem.to_string();
            }
        }
        if token.ends_with('s')
            && !token.ends_with("ss")
            && !token.ends_with("us")
            && !token.ends_with("is")
        {
            return token[..token.len() - 1].to_string();
        }
        if token.len() >= 6 {
            if let Some(stem) = token.strip_suffix("ing") {
                if let Some(lemma) = undouble(stem) {
                    return lemma;
                }
            }
        }
        if token.len() >= 5 {
            if let Some(stem) = token.strip_suffix("ed") {
                if let Some(lemma) = undouble(stem) {
                    return lemma;
                }
            }
        }
        token.to_string()
    }
}

/// Finishes inflection stripping: rejects stems with no vowel (the suffix
/// was not an inflection, e.g. "bring") and collapses a doubled final
/// consonant ("runn" → "run") except for l/s/z, which English doubles
/// legitimately ("fall", "pass", "buzz").
fn undouble(stem: &str) -> Option<String> {
    let bytes = stem.as_bytes();
    if !bytes.iter().any(|b| is_vowel(*b)) {
        return None;
    }
    let n = bytes.len();
    if n >= 3
        && bytes[n - 1] == bytes[n - 2]
        && !is_vowel(bytes[n - 1])
        && !matches!(bytes[n - 1], b'l' | b's' | b'z')
    {
        return Some(stem[..n - 1].to_string());
    }
    Some(stem.to_string())
}

fn is_vowel(b: u8) -> bool {
    matches!(b, b'a' | b'e' | b'i' | b'o' | b'u')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm() -> Normalizer {
        Normalizer::default()
    }

    // ── Totality and determinism ──────────────────────────────────────

    #[test]
    fn test_missing_input_yields_empty() {
        assert!(norm().normalize(None).is_empty());
    }

    #[test]
    fn test_empty_and_punctuation_only_yield_empty() {
        let n = norm();
        assert!(n.normalize(Some("")).is_empty());
        assert!(n.normalize(Some("   ")).is_empty());
        assert!(n.normalize(Some("!!! ... ???")).is_empty());
    }

    #[test]
    fn test_deterministic_across_calls() {
        let n = norm();
        let first = n.normalize(Some("Fever and COUGH in patients"));
        let second = n.normalize(Some("Fever and COUGH in patients"));
        assert_eq!(first, second);
    }

    // ── Case folding, punctuation, stopwords ──────────────────────────

    #[test]
    fn test_case_fold_and_stopword_removal() {
        let tokens = norm().normalize(Some("The Fever AND the Cough"));
        assert_eq!(tokens, vec!["fever", "cough"]);
    }

    #[test]
    fn test_punctuation_stripped() {
        let tokens = norm().normalize(Some("(fever), cough-like; symptoms!"));
        assert_eq!(tokens, vec!["fever", "coughlike", "symptom"]);
    }

    #[test]
    fn test_order_preserved() {
        let tokens = norm().normalize(Some("cough before fever"));
        assert_eq!(tokens, vec!["cough", "before", "fever"]);
    }

    // ── Lemmatization ─────────────────────────────────────────────────

    #[test]
    fn test_suffix_rules() {
        let n = norm();
        assert_eq!(n.normalize(Some("running")), vec!["run"]);
        assert_eq!(n.normalize(Some("patients")), vec!["patient"]);
        assert_eq!(n.normalize(Some("studies")), vec!["study"]);
        assert_eq!(n.normalize(Some("viruses")), vec!["virus"]);
        assert_eq!(n.normalize(Some("infected")), vec!["infect"]);
        assert_eq!(n.normalize(Some("classes")), vec!["class"]);
        assert_eq!(n.normalize(Some("diseases")), vec!["disease"]);
        assert_eq!(n.normalize(Some("increases")), vec!["increase"]);
    }

    #[test]
    fn test_suffix_rules_leave_short_or_vowelless_tokens() {
        let n = norm();
        assert_eq!(n.normalize(Some("gas")), vec!["gas"]);
        assert_eq!(n.normalize(Some("bring")), vec!["bring"]);
        assert_eq!(n.normalize(Some("falling")), vec!["fall"]);
    }

    #[test]
    fn test_exception_table() {
        let n = norm();
        assert_eq!(n.normalize(Some("diagnoses")), vec!["diagnosis"]);
        assert_eq!(n.normalize(Some("children")), vec!["child"]);
    }

    #[test]
    fn test_custom_configuration() {
        let n = Normalizer::new(
            vec!["foo".to_string()],
            vec![("bar".to_string(), "baz".to_string())],
        );
        assert_eq!(n.normalize(Some("foo bar")), vec!["baz"]);
    }

    // ── Idempotence ───────────────────────────────────────────────────

    #[test]
    fn test_normalize_is_idempotent() {
        let n = norm();
        for input in [
            "Patients running fevers, coughing badly",
            "Diagnoses of the children being studied",
            "COVID-19 vaccine trials: interim analyses",
            "Diseases whose phrases increase database releases",
        ] {
            let once = n.normalize(Some(input));
            let joined = once.join(" ");
            let twice = n.normalize(Some(&joined));
            assert_eq!(once, twice, "not idempotent for {:?}", input);
        }
    }
}
