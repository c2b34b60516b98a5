use std::collections::{BTreeMap, HashMap, HashSet};

use once_cell::sync::Lazy;
use thiserror::Error;

/// The corpus yielded no indexable terms (e.g. every word is a stop word).
#[derive(Debug, Error)]
#[error("problem descriptions produced no indexable terms")]
pub struct EmptyVocabularyError;

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any",
        "are", "as", "at", "be", "because", "been", "before", "being", "below", "between",
        "both", "but", "by", "can", "cannot", "could", "did", "do", "does", "doing", "down",
        "during", "each", "few", "for", "from", "further", "had", "has", "have", "having",
        "he", "her", "here", "hers", "herself", "him", "himself", "his", "how", "i", "if",
        "in", "into", "is", "it", "its", "itself", "just", "may", "me", "might", "more",
        "most", "must", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
        "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same",
        "shall", "she", "should", "so", "some", "such", "than", "that", "the", "their",
        "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those",
        "through", "to", "too", "under", "until", "up", "very", "was", "we", "were", "what",
        "when", "where", "which", "while", "who", "whom", "why", "will", "with", "would",
        "you", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// TF-IDF weights over the fixed corpus vocabulary. Fit once at startup;
/// queries are projected into the same vocabulary and out-of-vocabulary
/// terms contribute nothing. Never refits.
pub struct LexicalIndex {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    matrix: Vec<Vec<f32>>,
}

impl LexicalIndex {
    pub fn fit(documents: &[String]) -> Result<Self, EmptyVocabularyError> {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d)).collect();

        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for tokens in &tokenized {
            let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        if document_frequency.is_empty() {
            return Err(EmptyVocabularyError);
        }

        // BTreeMap iteration gives a sorted term -> column assignment, so the
        // fitted vocabulary is reproducible across runs.
        let vocabulary: HashMap<String, usize> = document_frequency
            .keys()
            .enumerate()
            .map(|(column, term)| (term.to_string(), column))
            .collect();

        let total_docs = documents.len() as f32;
        let mut idf = vec![0.0_f32; vocabulary.len()];
        for (term, df) in &document_frequency {
            // Smoothed inverse document frequency; stays positive even for
            // terms present in every document.
            idf[vocabulary[*term]] = ((1.0 + total_docs) / (1.0 + *df as f32)).ln() + 1.0;
        }

        let matrix = tokenized
            .iter()
            .map(|tokens| weigh(tokens, &vocabulary, &idf))
            .collect();

        Ok(Self {
            vocabulary,
            idf,
            matrix,
        })
    }

    /// Project a query string into the fitted vocabulary space.
    pub fn vectorize(&self, query: &str) -> Vec<f32> {
        weigh(&tokenize(query), &self.vocabulary, &self.idf)
    }

    /// Per-document weight rows, in catalog order.
    pub fn rows(&self) -> &[Vec<f32>] {
        &self.matrix
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }
}

fn weigh(tokens: &[String], vocabulary: &HashMap<String, usize>, idf: &[f32]) -> Vec<f32> {
    let mut weights = vec![0.0_f32; idf.len()];
    for token in tokens {
        if let Some(&column) = vocabulary.get(token) {
            weights[column] += idf[column];
        }
    }

    // L2-normalize so document length does not dominate cosine scores.
    let norm = weights.iter().map(|w| w * w).sum::<f32>().sqrt();
    if norm > 0.0 {
        for weight in &mut weights {
            *weight /= norm;
        }
    }
    weights
}

/// Lowercased runs of word characters (alphanumeric or underscore) at least
/// two characters long, with English stop words removed.
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            current.extend(ch.to_lowercase());
        } else if !current.is_empty() {
            push_token(&mut tokens, std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        push_token(&mut tokens, current);
    }

    tokens
}

fn push_token(tokens: &mut Vec<String>, token: String) {
    if token.chars().count() >= 2 && !STOP_WORDS.contains(token.as_str()) {
        tokens.push(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search;

    fn docs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn fit_rejects_stop_word_only_corpus() {
        let corpus = docs(&["the of and", "to with a", "is it"]);
        assert!(LexicalIndex::fit(&corpus).is_err());
    }

    #[test]
    fn fit_rejects_empty_corpus() {
        assert!(LexicalIndex::fit(&[]).is_err());
    }

    #[test]
    fn matrix_has_one_row_per_document() {
        let corpus = docs(&["binary tree traversal", "linked list reversal", "graph coloring"]);
        let index = LexicalIndex::fit(&corpus).unwrap();
        assert_eq!(index.rows().len(), 3);
        assert!(index.rows().iter().all(|row| row.len() == index.vocabulary_size()));
    }

    #[test]
    fn lexical_overlap_ranks_the_expected_document_first() {
        let corpus = docs(&[
            "find two numbers that add to target",
            "sort an array using merge sort",
        ]);
        let index = LexicalIndex::fit(&corpus).unwrap();

        let query = index.vectorize("sum of two numbers");
        let ranked = search::rank(&query, index.rows(), 1);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].index, 0);
        assert!(ranked[0].score > 0.0);
    }

    #[test]
    fn out_of_vocabulary_query_vectorizes_to_zero() {
        let corpus = docs(&["binary tree traversal", "linked list reversal"]);
        let index = LexicalIndex::fit(&corpus).unwrap();

        let query = index.vectorize("quantum chromodynamics");
        assert!(query.iter().all(|w| *w == 0.0));
    }

    #[test]
    fn stop_words_do_not_enter_the_vocabulary() {
        let corpus = docs(&["the binary tree", "a linked list"]);
        let index = LexicalIndex::fit(&corpus).unwrap();

        // "the" and "a" are dropped; only the content words remain.
        assert_eq!(index.vocabulary_size(), 4);
    }

    #[test]
    fn document_rows_are_unit_length() {
        let corpus = docs(&["binary tree traversal", "sort an array using merge sort"]);
        let index = LexicalIndex::fit(&corpus).unwrap();

        for row in index.rows() {
            let norm = row.iter().map(|w| w * w).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn own_description_is_its_best_match() {
        let corpus = docs(&[
            "find two numbers that add to target",
            "sort an array using merge sort",
            "detect a cycle in a linked list",
        ]);
        let index = LexicalIndex::fit(&corpus).unwrap();

        for (i, text) in corpus.iter().enumerate() {
            let query = index.vectorize(text);
            let ranked = search::rank(&query, index.rows(), corpus.len());
            assert_eq!(ranked[0].index, i, "document {i} should match itself first");
        }
    }

    #[test]
    fn vectorize_is_deterministic_across_fits() {
        let corpus = docs(&["binary tree traversal", "linked list reversal"]);
        let first = LexicalIndex::fit(&corpus).unwrap();
        let second = LexicalIndex::fit(&corpus).unwrap();

        assert_eq!(first.vectorize("binary list"), second.vectorize("binary list"));
    }

    #[test]
    fn casing_and_punctuation_are_normalized() {
        let corpus = docs(&["Reverse a LINKED list!", "merge two sorted lists"]);
        let index = LexicalIndex::fit(&corpus).unwrap();

        let upper = index.vectorize("LINKED");
        let lower = index.vectorize("linked");
        assert_eq!(upper, lower);
        assert!(upper.iter().any(|w| *w > 0.0));
    }
}
