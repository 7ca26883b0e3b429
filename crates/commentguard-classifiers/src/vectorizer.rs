//! TF-IDF feature extraction over a vocabulary fixed at training time
//!
//! The vectorizer is fitted once by the training driver and persisted next
//! to the classifier; a classifier is only meaningful against the exact
//! vocabulary it was trained on.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use commentguard_core::{Error, Result};

use crate::stopwords::is_stop_word;

/// Sparse feature vector over the fitted vocabulary.
///
/// Entries are `(term index, weight)` pairs sorted by index; indices
/// absent from `entries` carry weight zero.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    /// Dimension of the fitted feature space
    pub dimension: usize,

    /// Non-zero entries, sorted by term index
    pub entries: Vec<(usize, f32)>,
}

impl FeatureVector {
    /// True when the text shared no vocabulary with the training corpus
    pub fn is_all_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of non-zero features
    pub fn nonzero_count(&self) -> usize {
        self.entries.len()
    }
}

/// TF-IDF vectorizer with n-gram extraction and document-frequency pruning.
///
/// The fitted state (vocabulary and per-term IDF) is part of the
/// serialized representation; `transform` is a pure function of that state
/// and its input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// Term to feature-index mapping, fixed by `fit`
    vocabulary: HashMap<String, usize>,

    /// Inverse document frequency per feature index
    idf: Vec<f32>,

    /// Inclusive n-gram length range
    ngram_range: (usize, usize),

    /// Terms in fewer documents than this are pruned
    min_df: usize,

    /// Terms in more than this fraction of documents are pruned
    max_df: f32,

    /// Vocabulary size cap
    max_features: usize,

    /// Apply `1 + ln(tf)` scaling instead of raw counts
    sublinear_tf: bool,
}

impl TfidfVectorizer {
    /// Create a vectorizer with the production configuration: up to 10 000
    /// features, 1-3-grams, document-frequency floor 3 and ceiling 0.7,
    /// sublinear TF scaling.
    pub fn new() -> Self {
        Self {
            vocabulary: HashMap::new(),
            idf: Vec::new(),
            ngram_range: (1, 3),
            min_df: 3,
            max_df: 0.7,
            max_features: 10_000,
            sublinear_tf: true,
        }
    }

    /// Set the inclusive n-gram length range.
    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Self {
        self.ngram_range = (min_n.max(1), max_n.max(1));
        self
    }

    /// Set the minimum document frequency.
    pub fn with_min_df(mut self, min_df: usize) -> Self {
        self.min_df = min_df;
        self
    }

    /// Set the maximum document frequency as a fraction of the corpus.
    pub fn with_max_df(mut self, max_df: f32) -> Self {
        self.max_df = max_df.clamp(0.0, 1.0);
        self
    }

    /// Set the vocabulary size cap.
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    /// Enable or disable sublinear TF scaling.
    pub fn with_sublinear_tf(mut self, enable: bool) -> Self {
        self.sublinear_tf = enable;
        self
    }

    /// Learn the vocabulary and IDF weights from normalized documents.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<()> {
        if documents.is_empty() {
            return Err(Error::training("cannot fit vectorizer on an empty corpus"));
        }

        let n_docs = documents.len();
        let mut term_freq: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let tokens = tokenize(doc.as_ref());
            let mut doc_terms: HashSet<String> = HashSet::new();

            for term in self.ngrams(&tokens) {
                *term_freq.entry(term.clone()).or_insert(0) += 1;
                doc_terms.insert(term);
            }

            for term in doc_terms {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        // Prune by document frequency, then keep the most frequent terms.
        // Ties break lexicographically so fitting is deterministic.
        let max_df_count = (self.max_df * n_docs as f32).ceil() as usize;
        let mut sorted_terms: Vec<(String, usize)> = term_freq
            .into_iter()
            .filter(|(term, _)| {
                let df = doc_freq.get(term).copied().unwrap_or(0);
                df >= self.min_df && df <= max_df_count
            })
            .collect();
        sorted_terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        sorted_terms.truncate(self.max_features);

        self.vocabulary = sorted_terms
            .iter()
            .enumerate()
            .map(|(idx, (term, _))| (term.clone(), idx))
            .collect();

        self.idf = vec![0.0; self.vocabulary.len()];
        for (term, &idx) in &self.vocabulary {
            let df = doc_freq.get(term).copied().unwrap_or(0);
            self.idf[idx] = ((1.0 + n_docs as f32) / (1.0 + df as f32)).ln() + 1.0;
        }

        Ok(())
    }

    /// Transform one normalized text into a TF-IDF weighted, L2-normalized
    /// sparse vector over the fitted vocabulary.
    pub fn transform(&self, text: &str) -> Result<FeatureVector> {
        if self.vocabulary.is_empty() {
            return Err(Error::prediction("vectorizer has not been fitted"));
        }

        let tokens = tokenize(text);
        let mut counts: HashMap<usize, f32> = HashMap::new();
        for term in self.ngrams(&tokens) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f32)> = Vec::with_capacity(counts.len());
        for (idx, count) in counts {
            // a hand-edited or truncated persisted state surfaces here as
            // an error, not a panic
            let idf = self.idf.get(idx).copied().ok_or_else(|| {
                Error::prediction("vectorizer state is inconsistent: term index outside IDF table")
            })?;
            let tf = if self.sublinear_tf { 1.0 + count.ln() } else { count };
            entries.push((idx, tf * idf));
        }
        entries.sort_by_key(|&(idx, _)| idx);

        let norm = entries
            .iter()
            .map(|&(_, w)| w * w)
            .sum::<f32>()
            .sqrt();
        if norm > 0.0 {
            for (_, w) in &mut entries {
                *w /= norm;
            }
        }

        Ok(FeatureVector {
            dimension: self.vocabulary.len(),
            entries,
        })
    }

    /// Dimension of the fitted feature space
    pub fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    /// Whether `fit` has produced a vocabulary
    pub fn is_fitted(&self) -> bool {
        !self.vocabulary.is_empty()
    }

    fn ngrams(&self, tokens: &[String]) -> Vec<String> {
        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            for window in tokens.windows(n) {
                terms.push(window.join("_"));
            }
        }
        terms
    }
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Split normalized text into letter tokens, dropping single characters
/// and stop words.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_ascii_alphabetic())
        .filter(|token| token.len() >= 2 && !is_stop_word(token))
        .map(str::to_string)
        .collect()
}
