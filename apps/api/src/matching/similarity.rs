//! Similarity Scorer: TF-IDF cosine similarity between normalized texts.
//!
//! Weighting:
//! - tf(t, d) = raw count of t in d
//! - idf(t)   = ln((1 + n) / (1 + df(t))) + 1   (smoothed, n = corpus size)
//!
//! The IDF is fitted on the documents being compared and nothing else.
//! Vocabulary lives in a `BTreeMap`, so every sum runs in the same term order
//! and the score is bit-for-bit deterministic and symmetric.

use std::collections::{BTreeMap, HashSet};

use crate::matching::scoring::round_score;

/// Sparse TF-IDF vector keyed by vocabulary index.
pub type SparseVector = BTreeMap<usize, f64>;

/// A vocabulary and IDF table fitted over a small corpus of normalized texts.
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfIdfVectorizer {
    pub fn fit(documents: &[&str]) -> Self {
        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in documents {
            let seen: HashSet<&str> = doc.split_whitespace().collect();
            for term in seen {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let n = documents.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(doc_freq.len());
        for (idx, (term, df)) in doc_freq.into_iter().enumerate() {
            vocabulary.insert(term.to_string(), idx);
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
        }

        Self { vocabulary, idf }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Weighted vector for `document`. Terms outside the vocabulary are ignored.
    pub fn transform(&self, document: &str) -> SparseVector {
        let mut vector = SparseVector::new();
        for term in document.split_whitespace() {
            if let Some(&idx) = self.vocabulary.get(term) {
                *vector.entry(idx).or_insert(0.0) += 1.0;
            }
        }
        for (idx, weight) in vector.iter_mut() {
            *weight *= self.idf[*idx];
        }
        vector
    }
}

/// Cosine of the angle between two sparse vectors; 0.0 if either has zero norm.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let norm_a = norm(a);
    let norm_b = norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let dot: f64 = a
        .iter()
        .filter_map(|(idx, wa)| b.get(idx).map(|wb| wa * wb))
        .sum();

    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

fn norm(v: &SparseVector) -> f64 {
    v.values().map(|w| w * w).sum::<f64>().sqrt()
}

/// Similarity of two normalized texts scaled to an integer in [0, 100].
pub fn similarity_score(resume_normalized: &str, job_normalized: &str) -> u32 {
    let vectorizer = TfIdfVectorizer::fit(&[resume_normalized, job_normalized]);
    let resume_vec = vectorizer.transform(resume_normalized);
    let job_vec = vectorizer.transform(job_normalized);
    let sim = cosine_similarity(&resume_vec, &job_vec);
    round_score(sim * 100.0)
}
