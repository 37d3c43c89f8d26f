//! Okapi BM25 over an in-memory corpus.
//!
//! The index is built once per search call from plain document strings and never
//! updated afterwards. Scoring visits every document, so the ranked list always has
//! exactly one entry per document (zero scores included), ordered by score descending
//! with ties in ascending document order.
//!
//! IDF uses the Robertson-Spärck Jones form with a `+1` inside the logarithm, which
//! keeps it strictly positive even for a term present in every document:
//!
//! ```text
//! idf(t) = ln((N - df(t) + 0.5) / (df(t) + 0.5) + 1)
//! ```

use crate::ranking::{sort_descending, ScoredResult};
use crate::tokenizer::tokenize;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// BM25 parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bm25Params {
    /// Term-frequency saturation.
    pub k1: f64,
    /// Length normalization strength.
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75 }
    }
}

/// Term statistics and per-document term frequencies for one corpus.
#[derive(Debug, Clone)]
pub struct LexicalIndex {
    params: Bm25Params,
    term_freqs: Vec<HashMap<String, u32>>,
    doc_lengths: Vec<usize>,
    avgdl: f64,
    doc_freqs: HashMap<String, usize>,
    idf: HashMap<String, f64>,
}

impl Default for LexicalIndex {
    fn default() -> Self {
        Self::new(Bm25Params::default())
    }
}

impl LexicalIndex {
    /// Empty index; scores nothing until [`fit`](Self::fit) is called.
    pub fn new(params: Bm25Params) -> Self {
        Self {
            params,
            term_freqs: Vec::new(),
            doc_lengths: Vec::new(),
            avgdl: 0.0,
            doc_freqs: HashMap::new(),
            idf: HashMap::new(),
        }
    }

    pub fn build<S: AsRef<str>>(params: Bm25Params, documents: &[S]) -> Self {
        let mut index = Self::new(params);
        index.fit(documents);
        index
    }

    /// Replace the indexed corpus with `documents`.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) {
        self.term_freqs.clear();
        self.doc_lengths.clear();
        self.doc_freqs.clear();
        self.idf.clear();
        self.avgdl = 0.0;

        if documents.is_empty() {
            return;
        }

        for doc in documents {
            let tokens = tokenize(doc.as_ref());
            let mut freqs: HashMap<String, u32> = HashMap::new();
            for token in &tokens {
                *freqs.entry(token.clone()).or_insert(0) += 1;
            }
            let mut seen: HashSet<&str> = HashSet::new();
            for token in &tokens {
                if seen.insert(token.as_str()) {
                    *self.doc_freqs.entry(token.clone()).or_insert(0) += 1;
                }
            }
            self.doc_lengths.push(tokens.len());
            self.term_freqs.push(freqs);
        }

        let n = self.term_freqs.len() as f64;
        self.avgdl = self.doc_lengths.iter().sum::<usize>() as f64 / n;

        for (term, &df) in &self.doc_freqs {
            let df = df as f64;
            self.idf
                .insert(term.clone(), ((n - df + 0.5) / (df + 0.5) + 1.0).ln());
        }

        log::debug!(
            "BM25 index: {} docs, {} terms, avgdl {:.2}",
            self.term_freqs.len(),
            self.idf.len(),
            self.avgdl
        );
    }

    /// Score every document against `query`.
    ///
    /// Query terms unknown to the corpus contribute nothing; repeated query terms count
    /// once per occurrence.
    pub fn score(&self, query: &str) -> Vec<ScoredResult> {
        let query_terms = tokenize(query);
        let Bm25Params { k1, b } = self.params;

        let mut scores: Vec<ScoredResult> = self
            .term_freqs
            .iter()
            .zip(&self.doc_lengths)
            .enumerate()
            .map(|(idx, (freqs, &doc_len))| {
                let mut score = 0.0;
                for term in &query_terms {
                    let Some(&idf) = self.idf.get(term) else {
                        continue;
                    };
                    // tf = 0 contributes nothing and can zero the denominator.
                    let Some(&tf) = freqs.get(term) else {
                        continue;
                    };
                    let tf = f64::from(tf);
                    let numerator = tf * (k1 + 1.0);
                    let denominator = tf + k1 * (1.0 - b + b * doc_len as f64 / self.avgdl);
                    score += idf * numerator / denominator;
                }
                (idx, score)
            })
            .collect();

        sort_descending(&mut scores);
        scores
    }

    pub const fn params(&self) -> Bm25Params {
        self.params
    }

    pub fn num_docs(&self) -> usize {
        self.term_freqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.term_freqs.is_empty()
    }

    pub const fn avg_doc_len(&self) -> f64 {
        self.avgdl
    }

    /// Document length in terms; `None` for an index past the corpus.
    pub fn document_length(&self, doc: usize) -> Option<usize> {
        self.doc_lengths.get(doc).copied()
    }

    /// Number of documents containing `term` (0 when unseen).
    pub fn doc_frequency(&self, term: &str) -> usize {
        self.doc_freqs.get(term).copied().unwrap_or(0)
    }

    /// IDF of `term`; `None` for terms absent from the corpus.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    pub fn term_count(&self) -> usize {
        self.idf.len()
    }
}
