use crate::embeddings::cosine_similarity;
use crate::error::{Result, VectorStoreError};
use crate::provider::SemanticProvider;

/// Brute-force cosine index over one corpus.
///
/// Built fresh for every search call; the provider is consulted once for the corpus and
/// once per query.
pub struct SemanticIndex<'a> {
    provider: &'a dyn SemanticProvider,
    vectors: Vec<Vec<f32>>,
}

impl<'a> SemanticIndex<'a> {
    /// Embed every document. An empty corpus never touches the provider.
    pub fn fit(provider: &'a dyn SemanticProvider, documents: &[String]) -> Result<Self> {
        if documents.is_empty() {
            return Ok(Self {
                provider,
                vectors: Vec::new(),
            });
        }

        let texts: Vec<&str> = documents.iter().map(String::as_str).collect();
        let vectors = provider.embed(&texts)?;
        if vectors.len() != documents.len() {
            return Err(VectorStoreError::CountMismatch {
                sent: documents.len(),
                received: vectors.len(),
            });
        }
        log::debug!(
            "Embedded {} documents with '{}'",
            vectors.len(),
            provider.name()
        );

        Ok(Self { provider, vectors })
    }

    /// Documents ranked by cosine similarity to `query`, descending.
    ///
    /// Only strictly positive similarities are returned; equal scores keep ascending
    /// document order. At most `top_k` entries.
    pub fn search(&self, query: &str, top_k: usize) -> Result<Vec<(usize, f64)>> {
        if self.vectors.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self
            .provider
            .embed(&[query])?
            .pop()
            .ok_or_else(|| VectorStoreError::EmbeddingError("Empty query embedding".into()))?;

        let mut scores: Vec<(usize, f64)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(idx, vector)| {
                (
                    idx,
                    f64::from(cosine_similarity(&query_vector, vector)),
                )
            })
            .collect();

        // Stable sort keeps corpus order among equal similarities.
        scores.sort_by(|a, b| b.1.total_cmp(&a.1));
        scores.truncate(top_k);
        scores.retain(|(_, score)| *score > 0.0);

        Ok(scores)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}
