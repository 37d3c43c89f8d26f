//! # UX Guide Vector Store
//!
//! Semantic side of the style-guide search: text embeddings and cosine ranking.
//!
//! ## Architecture
//!
//! ```text
//! documents[]
//!     │
//!     ├──> SemanticProvider (trait)
//!     │      ├─> EmbeddingModel: ONNX Runtime (mean-pooled, L2-normalized)
//!     │      ├─> EmbeddingModel: stub (hashed bag-of-words, deterministic)
//!     │      └─> UnavailableProvider (sentinel, is_available() == false)
//!     │
//!     └──> SemanticIndex
//!            └─> cosine similarity, positive-only, top-k
//! ```
//!
//! The backend is chosen once with [`detect_provider`]; a backend that cannot be
//! loaded becomes an [`UnavailableProvider`] instead of an error, so callers can
//! fall back to lexical ranking.
//!
//! ## Example
//!
//! ```no_run
//! use uxguide_vector_store::{detect_provider, ProviderSettings, SemanticIndex};
//!
//! fn main() -> uxguide_vector_store::Result<()> {
//!     let provider = detect_provider(&ProviderSettings::from_env()?);
//!     if provider.is_available() {
//!         let docs = vec!["glassmorphism frosted blur".to_string()];
//!         let index = SemanticIndex::fit(provider.as_ref(), &docs)?;
//!         for (idx, score) in index.search("frosted glass", 3)? {
//!             println!("{idx}: {score:.3}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```

mod embeddings;
mod error;
mod onnx;
mod provider;
mod semantic_index;

pub use embeddings::{
    cosine_similarity, model_dir, EmbeddingMode, EmbeddingModel, ModelSpec, DEFAULT_MODEL_ID,
};
pub use error::{Result, VectorStoreError};
pub use provider::{detect_provider, ProviderSettings, SemanticProvider, UnavailableProvider};
pub use semantic_index::SemanticIndex;
