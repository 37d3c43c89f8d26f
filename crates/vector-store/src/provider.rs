use crate::embeddings::{model_dir, EmbeddingMode, EmbeddingModel, DEFAULT_MODEL_ID};
use crate::error::{Result, VectorStoreError};
use std::path::PathBuf;
use std::sync::Arc;

/// Capability that turns text into fixed-dimension vectors for semantic ranking.
///
/// Implementations must be deterministic for identical input. Similarity between the
/// vectors is always measured with cosine similarity by the caller.
pub trait SemanticProvider: Send + Sync {
    /// Whether the backend was loaded and can serve `embed` calls.
    fn is_available(&self) -> bool;

    /// Short identifier for logs (`"onnx"`, `"stub"`, `"unavailable"`).
    fn name(&self) -> &str;

    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;
}

impl SemanticProvider for EmbeddingModel {
    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        if self.is_stub() {
            "stub"
        } else {
            "onnx"
        }
    }

    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.embed_batch(texts)
    }
}

/// Sentinel used when no embedding backend could be loaded.
#[derive(Debug, Clone)]
pub struct UnavailableProvider {
    reason: String,
}

impl UnavailableProvider {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl SemanticProvider for UnavailableProvider {
    fn is_available(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "unavailable"
    }

    fn embed(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Err(VectorStoreError::Unavailable(self.reason.clone()))
    }
}

/// Where and how to look for an embedding backend.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub mode: EmbeddingMode,
    pub model_id: String,
    pub model_dir: PathBuf,
}

impl ProviderSettings {
    /// Settings from `UXGUIDE_EMBEDDING_MODE`, `UXGUIDE_EMBEDDING_MODEL` and `UXGUIDE_MODEL_DIR`.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_mode(None)
    }

    /// Like [`Self::from_env`], but an explicit `mode` wins and the mode variable is
    /// then not read at all.
    pub fn from_env_with_mode(mode: Option<EmbeddingMode>) -> Result<Self> {
        let mode = match mode {
            Some(mode) => mode,
            None => EmbeddingMode::from_env()?,
        };
        Ok(Self {
            mode,
            model_id: std::env::var("UXGUIDE_EMBEDDING_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL_ID.to_string()),
            model_dir: model_dir(),
        })
    }
}

/// Load the configured backend once; any failure yields the unavailable sentinel.
pub fn detect_provider(settings: &ProviderSettings) -> Arc<dyn SemanticProvider> {
    match EmbeddingModel::with_mode(settings.mode, &settings.model_id, &settings.model_dir) {
        Ok(model) => {
            log::debug!(
                "Semantic provider '{}' ready (dim {})",
                model.name(),
                model.dimension()
            );
            Arc::new(model)
        }
        Err(err) => {
            log::info!("Semantic search unavailable, lexical ranking only: {err}");
            Arc::new(UnavailableProvider::new(err.to_string()))
        }
    }
}
