use crate::error::{Result, VectorStoreError};
use crate::onnx::OnnxEncoder;
use serde::Deserialize;
use std::env;
use std::fmt::Display;
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL_ID: &str = "all-minilm-l6-v2";
const SPEC_FILE_NAME: &str = "uxguide-model.json";
const STUB_DIMENSION: usize = 384;

/// Which embedding backend the process should use.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EmbeddingMode {
    /// ONNX Runtime model loaded from the model directory.
    Fast,
    /// Deterministic hashed bag-of-words vectors; no model files needed.
    Stub,
    /// Semantic search disabled.
    Off,
}

impl EmbeddingMode {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "stub" => Ok(Self::Stub),
            "off" | "none" | "disabled" => Ok(Self::Off),
            other => Err(VectorStoreError::EmbeddingError(format!(
                "Unsupported UXGUIDE_EMBEDDING_MODE '{other}' (expected 'fast', 'stub' or 'off')"
            ))),
        }
    }

    pub fn from_env() -> Result<Self> {
        let raw = env::var("UXGUIDE_EMBEDDING_MODE").unwrap_or_else(|_| "fast".to_string());
        Self::parse(&raw)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Stub => "stub",
            Self::Off => "off",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ModelId(String);

impl Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl ModelId {
    fn from_raw(model_name: &str) -> Self {
        let model_name = model_name.trim().to_ascii_lowercase();
        let normalized = match model_name.as_str() {
            "sentence-transformers/all-minilm-l6-v2" | "minilm" => DEFAULT_MODEL_ID.to_string(),
            "bge-small-en-v1.5" => "bge-small".to_string(),
            other => other.to_string(),
        };
        Self(normalized)
    }
}

/// Shape parameters of an embedding model.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ModelSpec {
    pub dimension: usize,
    pub max_length: usize,
    pub max_batch: usize,
}

impl ModelSpec {
    /// Built-in spec for a known model, or the `uxguide-model.json` next to the model files.
    fn resolve(id: &ModelId, model_root: &Path) -> Result<Self> {
        let spec_path = model_root.join(id.to_string()).join(SPEC_FILE_NAME);
        if spec_path.exists() {
            let raw = std::fs::read_to_string(&spec_path)?;
            let spec: Self = serde_json::from_str(&raw)?;
            if spec.dimension == 0 || spec.max_length == 0 || spec.max_batch == 0 {
                return Err(VectorStoreError::EmbeddingError(format!(
                    "Model spec {} must have non-zero dimension, max_length and max_batch",
                    spec_path.display()
                )));
            }
            return Ok(spec);
        }

        match id.0.as_str() {
            DEFAULT_MODEL_ID => Ok(Self {
                dimension: 384,
                max_length: 256,
                max_batch: 32,
            }),
            "bge-small" => Ok(Self {
                dimension: 384,
                max_length: 512,
                max_batch: 32,
            }),
            other => Err(VectorStoreError::EmbeddingError(format!(
                "Unknown embedding model '{other}' and no {SPEC_FILE_NAME} at {}",
                spec_path.display()
            ))),
        }
    }
}

pub fn model_dir() -> PathBuf {
    env::var("UXGUIDE_MODEL_DIR").map_or_else(|_| PathBuf::from("models"), PathBuf::from)
}

pub(crate) fn l2_normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return;
    }
    for value in vec {
        *value /= norm;
    }
}

/// Hashed bag-of-words embedding: every lowercase alphanumeric word adds weight to one
/// bucket, so texts sharing words have positive cosine similarity and texts sharing no
/// bucket have similarity exactly zero.
fn stub_embed(text: &str, dimension: usize) -> Vec<f32> {
    let mut vec = vec![0.0f32; dimension];
    let lowered = text.to_lowercase();
    for word in lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let mut state = fnv1a_64(word.as_bytes());
        let bucket = (splitmix64(&mut state) % dimension as u64) as usize;
        vec[bucket] += 1.0;
    }
    l2_normalize(&mut vec);
    vec
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

const fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Sentence embedding model backing semantic search.
pub struct EmbeddingModel {
    backend: EmbeddingBackend,
    dimension: usize,
}

enum EmbeddingBackend {
    Onnx(Box<OnnxEncoder>),
    Stub,
}

impl EmbeddingModel {
    pub fn with_mode(mode: EmbeddingMode, model_id: &str, model_root: &Path) -> Result<Self> {
        match mode {
            EmbeddingMode::Off => Err(VectorStoreError::Unavailable(
                "embedding mode is 'off'".to_string(),
            )),
            EmbeddingMode::Stub => Ok(Self::stub()),
            EmbeddingMode::Fast => {
                let id = ModelId::from_raw(model_id);
                let spec = ModelSpec::resolve(&id, model_root)?;
                let dimension = spec.dimension;
                let encoder = OnnxEncoder::load(&id.0, &model_root.join(&id.0), spec)?;
                Ok(Self {
                    dimension,
                    backend: EmbeddingBackend::Onnx(Box::new(encoder)),
                })
            }
        }
    }

    #[must_use]
    pub const fn stub() -> Self {
        Self {
            backend: EmbeddingBackend::Stub,
            dimension: STUB_DIMENSION,
        }
    }

    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub const fn is_stub(&self) -> bool {
        matches!(self.backend, EmbeddingBackend::Stub)
    }

    pub fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let embeddings = match &self.backend {
            EmbeddingBackend::Stub => texts
                .iter()
                .map(|text| stub_embed(text, self.dimension))
                .collect(),
            EmbeddingBackend::Onnx(encoder) => encoder.encode(texts)?,
        };

        if embeddings.len() != texts.len() {
            return Err(VectorStoreError::CountMismatch {
                sent: texts.len(),
                received: embeddings.len(),
            });
        }
        Ok(embeddings)
    }
}

#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
