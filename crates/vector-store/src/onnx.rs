//! ONNX Runtime sentence encoder: tokenizes a batch, runs the model on the CPU
//! execution provider and mean-pools the last hidden state under the attention mask.

use crate::embeddings::{l2_normalize, ModelSpec};
use crate::error::{Result, VectorStoreError};
use ndarray::{Array2, ArrayD, ArrayView1, ArrayView2, Axis, Ix2, Ix3};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::{builder::GraphOptimizationLevel, Session, SessionInputs};
use ort::value::{DynTensor, Tensor};
use std::collections::HashMap;
use std::fmt::Display;
use std::path::Path;
use std::sync::Mutex;
use tokenizers::{Encoding, PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};

pub(crate) const MODEL_FILE_NAME: &str = "model.onnx";
pub(crate) const TOKENIZER_FILE_NAME: &str = "tokenizer.json";

pub(crate) struct OnnxEncoder {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    spec: ModelSpec,
}

/// Token ids, attention mask and segment ids for one padded batch.
struct BatchInputs {
    ids: Array2<i64>,
    mask: Array2<i64>,
    type_ids: Array2<i64>,
}

fn ort_err<E: Display>(stage: &'static str) -> impl Fn(E) -> VectorStoreError {
    move |err| VectorStoreError::EmbeddingError(format!("{stage}: {err}"))
}

impl OnnxEncoder {
    /// Load `model.onnx` and `tokenizer.json` from `dir`.
    pub(crate) fn load(label: &str, dir: &Path, spec: ModelSpec) -> Result<Self> {
        let model_path = dir.join(MODEL_FILE_NAME);
        let tokenizer_path = dir.join(TOKENIZER_FILE_NAME);
        if !model_path.is_file() || !tokenizer_path.is_file() {
            return Err(VectorStoreError::EmbeddingError(format!(
                "Model files for '{label}' are missing: need {} and {} (set UXGUIDE_MODEL_DIR to relocate)",
                model_path.display(),
                tokenizer_path.display(),
            )));
        }

        let tokenizer = load_tokenizer(&tokenizer_path, spec.max_length)?;
        let session = build_session(&model_path)?;
        log::info!(
            "Loaded ONNX model '{label}' (dim {}, max_length {}, batch {})",
            spec.dimension,
            spec.max_length,
            spec.max_batch
        );

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            spec,
        })
    }

    pub(crate) fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.spec.max_batch.max(1)) {
            let encodings = self
                .tokenizer
                .encode_batch(chunk.to_vec(), true)
                .map_err(ort_err("Tokenization failed"))?;
            if encodings.is_empty() {
                continue;
            }
            let batch = batch_inputs(&encodings, self.spec.max_length)?;
            let hidden = self.run(&batch)?;
            vectors.extend(pool(hidden, &batch.mask, self.spec.dimension)?);
        }
        Ok(vectors)
    }

    fn run(&self, batch: &BatchInputs) -> Result<ArrayD<f32>> {
        let mut session = self
            .session
            .lock()
            .map_err(|_| VectorStoreError::EmbeddingError("ONNX session lock poisoned".into()))?;

        // Feed only the inputs this graph declares; some exports drop token_type_ids.
        let mut feed: HashMap<String, DynTensor> = HashMap::new();
        for input in &session.inputs {
            let source = match input.name.as_str() {
                "input_ids" => &batch.ids,
                "attention_mask" => &batch.mask,
                "token_type_ids" => &batch.type_ids,
                other => {
                    return Err(VectorStoreError::EmbeddingError(format!(
                        "Unsupported ONNX input '{other}'"
                    )))
                }
            };
            let tensor = Tensor::from_array(source.clone().into_dyn())
                .map_err(ort_err("Tensor build failed"))?;
            feed.insert(input.name.clone(), tensor.upcast());
        }

        let outputs = session
            .run(SessionInputs::from(feed))
            .map_err(ort_err("ONNX forward failed"))?;
        if outputs.len() == 0 {
            return Err(VectorStoreError::EmbeddingError(
                "ONNX returned no outputs".to_string(),
            ));
        }
        let hidden = outputs[0]
            .try_extract_array::<f32>()
            .map_err(ort_err("Failed to decode ONNX output"))?
            .to_owned();
        Ok(hidden)
    }
}

fn load_tokenizer(path: &Path, max_length: usize) -> Result<Tokenizer> {
    if !tokenizers::utils::parallelism::is_parallelism_configured() {
        tokenizers::utils::parallelism::set_parallelism(false);
    }
    let mut tokenizer = Tokenizer::from_file(path).map_err(ort_err("Tokenizer load failed"))?;
    tokenizer.with_padding(Some(PaddingParams {
        strategy: PaddingStrategy::BatchLongest,
        ..PaddingParams::default()
    }));
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length,
            ..TruncationParams::default()
        }))
        .map_err(ort_err("Tokenizer truncation failed"))?;
    Ok(tokenizer)
}

fn build_session(model_path: &Path) -> Result<Session> {
    Session::builder()
        .map_err(ort_err("ORT session builder"))?
        .with_intra_threads(intra_threads())
        .map_err(ort_err("Failed to set ORT intra threads"))?
        .with_intra_op_spinning(false)
        .map_err(ort_err("Failed to disable ORT spinning"))?
        .with_execution_providers(vec![CPUExecutionProvider::default().build()])
        .map_err(ort_err("Failed to register CPU execution provider"))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(ort_err("Failed to set optimization level"))?
        .commit_from_file(model_path)
        .map_err(ort_err("Failed to load ONNX model"))
}

fn intra_threads() -> usize {
    match std::thread::available_parallelism().map_or(1, |n| n.get()) {
        0..=4 => 1,
        5..=12 => 2,
        _ => 4,
    }
}

fn batch_inputs(encodings: &[Encoding], max_length: usize) -> Result<BatchInputs> {
    let seq_len = encodings[0].len();
    if seq_len > max_length {
        return Err(VectorStoreError::EmbeddingError(format!(
            "Tokenized length {seq_len} exceeds max_length {max_length}"
        )));
    }
    if encodings.iter().any(|encoding| encoding.len() != seq_len) {
        return Err(VectorStoreError::EmbeddingError(
            "Inconsistent sequence lengths after padding".to_string(),
        ));
    }

    let shape = (encodings.len(), seq_len);
    let column = |values: &[u32], col: usize| i64::from(values.get(col).copied().unwrap_or(0));
    Ok(BatchInputs {
        ids: Array2::from_shape_fn(shape, |(row, col)| column(encodings[row].get_ids(), col)),
        mask: Array2::from_shape_fn(shape, |(row, col)| {
            column(encodings[row].get_attention_mask(), col)
        }),
        type_ids: Array2::from_shape_fn(shape, |(row, col)| {
            column(encodings[row].get_type_ids(), col)
        }),
    })
}

/// Turn model output into unit vectors: `[batch, dim]` outputs are already pooled,
/// `[batch, tokens, dim]` outputs are mean-pooled over unmasked tokens.
fn pool(output: ArrayD<f32>, mask: &Array2<i64>, dimension: usize) -> Result<Vec<Vec<f32>>> {
    let shape_error = ort_err("Bad ONNX output shape");
    let mut vectors: Vec<Vec<f32>> = match output.ndim() {
        2 => output
            .into_dimensionality::<Ix2>()
            .map_err(shape_error)?
            .outer_iter()
            .map(|row| row.to_vec())
            .collect(),
        3 => output
            .into_dimensionality::<Ix3>()
            .map_err(shape_error)?
            .outer_iter()
            .zip(mask.outer_iter())
            .map(|(tokens, row_mask)| mean_pool(tokens, row_mask))
            .collect(),
        _ => {
            return Err(VectorStoreError::EmbeddingError(format!(
                "Unexpected ONNX output dims: {:?}",
                output.shape()
            )))
        }
    };

    for vector in &mut vectors {
        if vector.len() != dimension {
            return Err(VectorStoreError::InvalidDimension {
                expected: dimension,
                actual: vector.len(),
            });
        }
        l2_normalize(vector);
    }
    Ok(vectors)
}

fn mean_pool(tokens: ArrayView2<'_, f32>, mask: ArrayView1<'_, i64>) -> Vec<f32> {
    let mut sum = vec![0.0f32; tokens.len_of(Axis(1))];
    let mut count = 0usize;
    for (token, _) in tokens
        .outer_iter()
        .zip(mask.iter())
        .filter(|(_, keep)| **keep != 0)
    {
        count += 1;
        for (acc, value) in sum.iter_mut().zip(token.iter()) {
            *acc += value;
        }
    }
    if count > 0 {
        let count = count as f32;
        sum.iter_mut().for_each(|value| *value /= count);
    }
    sum
}
