//! MiniLM sentence encoder
//!
//! Runs the paraphrase-MiniLM-L6-v2 sentence-embedding model with tract,
//! downloading the ONNX graph and tokenizer automatically on first use.

use super::SentenceEncoder;
use crate::error::GradeError;
use crate::fetch::ensure_cached;
use tokenizers::Tokenizer;
use tract_onnx::prelude::*;

const MODEL_URL: &str =
    "https://huggingface.co/sentence-transformers/paraphrase-MiniLM-L6-v2/resolve/main/onnx/model.onnx";
const TOKENIZER_URL: &str =
    "https://huggingface.co/sentence-transformers/paraphrase-MiniLM-L6-v2/resolve/main/tokenizer.json";

/// Token window the graph is compiled for; longer inputs are truncated
const MAX_SEQ_LEN: usize = 128;

type OnnxPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Sentence encoder wrapping the MiniLM transformer
pub struct MiniLmEncoder {
    model: OnnxPlan,
    tokenizer: Tokenizer,
}

impl MiniLmEncoder {
    /// Create a new encoder, downloading model and tokenizer if needed
    pub fn new() -> Result<Self, GradeError> {
        tracing::info!("Initializing MiniLM sentence encoder...");

        let model_path = ensure_cached(MODEL_URL, "paraphrase-minilm-l6-v2.onnx")?;
        let tokenizer_path =
            ensure_cached(TOKENIZER_URL, "paraphrase-minilm-l6-v2.tokenizer.json")?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| GradeError::Initialization(format!("Failed to load tokenizer: {}", e)))?;

        let mut model = tract_onnx::onnx()
            .model_for_path(&model_path)
            .map_err(|e| GradeError::Initialization(format!("Failed to load model: {}", e)))?;

        // Pin the dynamic batch/sequence dimensions so the graph can be
        // optimized once. Inputs: input_ids, attention_mask, token_type_ids.
        for input in 0..3 {
            model
                .set_input_fact(
                    input,
                    InferenceFact::dt_shape(i64::datum_type(), &[1, MAX_SEQ_LEN][..]),
                )
                .map_err(|e| {
                    GradeError::Initialization(format!("Failed to set input shape: {}", e))
                })?;
        }

        let model = model
            .into_typed()
            .map_err(|e| GradeError::Initialization(format!("Failed to type model: {}", e)))?
            .into_optimized()
            .map_err(|e| GradeError::Initialization(format!("Failed to optimize model: {}", e)))?
            .into_runnable()
            .map_err(|e| GradeError::Initialization(e.to_string()))?;

        tracing::info!("MiniLM encoder initialized successfully");

        Ok(Self { model, tokenizer })
    }

    fn input_tensor(values: &[i64]) -> Result<TValue, GradeError> {
        let array = tract_ndarray::Array2::from_shape_vec((1, MAX_SEQ_LEN), values.to_vec())
            .map_err(|e| GradeError::Embedding(e.to_string()))?;
        Ok(array.into_tvalue())
    }
}

impl SentenceEncoder for MiniLmEncoder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, GradeError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| GradeError::Embedding(format!("Tokenization failed: {}", e)))?;

        // Pad (or truncate) to the fixed window the graph was compiled for
        let mut ids = vec![0i64; MAX_SEQ_LEN];
        let mut mask = vec![0i64; MAX_SEQ_LEN];
        let mut type_ids = vec![0i64; MAX_SEQ_LEN];

        for (i, (&id, &m)) in encoding
            .get_ids()
            .iter()
            .zip(encoding.get_attention_mask())
            .take(MAX_SEQ_LEN)
            .enumerate()
        {
            ids[i] = id as i64;
            mask[i] = m as i64;
        }
        for (i, &t) in encoding.get_type_ids().iter().take(MAX_SEQ_LEN).enumerate() {
            type_ids[i] = t as i64;
        }

        let outputs = self
            .model
            .run(tvec!(
                Self::input_tensor(&ids)?,
                Self::input_tensor(&mask)?,
                Self::input_tensor(&type_ids)?,
            ))
            .map_err(|e| GradeError::Embedding(format!("Inference failed: {}", e)))?;

        let hidden = outputs[0]
            .to_array_view::<f32>()
            .map_err(|e| GradeError::Embedding(e.to_string()))?;

        mean_pool(hidden, &mask)
    }
}

/// Mean-pool token states over the attention mask, the pooling the
/// sentence-transformers release of this model applies to its transformer
/// output.
fn mean_pool(
    hidden: tract_ndarray::ArrayViewD<f32>,
    mask: &[i64],
) -> Result<Vec<f32>, GradeError> {
    let hidden = hidden
        .into_dimensionality::<tract_ndarray::Ix3>()
        .map_err(|e| GradeError::Embedding(format!("Unexpected output shape: {}", e)))?;

    let (seq_len, dim) = (hidden.shape()[1], hidden.shape()[2]);
    let mut pooled = vec![0f32; dim];
    let mut count = 0f32;

    for s in 0..seq_len {
        if mask.get(s).copied().unwrap_or(0) == 0 {
            continue;
        }
        count += 1.0;
        for (d, value) in pooled.iter_mut().enumerate() {
            *value += hidden[[0, s, d]];
        }
    }

    if count > 0.0 {
        for value in &mut pooled {
            *value /= count;
        }
    }

    Ok(pooled)
}
