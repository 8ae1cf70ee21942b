//! Semantic similarity scoring
//!
//! Wraps a sentence-embedding collaborator and reduces a pair of texts to
//! a single cosine-similarity scalar. No thresholding or pass/fail
//! decision happens here; that belongs to the caller.

pub mod minilm;

use crate::error::GradeError;
use std::sync::Arc;

/// Sentence-embedding collaborator.
///
/// Implementations map a text to a fixed-length vector such that
/// semantically similar texts have nearby vectors.
pub trait SentenceEncoder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, GradeError>;
}

/// Scores two texts by the cosine similarity of their embeddings.
pub struct SimilarityScorer {
    encoder: Arc<dyn SentenceEncoder>,
}

impl SimilarityScorer {
    pub fn new(encoder: Arc<dyn SentenceEncoder>) -> Self {
        Self { encoder }
    }

    /// Cosine similarity of the two embeddings, in [-1, 1].
    pub fn score(&self, text_a: &str, text_b: &str) -> Result<f32, GradeError> {
        let embedding_a = self.encoder.embed(text_a)?;
        let embedding_b = self.encoder.embed(text_b)?;
        Ok(cosine_similarity(&embedding_a, &embedding_b))
    }
}

/// Cosine of the angle between two vectors; 0.0 when either has no
/// magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
