//! ocrs recognizer implementation
//!
//! Pure Rust recognition using the ocrs library. No system dependencies
//! required. Downloads neural network models automatically on first use.

use crate::error::GradeError;
use crate::fetch::ensure_cached;
use crate::recognizer::HandwritingRecognizer;
use ocrs::{DecodeMethod, ImageSource, OcrEngine, OcrEngineParams};
use rten::Model;
use std::path::Path;

/// Default model URLs from the ocrs project
const DETECTION_MODEL_URL: &str =
    "https://ocrs-models.s3-accelerate.amazonaws.com/text-detection.rten";
const RECOGNITION_MODEL_URL: &str =
    "https://ocrs-models.s3-accelerate.amazonaws.com/text-recognition.rten";

/// Handwriting recognizer wrapping the ocrs library
pub struct OcrsRecognizer {
    engine: OcrEngine,
}

impl OcrsRecognizer {
    /// Create a new recognizer, downloading models if needed
    pub fn new() -> Result<Self, GradeError> {
        tracing::info!("Initializing ocrs recognizer...");

        let detection_model_path =
            ensure_cached(DETECTION_MODEL_URL, "text-detection.rten")?;
        let recognition_model_path =
            ensure_cached(RECOGNITION_MODEL_URL, "text-recognition.rten")?;

        let detection_model = Model::load_file(&detection_model_path).map_err(|e| {
            GradeError::Initialization(format!("Failed to load detection model: {}", e))
        })?;
        let recognition_model = Model::load_file(&recognition_model_path).map_err(|e| {
            GradeError::Initialization(format!("Failed to load recognition model: {}", e))
        })?;

        let engine = OcrEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            decode_method: DecodeMethod::Greedy,
            ..Default::default()
        })
        .map_err(|e| {
            GradeError::Initialization(format!("Failed to create ocrs engine: {}", e))
        })?;

        tracing::info!("ocrs recognizer initialized successfully");

        Ok(Self { engine })
    }
}

impl HandwritingRecognizer for OcrsRecognizer {
    fn name(&self) -> &'static str {
        "ocrs"
    }

    fn recognize(&self, path: &Path) -> Result<String, GradeError> {
        let img = image::open(path)
            .map_err(|e| GradeError::Recognition(format!("Failed to load image: {}", e)))?;

        // ocrs expects RGB8 bytes in HWC layout
        let rgb_img = img.into_rgb8();
        let dimensions = rgb_img.dimensions();

        let img_source = ImageSource::from_bytes(rgb_img.as_raw(), dimensions).map_err(|e| {
            GradeError::Recognition(format!("Failed to create image source: {}", e))
        })?;

        let ocr_input = self
            .engine
            .prepare_input(img_source)
            .map_err(|e| GradeError::Recognition(format!("Failed to prepare input: {}", e)))?;

        let word_rects = self
            .engine
            .detect_words(&ocr_input)
            .map_err(|e| GradeError::Recognition(format!("Failed to detect words: {}", e)))?;

        let line_rects = self.engine.find_text_lines(&ocr_input, &word_rects);

        let line_texts = self
            .engine
            .recognize_text(&ocr_input, &line_rects)
            .map_err(|e| GradeError::Recognition(format!("Failed to recognize text: {}", e)))?;

        let text: String = line_texts
            .iter()
            .filter_map(|line| line.as_ref())
            .map(|line| {
                line.words()
                    .map(|word| word.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n");

        Ok(text)
    }
}
