use crate::error::GradeError;
use std::path::Path;

/// Trait all handwriting recognizers implement.
///
/// Implementations are black boxes: any returned string, including the
/// empty string, is a valid transcript. Callers must not assume
/// determinism, casing, or punctuation conventions in the output.
pub trait HandwritingRecognizer: Send + Sync {
    /// Returns the recognizer identifier (e.g., "ocrs")
    fn name(&self) -> &'static str;

    /// Transcribe the handwriting in an image file.
    fn recognize(&self, path: &Path) -> Result<String, GradeError>;
}
