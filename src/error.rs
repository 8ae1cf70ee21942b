use thiserror::Error;

#[derive(Error, Debug)]
pub enum GradeError {
    #[error("Failed to initialize collaborator: {0}")]
    Initialization(String),

    #[error("Failed to read source sheet: {0}")]
    SourceRead(String),

    #[error("Preprocessing failed: {0}")]
    Preprocessing(String),

    #[error("Segmentation failed: {0}")]
    Segmentation(String),

    #[error("Handwriting recognition failed: {0}")]
    Recognition(String),

    #[error("Recognized text is empty or whitespace-only")]
    EmptyTranscript,

    #[error("Embedding failed: {0}")]
    Embedding(String),
}

impl GradeError {
    /// Whether the error is scoped to a single segmented answer rather than
    /// the whole run. The driver records these and moves on; anything else
    /// aborts the sheet.
    pub fn is_per_item(&self) -> bool {
        matches!(
            self,
            GradeError::EmptyTranscript | GradeError::Recognition(_)
        )
    }
}
