//! Automated grading of scanned handwritten answer sheets.
//!
//! One scanned sheet flows through a fixed sequence: preprocessing turns
//! the scan into a binary ink mask, segmentation crops each answer region
//! to its own image file, a handwriting recognizer transcribes each crop,
//! the transcript is normalized and spell-corrected, and the result is
//! scored against a reference answer by embedding cosine similarity.
//!
//! Recognition, spelling correction and sentence embedding are pretrained
//! collaborators behind traits; everything is single-threaded and
//! sequential.

pub mod cleaner;
pub mod config;
pub mod error;
pub mod fetch;
pub mod grader;
pub mod preprocessing;
pub mod recognizer;
pub mod recognizers;
pub mod scoring;
pub mod segmentation;
pub mod spell;

pub use config::Config;
pub use error::GradeError;
pub use grader::{Grader, SheetReport};
