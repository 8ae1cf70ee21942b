//! Handwriting recognizer implementations
//!
//! Implementations of the HandwritingRecognizer trait, conditionally
//! compiled based on feature flags.

#[cfg(feature = "recognizer-ocrs")]
pub mod ocrs;
