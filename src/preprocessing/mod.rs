//! Sheet preprocessing for answer segmentation
//!
//! Turns a scanned answer sheet into a binary ink mask suitable for
//! contour detection.

pub mod pipeline;
pub mod steps;

pub use pipeline::Preprocessor;
