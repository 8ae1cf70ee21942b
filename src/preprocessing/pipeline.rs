use crate::error::GradeError;
use image::{DynamicImage, GrayImage};
use std::time::Instant;

use super::steps;

/// Fixed preprocessing chain: grayscale, blur, adaptive threshold.
///
/// The output is an inverted binary mask with ink at 255 and paper at 0,
/// ready for contour detection.
#[derive(Debug, Default)]
pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Produce the binary ink mask for a source sheet.
    pub fn process(&self, image: DynamicImage) -> Result<GrayImage, GradeError> {
        let start = Instant::now();

        let mut img = image;
        img = run_step("grayscale", img, steps::grayscale::apply)?;
        img = run_step("blur", img, steps::blur::apply)?;
        img = run_step("threshold", img, steps::threshold::apply)?;

        tracing::debug!(
            "Preprocessing finished in {}ms",
            start.elapsed().as_millis()
        );

        Ok(img.into_luma8())
    }
}

fn run_step<F>(name: &str, img: DynamicImage, step_fn: F) -> Result<DynamicImage, GradeError>
where
    F: FnOnce(DynamicImage) -> Result<DynamicImage, GradeError>,
{
    let step_start = Instant::now();
    let result = step_fn(img)?;
    tracing::debug!("{} took {}ms", name, step_start.elapsed().as_millis());
    Ok(result)
}
