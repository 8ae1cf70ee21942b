use crate::error::GradeError;
use image::DynamicImage;

/// Convert the sheet to single-channel grayscale.
/// Scans arriving as RGB are collapsed here; already-gray input passes
/// through unchanged.
pub fn apply(image: DynamicImage) -> Result<DynamicImage, GradeError> {
    Ok(DynamicImage::ImageLuma8(image.into_luma8()))
}
