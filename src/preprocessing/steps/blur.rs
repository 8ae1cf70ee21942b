use crate::error::GradeError;
use image::DynamicImage;
use imageproc::filter::gaussian_blur_f32;

/// Sigma matching a 5x5 Gaussian kernel
const SIGMA: f32 = 1.1;

/// Suppress high-frequency scan noise before thresholding.
pub fn apply(image: DynamicImage) -> Result<DynamicImage, GradeError> {
    let gray = image.to_luma8();
    let blurred = gaussian_blur_f32(&gray, SIGMA);
    Ok(DynamicImage::ImageLuma8(blurred))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn test_blur_preserves_dimensions() {
        let img = GrayImage::new(64, 48);
        let result = apply(DynamicImage::ImageLuma8(img)).unwrap();
        assert_eq!(result.width(), 64);
        assert_eq!(result.height(), 48);
    }

    #[test]
    fn test_blur_attenuates_isolated_speck() {
        let mut img = GrayImage::from_pixel(21, 21, Luma([200]));
        img.put_pixel(10, 10, Luma([0]));

        let result = apply(DynamicImage::ImageLuma8(img)).unwrap();
        let blurred = result.to_luma8();

        // The speck is spread into its neighborhood: its center brightens,
        // its neighbors darken.
        assert!(blurred.get_pixel(10, 10).0[0] > 0);
        assert!(blurred.get_pixel(11, 10).0[0] < 200);
    }

    #[test]
    fn test_blur_keeps_uniform_image_uniform() {
        let img = GrayImage::from_pixel(30, 30, Luma([180]));
        let result = apply(DynamicImage::ImageLuma8(img)).unwrap();
        let blurred = result.to_luma8();

        let center = blurred.get_pixel(15, 15).0[0];
        assert!((179..=181).contains(&center));
    }
}
