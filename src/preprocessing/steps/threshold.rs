use crate::error::GradeError;
use image::{DynamicImage, GrayImage, Luma};

/// Adaptive mean threshold parameters
const BLOCK_SIZE: u32 = 11;
const OFFSET: f32 = 2.0;

/// Apply inverted adaptive mean thresholding.
/// A local threshold per pixel neighborhood tolerates the uneven
/// illumination of flatbed scans where a single global threshold does not.
/// The output is inverted: ink becomes 255, paper becomes 0.
pub fn apply(image: DynamicImage) -> Result<DynamicImage, GradeError> {
    let gray = image.to_luma8();
    let binarized = adaptive_mean_threshold(&gray, BLOCK_SIZE, OFFSET);
    Ok(DynamicImage::ImageLuma8(binarized))
}

/// Adaptive mean thresholding
///
/// For each pixel, threshold = window mean - offset. Pixels at or below
/// the threshold are foreground in the inverted output.
fn adaptive_mean_threshold(img: &GrayImage, block_size: u32, offset: f32) -> GrayImage {
    let (width, height) = img.dimensions();
    let half_block = block_size as i32 / 2;

    // Integral image gives O(1) window means
    let integral = compute_integral_image(img);

    GrayImage::from_fn(width, height, |x, y| {
        let x1 = (x as i32 - half_block).max(0) as u32;
        let y1 = (y as i32 - half_block).max(0) as u32;
        let x2 = (x as i32 + half_block).min(width as i32 - 1) as u32;
        let y2 = (y as i32 + half_block).min(height as i32 - 1) as u32;

        let mean = window_mean(&integral, x1, y1, x2, y2);
        let threshold = mean - offset;

        let pixel = img.get_pixel(x, y).0[0] as f32;
        if pixel > threshold {
            Luma([0u8])
        } else {
            Luma([255u8])
        }
    })
}

/// Compute the summed-area table of the image
fn compute_integral_image(img: &GrayImage) -> Vec<Vec<f64>> {
    let (width, height) = img.dimensions();
    let mut integral = vec![vec![0.0f64; width as usize + 1]; height as usize + 1];

    for y in 0..height as usize {
        for x in 0..width as usize {
            let val = img.get_pixel(x as u32, y as u32).0[0] as f64;
            integral[y + 1][x + 1] =
                val + integral[y][x + 1] + integral[y + 1][x] - integral[y][x];
        }
    }

    integral
}

/// Mean of an inclusive pixel window using the summed-area table
fn window_mean(integral: &[Vec<f64>], x1: u32, y1: u32, x2: u32, y2: u32) -> f32 {
    let (x1, y1, x2, y2) = (x1 as usize, y1 as usize, x2 as usize + 1, y2 as usize + 1);
    let area = ((x2 - x1) * (y2 - y1)) as f64;

    let sum = integral[y2][x2] - integral[y1][x2] - integral[y2][x1] + integral[y1][x1];

    (sum / area) as f32
}
