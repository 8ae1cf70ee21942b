//! Answer-region discovery on the binary ink mask.

use crate::error::GradeError;
use image::GrayImage;
use imageproc::contours::{find_contours, BorderType, Contour};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Axis-aligned bounding box of a connected ink region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// One cropped answer image written to disk.
#[derive(Debug, Clone)]
pub struct SegmentedAnswer {
    /// Enumeration index of the source contour; also the filename suffix.
    pub index: usize,
    pub region: Region,
    pub path: PathBuf,
}

/// Finds outer ink regions in the mask and persists each qualifying one
/// as a standalone crop.
pub struct AnswerSegmenter {
    min_width: u32,
    min_height: u32,
}

impl AnswerSegmenter {
    pub fn new(min_width: u32, min_height: u32) -> Self {
        Self {
            min_width,
            min_height,
        }
    }

    /// Crop every sufficiently large outer ink region of `mask` into
    /// `out_dir` as `{base_name}_ans{index}.png`.
    ///
    /// Only outer contours are considered; holes inside an ink blob are
    /// not answers. The index counts all outer contours, so regions
    /// rejected by the size filter leave gaps in the numbering. Discovery
    /// order follows the contour tracer, not reading order. Existing files
    /// with colliding names are overwritten.
    ///
    /// The size filter (strictly wider than `min_width`, strictly taller
    /// than `min_height`) rejects punctuation marks and stray specks. It
    /// does not reject underlines or margin rulings, and touching lines of
    /// handwriting can merge into one region.
    pub fn segment(
        &self,
        mask: &GrayImage,
        out_dir: &Path,
        base_name: &str,
    ) -> Result<Vec<SegmentedAnswer>, GradeError> {
        let contours: Vec<Contour<i32>> = find_contours(mask);

        let mut segments = Vec::new();
        for (index, contour) in contours
            .iter()
            .filter(|c| c.border_type == BorderType::Outer)
            .enumerate()
        {
            let region = match bounding_box(contour) {
                Some(region) => region,
                None => continue,
            };

            if region.height <= self.min_height || region.width <= self.min_width {
                tracing::trace!("Rejected region {:?} at index {}", region, index);
                continue;
            }

            let crop =
                image::imageops::crop_imm(mask, region.x, region.y, region.width, region.height)
                    .to_image();

            let path = out_dir.join(format!("{}_ans{}.png", base_name, index));
            crop.save(&path).map_err(|e| {
                GradeError::Segmentation(format!("Failed to write {:?}: {}", path, e))
            })?;

            tracing::debug!("Wrote segment {:?} for region {:?}", path, region);
            segments.push(SegmentedAnswer {
                index,
                region,
                path,
            });
        }

        Ok(segments)
    }
}

/// Smallest axis-aligned rectangle enclosing the contour.
fn bounding_box(contour: &Contour<i32>) -> Option<Region> {
    let first = contour.points.first()?;
    let (mut min_x, mut max_x) = (first.x, first.x);
    let (mut min_y, mut max_y) = (first.y, first.y);

    for point in &contour.points {
        min_x = min_x.min(point.x);
        max_x = max_x.max(point.x);
        min_y = min_y.min(point.y);
        max_y = max_y.max(point.y);
    }

    Some(Region {
        x: min_x.max(0) as u32,
        y: min_y.max(0) as u32,
        width: (max_x - min_x + 1) as u32,
        height: (max_y - min_y + 1) as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;

    fn mask_with_rects(width: u32, height: u32, rects: &[Rect]) -> GrayImage {
        let mut mask = GrayImage::new(width, height);
        for rect in rects {
            draw_filled_rect_mut(&mut mask, *rect, Luma([255u8]));
        }
        mask
    }

    #[test]
    fn test_segment_writes_one_crop_per_qualifying_blob() {
        let dir = tempfile::tempdir().unwrap();
        let mask = mask_with_rects(400, 300, &[Rect::at(10, 5).of_size(60, 40)]);

        let segments = AnswerSegmenter::new(50, 30)
            .segment(&mask, dir.path(), "sheet")
            .unwrap();

        assert_eq!(segments.len(), 1);
        let segment = &segments[0];
        assert_eq!(segment.index, 0);
        assert_eq!(
            segment.region,
            Region {
                x: 10,
                y: 5,
                width: 60,
                height: 40
            }
        );
        assert!(segment.path.ends_with("sheet_ans0.png"));

        let crop = image::open(&segment.path).unwrap().to_luma8();
        assert_eq!(crop.dimensions(), (60, 40));
    }

    #[test]
    fn test_segment_rejects_small_blobs() {
        let dir = tempfile::tempdir().unwrap();
        let mask = mask_with_rects(
            200,
            200,
            &[
                Rect::at(10, 10).of_size(40, 20),
                // Exactly at the thresholds is still too small
                Rect::at(100, 100).of_size(50, 30),
            ],
        );

        let segments = AnswerSegmenter::new(50, 30)
            .segment(&mask, dir.path(), "sheet")
            .unwrap();

        assert!(segments.is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_segment_keeps_multiple_regions_in_discovery_order() {
        let dir = tempfile::tempdir().unwrap();
        let mask = mask_with_rects(
            400,
            300,
            &[
                Rect::at(20, 10).of_size(80, 40),
                Rect::at(150, 120).of_size(120, 50),
            ],
        );

        let segments = AnswerSegmenter::new(50, 30)
            .segment(&mask, dir.path(), "sheet")
            .unwrap();

        assert_eq!(segments.len(), 2);
        let indices: Vec<usize> = segments.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_segment_indices_keep_gaps_for_filtered_contours() {
        let dir = tempfile::tempdir().unwrap();
        // A speck above the real answer takes index 0 and is filtered out
        let mask = mask_with_rects(
            400,
            300,
            &[
                Rect::at(30, 2).of_size(10, 5),
                Rect::at(40, 100).of_size(100, 60),
            ],
        );

        let segments = AnswerSegmenter::new(50, 30)
            .segment(&mask, dir.path(), "sheet")
            .unwrap();

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].index, 1);
        assert!(segments[0].path.ends_with("sheet_ans1.png"));
    }

    #[test]
    fn test_segment_empty_mask_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mask = GrayImage::new(100, 100);

        let segments = AnswerSegmenter::new(50, 30)
            .segment(&mask, dir.path(), "sheet")
            .unwrap();

        assert!(segments.is_empty());
    }
}
