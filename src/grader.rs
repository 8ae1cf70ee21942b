//! End-to-end sheet grading driver.

use crate::cleaner::TextCleaner;
use crate::config::Config;
use crate::error::GradeError;
use crate::preprocessing::Preprocessor;
use crate::recognizer::HandwritingRecognizer;
use crate::scoring::SimilarityScorer;
use crate::segmentation::AnswerSegmenter;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Result for one segmented answer image
#[derive(Debug, Clone, Serialize)]
pub struct AnswerReport {
    pub file_name: String,
    pub index: usize,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Scored { score: f32, text: String },
    Failed { reason: String },
}

/// Per-sheet report, in segment discovery order
#[derive(Debug, Clone, Default, Serialize)]
pub struct SheetReport {
    pub answers: Vec<AnswerReport>,
}

/// Sequences preprocessing, segmentation, recognition, cleaning and
/// scoring over one answer sheet.
///
/// Failures scoped to a single segment (empty transcript, recognition
/// failure) are recorded in the report and do not abort the remaining
/// segments; everything else does.
pub struct Grader {
    preprocessor: Preprocessor,
    segmenter: AnswerSegmenter,
    recognizer: Arc<dyn HandwritingRecognizer>,
    cleaner: TextCleaner,
    scorer: SimilarityScorer,
}

impl Grader {
    pub fn new(
        recognizer: Arc<dyn HandwritingRecognizer>,
        cleaner: TextCleaner,
        scorer: SimilarityScorer,
        config: &Config,
    ) -> Self {
        Self {
            preprocessor: Preprocessor::new(),
            segmenter: AnswerSegmenter::new(config.min_region_width, config.min_region_height),
            recognizer,
            cleaner,
            scorer,
        }
    }

    /// Segment a sheet into `output_dir` and grade every discovered answer
    /// against `reference`.
    pub fn grade_sheet(
        &self,
        sheet_path: &Path,
        output_dir: &Path,
        reference: &str,
    ) -> Result<SheetReport, GradeError> {
        std::fs::create_dir_all(output_dir).map_err(|e| {
            GradeError::Segmentation(format!("Failed to create output directory: {}", e))
        })?;

        let base_name = base_name(sheet_path)?;

        let sheet = image::open(sheet_path)
            .map_err(|e| GradeError::SourceRead(format!("{}: {}", sheet_path.display(), e)))?;

        let mask = self.preprocessor.process(sheet)?;
        let segments = self.segmenter.segment(&mask, output_dir, &base_name)?;

        tracing::info!(
            "Segmented {} answer region(s) from {}",
            segments.len(),
            sheet_path.display()
        );

        let items: Vec<(usize, PathBuf)> = segments
            .iter()
            .map(|segment| (segment.index, segment.path.clone()))
            .collect();

        self.grade_items(&items, reference)
    }

    /// Grade crops a previous run left in `output_dir` for `base_name`,
    /// without re-reading or re-segmenting the sheet.
    pub fn grade_existing(
        &self,
        output_dir: &Path,
        base_name: &str,
        reference: &str,
    ) -> Result<SheetReport, GradeError> {
        let items = discover_segments(output_dir, base_name)?;
        tracing::info!(
            "Found {} existing segment(s) for {} in {}",
            items.len(),
            base_name,
            output_dir.display()
        );
        self.grade_items(&items, reference)
    }

    fn grade_items(
        &self,
        items: &[(usize, PathBuf)],
        reference: &str,
    ) -> Result<SheetReport, GradeError> {
        let mut report = SheetReport::default();

        for (index, path) in items {
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());

            let outcome = match self.grade_one(path, reference) {
                Ok((score, text)) => Outcome::Scored { score, text },
                Err(err) if err.is_per_item() => {
                    tracing::warn!("Skipping {}: {}", file_name, err);
                    Outcome::Failed {
                        reason: err.to_string(),
                    }
                }
                Err(err) => return Err(err),
            };

            report.answers.push(AnswerReport {
                file_name,
                index: *index,
                outcome,
            });
        }

        Ok(report)
    }

    fn grade_one(&self, path: &Path, reference: &str) -> Result<(f32, String), GradeError> {
        let raw = self.recognizer.recognize(path)?;
        let cleaned = self.cleaner.clean(&raw)?;
        let score = self.scorer.score(&cleaned, reference)?;
        Ok((score, cleaned))
    }
}

/// File name of the sheet with the extension stripped.
pub fn base_name(path: &Path) -> Result<String, GradeError> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| GradeError::SourceRead(format!("No file name in {}", path.display())))
}

/// Find segment crops written by an earlier run, ordered by their numeric
/// index suffix.
///
/// A plain lexicographic listing would put `_ans10` before `_ans2`;
/// parsing the suffix restores discovery order.
pub fn discover_segments(
    dir: &Path,
    base_name: &str,
) -> Result<Vec<(usize, PathBuf)>, GradeError> {
    let prefix = format!("{}_ans", base_name);

    let entries = std::fs::read_dir(dir)
        .map_err(|e| GradeError::Segmentation(format!("Failed to list {}: {}", dir.display(), e)))?;

    let mut items = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| GradeError::Segmentation(e.to_string()))?;
        let path = entry.path();

        let name = match path.file_name().and_then(|name| name.to_str()) {
            Some(name) => name,
            None => continue,
        };

        let lower = name.to_lowercase();
        if !(lower.ends_with(".png") || lower.ends_with(".jpg") || lower.ends_with(".jpeg")) {
            continue;
        }

        let index = name
            .strip_prefix(&prefix)
            .and_then(|rest| rest.split('.').next())
            .and_then(|suffix| suffix.parse::<usize>().ok());

        if let Some(index) = index {
            items.push((index, path));
        }
    }

    items.sort_by_key(|(index, _)| *index);
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name_strips_extension() {
        assert_eq!(
            base_name(Path::new("/data/raw/sample_sheet.jpeg")).unwrap(),
            "sample_sheet"
        );
    }

    #[test]
    fn test_discover_segments_orders_numerically() {
        let dir = tempfile::tempdir().unwrap();
        for index in [0usize, 2, 10] {
            std::fs::write(dir.path().join(format!("sheet_ans{}.png", index)), b"x").unwrap();
        }
        // Unrelated files are ignored
        std::fs::write(dir.path().join("other_ans1.png"), b"x").unwrap();
        std::fs::write(dir.path().join("sheet_ans3.txt"), b"x").unwrap();

        let items = discover_segments(dir.path(), "sheet").unwrap();

        let indices: Vec<usize> = items.iter().map(|(index, _)| *index).collect();
        assert_eq!(indices, vec![0, 2, 10]);
    }

    #[test]
    fn test_discover_segments_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_segments(dir.path(), "sheet").unwrap().is_empty());
    }
}
