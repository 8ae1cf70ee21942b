use std::path::PathBuf;

/// Run configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the scanned answer sheet image
    pub sheet_path: PathBuf,
    /// Directory receiving the segmented answer crops
    pub output_dir: PathBuf,
    /// Reference answer every segment is scored against
    pub reference_answer: String,
    /// Regions wider than this survive the size filter
    pub min_region_width: u32,
    /// Regions taller than this survive the size filter
    pub min_region_height: u32,
}
