//! Cached download of collaborator artifacts (models, dictionaries).

use crate::error::GradeError;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Ensure an artifact is downloaded and return its path.
///
/// Files land in the user cache directory and are fetched at most once;
/// delete the cache entry to force a re-download.
pub fn ensure_cached(url: &str, filename: &str) -> Result<PathBuf, GradeError> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("exam-grader");

    std::fs::create_dir_all(&cache_dir).map_err(|e| {
        GradeError::Initialization(format!("Failed to create cache directory: {}", e))
    })?;

    let artifact_path = cache_dir.join(filename);

    if !artifact_path.exists() {
        tracing::info!("Downloading {} (this may take a moment)...", filename);
        download_file(url, &artifact_path)?;
        tracing::info!("Downloaded {} to {:?}", filename, artifact_path);
    } else {
        tracing::debug!("Using cached {} from {:?}", filename, artifact_path);
    }

    Ok(artifact_path)
}

/// Download a file from URL to path using ureq
fn download_file(url: &str, path: &Path) -> Result<(), GradeError> {
    let response = ureq::get(url)
        .call()
        .map_err(|e| GradeError::Initialization(format!("Failed to download {}: {}", url, e)))?;

    let mut file = File::create(path)
        .map_err(|e| GradeError::Initialization(format!("Failed to create file: {}", e)))?;

    let buffer = response.into_body().read_to_vec().map_err(|e| {
        GradeError::Initialization(format!("Failed to read response body: {}", e))
    })?;

    file.write_all(&buffer)
        .map_err(|e| GradeError::Initialization(format!("Failed to write file: {}", e)))?;

    Ok(())
}
