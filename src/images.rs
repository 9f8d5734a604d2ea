//! Character image helpers: filename sanitizing, saving, dimension probing

use std::fs;
use std::path::{Path, PathBuf};

use image::GenericImageView;

use crate::{Error, Result};

/// File stem used when a name sanitizes down to nothing
const FALLBACK_STEM: &str = "character";

/// Reduce a character name to a filesystem-safe file stem
///
/// Keeps alphanumerics, spaces and underscores, drops everything else,
/// then collapses whitespace runs into single underscores.
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '_')
        .collect();

    let stem = kept.split_whitespace().collect::<Vec<_>>().join("_");
    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem
    }
}

/// Write image bytes to `<dir>/<sanitized-name>.png`, creating the
/// directory on demand
///
/// The `.png` suffix is kept regardless of the actual encoding; the
/// filename contract predates the API switching its portraits to JPEG.
///
/// # Errors
///
/// Returns error if the directory or the file cannot be written
pub fn save_image(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let path = dir.join(format!("{}.png", sanitize_name(name)));
    fs::write(&path, bytes)?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "image saved");
    Ok(path)
}

/// Decode image bytes and return `(width, height)` in pixels
///
/// # Errors
///
/// Returns error if the bytes are not a decodable image
pub fn dimensions(bytes: &[u8]) -> Result<(u32, u32)> {
    let img = image::load_from_memory(bytes).map_err(|e| Error::Image(e.to_string()))?;
    Ok(img.dimensions())
}
