//! File I/O for fonts, documents and atlas images.

use std::{
    fs::{create_dir_all, read, remove_file, write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glob::glob;
use image::RgbaImage;
use serde::{Serialize, de::DeserializeOwned};
use sdfont_glyph_doc::GlyphDocument;

use crate::config::FONT_EXTENSIONS;

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Serialize a value as pretty JSON, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let text = serde_json::to_string_pretty(value)?;
    write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}

/// Read and validate a glyph document.
pub fn read_document(path: &Path) -> Result<GlyphDocument> {
    let data = read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    GlyphDocument::from_slice(&data)
        .with_context(|| format!("Invalid glyph document: {}", path.display()))
}

pub fn write_document(path: &Path, doc: &GlyphDocument) -> Result<()> {
    write_json(path, doc)
}

pub fn save_png(path: &Path, image: &RgbaImage) -> Result<()> {
    ensure_parent_dir(path)?;
    image.save(path).with_context(|| format!("Failed to write image: {}", path.display()))
}

pub fn load_png(path: &Path) -> Result<RgbaImage> {
    Ok(image::open(path)
        .with_context(|| format!("Failed to load image: {}", path.display()))?
        .into_rgba8())
}

/// Create parent directory if it doesn't exist.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

/// Remove files, ignoring ones that are already gone.
pub fn remove_files<'a>(paths: impl IntoIterator<Item = &'a PathBuf>) -> Result<usize> {
    let mut removed = 0;
    for path in paths {
        if path.exists() {
            remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// Find files matching a glob pattern in a directory.
pub fn glob_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = dir.join(pattern);
    let pattern_str = pattern.to_str().context("Invalid pattern path")?;
    Ok(glob(pattern_str)
        .with_context(|| format!("Failed to glob pattern: {pattern_str}"))?
        .filter_map(Result::ok)
        .collect())
}

/// Every font file directly inside `dir`, sorted by path.
pub fn font_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut fonts = Vec::new();
    for ext in FONT_EXTENSIONS {
        fonts.extend(glob_files(dir, &format!("*.{ext}"))?);
    }
    fonts.sort();
    Ok(fonts)
}

/// File name without extension, e.g. `Ubuntu-Regular` for `fonts/Ubuntu-Regular.ttf`.
pub fn base_name(path: &Path) -> String {
    path.file_stem().unwrap_or_default().to_string_lossy().into_owned()
}
