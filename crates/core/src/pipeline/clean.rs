use std::{fs::remove_dir_all, path::Path};

use anyhow::{Context, Result};

/// Remove the destination directory. Returns whether anything was removed.
pub fn clean(dest_dir: &Path) -> Result<bool> {
    if !dest_dir.exists() {
        println!("Skipped {} (not found)", dest_dir.display());
        return Ok(false);
    }
    remove_dir_all(dest_dir).with_context(|| format!("Failed to remove {}", dest_dir.display()))?;
    println!("Removed {}", dest_dir.display());
    Ok(true)
}
