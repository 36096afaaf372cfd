//! Collision-avoiding renames for release folders and report files.

use crate::common::DrScore;
use crate::error::{DrRoonExpectedError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

static FOLDER_DR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(DR \d+\)").unwrap());

/// Returns `new` if nothing exists there, otherwise the first free `{stem}_{n}{ext}` sibling.
pub fn free_path(new: &Path) -> PathBuf {
    if !new.exists() {
        return new.to_path_buf();
    }
    let stem = new.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let ext = new.extension().map(|e| format!(".{}", e.to_string_lossy())).unwrap_or_default();
    let parent = new.parent().unwrap_or_else(|| Path::new(""));
    let mut counter = 1;
    loop {
        let candidate = parent.join(format!("{stem}_{counter}{ext}"));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Moves `old` to `new`, picking a free `_N` suffixed name when `new` is taken. Returns the path
/// the file or directory ended up at.
pub fn safe_rename(old: &Path, new: &Path) -> Result<PathBuf> {
    let target = free_path(new);
    if target != new {
        debug!("{} exists, using {} instead", new.display(), target.display());
    }
    fs::rename(old, &target)?;
    info!("Renamed '{}' to '{}'", old.display(), target.display());
    Ok(target)
}

/// The folder name with the DR score appended, or `None` when the name already carries one.
pub fn dr_folder_name(name: &str, dr: DrScore) -> Option<String> {
    if FOLDER_DR_REGEX.is_match(name) {
        return None;
    }
    Some(format!("{name} ({dr})"))
}

/// Appends ` (DR N)` to the release folder name. Returns the directory's path after the rename,
/// which is unchanged when the name already carries a DR score.
pub fn rename_release_folder(dir: &Path, dr: DrScore) -> Result<PathBuf> {
    let Some(name) = dir.file_name().map(|n| n.to_string_lossy().into_owned()) else {
        return Err(DrRoonExpectedError::Generic(format!("Cannot rename {}: path has no folder name", dir.display())).into());
    };
    match dr_folder_name(&name, dr) {
        Some(new_name) => safe_rename(dir, &dir.with_file_name(new_name)),
        None => {
            info!("Folder '{}' already contains DR value. Skipping rename.", name);
            Ok(dir.to_path_buf())
        }
    }
}
