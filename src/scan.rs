//! The scan module finds release directories that carry a DR report.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDirectory {
    pub directory: PathBuf,
    pub report: PathBuf,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// Walks `root` and returns every directory containing a file named `report_filename`. Hidden
/// directories are not descended into.
///
/// Results are ordered deepest first, so renaming a release folder never invalidates the path of
/// a release nested inside it that has not been processed yet.
pub fn find_report_directories(root: &Path, report_filename: &str) -> Vec<ReportDirectory> {
    let mut found: Vec<(usize, ReportDirectory)> = Vec::new();

    let walker = WalkDir::new(root).sort_by_file_name().into_iter().filter_entry(|e| !e.file_type().is_dir() || !is_hidden(e));
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Failed to scan {}: {}", e.path().map(|p| p.display().to_string()).unwrap_or_default(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() || entry.file_name() != report_filename {
            continue;
        }
        let Some(directory) = entry.path().parent() else {
            continue;
        };
        debug!("Found report {}", entry.path().display());
        found.push((
            entry.depth(),
            ReportDirectory {
                directory: directory.to_path_buf(),
                report: entry.path().to_path_buf(),
            },
        ));
    }

    // Stable sort keeps the by-name order within a depth.
    found.sort_by(|a, b| b.0.cmp(&a.0));
    found.into_iter().map(|(_, rd)| rd).collect()
}
