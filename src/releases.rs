//! The releases module drives the per-album work: tagging every audio file of a release folder,
//! renaming the folder, and marking the report as processed.

use crate::audiotags::{update_file, AudioFormat};
use crate::common::{DrScore, TagScope};
use crate::config::Options;
use crate::datafiles::{extract_dr_score, mark_report_processed};
use crate::rename::rename_release_folder;
use crate::scan::{find_report_directories, ReportDirectory};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Writes `dr` into the tags of every supported audio file directly inside `dir`. Files whose
/// name starts with `.` and unsupported file types are skipped. Errors are logged per file and do
/// not stop the remaining files from being processed.
///
/// Returns `true` when no file failed, including when the directory holds no audio files.
pub fn update_directory(dir: &Path, dr: DrScore, scope: TagScope) -> bool {
    if scope == TagScope::None {
        return true;
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            error!("Error reading directory {}: {}", dir.display(), e);
            return false;
        }
    };
    let mut paths: Vec<PathBuf> = Vec::new();
    let mut success = true;
    for entry in entries {
        match entry {
            Ok(entry) => paths.push(entry.path()),
            Err(e) => {
                error!("Error reading directory entry in {}: {}", dir.display(), e);
                success = false;
            }
        }
    }
    paths.sort();

    for path in paths {
        let filename = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        if filename.starts_with('.') || !path.is_file() {
            continue;
        }
        if AudioFormat::from_path(&path).is_none() {
            debug!("Skipped unsupported file type: {}", filename);
            continue;
        }
        match update_file(&path, dr, scope) {
            Ok(true) => info!("Updated metadata for {}", filename),
            Ok(false) => info!("No changes needed for {}", filename),
            Err(e) => {
                error!("Error updating metadata for {}: {}", filename, e);
                success = false;
            }
        }
    }
    success
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The report had no usable DR value; nothing was touched.
    Skipped,
    Processed { success: bool, directory: PathBuf },
}

/// Processes one release folder: reads the score, optionally renames the folder, tags the audio
/// files, and marks the report as processed when every file succeeded.
pub fn process_release(release: &ReportDirectory, options: &Options) -> ReleaseOutcome {
    let dr = match extract_dr_score(&release.report) {
        Ok(dr) => dr,
        Err(e) => {
            warn!("{}", e);
            return ReleaseOutcome::Skipped;
        }
    };
    info!("Processing directory: {} ({})", release.directory.display(), dr);

    let mut directory = release.directory.clone();
    if options.rename_folder {
        match rename_release_folder(&directory, dr) {
            Ok(renamed) => directory = renamed,
            Err(e) => error!("Error renaming '{}': {}", directory.display(), e),
        }
    }

    let success = update_directory(&directory, dr, options.scope);

    if success && options.mark_processed {
        if let Err(e) = mark_report_processed(&directory, &release.report, &options.processed_filename) {
            error!("Error marking report in {} as processed: {}", directory.display(), e);
        }
    } else if !success {
        warn!("Not all files in {} were updated; leaving the report in place", directory.display());
    }

    ReleaseOutcome::Processed { success, directory }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub processed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Summary {
    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

/// Finds every release under `root` and processes it.
pub fn process_tree(root: &Path, options: &Options) -> Summary {
    let mut summary = Summary::default();
    for release in find_report_directories(root, &options.report_filename) {
        match process_release(&release, options) {
            ReleaseOutcome::Skipped => summary.skipped += 1,
            ReleaseOutcome::Processed { success: true, .. } => summary.processed += 1,
            ReleaseOutcome::Processed { success: false, .. } => summary.failed += 1,
        }
    }
    info!("Done: {} processed, {} failed, {} skipped", summary.processed, summary.failed, summary.skipped);
    summary
}
