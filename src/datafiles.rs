use crate::common::DrScore;
use crate::error::{DrRoonExpectedError, Result};
use crate::rename::safe_rename;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Name of the report the DR meter writes next to the album.
pub const DEFAULT_REPORT_FILENAME: &str = "foo_dr.txt";

/// Name the report is renamed to once an album has been processed.
pub const DEFAULT_PROCESSED_FILENAME: &str = "foo_dr_processed.txt";

static DR_VALUE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"Official DR value: DR(\d+)").unwrap());

/// Extracts the official DR value from the text of a report.
pub fn parse_dr_score(content: &str) -> Option<DrScore> {
    DR_VALUE_REGEX.captures(content).and_then(|c| c.get(1)).and_then(|m| m.as_str().parse().ok())
}

/// Reads a report file and extracts its official DR value.
pub fn extract_dr_score(path: &Path) -> Result<DrScore> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DrRoonExpectedError::ReportNotFound { path: path.to_path_buf() },
        _ => DrRoonExpectedError::ReportUnreadable {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
    })?;
    let content = String::from_utf8_lossy(&bytes);
    parse_dr_score(&content).ok_or_else(|| DrRoonExpectedError::NoDrValue { path: path.to_path_buf() }.into())
}

/// Renames the report inside `release_dir` to `processed_filename`. `report_path` may point into
/// the release directory under its old name; only the file name is reused.
pub fn mark_report_processed(release_dir: &Path, report_path: &Path, processed_filename: &str) -> Result<PathBuf> {
    let current = match report_path.file_name() {
        Some(name) => release_dir.join(name),
        None => return Err(DrRoonExpectedError::ReportNotFound { path: report_path.to_path_buf() }.into()),
    };
    safe_rename(&current, &release_dir.join(processed_filename))
}
