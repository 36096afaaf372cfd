use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DrRoonError {
    #[error(transparent)]
    Expected(#[from] DrRoonExpectedError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to write tags to {path}: {message}")]
    TagWrite { path: PathBuf, message: String },
}

/// Errors that are caused by the user's files or configuration rather than by a bug. These are
/// reported with a short message and never abort a run.
#[derive(Error, Debug)]
pub enum DrRoonExpectedError {
    #[error("{0}")]
    Generic(String),
    #[error("Report file not found: {path}")]
    ReportNotFound { path: PathBuf },
    #[error("Failed to read report file {path}: {message}")]
    ReportUnreadable { path: PathBuf, message: String },
    #[error("No DR value found in {path}")]
    NoDrValue { path: PathBuf },
    #[error("Invalid DR value: {value}")]
    InvalidDrValue { value: String },
    #[error("Failed to read tags from {path}: {message}")]
    TagDecode { path: PathBuf, message: String },
    #[error("Failed to encode {field} for {path}: {message}")]
    TagEncode { path: PathBuf, field: String, message: String },
    #[error("Not a valid DSF file: {path}: {message}")]
    InvalidDsf { path: PathBuf, message: String },
    #[error("{path} is not a supported audio file")]
    UnsupportedFiletype { path: PathBuf },
    #[error("Configuration file not found ({path})")]
    ConfigNotFound { path: PathBuf },
    #[error("Failed to decode configuration file ({path}): {message}")]
    ConfigDecode { path: PathBuf, message: String },
    #[error("Invalid value for {key} in configuration file ({path}): {message}")]
    InvalidConfigValue { path: PathBuf, key: String, message: String },
}

pub type Result<T> = std::result::Result<T, DrRoonError>;
