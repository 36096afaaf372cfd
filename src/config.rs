//! The config module provides the run options and their parsing logic.
//!
//! Options come from three layers, later ones winning: built-in defaults, an optional TOML
//! configuration file, and command line flags. Unrecognized configuration keys are reported as
//! warnings rather than errors.

use crate::common::TagScope;
use crate::datafiles::{DEFAULT_PROCESSED_FILENAME, DEFAULT_REPORT_FILENAME};
use crate::error::{DrRoonExpectedError, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const KNOWN_KEYS: &[&str] = &["rename_folder", "tags", "mark_processed", "report_filename", "processed_filename"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Append ` (DR N)` to each release folder name.
    pub rename_folder: bool,
    /// Which tag fields to write.
    pub scope: TagScope,
    /// Rename the report once every file in the release was updated.
    pub mark_processed: bool,
    pub report_filename: String,
    pub processed_filename: String,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            rename_folder: false,
            scope: TagScope::Both,
            mark_processed: true,
            report_filename: DEFAULT_REPORT_FILENAME.to_string(),
            processed_filename: DEFAULT_PROCESSED_FILENAME.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    rename_folder: Option<bool>,
    tags: Option<TagScope>,
    mark_processed: Option<bool>,
    report_filename: Option<String>,
    processed_filename: Option<String>,
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "drroon").map(|d| d.config_dir().join("config.toml"))
}

impl Options {
    /// Loads options from `path`, or from the default location when `path` is `None`. A missing
    /// file at the default location yields the built-in defaults; a missing explicit file is an
    /// error.
    pub fn parse(path: Option<&Path>) -> Result<Options> {
        let (cfgpath, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match default_config_path() {
                Some(p) => (p, false),
                None => return Ok(Options::default()),
            },
        };

        let content = match fs::read_to_string(&cfgpath) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if explicit {
                    return Err(DrRoonExpectedError::ConfigNotFound { path: cfgpath }.into());
                }
                debug!("No configuration file at {}, using defaults", cfgpath.display());
                return Ok(Options::default());
            }
            Err(e) => return Err(e.into()),
        };
        Options::from_toml(&cfgpath, &content)
    }

    pub fn from_toml(cfgpath: &Path, content: &str) -> Result<Options> {
        let decode_error = |e: toml::de::Error| DrRoonExpectedError::ConfigDecode {
            path: cfgpath.to_path_buf(),
            message: e.to_string(),
        };

        let table: toml::Table = content.parse().map_err(decode_error)?;
        for key in table.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                warn!("Unrecognized key {} in configuration file ({})", key, cfgpath.display());
            }
        }
        let raw: RawConfig = toml::Value::Table(table).try_into().map_err(decode_error)?;

        let defaults = Options::default();
        let options = Options {
            rename_folder: raw.rename_folder.unwrap_or(defaults.rename_folder),
            scope: raw.tags.unwrap_or(defaults.scope),
            mark_processed: raw.mark_processed.unwrap_or(defaults.mark_processed),
            report_filename: raw.report_filename.unwrap_or(defaults.report_filename),
            processed_filename: raw.processed_filename.unwrap_or(defaults.processed_filename),
        };
        options.validate(cfgpath)?;
        Ok(options)
    }

    fn validate(&self, cfgpath: &Path) -> Result<()> {
        let invalid = |key: &str, message: &str| DrRoonExpectedError::InvalidConfigValue {
            path: cfgpath.to_path_buf(),
            key: key.to_string(),
            message: message.to_string(),
        };
        for (key, value) in [("report_filename", &self.report_filename), ("processed_filename", &self.processed_filename)] {
            if value.is_empty() {
                return Err(invalid(key, "must not be empty").into());
            }
            if value.contains('/') || value.contains('\\') {
                return Err(invalid(key, "must be a file name, not a path").into());
            }
        }
        if self.report_filename == self.processed_filename {
            return Err(invalid("processed_filename", "must differ from report_filename").into());
        }
        Ok(())
    }
}
