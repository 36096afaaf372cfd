//! The common module is our grab bag of small shared types: the DR score, the two tag fields we
//! manage, the scope selector, and logging setup.

use crate::error::{DrRoonError, DrRoonExpectedError};
use clap::ValueEnum;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::str::FromStr;
use std::sync::Mutex;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt as tracing_fmt, prelude::*, EnvFilter};

/// Prefix that marks the DR part of a tag value.
pub const DR_PREFIX: &str = "DR ";

/// A Dynamic Range score as reported by the DR meter. Rendered as `DR <n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrScore(pub u32);

impl fmt::Display for DrScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", DR_PREFIX, self.0)
    }
}

impl FromStr for DrScore {
    type Err = DrRoonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(DrRoonExpectedError::InvalidDrValue { value: s.to_string() }.into());
        }
        s.parse::<u32>().map(DrScore).map_err(|_| DrRoonExpectedError::InvalidDrValue { value: s.to_string() }.into())
    }
}

/// The two custom fields Roon reads the DR score from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagField {
    Version,
    RoonAlbumTag,
}

impl TagField {
    pub const ALL: [TagField; 2] = [TagField::Version, TagField::RoonAlbumTag];

    /// The key used by every container format: TXXX description, Vorbis comment key, and the name
    /// half of the iTunes freeform atom.
    pub fn key(self) -> &'static str {
        match self {
            TagField::Version => "VERSION",
            TagField::RoonAlbumTag => "ROONALBUMTAG",
        }
    }

    pub fn separator(self) -> &'static str {
        match self {
            TagField::Version => ", ",
            TagField::RoonAlbumTag => "; ",
        }
    }
}

impl fmt::Display for TagField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Which of the tag fields a run writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TagScope {
    #[default]
    Both,
    VersionOnly,
    RoonAlbumTagOnly,
    None,
}

impl TagScope {
    pub fn fields(self) -> &'static [TagField] {
        match self {
            TagScope::Both => &TagField::ALL,
            TagScope::VersionOnly => &[TagField::Version],
            TagScope::RoonAlbumTagOnly => &[TagField::RoonAlbumTag],
            TagScope::None => &[],
        }
    }

    pub fn includes(self, field: TagField) -> bool {
        self.fields().contains(&field)
    }
}

// Logging initialization

static LOGGING_INITIALIZED: Mutex<bool> = Mutex::new(false);

/// Installs the global tracing subscriber. Logs go to stderr; with `log_to_file` they are also
/// written to `drroon.log` in the state directory. The returned guard must be held until exit so
/// the file writer flushes.
pub fn initialize_logging(log_to_file: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let mut initialized = LOGGING_INITIALIZED.lock().map_err(|_| anyhow::anyhow!("Logging lock poisoned"))?;
    if *initialized {
        return Ok(None);
    }
    *initialized = true;
    drop(initialized);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = tracing_fmt::layer().with_writer(std::io::stderr).with_target(false);

    if !log_to_file {
        tracing_subscriber::registry().with(env_filter).with(stderr_layer).try_init()?;
        return Ok(None);
    }

    let proj_dirs = ProjectDirs::from("", "", "drroon").ok_or_else(|| anyhow::anyhow!("Failed to get project directories"))?;
    let log_dir = if cfg!(target_os = "macos") { proj_dirs.cache_dir() } else { proj_dirs.state_dir().unwrap_or(proj_dirs.cache_dir()) };
    fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("drroon")
        .filename_suffix("log")
        .build(log_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = tracing_fmt::layer().with_writer(non_blocking).with_ansi(false).with_line_number(true).with_file(true);

    tracing_subscriber::registry().with(env_filter).with(stderr_layer).with(file_layer).try_init()?;
    Ok(Some(guard))
}
