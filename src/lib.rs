pub mod audiotags;
pub mod common;
pub mod config;
pub mod datafiles;
pub mod dsf;
pub mod error;
pub mod merge;
pub mod releases;
pub mod rename;
pub mod scan;

pub use common::{DrScore, TagField, TagScope};
pub use error::{DrRoonError, DrRoonExpectedError, Result};
pub use releases::update_directory;

#[cfg(test)]
mod testing;

#[cfg(test)]
mod config_test;
#[cfg(test)]
mod rename_test;
