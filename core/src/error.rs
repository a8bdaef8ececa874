//! Error types shared by the libcompose crates.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while reading a binary table (phonetic dictionary, GTAB, TSIN).
///
/// Every variant is recoverable: callers try the next candidate path and, if
/// all fail, keep running with reduced capability.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("truncated {what}: needed {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        what: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("implausible {field} in header: {value}")]
    Implausible { field: &'static str, value: i64 },

    #[error("{file} not found in any data directory")]
    NotFound { file: String },

    #[error("unknown table id {0}")]
    UnknownTable(u32),
}

/// Errors from reading or writing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub type LoadResult<T> = Result<T, LoadError>;
