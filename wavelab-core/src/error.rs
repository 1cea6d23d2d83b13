//! Error types.

use std::io;
use std::num::ParseIntError;

pub type Result<T> = core::result::Result<T, Error>;

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::IoError(e.to_string())
    }
}

/// Crate-wide error type.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("unknown configuration: {0}")]
    UnknownConfiguration(u32),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("failed spawning simulator process: {0}")]
    SpawnFailure(String),

    #[error("manifest error: {0}")]
    ManifestError(String),
    #[error("toml deserialization error: {0}")]
    TomlDeserError(#[from] toml::de::Error),
    #[error("failed parsing int: {0}")]
    ParseIntError(#[from] ParseIntError),
    #[error("io error: {0}")]
    IoError(String),

    #[error("other error: {0}")]
    Other(String),
}
