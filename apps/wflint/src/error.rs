//! Error type for the I/O and configuration layers.
//!
//! Parsing and rule evaluation never fail; only reading documents, writing
//! fixes and loading configuration produce these.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WflintError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    ConfigToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config {path}: {source}")]
    ConfigYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid discovery pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

impl WflintError {
    /// Path of the file the error concerns, when there is one.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Read { path, .. }
            | Self::Write { path, .. }
            | Self::ConfigToml { path, .. }
            | Self::ConfigYaml { path, .. } => Some(path),
            Self::Pattern(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, WflintError>;
