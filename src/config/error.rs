//! Errors raised while resolving or persisting configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors during config loading, materialization and saving.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine the home directory")]
    HomeDirUnavailable,

    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: serde_yaml_ng::Error,
    },

    #[error("config file {path} must contain a mapping at the top level")]
    NotAMapping { path: PathBuf },

    #[error("invalid value for `{key}`: expected {expected}, found {found}")]
    InvalidType {
        key: String,
        expected: &'static str,
        found: String,
    },

    #[error("failed to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write config file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_yaml_ng::Error),
}
