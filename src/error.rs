//! Error types for addon-mirror
//!
//! Uses `thiserror` for library errors; the binary wraps everything in
//! `anyhow` at the top level.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mirror operations
pub type MirrorResult<T> = Result<T, MirrorError>;

/// Main error type for mirror operations
#[derive(Error, Debug)]
pub enum MirrorError {
    /// A git subcommand exited with a failure status
    #[error("git {action} failed with exit code {code:?}")]
    Git { action: String, code: Option<i32> },

    /// A git subcommand could not be spawned at all
    #[error("failed to run git {action}: {source}")]
    GitSpawn {
        action: String,
        source: std::io::Error,
    },

    /// Directory required by the pipeline is missing
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// JSON document could not be parsed or serialized
    #[error("invalid JSON in {file}: {source}")]
    Json {
        file: PathBuf,
        source: serde_json::Error,
    },

    /// Configuration file exists but could not be parsed
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Contributor endpoint request failed
    #[error("contributor fetch failed: {0}")]
    Fetch(#[from] Box<ureq::Error>),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
