//! Error types for compdb-flags

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for compdb-flags operations
pub type Result<T> = std::result::Result<T, FlagsError>;

/// Error types for compdb-flags operations
#[derive(Error, Debug)]
pub enum FlagsError {
    /// Compilation database directory exists but its JSON cannot be read
    #[error("Cannot read compilation database '{path}': {reason}")]
    DatabaseUnreadable { path: PathBuf, reason: String },

    /// Compilation database is not valid JSON or has the wrong shape
    #[error("Malformed compilation database '{path}': {source}")]
    DatabaseMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Input list (or stdin) could not be read
    #[error("Cannot read input list '{path}': {reason}")]
    InputUnreadable { path: String, reason: String },

    /// Invalid configuration provided
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Conflicting output format options
    #[error("Output format conflict: specify only one of --json or --plain")]
    OutputFormatConflict,

    /// Worker pool for batch queries could not be started
    #[error("Failed to create thread pool: {0}")]
    ThreadPool(String),

    /// I/O error during output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization of the output failed
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
