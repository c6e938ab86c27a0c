//! Error types for the upload namespace.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Namespace errors
    #[error("Invalid name: '{0}'")]
    InvalidName(String),

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    // Storage errors carry the operation and path, never the raw OS message
    #[error("Storage failure: could not {op} '{}' ({})", .path.display(), .source.kind())]
    Storage {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    /// Build a closure that wraps an io error with the operation and path it hit.
    pub fn storage(op: &'static str, path: &Path) -> impl FnOnce(io::Error) -> Error {
        let path = path.to_path_buf();
        move |source| Error::Storage { op, path, source }
    }

    /// Whether this error is a rejection of a name (as opposed to a failure).
    pub fn is_rejection(&self) -> bool {
        matches!(self, Error::InvalidName(_) | Error::AlreadyExists(_))
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes used by the CLI.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const CONFIG_ERROR: i32 = 2;
    pub const NAME_REJECTED: i32 = 3;
    pub const STORAGE_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
}
