//! Error types for the content tools.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`ToolError`].
pub type Result<T> = std::result::Result<T, ToolError>;

/// Failure to load pack or option files.
///
/// Validation failures are not errors here: they are reported per pack.
#[derive(Debug, Error)]
pub enum ToolError {
    /// File could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// File read.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// JSON text did not parse.
    #[error("invalid JSON in '{path}': {source}")]
    Json {
        /// File parsed.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// RON text did not parse.
    #[error("invalid RON in '{path}': {source}")]
    Ron {
        /// File parsed.
        path: PathBuf,
        /// Underlying error.
        source: ron::error::SpannedError,
    },

    /// Options file parsed but does not match the options schema.
    #[error("invalid options in '{path}': {source}")]
    Options {
        /// File parsed.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// File extension is neither `.json` nor `.ron`.
    #[error("unsupported file type '{path}' (expected .json or .ron)")]
    UnsupportedFormat {
        /// Offending file.
        path: PathBuf,
    },

    /// No pack files were found under the given paths.
    #[error("no content packs found")]
    NoPacks,
}
