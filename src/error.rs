//! Error types for xtlinks.
//!
//! This module provides a unified error handling approach using `thiserror`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for xtlinks operations.
pub type Result<T> = std::result::Result<T, XtError>;

/// Errors that can occur in xtlinks.
#[derive(Debug, Error)]
pub enum XtError {
    /// No API base URL was configured.
    #[error("API URL is not configured (set --api-url or XTLINKS_API_URL)")]
    ApiUrlMissing,

    /// Native clipboard failure.
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] arboard::Error),

    /// The native clipboard could not be opened.
    #[error("Native clipboard unavailable: {0}")]
    ClipboardUnavailable(String),

    /// Text is too large for a terminal clipboard sequence.
    #[error("Clipboard payload too large: {size} bytes (limit {limit})")]
    PayloadTooLarge { size: usize, limit: usize },

    /// Failed to open a file.
    #[error("Failed to open file: {path}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed manifest line.
    #[error("Manifest line {line}: {reason}")]
    ManifestParse { line: usize, reason: String },

    /// The same key appears twice in a manifest.
    #[error("Duplicate file key '{key}' on line {line}")]
    DuplicateKey { key: String, line: usize },

    /// The same key appears twice in the combined file list.
    #[error("Duplicate file key '{key}' in entry {entry}")]
    DuplicateEntry { key: String, entry: usize },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl XtError {
    /// Create a FileOpen error.
    pub fn file_open(path: PathBuf, source: std::io::Error) -> Self {
        Self::FileOpen { path, source }
    }

    /// Create a ManifestParse error.
    pub fn manifest_parse(line: usize, reason: impl Into<String>) -> Self {
        Self::ManifestParse {
            line,
            reason: reason.into(),
        }
    }
}
