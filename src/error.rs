//! Error types for radio-dl
//!
//! Hard failures only. A program that cannot be found on the site is not an
//! error: the crawler returns an empty list for it, and callers are expected to
//! treat "zero broadcasts" as a valid outcome.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for radio-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for radio-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "parallel_downloads")
        key: Option<String>,
    },

    /// Network error (connect, timeout, body read)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status code
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that was requested
        url: String,
        /// The status code returned by the server
        status: u16,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A CSS selector failed to parse
    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector {
        /// The selector text
        selector: String,
        /// Parser message
        reason: String,
    },

    /// A URL could not be parsed or joined
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL text
        url: String,
        /// Parser message
        reason: String,
    },

    /// Malformed or out-of-range station/program/broadcast selection
    #[error("invalid selection: {0}")]
    Selection(String),

    /// Download-related error
    #[error("download error: {0}")]
    Download(#[from] DownloadError),

    /// A spawned task panicked or was cancelled
    #[error("task failed: {0}")]
    TaskJoin(String),

    /// Operation not supported (unimplemented station, etc.)
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Download-related errors
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Destination already exists and the collision action is Skip
    #[error("file {path} already exists")]
    FileExists {
        /// The path that already exists
        path: PathBuf,
    },

    /// Output directory is missing or not a directory
    #[error("{path} is not a valid directory")]
    InvalidDirectory {
        /// The path that was supplied
        path: PathBuf,
    },

    /// A single broadcast failed to download
    #[error("broadcast #{index} ({url}) failed: {reason}")]
    Failed {
        /// Display index of the broadcast (position + start index)
        index: usize,
        /// Audio URL
        url: String,
        /// The underlying failure
        reason: String,
    },
}

impl Error {
    /// Shorthand for a configuration error on a specific key
    pub fn config(key: &str, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }

    /// Whether this error came from the network or an HTTP status
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, Error::Network(_) | Error::HttpStatus { .. })
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(e: tokio::task::JoinError) -> Self {
        Error::TaskJoin(e.to_string())
    }
}
