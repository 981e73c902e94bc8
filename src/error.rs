//! Error types for pomdp-datasets
//!
//! Every failure in this crate is fatal to the run that hit it. The variants
//! exist to carry context (which path, which URL, which archive) into the
//! final log line, not to drive recovery.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for pomdp-datasets operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for pomdp-datasets
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration or manifest error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "download_root")
        key: Option<String>,
    },

    /// A download URL could not be built from the base URL and a filename
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        /// The URL string that failed to parse
        url: String,
        /// Underlying parse error
        source: url::ParseError,
    },

    /// Filesystem operation failed
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path being read, written, created or removed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Request could not be completed (connect, timeout, DNS, body read)
    #[error("network error fetching '{url}': {source}")]
    Network {
        /// The URL being fetched
        url: String,
        /// Underlying client error
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("HTTP {status} fetching '{url}'")]
    HttpStatus {
        /// The URL being fetched
        url: String,
        /// Status code returned by the server
        status: reqwest::StatusCode,
    },

    /// Archive decompression or unpacking failed
    #[error("extraction error: {0}")]
    Extract(#[from] ExtractError),
}

/// Archive-format errors (gzip and tar)
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The gzip stream is corrupt or truncated
    #[error("failed to decompress {archive}: {reason}")]
    Decompress {
        /// The `.gz` file being decompressed
        archive: PathBuf,
        /// The reason decompression failed
        reason: String,
    },

    /// The tar archive has malformed headers or members
    #[error("malformed tar archive {archive}: {reason}")]
    MalformedArchive {
        /// The `.tar` file being unpacked
        archive: PathBuf,
        /// The reason unpacking failed
        reason: String,
    },

    /// The blocking extraction task panicked or was cancelled
    #[error("extraction task failed: {reason}")]
    TaskFailed {
        /// The reason the task did not complete
        reason: String,
    },
}

impl Error {
    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Machine-readable error code for structured log output
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config_error",
            Error::InvalidUrl { .. } => "invalid_url",
            Error::Io { .. } => "io_error",
            Error::Network { .. } => "network_error",
            Error::HttpStatus { .. } => "http_status",
            Error::Extract(ExtractError::Decompress { .. }) => "decompress_failed",
            Error::Extract(ExtractError::MalformedArchive { .. }) => "malformed_archive",
            Error::Extract(ExtractError::TaskFailed { .. }) => "extraction_task_failed",
        }
    }

    /// Whether the failure came from the remote side rather than the local machine
    ///
    /// Broken links and unreachable hosts are worth reporting upstream; local
    /// filesystem and archive errors are not.
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network { .. } | Error::HttpStatus { .. })
    }
}
