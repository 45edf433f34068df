//! Error types for the download module.
//!
//! This module defines structured errors for all download operations,
//! providing context-rich error messages for logging.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during file downloads.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The URL does not look like a direct media file; never retried.
    #[error("Skipping invalid URL: {url}")]
    InvalidMediaUrl {
        /// The rejected URL.
        url: String,
    },

    /// The suggested filename sanitized to nothing; never retried.
    #[error("no usable filename for {url}")]
    EmptyFilename {
        /// The URL being downloaded.
        url: String,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error during download (create file, write, etc.)
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Every attempt failed.
    #[error("giving up on {url} after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// The URL that could not be downloaded.
        url: String,
        /// How many attempts were made.
        attempts: u32,
        /// The error from the final attempt.
        #[source]
        last: Box<DownloadError>,
    },
}

impl DownloadError {
    /// Creates an invalid media URL error.
    pub fn invalid_media_url(url: impl Into<String>) -> Self {
        Self::InvalidMediaUrl { url: url.into() }
    }

    /// Creates an empty filename error.
    pub fn empty_filename(url: impl Into<String>) -> Self {
        Self::EmptyFilename { url: url.into() }
    }

    /// Maps a reqwest error, splitting timeouts from other transport failures.
    pub fn from_reqwest(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            Self::Timeout { url }
        } else {
            Self::Network { url, source }
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wraps the final attempt's error once the retry budget is spent.
    pub fn retries_exhausted(url: impl Into<String>, attempts: u32, last: DownloadError) -> Self {
        Self::RetriesExhausted {
            url: url.into(),
            attempts,
            last: Box::new(last),
        }
    }
}
