//! Error types for the terraglobe crate.

use std::fmt;

/// Result type for terraglobe operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while listing, fetching or decoding overlay data.
#[derive(Debug)]
pub enum Error {
    /// The requested folder or resource does not exist.
    ResourceNotFound {
        /// The path that was requested.
        path: String,
    },
    /// The requested path is malformed or escapes the served root.
    InvalidPath {
        /// The path that was rejected.
        path: String,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// Raster decoding failed.
    Decode(terraglobe_decode::DecodeError),
    /// HTTP request failed.
    Http {
        /// The URL that failed.
        url: String,
        /// The error message.
        message: String,
    },
    /// HTTP response had a non-success status code.
    HttpStatus {
        /// The URL that returned the error.
        url: String,
        /// The HTTP status code.
        status: u16,
    },
    /// Filesystem read failed.
    Io {
        /// The path that failed.
        path: String,
        /// The error message.
        message: String,
    },
    /// A response parsed but did not have the expected shape.
    InvalidData {
        /// Context for where the error occurred.
        context: &'static str,
        /// Description of what was invalid.
        detail: String,
    },
}

impl Error {
    /// The HTTP status a listing endpoint would answer with for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidPath { .. } => 400,
            Self::ResourceNotFound { .. } => 404,
            _ => 500,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResourceNotFound { path } => write!(f, "resource not found: {path}"),
            Self::InvalidPath { path, reason } => {
                write!(f, "invalid path {path}: {reason}")
            }
            Self::Decode(e) => write!(f, "decode error: {e}"),
            Self::Http { url, message } => {
                write!(f, "http request to {url} failed: {message}")
            }
            Self::HttpStatus { url, status } => {
                write!(f, "http request to {url} returned status {status}")
            }
            Self::Io { path, message } => write!(f, "io error on {path}: {message}"),
            Self::InvalidData { context, detail } => {
                write!(f, "invalid {context}: {detail}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<terraglobe_decode::DecodeError> for Error {
    fn from(e: terraglobe_decode::DecodeError) -> Self {
        Self::Decode(e)
    }
}
