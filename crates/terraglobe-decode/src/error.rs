//! Error types for decoding operations.

use std::fmt;

/// Errors that can occur while decoding a raster resource.
///
/// An unsupported sample count in the color path is deliberately *not* an
/// error: it renders as the diagnostic fallback color instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The container could not be parsed at all.
    Parse {
        context: &'static str,
        detail: String,
    },
    /// The container parsed but uses a layout this crate does not read.
    UnsupportedFormat { detail: String },
    /// The raster has zero pixels, so there is nothing to decode.
    EmptyRaster,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse { context, detail } => {
                write!(f, "failed to parse {context}: {detail}")
            }
            Self::UnsupportedFormat { detail } => {
                write!(f, "unsupported raster layout: {detail}")
            }
            Self::EmptyRaster => write!(f, "raster contains no pixels"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Result type for decoding operations.
pub type DecodeResult<T> = Result<T, DecodeError>;
