//! Error types for the renderer and its HTTP surface

use thiserror::Error;

/// Result type alias for render operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, rendering or serving a matrix
#[derive(Error, Debug)]
pub enum Error {
    /// Out-of-range pixel size, non-positive dimensions, unknown render mode
    #[error("{0}")]
    InvalidInput(String),

    /// Bitmap length does not equal `rows * columns`
    #[error("Bitmap length mismatch: expected {expected} values, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Accessor called outside `[0, columns) x [0, rows)`
    #[error("Pixel ({x}, {y}) out of range for a {columns}x{rows} matrix")]
    IndexOutOfRange {
        x: usize,
        y: usize,
        columns: usize,
        rows: usize,
    },

    /// Failed to decode the JSON matrix
    #[error("Invalid JSON: {0}")]
    DecodeError(String),

    /// Failed to encode the rendered bitmap
    #[error("Unable to encode resulting image: {0}")]
    EncodeError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// HTTP server failure (bind, accept)
    #[error("Server error: {0}")]
    ServerError(String),

    /// Failed to read the request body
    #[error("Unable to read request body: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP status the service answers with for this error.
    ///
    /// Everything caused by the request itself is a client error, including
    /// `IndexOutOfRange`, which can only surface when a malformed matrix
    /// slipped past validation, and `Io`, which only comes from reading the
    /// request body.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::InvalidInput(_)
            | Error::DimensionMismatch { .. }
            | Error::IndexOutOfRange { .. }
            | Error::DecodeError(_)
            | Error::Io(_) => 400,
            Error::EncodeError(_) | Error::ConfigError(_) | Error::ServerError(_) => 500,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::DecodeError(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::EncodeError(err.to_string())
    }
}
