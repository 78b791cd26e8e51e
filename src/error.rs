//! Error types for the face direction library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// A required reference landmark is absent or has non-finite coordinates.
    ///
    /// This is the only failure of the direction estimator. Frame loops skip
    /// the frame and wait for the next detection.
    #[error("Missing or malformed landmark: {0}")]
    MissingLandmark(String),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Malformed landmark frame in an input stream
    #[error("Parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number in the input
        line: usize,
        /// Parser message
        message: String,
    },

    /// Output record could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error only invalidates the current frame
    #[must_use]
    pub const fn is_frame_local(&self) -> bool {
        matches!(self, Self::MissingLandmark(_))
    }
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
