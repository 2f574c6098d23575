//! Error types for the tug-dl library.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during download operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Resume was requested and partial data exists locally, but the remote
    /// source does not advertise byte-range support.
    #[error("cannot resume {path}: remote does not support byte ranges")]
    ResumeUnsupported {
        /// Destination path holding the partial data.
        path: PathBuf,
    },

    /// The resolved destination's directory does not exist.
    #[error("destination directory does not exist: {path}")]
    InvalidDestination {
        /// The destination path that failed validation.
        path: PathBuf,
    },

    /// HTTP transport error, including non-success response statuses.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error while statting or writing the destination file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for tug-dl operations.
pub type Result<T> = std::result::Result<T, Error>;
