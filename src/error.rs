//! Error types for the ntsearch library.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while running a search.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Malformed request parameter (e.g. zero-length query where a
    /// positive length is required, or no target sequence available)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Query or target exceeds the configured maximum length
    #[error("{what} length {len} exceeds maximum {max} (including repeats)")]
    InputTooLarge {
        what: &'static str,
        len: usize,
        max: usize,
    },

    /// A dispatched chunk invocation failed; the whole search is aborted
    #[error("worker for chunk {chunk} failed: {message}")]
    WorkerFailed { chunk: usize, message: String },

    /// The map phase did not finish within the configured deadline
    #[error("map phase exceeded the configured deadline")]
    DeadlineExceeded,

    /// I/O error while loading a reference sequence
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic error with custom message
    #[error("{0}")]
    Other(String),
}
