//! Error types for the optimization engine.

use thiserror::Error;

/// Errors surfaced by the optimization pipeline.
///
/// None of these are recovered locally: each aborts the job and is handed
/// back to the caller as the result of `optimize`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// The input path list was empty.
    #[error("No paths to optimize")]
    EmptyInput,

    /// A path had fewer than two points or a non-finite coordinate.
    #[error("Malformed path: {0}")]
    MalformedPath(String),

    /// A configuration value was outside its documented range.
    #[error("Configuration out of range: {0}")]
    ConfigRange(String),

    /// The cancellation token tripped; partial state was discarded.
    #[error("Optimization cancelled")]
    Cancelled,

    /// An internal invariant was violated mid-run. Should be unreachable.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
