//! Error types for RIFF tree parsing.

use thiserror::Error;

/// Errors that can occur when reading or writing RIFF chunk trees.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] korob_common::Error),

    /// A container chunk too short to hold its 4-byte sub-tag.
    ///
    /// The lenient-truncation policy cannot absorb this: subtracting the
    /// sub-tag would leave a negative content length.
    #[error("container chunk length {size} cannot hold a 4-byte sub-tag")]
    ContainerTooShort { size: usize },
}

/// Result type for RIFF operations.
pub type Result<T> = std::result::Result<T, Error>;
