//! Error types for xzzpcb-common.

use thiserror::Error;

/// Common error type for bounded binary reads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Attempted to read past the end of the buffer.
    #[error("read past end of buffer at offset {offset}: needed {needed} bytes but only {available} available")]
    Overrun {
        offset: usize,
        needed: usize,
        available: usize,
    },
}

impl Error {
    /// The absolute offset at which the failed read started.
    pub fn offset(&self) -> usize {
        match self {
            Error::Overrun { offset, .. } => *offset,
        }
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
