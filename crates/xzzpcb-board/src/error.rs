//! Error and diagnostic types for board decoding.

use thiserror::Error;

use crate::crypto::DecryptError;

/// Errors that can occur on the fallible entry points.
///
/// Decoding itself never fails; only the path-based convenience wrapper can
/// return an error, for I/O reasons.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for board operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A decoding problem that was recovered locally.
///
/// The decoder always returns a board; anything that went wrong on the way
/// is recorded as one of these and attached to the result. Offsets are
/// absolute file offsets for outer-stream diagnostics and offsets into the
/// decrypted payload for part-level diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Diagnostic {
    /// A read ran past the end of its buffer.
    #[error("read past end of buffer at offset {offset}: needed {needed} bytes but only {available} available")]
    Overrun {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A block tag outside the known set; the outer walk stops here.
    #[error("unknown block tag {tag:#04x} at offset {offset}")]
    UnknownTag { offset: usize, tag: u8 },

    /// A part sub-block tag outside the known set; that part's walk stops.
    #[error("unknown part sub-block tag {tag:#04x} at offset {offset}")]
    UnknownSubTag { offset: usize, tag: u8 },

    /// A part payload that could not be decrypted.
    #[error("failed to decrypt part payload at offset {offset}: {source}")]
    DecryptFailure {
        offset: usize,
        #[source]
        source: DecryptError,
    },
}

impl From<xzzpcb_common::Error> for Diagnostic {
    fn from(err: xzzpcb_common::Error) -> Self {
        match err {
            xzzpcb_common::Error::Overrun {
                offset,
                needed,
                available,
            } => Diagnostic::Overrun {
                offset,
                needed,
                available,
            },
        }
    }
}
