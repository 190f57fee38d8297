//! Common utilities for the XZZPCB decoder.
//!
//! This crate provides the foundational types shared by the decoder crates:
//!
//! - [`BinaryReader`] - Bounded little-endian reading from byte slices
//! - [`Error`] - The overrun error produced by bounds-checked reads

mod error;
mod reader;

pub use error::{Error, Result};
pub use reader::BinaryReader;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Re-export memchr for SIMD-accelerated byte searching
pub use memchr;
