//! XZZPCB - decoding library for XZZ `.pcb` board files.
//!
//! This crate provides a unified interface to the decoder crates:
//!
//! - [`xzzpcb_common`] - Common utilities (bounded binary reading)
//! - [`xzzpcb_board`] - The board decoder (XOR layer, DES parts, block
//!   stream)
//!
//! # Example
//!
//! ```no_run
//! use xzzpcb::prelude::*;
//!
//! let decoded = decode_file("board.pcb")?;
//! for entity in &decoded.board.entities {
//!     println!("{}", entity.kind());
//! }
//! # Ok::<(), xzzpcb_board::Error>(())
//! ```

// Re-export all sub-crates
pub use xzzpcb_board as board;
pub use xzzpcb_common as common;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use xzzpcb_board::{
        decode, decode_file, decode_with_progress, extract_part_payloads, Board, Decoded,
        Diagnostic, Entity, Part, Pin, Progress, Stage,
    };
    pub use xzzpcb_common::BinaryReader;
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
