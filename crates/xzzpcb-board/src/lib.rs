//! Decoder for XZZ `.pcb` board files.
//!
//! XZZ files are a proprietary container for printed-circuit-board layout
//! data: traces, arcs, vias, silkscreen text, and DES-encrypted part
//! descriptors with component outlines, labels, and pins.
//!
//! # File Format
//!
//! Everything is little-endian. The container has three layers:
//!
//! - An optional whole-file XOR layer. The key byte sits at offset 0x10
//!   (0x00 for clear files); the obfuscated prefix ends at an 11-byte
//!   sentinel, after which the diode-readings region is stored in the
//!   clear.
//! - The main block region: its size is the `u32` at offset 0x40, its
//!   blocks start at 0x44. Each block is a one-byte tag, a `u32` size, and
//!   the body. Known tags: 0x01 arc, 0x02 via, 0x05 segment, 0x06 text,
//!   0x07 encrypted part data, 0x03/0x09 skipped, 0x04/0x08 bare markers.
//! - Part payloads: DES-ECB encrypted with a fixed key and PKCS#7 padding.
//!   The plaintext holds a part header followed by sized sub-blocks
//!   (outline arcs and lines, labels, pin arrays).
//!
//! # Decoding Model
//!
//! Decoding is total: [`decode`] always returns a [`Decoded`] carrying the
//! board entities that could be read plus a [`Diagnostic`] per recovered
//! problem. Truncated or malformed input yields a prefix of the file's
//! entities, never an error or a panic.
//!
//! # Example
//!
//! ```no_run
//! use xzzpcb_board::decode_file;
//!
//! let decoded = decode_file("board.pcb")?;
//! println!("{} entities", decoded.board.entities.len());
//! for part in decoded.board.parts() {
//!     println!("part {:?}: {} pins", part.group_name(), part.pins().count());
//! }
//! for diag in &decoded.diagnostics {
//!     eprintln!("warning: {diag}");
//! }
//! # Ok::<(), xzzpcb_board::Error>(())
//! ```

mod blocks;
mod board;
mod crypto;
mod decode;
mod error;
mod obfuscation;
pub mod part;
mod progress;

pub use blocks::{MAIN_REGION_OFFSET, MAIN_SIZE_OFFSET};
pub use board::{
    Arc, Board, Entity, Segment, Text, Via, LAYER_BOARD_OUTLINE, LAYER_PART_OUTLINES, LAYER_PINS,
    LAYER_SILKSCREEN, MAX_COPPER_LAYER, NO_NET,
};
pub use crypto::{decrypt_part, DecryptError, DES_BLOCK_SIZE, PART_DES_KEY};
pub use decode::{
    decode, decode_file, decode_with_progress, extract_part_payloads, Decoded, PartPayload,
    HEADER_SIZE,
};
pub use error::{Diagnostic, Error, Result};
pub use obfuscation::{deobfuscate_in_place, is_obfuscated, XOR_KEY_OFFSET, XOR_SENTINEL};
pub use part::{Part, PartSubBlock, Pin};
pub use progress::{Progress, Stage, PROGRESS_BLOCK_INTERVAL};
