//! Fixed-layout block bodies.
//!
//! Each struct mirrors the wire layout of one outer block body after its
//! size prefix. Endianness is carried by the field types, so these parse
//! correctly on any host.

use zerocopy::byteorder::little_endian::{I32, U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// ARC block body (tag 0x01).
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct RawArc {
    pub layer: U32,
    pub cx: U32,
    pub cy: U32,
    pub r: I32,
    pub angle_start: I32,
    pub angle_end: I32,
    pub scale: I32,
    pub net_index: I32,
}

/// VIA block body (tag 0x02), up to the length-prefixed text that follows.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct RawVia {
    pub x: I32,
    pub y: I32,
    pub outer_radius: I32,
    pub inner_radius: I32,
    pub layer_a: U32,
    pub layer_b: U32,
    pub net_index: U32,
    pub text_len: U32,
}

/// SEGMENT block body (tag 0x05).
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct RawSegment {
    pub layer: U32,
    pub x1: I32,
    pub y1: I32,
    pub x2: I32,
    pub y2: I32,
    pub scale: I32,
    pub net_index: U32,
}

/// TEXT block body (tag 0x06), up to the length-prefixed text that follows.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct RawText {
    pub unknown1: U32,
    pub pos_x: U32,
    pub pos_y: U32,
    pub text_size: U32,
    pub divider: U32,
    pub empty: U32,
    pub one: U16,
    pub text_len: U32,
}
