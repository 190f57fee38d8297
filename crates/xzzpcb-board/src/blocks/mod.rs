//! Outer tagged-block stream.
//!
//! The main block region starts at offset 0x44 and is bounded by the size
//! field at 0x40. It is a sequence of one-byte tags, each followed by a
//! `u32` block size and the block body; runs of four zero bytes between
//! blocks are padding. The walker dispatches each tag to its parser and
//! stops at the first tag it does not know, recording a diagnostic, since
//! the rest of the region cannot be re-framed.

mod raw;

use xzzpcb_common::BinaryReader;

use crate::board::{Arc, Entity, Segment, Text, Via};
use crate::crypto;
use crate::error::Diagnostic;
use crate::part::{self, Part};
use crate::progress::{Progress, Stage, PROGRESS_BLOCK_INTERVAL};
use raw::{RawArc, RawSegment, RawText, RawVia};

/// Absolute offset of the main-region size field.
pub const MAIN_SIZE_OFFSET: usize = 0x40;

/// Absolute offset where the main block region begins.
pub const MAIN_REGION_OFFSET: usize = 0x44;

/// Outer block tags.
pub(crate) mod tag {
    pub const ARC: u8 = 0x01;
    pub const VIA: u8 = 0x02;
    /// Length-prefixed block of unknown purpose, skipped.
    pub const SKIP_03: u8 = 0x03;
    /// Bare marker tag, no payload.
    pub const MARKER_04: u8 = 0x04;
    pub const SEGMENT: u8 = 0x05;
    pub const TEXT: u8 = 0x06;
    /// DES-encrypted part descriptor.
    pub const DATA: u8 = 0x07;
    /// Bare marker tag, no payload.
    pub const MARKER_08: u8 = 0x08;
    /// Length-prefixed block of unknown purpose, skipped.
    pub const SKIP_09: u8 = 0x09;
}

/// Walk the main block region and decode every entity in file order.
///
/// Never fails: problems are recorded in `diagnostics` and the entities
/// decoded so far are returned.
pub(crate) fn walk_main_region<F>(
    data: &[u8],
    main_size: usize,
    diagnostics: &mut Vec<Diagnostic>,
    progress: &mut F,
) -> Vec<Entity>
where
    F: FnMut(Progress),
{
    let mut reader = BinaryReader::new_at(data, MAIN_REGION_OFFSET);
    let end = MAIN_REGION_OFFSET.saturating_add(main_size);
    let mut entities = Vec::new();
    let mut blocks_seen = 0usize;

    while reader.position() < end && reader.position() < data.len() {
        // Four zero bytes between blocks are padding.
        if let Ok(0) = reader.peek_u32() {
            let _ = reader.skip(4);
            continue;
        }

        let tag_offset = reader.position();
        let tag = match reader.read_u8() {
            Ok(tag) => tag,
            Err(err) => {
                diagnostics.push(err.into());
                break;
            }
        };

        let parsed = match tag {
            tag::ARC => parse_arc(&mut reader).map(Some),
            tag::VIA => parse_via(&mut reader).map(Some),
            tag::SEGMENT => parse_segment(&mut reader).map(Some),
            tag::TEXT => parse_text(&mut reader).map(Some),
            tag::DATA => parse_data(&mut reader, diagnostics).map(Some),
            tag::MARKER_04 | tag::MARKER_08 => Ok(None),
            tag::SKIP_03 | tag::SKIP_09 => skip_block(&mut reader).map(|_| None),
            other => {
                tracing::warn!(offset = tag_offset, tag = other, "unknown block tag, stopping walk");
                diagnostics.push(Diagnostic::UnknownTag {
                    offset: tag_offset,
                    tag: other,
                });
                break;
            }
        };

        match parsed {
            Ok(Some(entity)) => entities.push(entity),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(offset = tag_offset, tag, %err, "block truncated, stopping walk");
                diagnostics.push(err.into());
                break;
            }
        }

        blocks_seen += 1;
        if blocks_seen % PROGRESS_BLOCK_INTERVAL == 0 {
            progress(Progress {
                stage: Stage::Walk,
                percent: walk_percent(reader.position(), end),
            });
        }
    }

    entities
}

/// Map a cursor position within the main region onto the 10..=95 band the
/// walk stage occupies.
fn walk_percent(position: usize, end: usize) -> u8 {
    let span = end.saturating_sub(MAIN_REGION_OFFSET).max(1);
    let done = position.min(end).saturating_sub(MAIN_REGION_OFFSET);
    (10 + done * 85 / span).min(95) as u8
}

/// Read a block's size prefix, validate that the body fits in the buffer,
/// and return the absolute offset one past the body.
pub(crate) fn read_frame(reader: &mut BinaryReader<'_>) -> xzzpcb_common::Result<usize> {
    let size = reader.read_u32()? as usize;
    if reader.remaining() < size {
        return Err(xzzpcb_common::Error::Overrun {
            offset: reader.position(),
            needed: size,
            available: reader.remaining(),
        });
    }
    Ok(reader.position() + size)
}

/// Skip a length-prefixed block. A zero size advances only the size field.
pub(crate) fn skip_block(reader: &mut BinaryReader<'_>) -> xzzpcb_common::Result<()> {
    let frame_end = read_frame(reader)?;
    reader.seek(frame_end);
    Ok(())
}

fn parse_arc(reader: &mut BinaryReader<'_>) -> xzzpcb_common::Result<Entity> {
    let frame_end = read_frame(reader)?;
    let body: RawArc = reader.read_struct()?;
    reader.seek(frame_end);

    Ok(Entity::Arc(Arc {
        layer: body.layer.get(),
        cx: body.cx.get(),
        cy: body.cy.get(),
        r: body.r.get(),
        angle_start: body.angle_start.get(),
        angle_end: body.angle_end.get(),
        scale: body.scale.get(),
        net_index: body.net_index.get(),
    }))
}

fn parse_via(reader: &mut BinaryReader<'_>) -> xzzpcb_common::Result<Entity> {
    let frame_end = read_frame(reader)?;
    let body: RawVia = reader.read_struct()?;
    let text = reader.read_string_lossy(body.text_len.get() as usize)?;
    reader.seek(frame_end);

    Ok(Entity::Via(Via {
        x: body.x.get(),
        y: body.y.get(),
        outer_radius: body.outer_radius.get(),
        inner_radius: body.inner_radius.get(),
        layer_a: body.layer_a.get(),
        layer_b: body.layer_b.get(),
        net_index: body.net_index.get(),
        text,
    }))
}

fn parse_segment(reader: &mut BinaryReader<'_>) -> xzzpcb_common::Result<Entity> {
    let frame_end = read_frame(reader)?;
    let body: RawSegment = reader.read_struct()?;
    reader.seek(frame_end);

    Ok(Entity::Segment(Segment {
        layer: body.layer.get(),
        x1: body.x1.get(),
        y1: body.y1.get(),
        x2: body.x2.get(),
        y2: body.y2.get(),
        scale: body.scale.get(),
        net_index: body.net_index.get(),
    }))
}

fn parse_text(reader: &mut BinaryReader<'_>) -> xzzpcb_common::Result<Entity> {
    let frame_end = read_frame(reader)?;
    let body: RawText = reader.read_struct()?;
    let text = reader.read_string_lossy(body.text_len.get() as usize)?;
    reader.seek(frame_end);

    Ok(Entity::Text(Text {
        pos_x: body.pos_x.get(),
        pos_y: body.pos_y.get(),
        text_size: body.text_size.get(),
        divider: body.divider.get(),
        empty: body.empty.get(),
        one: body.one.get(),
        body: text,
    }))
}

/// Parse a DATA block: decrypt the payload and decode the part inside.
///
/// A decrypt failure is recoverable: the part keeps its ciphertext and an
/// empty sub-block list, and the walk continues with the next block.
fn parse_data(
    reader: &mut BinaryReader<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) -> xzzpcb_common::Result<Entity> {
    let frame_end = read_frame(reader)?;
    let payload_offset = reader.position();
    let ciphertext = reader.read_bytes(frame_end - payload_offset)?;
    reader.seek(frame_end);

    let part = match crypto::decrypt_part(ciphertext) {
        Ok(plaintext) => part::parse_part(&plaintext, diagnostics),
        Err(err) => {
            tracing::warn!(offset = payload_offset, %err, "part payload decryption failed");
            diagnostics.push(Diagnostic::DecryptFailure {
                offset: payload_offset,
                source: err,
            });
            Part::undecrypted(ciphertext.to_vec())
        }
    };

    Ok(Entity::Part(part))
}
