//! Decoder entry points.

use std::fs;
use std::path::Path;

use xzzpcb_common::BinaryReader;

use crate::blocks::{self, tag, MAIN_REGION_OFFSET, MAIN_SIZE_OFFSET};
use crate::board::Board;
use crate::crypto;
use crate::error::{Diagnostic, Result};
use crate::obfuscation;
use crate::part;
use crate::progress::{Progress, Stage};

/// Size of the fixed file header, through the main-region size field.
pub const HEADER_SIZE: usize = MAIN_REGION_OFFSET;

/// The outcome of decoding: the board plus everything that went wrong.
///
/// Decoding is total; a malformed or truncated file yields the entities
/// that could be decoded and one diagnostic per recovered problem.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub board: Board,
    pub diagnostics: Vec<Diagnostic>,
}

/// Decode a board file held in memory.
///
/// The buffer is taken by value because the XOR layer is removed in place.
pub fn decode(data: Vec<u8>) -> Decoded {
    decode_with_progress(data, |_| {})
}

/// Decode a board file, reporting progress through a callback.
///
/// The callback fires at each stage boundary and every
/// [`crate::progress::PROGRESS_BLOCK_INTERVAL`] blocks during the walk. The
/// decoder never depends on its behavior.
pub fn decode_with_progress<F>(mut data: Vec<u8>, mut progress: F) -> Decoded
where
    F: FnMut(Progress),
{
    let mut diagnostics = Vec::new();
    let mut board = Board::default();

    progress(Progress {
        stage: Stage::Init,
        percent: 0,
    });

    if data.len() < HEADER_SIZE {
        tracing::warn!(len = data.len(), "file shorter than the fixed header");
        diagnostics.push(Diagnostic::Overrun {
            offset: 0,
            needed: HEADER_SIZE,
            available: data.len(),
        });
        progress(Progress {
            stage: Stage::Complete,
            percent: 100,
        });
        return Decoded { board, diagnostics };
    }

    if let Some(sentinel) = obfuscation::deobfuscate_in_place(&mut data) {
        board.diode_readings = Some(data[sentinel..].to_vec());
    }
    progress(Progress {
        stage: Stage::Deobfuscate,
        percent: 5,
    });

    let mut reader = BinaryReader::new_at(&data, MAIN_SIZE_OFFSET);
    let main_size = match reader.read_u32() {
        Ok(size) => size as usize,
        Err(err) => {
            diagnostics.push(err.into());
            return Decoded { board, diagnostics };
        }
    };
    progress(Progress {
        stage: Stage::Header,
        percent: 10,
    });

    tracing::debug!(main_size, "walking main block region");
    board.entities = blocks::walk_main_region(&data, main_size, &mut diagnostics, &mut progress);

    progress(Progress {
        stage: Stage::Complete,
        percent: 100,
    });
    Decoded { board, diagnostics }
}

/// Read and decode a board file from disk.
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<Decoded> {
    let data = fs::read(path)?;
    Ok(decode(data))
}

/// Decrypted plaintext of one DATA block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartPayload {
    /// Absolute file offset of the encrypted payload.
    pub offset: usize,
    /// Group name from the payload header, when one decodes.
    pub group_name: Option<String>,
    pub plaintext: Vec<u8>,
}

/// Decrypt every DATA block without decoding the rest of the board.
///
/// This is the extraction path: it walks the outer stream only to frame
/// blocks, skips everything that is not a DATA block, and returns each
/// part's plaintext payload in file order.
pub fn extract_part_payloads(mut data: Vec<u8>) -> (Vec<PartPayload>, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let mut payloads = Vec::new();

    if data.len() < HEADER_SIZE {
        diagnostics.push(Diagnostic::Overrun {
            offset: 0,
            needed: HEADER_SIZE,
            available: data.len(),
        });
        return (payloads, diagnostics);
    }

    obfuscation::deobfuscate_in_place(&mut data);

    let mut reader = BinaryReader::new_at(&data, MAIN_SIZE_OFFSET);
    let main_size = match reader.read_u32() {
        Ok(size) => size as usize,
        Err(err) => {
            diagnostics.push(err.into());
            return (payloads, diagnostics);
        }
    };
    let end = MAIN_REGION_OFFSET.saturating_add(main_size);

    while reader.position() < end && reader.position() < data.len() {
        if let Ok(0) = reader.peek_u32() {
            let _ = reader.skip(4);
            continue;
        }

        let tag_offset = reader.position();
        let step = match reader.read_u8() {
            Ok(tag::DATA) => read_payload(&mut reader, &mut payloads, &mut diagnostics),
            Ok(tag::MARKER_04) | Ok(tag::MARKER_08) => Ok(()),
            Ok(tag::ARC) | Ok(tag::VIA) | Ok(tag::SKIP_03) | Ok(tag::SEGMENT)
            | Ok(tag::TEXT) | Ok(tag::SKIP_09) => blocks::skip_block(&mut reader),
            Ok(other) => {
                diagnostics.push(Diagnostic::UnknownTag {
                    offset: tag_offset,
                    tag: other,
                });
                break;
            }
            Err(err) => Err(err),
        };

        if let Err(err) = step {
            diagnostics.push(err.into());
            break;
        }
    }

    (payloads, diagnostics)
}

fn read_payload(
    reader: &mut BinaryReader<'_>,
    payloads: &mut Vec<PartPayload>,
    diagnostics: &mut Vec<Diagnostic>,
) -> xzzpcb_common::Result<()> {
    let frame_end = blocks::read_frame(reader)?;
    let offset = reader.position();
    let ciphertext = reader.read_bytes(frame_end - offset)?;
    reader.seek(frame_end);

    match crypto::decrypt_part(ciphertext) {
        Ok(plaintext) => {
            let mut scratch = Vec::new();
            let group_name = part::parse_part(&plaintext, &mut scratch)
                .group_name()
                .map(str::to_owned);
            payloads.push(PartPayload {
                offset,
                group_name,
                plaintext,
            });
        }
        Err(err) => {
            diagnostics.push(Diagnostic::DecryptFailure {
                offset,
                source: err,
            });
        }
    }
    Ok(())
}
