//! Decrypted part payloads.
//!
//! A DATA block's plaintext starts with a [`PartHeader`] whose `part_size`
//! bounds the rest of the payload. After the header comes a stream of
//! one-byte sub-tags, each introducing a sized sub-block: outline arcs and
//! lines, text labels, and pin arrays. The walk stops at the first unknown
//! sub-tag or overrun, keeping whatever was decoded up to that point.

mod geometry;
mod header;
mod label;
mod pins;

pub use geometry::{PartArc, PartLine};
pub use header::PartHeader;
pub use label::PartLabel;
pub use pins::{Pin, PIN_RESERVED_LEN};

use xzzpcb_common::BinaryReader;

use crate::error::Diagnostic;

/// Part sub-block tags.
mod sub_tag {
    pub const ARC: u8 = 0x01;
    pub const LINE: u8 = 0x05;
    pub const LABEL: u8 = 0x06;
    pub const PINS: u8 = 0x09;
}

/// A component on the board: header, outline geometry, labels, and pins.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Part {
    /// Header of the decrypted payload. `None` when the payload failed to
    /// decrypt or was empty.
    pub header: Option<PartHeader>,
    /// Sub-blocks in payload order.
    pub sub_blocks: Vec<PartSubBlock>,
    /// The raw encrypted payload, kept only when decryption failed.
    pub ciphertext: Option<Vec<u8>>,
}

impl Part {
    /// A part whose payload could not be decrypted.
    pub(crate) fn undecrypted(ciphertext: Vec<u8>) -> Self {
        Self {
            header: None,
            sub_blocks: Vec::new(),
            ciphertext: Some(ciphertext),
        }
    }

    /// The part's group name, when the header was decoded.
    pub fn group_name(&self) -> Option<&str> {
        self.header.as_ref().map(|h| h.group_name.as_str())
    }

    /// Iterate over all pins across the part's pin arrays.
    pub fn pins(&self) -> impl Iterator<Item = &Pin> {
        self.sub_blocks.iter().flat_map(|sub| match sub {
            PartSubBlock::PinArray { pins } => pins.as_slice(),
            _ => &[],
        })
    }
}

/// One sub-block of a decrypted part payload.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum PartSubBlock {
    Arc(PartArc),
    Line(PartLine),
    Label(PartLabel),
    PinArray { pins: Vec<Pin> },
}

/// Decode a decrypted part payload.
///
/// Never fails: problems are recorded in `diagnostics` (with offsets
/// relative to the payload) and the part decoded so far is returned. An
/// empty payload or a zero `part_size` yields an empty part.
pub(crate) fn parse_part(plaintext: &[u8], diagnostics: &mut Vec<Diagnostic>) -> Part {
    if plaintext.is_empty() {
        return Part::default();
    }

    let mut reader = BinaryReader::new(plaintext);
    let part_size = match reader.read_u32() {
        Ok(size) => size,
        Err(err) => {
            diagnostics.push(err.into());
            return Part::default();
        }
    };
    if part_size == 0 {
        return Part::default();
    }

    // The header's size field bounds the payload; everything past
    // `part_size + 4` is padding from the cipher layer.
    let view_len = (part_size as usize).saturating_add(4);
    let view = if view_len <= plaintext.len() {
        &plaintext[..view_len]
    } else {
        diagnostics.push(Diagnostic::Overrun {
            offset: 0,
            needed: view_len,
            available: plaintext.len(),
        });
        plaintext
    };

    let mut reader = BinaryReader::new_at(view, 4);
    let header = match PartHeader::read(&mut reader, part_size) {
        Ok(header) => header,
        Err(err) => {
            diagnostics.push(err.into());
            return Part::default();
        }
    };

    let mut sub_blocks = Vec::new();
    while !reader.is_empty() {
        let tag_offset = reader.position();
        let tag = match reader.read_u8() {
            Ok(tag) => tag,
            Err(err) => {
                diagnostics.push(err.into());
                break;
            }
        };

        let parsed = match tag {
            sub_tag::ARC => PartArc::read(&mut reader).map(PartSubBlock::Arc),
            sub_tag::LINE => PartLine::read(&mut reader).map(PartSubBlock::Line),
            sub_tag::LABEL => PartLabel::read(&mut reader).map(PartSubBlock::Label),
            sub_tag::PINS => {
                let (pins, err) = pins::read_pin_array(&mut reader);
                if !pins.is_empty() {
                    sub_blocks.push(PartSubBlock::PinArray { pins });
                }
                match err {
                    None => continue,
                    Some(err) => {
                        diagnostics.push(err.into());
                        break;
                    }
                }
            }
            other => {
                tracing::warn!(offset = tag_offset, tag = other, "unknown part sub-tag, stopping walk");
                diagnostics.push(Diagnostic::UnknownSubTag {
                    offset: tag_offset,
                    tag: other,
                });
                break;
            }
        };

        match parsed {
            Ok(sub) => sub_blocks.push(sub),
            Err(err) => {
                diagnostics.push(err.into());
                break;
            }
        }
    }

    Part {
        header: Some(header),
        sub_blocks,
        ciphertext: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(group_name: &str, body_len: usize) -> Vec<u8> {
        // part_size covers everything after the size field itself.
        let part_size = (4 + 4 + 4 + 4 + 2 + 4 + group_name.len() + body_len) as u32;
        let mut data = Vec::new();
        data.extend_from_slice(&part_size.to_le_bytes());
        data.extend_from_slice(&[0u8; 4]);
        data.extend_from_slice(&500u32.to_le_bytes());
        data.extend_from_slice(&600u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&[1, 0]);
        data.extend_from_slice(&(group_name.len() as u32).to_le_bytes());
        data.extend_from_slice(group_name.as_bytes());
        data
    }

    fn line_bytes() -> Vec<u8> {
        let mut data = vec![sub_tag::LINE];
        data.extend_from_slice(&24u32.to_le_bytes());
        for value in [29u32, 1, 2, 3, 4, 1] {
            data.extend_from_slice(&value.to_le_bytes());
        }
        data.extend_from_slice(&[0u8; 4]);
        data
    }

    #[test]
    fn test_empty_payload() {
        let mut diagnostics = Vec::new();
        let part = parse_part(&[], &mut diagnostics);
        assert_eq!(part, Part::default());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_zero_part_size() {
        let mut diagnostics = Vec::new();
        let part = parse_part(&[0, 0, 0, 0], &mut diagnostics);
        assert!(part.header.is_none());
        assert!(part.sub_blocks.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_header_and_line() {
        let body = line_bytes();
        let mut payload = header_bytes("R33", body.len());
        payload.extend_from_slice(&body);

        let mut diagnostics = Vec::new();
        let part = parse_part(&payload, &mut diagnostics);

        assert!(diagnostics.is_empty());
        assert_eq!(part.group_name(), Some("R33"));
        assert_eq!(part.sub_blocks.len(), 1);
        assert!(matches!(part.sub_blocks[0], PartSubBlock::Line(_)));
    }

    #[test]
    fn test_unknown_sub_tag_stops_walk() {
        let mut body = line_bytes();
        body.push(0xAB);
        body.extend_from_slice(&[0u8; 8]);
        let body_len = body.len();
        let mut payload = header_bytes("U7", body_len);
        payload.extend_from_slice(&body);

        let mut diagnostics = Vec::new();
        let part = parse_part(&payload, &mut diagnostics);

        assert_eq!(part.sub_blocks.len(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            diagnostics[0],
            Diagnostic::UnknownSubTag { tag: 0xAB, .. }
        ));
    }

    #[test]
    fn test_part_size_beyond_payload() {
        // Header promises more bytes than the payload holds.
        let mut payload = header_bytes("J1", 64);
        let line = line_bytes();
        payload.extend_from_slice(&line);

        let mut diagnostics = Vec::new();
        let part = parse_part(&payload, &mut diagnostics);

        assert_eq!(part.group_name(), Some("J1"));
        assert_eq!(part.sub_blocks.len(), 1);
        assert!(matches!(diagnostics[0], Diagnostic::Overrun { .. }));
    }

    #[test]
    fn test_truncated_header() {
        let payload = [2u8, 0, 0, 0, 0, 0];
        let mut diagnostics = Vec::new();
        let part = parse_part(&payload, &mut diagnostics);

        assert!(part.header.is_none());
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(diagnostics[0], Diagnostic::Overrun { .. }));
    }
}
