//! Part outline geometry sub-blocks.

use xzzpcb_common::{BinaryReader, Result};

use crate::board::ANGLE_DIVISOR;

/// An arc in a part outline (sub-tag 0x01).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartArc {
    pub layer: u32,
    pub x: u32,
    pub y: u32,
    pub radius: u32,
    /// Start angle in tenths of milli-degrees.
    pub angle_start: u32,
    /// End angle in tenths of milli-degrees.
    pub angle_end: u32,
    pub scale: u32,
    pub extra: u32,
}

impl PartArc {
    pub(crate) fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let _block_size = reader.read_u32()?;
        Ok(Self {
            layer: reader.read_u32()?,
            x: reader.read_u32()?,
            y: reader.read_u32()?,
            radius: reader.read_u32()?,
            angle_start: reader.read_u32()?,
            angle_end: reader.read_u32()?,
            scale: reader.read_u32()?,
            extra: reader.read_u32()?,
        })
    }

    /// Start angle in degrees.
    pub fn start_degrees(&self) -> f64 {
        self.angle_start as f64 / ANGLE_DIVISOR
    }

    /// End angle in degrees.
    pub fn end_degrees(&self) -> f64 {
        self.angle_end as f64 / ANGLE_DIVISOR
    }
}

/// A line in a part outline (sub-tag 0x05).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartLine {
    pub layer: u32,
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
    pub scale: u32,
}

impl PartLine {
    pub(crate) fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let _block_size = reader.read_u32()?;
        let line = Self {
            layer: reader.read_u32()?,
            x1: reader.read_u32()?,
            y1: reader.read_u32()?,
            x2: reader.read_u32()?,
            y2: reader.read_u32()?,
            scale: reader.read_u32()?,
        };
        reader.skip(4)?; // trailing padding
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_line_consumes_trailing_padding() {
        let mut data = Vec::new();
        data.extend_from_slice(&24u32.to_le_bytes());
        for value in [29u32, 10, 20, 30, 40, 5] {
            data.extend_from_slice(&value.to_le_bytes());
        }
        data.extend_from_slice(&[0u8; 4]);

        let mut reader = BinaryReader::new(&data);
        let line = PartLine::read(&mut reader).unwrap();

        assert_eq!(line.layer, 29);
        assert_eq!((line.x1, line.y1, line.x2, line.y2), (10, 20, 30, 40));
        assert_eq!(line.scale, 5);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_arc() {
        let mut data = Vec::new();
        data.extend_from_slice(&32u32.to_le_bytes());
        for value in [29u32, 100, 200, 50, 0, 1_800_000, 2, 0] {
            data.extend_from_slice(&value.to_le_bytes());
        }

        let mut reader = BinaryReader::new(&data);
        let arc = PartArc::read(&mut reader).unwrap();

        assert_eq!(arc.radius, 50);
        assert_eq!(arc.end_degrees(), 180.0);
        assert!(reader.is_empty());
    }
}
