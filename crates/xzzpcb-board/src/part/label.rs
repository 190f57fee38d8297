//! Part label sub-block.

use xzzpcb_common::{BinaryReader, Result};

/// A text label attached to a part (sub-tag 0x06).
///
/// Label bytes may be GB2312-encoded; they are decoded lossily here and
/// re-interpreted by consumers that understand that encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartLabel {
    pub layer: u32,
    pub x: u32,
    pub y: u32,
    pub font_size: u32,
    pub font_scale: u32,
    pub font_rotation: u32,
    pub visibility: u8,
    pub text: String,
}

impl PartLabel {
    pub(crate) fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let _block_size = reader.read_u32()?;
        let layer = reader.read_u32()?;
        let x = reader.read_u32()?;
        let y = reader.read_u32()?;
        let font_size = reader.read_u32()?;
        let font_scale = reader.read_u32()?;
        let font_rotation = reader.read_u32()?;
        let visibility = reader.read_u8()?;
        reader.skip(1)?; // visibility occupies two bytes of stream
        let text_len = reader.read_u32()? as usize;
        let text = reader.read_string_lossy(text_len)?;

        Ok(Self {
            layer,
            x,
            y,
            font_size,
            font_scale,
            font_rotation,
            visibility,
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_label() {
        let mut data = Vec::new();
        data.extend_from_slice(&0u32.to_le_bytes()); // block size, unused
        for value in [17u32, 5, 6, 12, 100, 0] {
            data.extend_from_slice(&value.to_le_bytes());
        }
        data.push(1);
        data.push(0);
        data.extend_from_slice(&3u32.to_le_bytes());
        data.extend_from_slice(b"C12");

        let mut reader = BinaryReader::new(&data);
        let label = PartLabel::read(&mut reader).unwrap();

        assert_eq!(label.layer, 17);
        assert_eq!(label.font_size, 12);
        assert_eq!(label.visibility, 1);
        assert_eq!(label.text, "C12");
        assert!(reader.is_empty());
    }

    #[test]
    fn test_empty_label() {
        let mut data = Vec::new();
        data.extend_from_slice(&0u32.to_le_bytes());
        for value in [17u32, 0, 0, 0, 0, 0] {
            data.extend_from_slice(&value.to_le_bytes());
        }
        data.extend_from_slice(&[0, 0]);
        data.extend_from_slice(&0u32.to_le_bytes());

        let mut reader = BinaryReader::new(&data);
        let label = PartLabel::read(&mut reader).unwrap();
        assert_eq!(label.text, "");
        assert!(reader.is_empty());
    }
}
