//! Part header.

use xzzpcb_common::{BinaryReader, Result};

/// Fixed header at the start of every decrypted part payload.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartHeader {
    /// Size of the part payload after the size field itself.
    pub part_size: u32,
    pub part_x: u32,
    pub part_y: u32,
    pub rotation: u32,
    pub visibility: u8,
    /// Component group name, e.g. the footprint or refdes group.
    pub group_name: String,
}

impl PartHeader {
    /// Read the header fields that follow the already-consumed size field.
    pub(crate) fn read(reader: &mut BinaryReader<'_>, part_size: u32) -> Result<Self> {
        reader.skip(4)?; // padding after the size field
        let part_x = reader.read_u32()?;
        let part_y = reader.read_u32()?;
        let rotation = reader.read_u32()?;
        let visibility = reader.read_u8()?;
        reader.skip(1)?; // visibility occupies two bytes of stream
        let name_len = reader.read_u32()? as usize;
        let group_name = reader.read_string_lossy(name_len)?;

        Ok(Self {
            part_size,
            part_x,
            part_y,
            rotation,
            visibility,
            group_name,
        })
    }
}
