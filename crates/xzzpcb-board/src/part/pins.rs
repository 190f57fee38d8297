//! Pin array sub-block.

use xzzpcb_common::BinaryReader;

/// Bytes between a pin's shape field and its net index whose meaning is
/// unknown. They are preserved verbatim on each [`Pin`].
pub const PIN_RESERVED_LEN: usize = 23;

/// Bytes trailing each pin record after the net index.
const PIN_TRAILER_LEN: usize = 13;

/// One contact on a part.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pin {
    pub un1: u32,
    pub x: u32,
    pub y: u32,
    /// Drill diameter; zero for surface-mount pins.
    pub inner_diameter: u32,
    pub rotation: u32,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub shape: u8,
    /// Opaque bytes following the shape field, kept for forward
    /// compatibility.
    pub reserved: [u8; PIN_RESERVED_LEN],
    pub net_index: u32,
    /// True when the pin is through-hole, i.e. `inner_diameter != 0`.
    pub is_thru_hole: bool,
}

/// Read a pin array (sub-tag 0x09).
///
/// The array carries no count; pins repeat while at least `block_size`
/// bytes remain in the part view. Returns the pins read so far together
/// with the overrun, if one cut the array short.
pub(crate) fn read_pin_array(
    reader: &mut BinaryReader<'_>,
) -> (Vec<Pin>, Option<xzzpcb_common::Error>) {
    let block_size = match reader.read_u32() {
        Ok(size) => size as usize,
        Err(err) => return (Vec::new(), Some(err)),
    };

    let mut pins = Vec::new();
    while reader.position().saturating_add(block_size) <= reader.len() {
        match read_pin(reader) {
            Ok(pin) => pins.push(pin),
            Err(err) => return (pins, Some(err)),
        }
    }
    (pins, None)
}

fn read_pin(reader: &mut BinaryReader<'_>) -> xzzpcb_common::Result<Pin> {
    let un1 = reader.read_u32()?;
    let x = reader.read_u32()?;
    let y = reader.read_u32()?;
    let inner_diameter = reader.read_u32()?;
    let rotation = reader.read_u32()?;
    let name_len = reader.read_u32()? as usize;
    let name = reader.read_string_lossy(name_len)?;
    let width = reader.read_u32()?;
    let height = reader.read_u32()?;
    let shape = reader.read_u8()?;
    let mut reserved = [0u8; PIN_RESERVED_LEN];
    reserved.copy_from_slice(reader.read_bytes(PIN_RESERVED_LEN)?);
    let net_index = reader.read_u32()?;
    reader.skip(PIN_TRAILER_LEN)?;

    Ok(Pin {
        un1,
        x,
        y,
        inner_diameter,
        rotation,
        name,
        width,
        height,
        shape,
        reserved,
        net_index,
        is_thru_hole: inner_diameter != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Wire bytes of one pin record.
    fn pin_bytes(name: &str, inner_diameter: u32, net_index: u32) -> Vec<u8> {
        let mut data = Vec::new();
        for value in [7u32, 100, 200, inner_diameter, 0] {
            data.extend_from_slice(&value.to_le_bytes());
        }
        data.extend_from_slice(&(name.len() as u32).to_le_bytes());
        data.extend_from_slice(name.as_bytes());
        data.extend_from_slice(&30u32.to_le_bytes()); // width
        data.extend_from_slice(&40u32.to_le_bytes()); // height
        data.push(2); // shape
        data.extend_from_slice(&[0xEE; PIN_RESERVED_LEN]);
        data.extend_from_slice(&net_index.to_le_bytes());
        data.extend_from_slice(&[0u8; 13]);
        data
    }

    #[test]
    fn test_read_pins() {
        let mut data = Vec::new();
        data.extend_from_slice(&74u32.to_le_bytes()); // per-pin block size
        data.extend_from_slice(&pin_bytes("1", 12, 3));
        data.extend_from_slice(&pin_bytes("A2", 0, 0));

        let mut reader = BinaryReader::new(&data);
        let (pins, err) = read_pin_array(&mut reader);

        assert!(err.is_none());
        assert_eq!(pins.len(), 2);
        assert_eq!(pins[0].name, "1");
        assert!(pins[0].is_thru_hole);
        assert_eq!(pins[0].net_index, 3);
        assert_eq!(pins[0].reserved, [0xEE; PIN_RESERVED_LEN]);
        assert_eq!(pins[1].name, "A2");
        assert!(!pins[1].is_thru_hole);
    }

    #[test]
    fn test_truncated_pin_keeps_prefix() {
        let mut data = Vec::new();
        data.extend_from_slice(&74u32.to_le_bytes());
        data.extend_from_slice(&pin_bytes("1", 0, 0));
        // Enough bytes to start another pin, but its record is cut short.
        let second = pin_bytes("LONG_PIN_NAME_0123456789", 5, 1);
        data.extend_from_slice(&second[..80]);

        let mut reader = BinaryReader::new(&data);
        let (pins, err) = read_pin_array(&mut reader);

        assert_eq!(pins.len(), 1);
        assert!(err.is_some());
    }

    #[test]
    fn test_name_length_matches_size_field() {
        let mut data = Vec::new();
        data.extend_from_slice(&80u32.to_le_bytes());
        data.extend_from_slice(&pin_bytes("GND_PAD", 0, 9));

        let mut reader = BinaryReader::new(&data);
        let (pins, err) = read_pin_array(&mut reader);

        assert!(err.is_none());
        assert_eq!(pins[0].name.len(), 7);
    }
}
