//! In-memory board model.
//!
//! A [`Board`] is an ordered list of [`Entity`] values in file order. All
//! numeric fields are passed through from the wire unchanged; layer and net
//! integers keep whatever meaning the producing tool gave them, with the
//! well-known assignments exported as constants below.

use crate::part::Part;

/// Net index meaning "no net".
pub const NO_NET: u32 = 0;

/// Highest layer index that designates a copper layer.
pub const MAX_COPPER_LAYER: u32 = 16;

/// Silkscreen layer.
pub const LAYER_SILKSCREEN: u32 = 17;

/// Board outline layer.
pub const LAYER_BOARD_OUTLINE: u32 = 28;

/// Part outline layer.
pub const LAYER_PART_OUTLINES: u32 = 29;

/// Pin layer.
pub const LAYER_PINS: u32 = 32;

/// Angles are stored in tenths of milli-degrees.
pub(crate) const ANGLE_DIVISOR: f64 = 10_000.0;

/// A decoded board: every entity of the main block region, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    /// Entities in the order their blocks appear in the file.
    pub entities: Vec<Entity>,
    /// Raw bytes of the trailing diode-readings region, when the file was
    /// obfuscated and carried one. Starts at the sentinel.
    pub diode_readings: Option<Vec<u8>>,
}

impl Board {
    /// Iterate over the parts on the board.
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.entities.iter().filter_map(|e| match e {
            Entity::Part(part) => Some(part),
            _ => None,
        })
    }
}

/// One decoded entity of the outer block stream.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Entity {
    Arc(Arc),
    Via(Via),
    Segment(Segment),
    Text(Text),
    Part(Part),
}

impl Entity {
    /// Short name of the entity kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Entity::Arc(_) => "arc",
            Entity::Via(_) => "via",
            Entity::Segment(_) => "segment",
            Entity::Text(_) => "text",
            Entity::Part(_) => "part",
        }
    }
}

/// A circular arc on a copper or silkscreen layer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Arc {
    pub layer: u32,
    pub cx: u32,
    pub cy: u32,
    pub r: i32,
    /// Start angle in tenths of milli-degrees.
    pub angle_start: i32,
    /// End angle in tenths of milli-degrees.
    pub angle_end: i32,
    pub scale: i32,
    pub net_index: i32,
}

impl Arc {
    /// Start angle in degrees.
    pub fn start_degrees(&self) -> f64 {
        self.angle_start as f64 / ANGLE_DIVISOR
    }

    /// End angle in degrees.
    pub fn end_degrees(&self) -> f64 {
        self.angle_end as f64 / ANGLE_DIVISOR
    }
}

/// A plated hole connecting two copper layers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Via {
    pub x: i32,
    pub y: i32,
    pub outer_radius: i32,
    pub inner_radius: i32,
    pub layer_a: u32,
    pub layer_b: u32,
    pub net_index: u32,
    pub text: String,
}

/// A straight trace segment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    pub layer: u32,
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub scale: i32,
    pub net_index: u32,
}

/// Free-standing text, typically silkscreen.
///
/// The `divider`, `empty` and `one` fields are passed through from the wire;
/// their meaning is unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Text {
    pub pos_x: u32,
    pub pos_y: u32,
    pub text_size: u32,
    pub divider: u32,
    pub empty: u32,
    pub one: u16,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arc_degrees() {
        let arc = Arc {
            layer: 1,
            cx: 0,
            cy: 0,
            r: 10,
            angle_start: 900_000,
            angle_end: 2_700_000,
            scale: 0,
            net_index: 0,
        };
        assert_eq!(arc.start_degrees(), 90.0);
        assert_eq!(arc.end_degrees(), 270.0);
    }

    #[test]
    fn test_parts_iterator() {
        let board = Board {
            entities: vec![
                Entity::Segment(Segment {
                    layer: 1,
                    x1: 0,
                    y1: 0,
                    x2: 1,
                    y2: 1,
                    scale: 0,
                    net_index: 0,
                }),
                Entity::Part(Part::default()),
            ],
            diode_readings: None,
        };
        assert_eq!(board.parts().count(), 1);
    }
}
