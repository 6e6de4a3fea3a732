//! Workbook color palette and index resolution.
//!
//! Chart formatting records store colors twice: as an RGB triplet and as an index into the
//! workbook palette. Indices at or above the palette size form a band of "special" values that
//! mean automatic foreground/background or the chart's neutral black.

use serde::Serialize;
use std::fmt;

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    pub fn from_bytes(raw: [u8; 3]) -> Self {
        Rgb::new(raw[0], raw[1], raw[2])
    }

    pub fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Uppercase `RRGGBB`, the form used by OOXML `a:srgbClr`.
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

/// Automatic foreground (chart neutral black).
pub const ICV_AUTO_FOREGROUND: u16 = 0x4D;
/// Automatic background.
pub const ICV_AUTO_BACKGROUND: u16 = 0x4E;
/// Index the back color is reset to whenever a fore color is set by index.
pub const ICV_DEFAULT_BACK: u16 = 0x09;

pub const ICV_WHITE: u16 = 1;
pub const ICV_GRAY25: u16 = 22;
pub const ICV_GRAY50: u16 = 23;
pub const ICV_GRAY80: u16 = 63;

const fn c(r: u8, g: u8, b: u8) -> Rgb {
    Rgb::new(r, g, b)
}

/// The BIFF8 default palette.
pub const DEFAULT_PALETTE: [Rgb; 66] = [
    c(0, 0, 0),
    c(255, 255, 255),
    c(255, 0, 0),
    c(0, 255, 0),
    c(0, 0, 255),
    c(255, 255, 0),
    c(255, 0, 255),
    c(0, 255, 255),
    // 8
    c(0, 0, 0),
    c(255, 255, 255),
    c(255, 0, 0),
    c(0, 255, 0),
    c(0, 0, 255),
    c(255, 255, 0),
    c(255, 0, 255),
    c(0, 255, 255),
    // 16
    c(128, 0, 0),
    c(0, 128, 0),
    c(0, 0, 128),
    c(128, 128, 0),
    c(128, 0, 128),
    c(0, 128, 128),
    c(192, 192, 192),
    c(136, 136, 136),
    // 24
    c(153, 153, 255),
    c(153, 51, 102),
    c(255, 255, 153),
    c(204, 255, 255),
    c(102, 0, 102),
    c(255, 128, 128),
    c(102, 102, 153),
    c(204, 204, 255),
    // 32
    c(0, 0, 128),
    c(255, 0, 255),
    c(255, 255, 0),
    c(0, 255, 255),
    c(128, 0, 128),
    c(128, 0, 0),
    c(0, 128, 128),
    c(0, 0, 255),
    // 40
    c(0, 204, 255),
    c(204, 255, 255),
    c(204, 255, 204),
    c(255, 255, 153),
    c(153, 204, 255),
    c(255, 153, 204),
    c(204, 153, 255),
    c(255, 204, 153),
    // 48
    c(128, 128, 0),
    c(51, 204, 204),
    c(153, 204, 0),
    c(255, 204, 0),
    c(255, 153, 0),
    c(255, 102, 0),
    c(102, 102, 153),
    c(150, 150, 150),
    // 56
    c(0, 51, 102),
    c(51, 153, 102),
    c(0, 51, 0),
    c(51, 51, 0),
    c(153, 51, 0),
    c(153, 51, 102),
    c(51, 51, 153),
    c(51, 51, 51),
    // 64
    c(255, 255, 255),
    c(0, 0, 0),
];

/// A workbook-scoped color palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTable {
    colors: Vec<Rgb>,
}

impl Default for ColorTable {
    fn default() -> Self {
        ColorTable {
            colors: DEFAULT_PALETTE.to_vec(),
        }
    }
}

impl ColorTable {
    /// A palette with custom entries (e.g. from a workbook PALETTE record).
    ///
    /// An empty list yields the default palette.
    pub fn new(colors: Vec<Rgb>) -> Self {
        if colors.is_empty() {
            return ColorTable::default();
        }
        ColorTable { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The stored entry, if `index` is within the table.
    pub fn get(&self, index: u16) -> Option<Rgb> {
        self.colors.get(usize::from(index)).copied()
    }

    /// Whether `index` falls in the special band (at or past the end of the table).
    pub fn is_special(&self, index: u16) -> bool {
        usize::from(index) >= self.colors.len()
    }

    /// Resolves `index` to its effective color.
    ///
    /// In-table indices give the stored RGB. Special indices map to white or black according
    /// to their meaning; unrecognized special values resolve to white.
    pub fn resolve(&self, index: u16) -> Rgb {
        if let Some(rgb) = self.get(index) {
            return rgb;
        }
        let entry = special_index_entry(index);
        self.get(entry).unwrap_or(if entry == 0 { Rgb::BLACK } else { Rgb::WHITE })
    }
}

/// Maps a special index to the palette entry holding its color: 0 (black) or 1 (white).
pub fn special_index_entry(index: u16) -> u16 {
    match index {
        // automatic foreground, chart neutral black, system window text
        0x40 | 0x4D | 0x4F | 0x51 | 0x7FFF => 0,
        // 0x41, 0x4E and 0x50 are automatic backgrounds; unknown values are drawn white as well
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_table_indices_resolve_to_stored_rgb() {
        let table = ColorTable::default();
        assert_eq!(table.len(), 66);
        assert_eq!(table.resolve(2), Rgb::new(255, 0, 0));
        assert_eq!(table.resolve(23), Rgb::new(136, 136, 136));
        assert_eq!(table.resolve(65), Rgb::BLACK);
    }

    #[test]
    fn test_special_band_starts_at_table_size() {
        let table = ColorTable::default();
        assert!(!table.is_special(65));
        assert!(table.is_special(66));
        assert_eq!(table.resolve(0x4D), Rgb::BLACK);
        assert_eq!(table.resolve(0x4E), Rgb::WHITE);
        assert_eq!(table.resolve(0x7FFF), Rgb::BLACK);
        assert_eq!(table.resolve(0x41), Rgb::WHITE);
        assert_eq!(table.resolve(0x1234), Rgb::WHITE);
    }

    #[test]
    fn test_small_custom_table_moves_the_band() {
        let table = ColorTable::new(vec![Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)]);
        assert!(table.is_special(2));
        assert_eq!(table.resolve(1), Rgb::new(4, 5, 6));
        // special values resolve through the custom table's own black/white slots
        assert_eq!(table.resolve(0x4D), Rgb::new(1, 2, 3));
    }

    #[test]
    fn test_hex() {
        assert_eq!(Rgb::new(0, 0x80, 0xFF).to_hex(), "0080FF");
        assert_eq!(Rgb::new(0, 0x80, 0xFF).to_string(), "#0080FF");
    }
}
