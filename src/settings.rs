use crate::color::ColorTable;
use encoding::EncodingRef;
use std::fmt;

/// Nesting beyond this many BEGIN markers is rejected as corrupt input.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Settings shared by assembly, record decoding and programmatic edits of a chart tree.
///
/// ```
/// use biffchart::ChartSettings;
///
/// let settings = ChartSettings::new().max_depth(16);
/// assert_eq!(settings.get_max_depth(), 16);
/// ```
#[derive(Clone)]
pub struct ChartSettings {
    max_depth: usize,
    ansi_codec: EncodingRef,
    color_table: ColorTable,
}

impl fmt::Debug for ChartSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartSettings")
            .field("max_depth", &self.max_depth)
            .field("ansi_codec", &self.ansi_codec.name())
            .field("color_table_len", &self.color_table.len())
            .finish()
    }
}

impl PartialEq for ChartSettings {
    fn eq(&self, other: &Self) -> bool {
        self.max_depth == other.max_depth
            && self.ansi_codec.name() == other.ansi_codec.name()
            && self.color_table == other.color_table
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        ChartSettings {
            max_depth: DEFAULT_MAX_DEPTH,
            ansi_codec: encoding::all::WINDOWS_1252,
            color_table: ColorTable::default(),
        }
    }
}

impl ChartSettings {
    pub fn new() -> Self {
        ChartSettings::default()
    }

    /// Sets the maximum BEGIN/END nesting depth accepted by the assembler.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the codepage used for 8-bit ("compressed") strings.
    pub fn ansi_codec(mut self, ansi_codec: EncodingRef) -> Self {
        self.ansi_codec = ansi_codec;
        self
    }

    /// Sets the workbook palette used to resolve color indices.
    pub fn color_table(mut self, color_table: ColorTable) -> Self {
        self.color_table = color_table;
        self
    }

    pub fn get_max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn get_ansi_codec(&self) -> EncodingRef {
        self.ansi_codec
    }

    pub fn get_color_table(&self) -> &ColorTable {
        &self.color_table
    }
}
