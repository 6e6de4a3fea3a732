//! Chart-level layout records: the chart itself, series, legend, positions and sheet
//! properties.

use super::ChartObject;
use super::value::{bool_str, is, name_of, parse_bool, parse_named};
use crate::err::{DecodeResult, Result};
use crate::registry::RecordKind;
use crate::settings::ChartSettings;
use crate::utils::ByteCursor;
use crate::utils::bytes::{put_i32, put_u8, put_u16};
use bitflags::bitflags;
use serde::Serialize;

/// Declares a record holding a single `u16`.
macro_rules! word_record {
    ($(#[$doc:meta])* $name:ident, $field:ident, $what:literal, $proto:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
        pub struct $name {
            pub $field: u16,
        }

        impl ChartObject for $name {
            const KIND: RecordKind = RecordKind::$name;

            fn decode(payload: &[u8]) -> DecodeResult<Self> {
                let mut c = ByteCursor::new(payload);
                Ok($name {
                    $field: c.u16_named($what)?,
                })
            }

            fn encode(&self, out: &mut Vec<u8>) {
                put_u16(out, self.$field);
            }

            fn prototype() -> Self {
                $name { $field: $proto }
            }
        }
    };
}

word_record!(
    /// Chart units; always zero.
    Units, reserved, "Units.reserved", 0
);
word_record!(
    /// Zero-based index of the chart group a series belongs to (0x1045).
    SerToCrt, chart_group, "SerToCrt.id", 0
);
word_record!(
    /// One-based index of the parent series of a trendline or error bar (0x104A).
    SerParent, series, "SerParent.series", 1
);
word_record!(
    /// Number format index of an axis or data label (0x104E).
    IFmt, format_index, "IFmt.ifmt", 0
);
word_record!(
    /// Which cache the following records describe: 1 values, 2 categories, 3 bubbles (0x1065).
    SiIndex, index, "SiIndex.numIndex", 1
);

/// The chart body (0x1002). Coordinates are 16.16 fixed point, in points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chart {
    pub x: i32,
    pub y: i32,
    pub dx: i32,
    pub dy: i32,
}

impl ChartObject for Chart {
    const KIND: RecordKind = RecordKind::Chart;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(Chart {
            x: c.i32_named("Chart.x")?,
            y: c.i32_named("Chart.y")?,
            dx: c.i32_named("Chart.dx")?,
            dy: c.i32_named("Chart.dy")?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_i32(out, self.x);
        put_i32(out, self.y);
        put_i32(out, self.dx);
        put_i32(out, self.dy);
    }

    fn prototype() -> Self {
        Chart {
            x: 0,
            y: 0,
            dx: 0,
            dy: 0,
        }
    }
}

/// Data types and counts of a series (0x1003).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Series {
    /// Category data type: 1 numeric, 3 text.
    pub category_type: u16,
    /// Value data type: 1 numeric, 3 text.
    pub value_type: u16,
    pub category_count: u16,
    pub value_count: u16,
    pub bubble_type: u16,
    pub bubble_count: u16,
}

impl ChartObject for Series {
    const KIND: RecordKind = RecordKind::Series;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(Series {
            category_type: c.u16_named("Series.sdtX")?,
            value_type: c.u16_named("Series.sdtY")?,
            category_count: c.u16_named("Series.cValx")?,
            value_count: c.u16_named("Series.cValy")?,
            bubble_type: c.u16_named("Series.sdtBSize")?,
            bubble_count: c.u16_named("Series.cValBSize")?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u16(out, self.category_type);
        put_u16(out, self.value_type);
        put_u16(out, self.category_count);
        put_u16(out, self.value_count);
        put_u16(out, self.bubble_type);
        put_u16(out, self.bubble_count);
    }

    fn prototype() -> Self {
        Series {
            category_type: 3,
            value_type: 1,
            category_count: 3,
            value_count: 3,
            bubble_type: 1,
            bubble_count: 0,
        }
    }
}

/// Legend placement codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LegendPosition {
    Bottom,
    Corner,
    Top,
    Right,
    Left,
    NotDocked,
}

const LEGEND_POSITIONS: &[(&str, u8)] = &[
    ("b", 0),
    ("tr", 1),
    ("t", 2),
    ("r", 3),
    ("l", 4),
    ("none", 7),
];

impl LegendPosition {
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => LegendPosition::Bottom,
            1 => LegendPosition::Corner,
            2 => LegendPosition::Top,
            3 => LegendPosition::Right,
            4 => LegendPosition::Left,
            7 => LegendPosition::NotDocked,
            _ => return None,
        })
    }

    /// The OOXML `legendPos` value; a legend that is not docked has none.
    pub fn ooxml(self) -> Option<&'static str> {
        match self {
            LegendPosition::Bottom => Some("b"),
            LegendPosition::Corner => Some("tr"),
            LegendPosition::Top => Some("t"),
            LegendPosition::Right => Some("r"),
            LegendPosition::Left => Some("l"),
            LegendPosition::NotDocked => None,
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    #[serde(transparent)]
    pub struct LegendFlags: u16 {
        const AUTO_POSITION = 0x0001;
        const AUTO_SERIES = 0x0002;
        const AUTO_X = 0x0004;
        const AUTO_Y = 0x0008;
        const VERTICAL = 0x0010;
        /// Shown as part of a data table.
        const DATA_TABLE = 0x0020;
    }
}

/// Chart legend (0x1015).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Legend {
    pub x: i32,
    pub y: i32,
    pub dx: i32,
    pub dy: i32,
    position: u8,
    pub spacing: u8,
    pub flags: LegendFlags,
}

impl Legend {
    pub fn position(&self) -> Option<LegendPosition> {
        LegendPosition::from_code(self.position)
    }

    pub fn is_vertical(&self) -> bool {
        self.flags.contains(LegendFlags::VERTICAL)
    }
}

impl ChartObject for Legend {
    const KIND: RecordKind = RecordKind::Legend;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(Legend {
            x: c.i32_named("Legend.x")?,
            y: c.i32_named("Legend.y")?,
            dx: c.i32_named("Legend.dx")?,
            dy: c.i32_named("Legend.dy")?,
            position: c.u8_named("Legend.wType")?,
            spacing: c.u8_named("Legend.wSpacing")?,
            flags: LegendFlags::from_bits_retain(c.u16_named("Legend.grbit")?),
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_i32(out, self.x);
        put_i32(out, self.y);
        put_i32(out, self.dx);
        put_i32(out, self.dy);
        put_u8(out, self.position);
        put_u8(out, self.spacing);
        put_u16(out, self.flags.bits());
    }

    /// A vertical legend docked on the right.
    fn prototype() -> Self {
        Legend {
            x: 3573,
            y: 952,
            dx: 401,
            dy: 1249,
            position: 3,
            spacing: 1,
            flags: LegendFlags::from_bits_retain(0x001F),
        }
    }

    fn get_option(&self, name: &str) -> Option<String> {
        if is(name, &["Position"]) {
            name_of(LEGEND_POSITIONS, self.position)
        } else if is(name, &["Vertical"]) {
            Some(bool_str(self.is_vertical()))
        } else if is(name, &["DataTable"]) {
            Some(bool_str(self.flags.contains(LegendFlags::DATA_TABLE)))
        } else {
            None
        }
    }

    fn set_option(&mut self, name: &str, value: &str, _settings: &ChartSettings) -> Result<bool> {
        if is(name, &["Position"]) {
            self.position = parse_named(
                "Legend.wType",
                value,
                LEGEND_POSITIONS,
                "b, tr, t, r, l or none",
            )?;
        } else if is(name, &["Vertical"]) {
            self.flags
                .set(LegendFlags::VERTICAL, parse_bool("Legend.fVert", value)?);
        } else if is(name, &["DataTable"]) {
            self.flags
                .set(LegendFlags::DATA_TABLE, parse_bool("Legend.fWasDataTable", value)?);
        } else {
            return Ok(false);
        }
        Ok(true)
    }
}

/// Position of the enclosing element (0x104F).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pos {
    /// 2 for positions relative to the chart.
    pub top_left_mode: u16,
    pub bottom_right_mode: u16,
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl ChartObject for Pos {
    const KIND: RecordKind = RecordKind::Pos;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(Pos {
            top_left_mode: c.u16_named("Pos.mdTopLt")?,
            bottom_right_mode: c.u16_named("Pos.mdBotRt")?,
            x1: c.i32_named("Pos.x1")?,
            y1: c.i32_named("Pos.y1")?,
            x2: c.i32_named("Pos.x2")?,
            y2: c.i32_named("Pos.y2")?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u16(out, self.top_left_mode);
        put_u16(out, self.bottom_right_mode);
        put_i32(out, self.x1);
        put_i32(out, self.y1);
        put_i32(out, self.x2);
        put_i32(out, self.y2);
    }

    fn prototype() -> Self {
        Pos {
            top_left_mode: 2,
            bottom_right_mode: 2,
            x1: 0,
            y1: 0,
            x2: 0,
            y2: 0,
        }
    }
}

/// Marks the following Frame as the plot area frame (0x1035). Has no payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PlotArea;

impl ChartObject for PlotArea {
    const KIND: RecordKind = RecordKind::PlotArea;

    fn decode(_payload: &[u8]) -> DecodeResult<Self> {
        Ok(PlotArea)
    }

    fn encode(&self, _out: &mut Vec<u8>) {}

    fn prototype() -> Self {
        PlotArea
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    #[serde(transparent)]
    pub struct ShtPropsFlags: u16 {
        const MANUAL_SERIES = 0x0001;
        const PLOT_VISIBLE_ONLY = 0x0002;
        const NOT_SIZE_WITH_WINDOW = 0x0004;
        const MANUAL_PLOT_AREA = 0x0008;
        const ALWAYS_AUTO_PLOT_AREA = 0x0010;
    }
}

/// Sheet-level chart properties (0x1044).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShtProps {
    pub flags: ShtPropsFlags,
    /// How empty cells are plotted: 0 gaps, 1 zero, 2 interpolated.
    pub blank_mode: u8,
    pub reserved: Option<u8>,
}

impl ChartObject for ShtProps {
    const KIND: RecordKind = RecordKind::ShtProps;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(ShtProps {
            flags: ShtPropsFlags::from_bits_retain(c.u16_named("ShtProps.grbit")?),
            blank_mode: c.u8_named("ShtProps.mdBlank")?,
            reserved: c.opt_u8_named("ShtProps.unused")?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u16(out, self.flags.bits());
        put_u8(out, self.blank_mode);
        if let Some(r) = self.reserved {
            put_u8(out, r);
        }
    }

    fn prototype() -> Self {
        ShtProps {
            flags: ShtPropsFlags::PLOT_VISIBLE_ONLY,
            blank_mode: 0,
            reserved: Some(0),
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    #[serde(transparent)]
    pub struct DatFlags: u16 {
        const HORIZONTAL_BORDERS = 0x0001;
        const VERTICAL_BORDERS = 0x0002;
        const OUTLINE = 0x0004;
        const SHOW_SERIES_KEY = 0x0008;
    }
}

/// Data table options (0x1063).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dat {
    pub flags: DatFlags,
}

impl ChartObject for Dat {
    const KIND: RecordKind = RecordKind::Dat;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(Dat {
            flags: DatFlags::from_bits_retain(c.u16_named("Dat.grbit")?),
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u16(out, self.flags.bits());
    }

    fn prototype() -> Self {
        Dat {
            flags: DatFlags::all(),
        }
    }
}
