//! Axis group records: axis parents, axes and their scaling, ticks and lines.

use super::ChartObject;
use super::value::{bool_str, check_in, is, name_of, parse_f64, parse_in, parse_named};
use crate::err::{DecodeResult, Result};
use crate::registry::RecordKind;
use crate::settings::ChartSettings;
use crate::utils::ByteCursor;
use crate::utils::bytes::{put_f64, put_i32, put_u8, put_u16};
use bitflags::bitflags;
use serde::Serialize;

/// Primary or secondary axis group (0x1041).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AxisParent {
    /// 0 for the primary axis group, 1 for the secondary one.
    pub index: u16,
    pub x: i32,
    pub y: i32,
    pub dx: i32,
    pub dy: i32,
}

impl AxisParent {
    pub fn is_secondary(&self) -> bool {
        self.index == 1
    }
}

impl ChartObject for AxisParent {
    const KIND: RecordKind = RecordKind::AxisParent;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(AxisParent {
            index: c.u16_named("AxisParent.iax")?,
            x: c.i32_named("AxisParent.x")?,
            y: c.i32_named("AxisParent.y")?,
            dx: c.i32_named("AxisParent.dx")?,
            dy: c.i32_named("AxisParent.dy")?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u16(out, self.index);
        put_i32(out, self.x);
        put_i32(out, self.y);
        put_i32(out, self.dx);
        put_i32(out, self.dy);
    }

    fn prototype() -> Self {
        AxisParent {
            index: 0,
            x: 0,
            y: 0,
            dx: 0,
            dy: 0,
        }
    }
}

/// Values of the `wType` field of an [`Axis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AxisRecordType {
    Category,
    Value,
    Series,
}

impl AxisRecordType {
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(AxisRecordType::Category),
            1 => Some(AxisRecordType::Value),
            2 => Some(AxisRecordType::Series),
            _ => None,
        }
    }

    pub fn code(self) -> u16 {
        self as u16
    }
}

/// An axis of an axis group (0x101D).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Axis {
    pub axis_type: u16,
    pub reserved: [u8; 16],
}

impl Axis {
    pub fn new(axis_type: AxisRecordType) -> Self {
        Axis {
            axis_type: axis_type.code(),
            reserved: [0; 16],
        }
    }

    pub fn record_type(&self) -> Option<AxisRecordType> {
        AxisRecordType::from_code(self.axis_type)
    }
}

impl ChartObject for Axis {
    const KIND: RecordKind = RecordKind::Axis;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(Axis {
            axis_type: c.u16_named("Axis.wType")?,
            reserved: c.array::<16>("Axis.reserved")?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u16(out, self.axis_type);
        out.extend_from_slice(&self.reserved);
    }

    fn prototype() -> Self {
        Axis::new(AxisRecordType::Category)
    }
}

const TICK_MARKS: &[(&str, u8)] = &[("none", 0), ("in", 1), ("out", 2), ("cross", 3)];
const TICK_LABEL_POSITIONS: &[(&str, u8)] = &[("none", 0), ("low", 1), ("high", 2), ("nextTo", 3)];

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    #[serde(transparent)]
    pub struct TickFlags: u16 {
        const AUTO_COLOR = 0x0001;
        const AUTO_MODE = 0x0002;
        /// Label rotation code, bits 2..=4.
        const ROTATION = 0x001C;
        const AUTO_ROTATE = 0x0020;
    }
}

/// Tick marks and tick labels of an axis (0x101E).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tick {
    pub major: u8,
    pub minor: u8,
    pub label_position: u8,
    /// 1 transparent, 2 opaque.
    pub background_mode: u8,
    pub rgb: [u8; 4],
    pub reserved: [u8; 16],
    pub flags: TickFlags,
    pub color_index: u16,
    /// Label rotation in degrees, if present.
    pub trot: Option<u16>,
}

impl Tick {
    pub fn rotation(&self) -> u16 {
        (self.flags.bits() & TickFlags::ROTATION.bits()) >> 2
    }

    pub fn set_rotation(&mut self, rotation: u16) -> Result<()> {
        let rotation = check_in("Tick.rot", rotation, 0..=7, "0..=7")?;
        let bits = (self.flags.bits() & !TickFlags::ROTATION.bits()) | (rotation << 2);
        self.flags = TickFlags::from_bits_retain(bits);
        Ok(())
    }

    pub fn shows_major_ticks(&self) -> bool {
        self.major != 0
    }

    pub fn shows_minor_ticks(&self) -> bool {
        self.minor != 0
    }
}

impl ChartObject for Tick {
    const KIND: RecordKind = RecordKind::Tick;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(Tick {
            major: c.u8_named("Tick.tktMajor")?,
            minor: c.u8_named("Tick.tktMinor")?,
            label_position: c.u8_named("Tick.tlt")?,
            background_mode: c.u8_named("Tick.wBkgMode")?,
            rgb: c.array::<4>("Tick.rgb")?,
            reserved: c.array::<16>("Tick.reserved")?,
            flags: TickFlags::from_bits_retain(c.u16_named("Tick.grbit")?),
            color_index: c.u16_named("Tick.icv")?,
            trot: c.opt_u16_named("Tick.trot")?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u8(out, self.major);
        put_u8(out, self.minor);
        put_u8(out, self.label_position);
        put_u8(out, self.background_mode);
        out.extend_from_slice(&self.rgb);
        out.extend_from_slice(&self.reserved);
        put_u16(out, self.flags.bits());
        put_u16(out, self.color_index);
        if let Some(trot) = self.trot {
            put_u16(out, trot);
        }
    }

    /// Outside major ticks, no minor ticks, labels next to the axis.
    fn prototype() -> Self {
        Tick {
            major: 2,
            minor: 0,
            label_position: 3,
            background_mode: 1,
            rgb: [0; 4],
            reserved: [0; 16],
            flags: TickFlags::from_bits_retain(0x0023),
            color_index: 0x4D,
            trot: Some(0),
        }
    }

    fn get_option(&self, name: &str) -> Option<String> {
        if is(name, &["tickLblPos"]) {
            name_of(TICK_LABEL_POSITIONS, self.label_position)
        } else if is(name, &["majorTickMark"]) {
            name_of(TICK_MARKS, self.major)
        } else if is(name, &["minorTickMark"]) {
            name_of(TICK_MARKS, self.minor)
        } else if is(name, &["rotation"]) {
            Some(self.rotation().to_string())
        } else {
            None
        }
    }

    fn set_option(&mut self, name: &str, value: &str, _settings: &ChartSettings) -> Result<bool> {
        if is(name, &["tickLblPos"]) {
            self.label_position = parse_named(
                "Tick.tlt",
                value,
                TICK_LABEL_POSITIONS,
                "none, low, high or nextTo",
            )?;
        } else if is(name, &["majorTickMark"]) {
            self.major = parse_named("Tick.tktMajor", value, TICK_MARKS, "none, in, out or cross")?;
        } else if is(name, &["minorTickMark"]) {
            self.minor = parse_named("Tick.tktMinor", value, TICK_MARKS, "none, in, out or cross")?;
        } else if is(name, &["rotation"]) {
            self.set_rotation(parse_in("Tick.rot", value, 0..=7, "0..=7")?)?;
        } else {
            return Ok(false);
        }
        Ok(true)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    #[serde(transparent)]
    pub struct ValueRangeFlags: u16 {
        const AUTO_MIN = 0x0001;
        const AUTO_MAX = 0x0002;
        const AUTO_MAJOR = 0x0004;
        const AUTO_MINOR = 0x0008;
        const AUTO_CROSS = 0x0010;
        const LOG_SCALE = 0x0020;
        const REVERSED = 0x0040;
        const MAX_CROSS = 0x0080;
    }
}

/// Scaling of a value axis (0x101F).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
    pub major: f64,
    pub minor: f64,
    pub cross: f64,
    pub flags: ValueRangeFlags,
}

impl ValueRange {
    pub fn is_reversed(&self) -> bool {
        self.flags.contains(ValueRangeFlags::REVERSED)
    }

    /// Fixes the axis bounds, turning off automatic min/max.
    pub fn set_bounds(&mut self, min: f64, max: f64) {
        self.min = min;
        self.max = max;
        self.flags
            .remove(ValueRangeFlags::AUTO_MIN | ValueRangeFlags::AUTO_MAX);
    }
}

impl ChartObject for ValueRange {
    const KIND: RecordKind = RecordKind::ValueRange;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(ValueRange {
            min: c.f64_named("ValueRange.numMin")?,
            max: c.f64_named("ValueRange.numMax")?,
            major: c.f64_named("ValueRange.numMajor")?,
            minor: c.f64_named("ValueRange.numMinor")?,
            cross: c.f64_named("ValueRange.numCross")?,
            flags: ValueRangeFlags::from_bits_retain(c.u16_named("ValueRange.grbit")?),
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_f64(out, self.min);
        put_f64(out, self.max);
        put_f64(out, self.major);
        put_f64(out, self.minor);
        put_f64(out, self.cross);
        put_u16(out, self.flags.bits());
    }

    /// Fully automatic scaling.
    fn prototype() -> Self {
        ValueRange {
            min: 0.0,
            max: 0.0,
            major: 0.0,
            minor: 0.0,
            cross: 0.0,
            flags: ValueRangeFlags::from_bits_retain(0x011F),
        }
    }

    fn get_option(&self, name: &str) -> Option<String> {
        let auto_cross = self.flags.contains(ValueRangeFlags::AUTO_CROSS);
        if is(name, &["crossesAt"]) {
            Some(self.cross.to_string())
        } else if is(name, &["orientation"]) {
            Some(if self.is_reversed() { "maxMin" } else { "minMax" }.to_string())
        } else if is(name, &["crosses"]) {
            let crosses = if self.flags.contains(ValueRangeFlags::MAX_CROSS) {
                "max"
            } else if auto_cross {
                "autoZero"
            } else {
                "min"
            };
            Some(crosses.to_string())
        } else if is(name, &["crossBetween"]) {
            Some(if auto_cross { "between" } else { "midCat" }.to_string())
        } else if is(name, &["max"]) {
            Some(self.max.to_string())
        } else if is(name, &["min"]) {
            Some(self.min.to_string())
        } else if is(name, &["majorUnit"]) {
            Some(self.major.to_string())
        } else if is(name, &["minorUnit"]) {
            Some(self.minor.to_string())
        } else if is(name, &["logBase"]) {
            Some(bool_str(self.flags.contains(ValueRangeFlags::LOG_SCALE)))
        } else {
            None
        }
    }

    fn set_option(&mut self, name: &str, value: &str, _settings: &ChartSettings) -> Result<bool> {
        if is(name, &["crossesAt"]) {
            self.cross = parse_f64("ValueRange.numCross", value)?;
            self.flags.remove(ValueRangeFlags::AUTO_CROSS);
        } else if is(name, &["orientation"]) {
            let reversed = parse_named(
                "ValueRange.fReversed",
                value,
                &[("minMax", false), ("maxMin", true)],
                "minMax or maxMin",
            )?;
            self.flags.set(ValueRangeFlags::REVERSED, reversed);
        } else if is(name, &["crosses"]) {
            match parse_named(
                "ValueRange.crosses",
                value,
                &[("autoZero", 0u8), ("min", 1), ("max", 2)],
                "autoZero, min or max",
            )? {
                0 => self.flags.insert(ValueRangeFlags::AUTO_CROSS),
                1 => self.flags.remove(ValueRangeFlags::AUTO_CROSS),
                _ => self.flags.insert(ValueRangeFlags::MAX_CROSS),
            }
        } else if is(name, &["crossBetween"]) {
            let between = parse_named(
                "ValueRange.crossBetween",
                value,
                &[("between", true), ("midCat", false)],
                "between or midCat",
            )?;
            self.flags.set(ValueRangeFlags::AUTO_CROSS, between);
        } else if is(name, &["max"]) {
            self.max = parse_f64("ValueRange.numMax", value)?;
            self.flags.remove(ValueRangeFlags::AUTO_MAX);
        } else if is(name, &["min"]) {
            self.min = parse_f64("ValueRange.numMin", value)?;
            self.flags.remove(ValueRangeFlags::AUTO_MIN);
        } else if is(name, &["majorUnit"]) {
            self.major = parse_f64("ValueRange.numMajor", value)?;
            self.flags.remove(ValueRangeFlags::AUTO_MAJOR);
        } else if is(name, &["minorUnit"]) {
            self.minor = parse_f64("ValueRange.numMinor", value)?;
            self.flags.remove(ValueRangeFlags::AUTO_MINOR);
        } else {
            return Ok(false);
        }
        Ok(true)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    #[serde(transparent)]
    pub struct CatserRangeFlags: u16 {
        /// The value axis crosses between categories.
        const BETWEEN = 0x0001;
        /// The value axis crosses at the last category.
        const MAX_CROSS = 0x0002;
        const REVERSED = 0x0004;
    }
}

/// Scaling of a category or series axis (0x1020).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatserRange {
    pub cross: u16,
    pub label_frequency: u16,
    pub mark_frequency: u16,
    pub flags: CatserRangeFlags,
}

impl CatserRange {
    pub fn is_reversed(&self) -> bool {
        self.flags.contains(CatserRangeFlags::REVERSED)
    }
}

impl ChartObject for CatserRange {
    const KIND: RecordKind = RecordKind::CatserRange;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(CatserRange {
            cross: c.u16_named("CatserRange.catCross")?,
            label_frequency: c.u16_named("CatserRange.catLabel")?,
            mark_frequency: c.u16_named("CatserRange.catMark")?,
            flags: CatserRangeFlags::from_bits_retain(c.u16_named("CatserRange.grbit")?),
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u16(out, self.cross);
        put_u16(out, self.label_frequency);
        put_u16(out, self.mark_frequency);
        put_u16(out, self.flags.bits());
    }

    fn prototype() -> Self {
        CatserRange {
            cross: 1,
            label_frequency: 1,
            mark_frequency: 1,
            flags: CatserRangeFlags::BETWEEN,
        }
    }

    fn get_option(&self, name: &str) -> Option<String> {
        if is(name, &["crossesAt"]) {
            Some(self.cross.to_string())
        } else if is(name, &["orientation"]) {
            Some(if self.is_reversed() { "maxMin" } else { "minMax" }.to_string())
        } else if is(name, &["crosses"]) {
            let crosses = if self.flags.contains(CatserRangeFlags::MAX_CROSS) {
                "max"
            } else if self.flags.contains(CatserRangeFlags::BETWEEN) {
                "autoZero"
            } else {
                "min"
            };
            Some(crosses.to_string())
        } else if is(name, &["tickMarkSkip"]) {
            Some(self.mark_frequency.to_string())
        } else if is(name, &["tickLblSkip"]) {
            Some(self.label_frequency.to_string())
        } else {
            None
        }
    }

    fn set_option(&mut self, name: &str, value: &str, _settings: &ChartSettings) -> Result<bool> {
        if is(name, &["crossesAt"]) {
            self.cross = parse_in("CatserRange.catCross", value, 1..=31999, "1..=31999")?;
        } else if is(name, &["tickLblSkip"]) {
            self.label_frequency = parse_in("CatserRange.catLabel", value, 1..=31999, "1..=31999")?;
        } else if is(name, &["tickMarkSkip"]) {
            self.mark_frequency = parse_in("CatserRange.catMark", value, 1..=31999, "1..=31999")?;
        } else if is(name, &["orientation"]) {
            let reversed = parse_named(
                "CatserRange.fReversed",
                value,
                &[("minMax", false), ("maxMin", true)],
                "minMax or maxMin",
            )?;
            self.flags.set(CatserRangeFlags::REVERSED, reversed);
        } else if is(name, &["crosses"]) {
            match parse_named(
                "CatserRange.crosses",
                value,
                &[("autoZero", 0u8), ("mid", 1), ("max", 2), ("min", 3)],
                "autoZero, mid, max or min",
            )? {
                0 => self.flags.insert(CatserRangeFlags::BETWEEN),
                1 => self.flags.remove(CatserRangeFlags::BETWEEN),
                2 => self.flags.insert(CatserRangeFlags::MAX_CROSS),
                // accepted without changing the record
                _ => {}
            }
        } else {
            return Ok(false);
        }
        Ok(true)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    #[serde(transparent)]
    pub struct AxcentFlags: u16 {
        const AUTO_MIN = 0x0001;
        const AUTO_MAX = 0x0002;
        const AUTO_MAJOR = 0x0004;
        const AUTO_MINOR = 0x0008;
        const DATE_AXIS = 0x0010;
        const AUTO_BASE = 0x0020;
        const AUTO_CROSS = 0x0040;
        const AUTO_DATE = 0x0080;
    }
}

/// Date settings of a category axis (0x1062).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Axcent {
    pub min: u16,
    pub max: u16,
    pub major: u16,
    pub major_unit: u16,
    pub minor: u16,
    pub minor_unit: u16,
    pub base_unit: u16,
    pub cross_date: u16,
    pub flags: AxcentFlags,
}

impl Axcent {
    pub fn is_date_axis(&self) -> bool {
        self.flags.contains(AxcentFlags::DATE_AXIS)
    }
}

impl ChartObject for Axcent {
    const KIND: RecordKind = RecordKind::Axcent;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(Axcent {
            min: c.u16_named("Axcent.catMin")?,
            max: c.u16_named("Axcent.catMax")?,
            major: c.u16_named("Axcent.catMajor")?,
            major_unit: c.u16_named("Axcent.duMajor")?,
            minor: c.u16_named("Axcent.catMinor")?,
            minor_unit: c.u16_named("Axcent.duMinor")?,
            base_unit: c.u16_named("Axcent.duBase")?,
            cross_date: c.u16_named("Axcent.catCrossDate")?,
            flags: AxcentFlags::from_bits_retain(c.u16_named("Axcent.grbit")?),
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        for v in [
            self.min,
            self.max,
            self.major,
            self.major_unit,
            self.minor,
            self.minor_unit,
            self.base_unit,
            self.cross_date,
            self.flags.bits(),
        ] {
            put_u16(out, v);
        }
    }

    fn prototype() -> Self {
        Axcent {
            min: 0,
            max: 0,
            major: 1,
            major_unit: 0,
            minor: 1,
            minor_unit: 0,
            base_unit: 0,
            cross_date: 0,
            flags: AxcentFlags::from_bits_retain(0x00EF),
        }
    }
}

/// Which line of an axis the following LineFormat styles (0x1021).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AxisLineFormat {
    /// 0 axis line, 1 major gridlines, 2 minor gridlines, 3 walls or floor.
    pub id: u16,
}

impl AxisLineFormat {
    pub const AXIS_LINE: u16 = 0;
    pub const MAJOR_GRIDLINES: u16 = 1;
    pub const MINOR_GRIDLINES: u16 = 2;
    pub const WALLS: u16 = 3;
}

impl ChartObject for AxisLineFormat {
    const KIND: RecordKind = RecordKind::AxisLineFormat;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(AxisLineFormat {
            id: c.u16_named("AxisLineFormat.id")?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u16(out, self.id);
    }

    fn prototype() -> Self {
        AxisLineFormat {
            id: Self::MAJOR_GRIDLINES,
        }
    }
}

/// Number of axis groups in the chart (0x1046).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AxesUsed {
    pub count: u16,
}

impl ChartObject for AxesUsed {
    const KIND: RecordKind = RecordKind::AxesUsed;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(AxesUsed {
            count: c.u16_named("AxesUsed.cAxes")?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u16(out, self.count);
    }

    fn prototype() -> Self {
        AxesUsed { count: 1 }
    }
}
