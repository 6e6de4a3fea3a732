//! Formatting records: data-point ownership, line/fill/marker styling and data labels.

use super::ChartObject;
use super::value::{bool_str, check_in, is, name_of, parse_bool, parse_in, parse_named};
use crate::color::{
    ColorTable, ICV_AUTO_BACKGROUND, ICV_AUTO_FOREGROUND, ICV_DEFAULT_BACK, ICV_GRAY25, ICV_GRAY50,
    ICV_GRAY80, Rgb,
};
use crate::err::{DecodeResult, Result};
use crate::registry::RecordKind;
use crate::settings::ChartSettings;
use crate::utils::ByteCursor;
use crate::utils::bytes::{put_i16, put_u8, put_u16, put_u32};
use bitflags::bitflags;
use serde::Serialize;

/// A `LongRGB`: three color bytes and a reserved byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LongRgb {
    pub rgb: Rgb,
    pub reserved: u8,
}

impl LongRgb {
    fn read(c: &mut ByteCursor<'_>, what: &'static str) -> DecodeResult<Self> {
        let [r, g, b, reserved] = c.array::<4>(what)?;
        Ok(LongRgb {
            rgb: Rgb::new(r, g, b),
            reserved,
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.rgb.to_bytes());
        put_u8(out, self.reserved);
    }

    fn black() -> Self {
        LongRgb {
            rgb: Rgb::BLACK,
            reserved: 0,
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    #[serde(transparent)]
    pub struct DataFormatFlags: u16 {
        const UNUSED = 0x0001;
    }
}

/// Owner of the formatting of one series, or of one point of a series (0x1006).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataFormat {
    /// Zero-based point index, or [`DataFormat::WHOLE_SERIES`].
    pub point: u16,
    pub series_index: u16,
    pub series_order: u16,
    pub flags: DataFormatFlags,
}

impl DataFormat {
    pub const WHOLE_SERIES: u16 = 0xFFFF;

    pub fn is_whole_series(&self) -> bool {
        self.point == Self::WHOLE_SERIES
    }
}

impl ChartObject for DataFormat {
    const KIND: RecordKind = RecordKind::DataFormat;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(DataFormat {
            point: c.u16_named("DataFormat.xi")?,
            series_index: c.u16_named("DataFormat.yi")?,
            series_order: c.u16_named("DataFormat.iss")?,
            flags: DataFormatFlags::from_bits_retain(c.u16_named("DataFormat.grbit")?),
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u16(out, self.point);
        put_u16(out, self.series_index);
        put_u16(out, self.series_order);
        put_u16(out, self.flags.bits());
    }

    fn prototype() -> Self {
        DataFormat {
            point: Self::WHOLE_SERIES,
            series_index: 0,
            series_order: 0,
            flags: DataFormatFlags::empty(),
        }
    }
}

/// Line pattern codes of a [`LineFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LineStyle {
    Solid,
    Dash,
    Dot,
    DashDot,
    DashDotDot,
    None,
    DarkGray,
    MediumGray,
    LightGray,
}

impl LineStyle {
    pub fn from_code(code: u16) -> Option<LineStyle> {
        Some(match code {
            0 => LineStyle::Solid,
            1 => LineStyle::Dash,
            2 => LineStyle::Dot,
            3 => LineStyle::DashDot,
            4 => LineStyle::DashDotDot,
            5 => LineStyle::None,
            6 => LineStyle::DarkGray,
            7 => LineStyle::MediumGray,
            8 => LineStyle::LightGray,
            _ => return None,
        })
    }

    pub fn code(self) -> u16 {
        self as u16
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    #[serde(transparent)]
    pub struct LineFlags: u16 {
        const AUTO = 0x0001;
        /// The axis line is displayed (axis lines only).
        const AXIS_ON = 0x0004;
        const AUTO_COLOR = 0x0008;
    }
}

/// Line styling (0x1007).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineFormat {
    color: LongRgb,
    pattern: u16,
    weight: i16,
    pub flags: LineFlags,
    color_index: u16,
}

impl LineFormat {
    pub const HAIRLINE: i16 = -1;

    /// The pattern, if it is one of the defined codes.
    pub fn line_style(&self) -> Option<LineStyle> {
        LineStyle::from_code(self.pattern)
    }

    pub fn weight(&self) -> i16 {
        self.weight
    }

    pub fn color_index(&self) -> u16 {
        self.color_index
    }

    pub fn rgb(&self) -> Rgb {
        self.color.rgb
    }

    /// Setting [`LineStyle::None`] also drops the weight to hairline and the color to automatic.
    pub fn set_line_style(&mut self, style: LineStyle) {
        self.pattern = style.code();
        if style == LineStyle::None {
            self.weight = Self::HAIRLINE;
            self.flags = LineFlags::AUTO_COLOR;
            self.color_index = ICV_AUTO_FOREGROUND;
        }
    }

    pub fn set_weight(&mut self, weight: i16) -> Result<()> {
        self.weight = check_in("LineFormat.we", weight, -1..=2, "-1..=2")?;
        Ok(())
    }

    /// An in-table color turns off automatic styling; an invisible line becomes solid.
    ///
    /// The automatic foreground index only stores the index and its color. Any other index
    /// past the end of `table` is ignored.
    pub fn set_color_index(&mut self, index: u16, table: &ColorTable) {
        if let Some(rgb) = table.get(index) {
            self.flags.remove(LineFlags::AUTO | LineFlags::AUTO_COLOR);
            self.color_index = index;
            self.color.rgb = rgb;
            if self.pattern == LineStyle::None.code() {
                self.pattern = LineStyle::Solid.code();
            }
        } else if index == ICV_AUTO_FOREGROUND {
            self.color_index = index;
            self.color.rgb = table.resolve(index);
        }
    }

    /// The effective line color.
    pub fn line_color(&self, table: &ColorTable) -> Rgb {
        table.resolve(self.color_index)
    }
}

impl ChartObject for LineFormat {
    const KIND: RecordKind = RecordKind::LineFormat;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(LineFormat {
            color: LongRgb::read(&mut c, "LineFormat.rgb")?,
            pattern: c.u16_named("LineFormat.lns")?,
            weight: c.i16_named("LineFormat.we")?,
            flags: LineFlags::from_bits_retain(c.u16_named("LineFormat.grbit")?),
            color_index: c.u16_named("LineFormat.icv")?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        self.color.write(out);
        put_u16(out, self.pattern);
        put_i16(out, self.weight);
        put_u16(out, self.flags.bits());
        put_u16(out, self.color_index);
    }

    /// An automatic black hairline.
    fn prototype() -> Self {
        LineFormat {
            color: LongRgb::black(),
            pattern: LineStyle::Solid.code(),
            weight: Self::HAIRLINE,
            flags: LineFlags::AUTO | LineFlags::AUTO_COLOR,
            color_index: ICV_AUTO_FOREGROUND,
        }
    }

    fn get_option(&self, name: &str) -> Option<String> {
        if is(name, &["LineStyle"]) {
            Some(self.pattern.to_string())
        } else if is(name, &["LineWeight"]) {
            Some(self.weight.to_string())
        } else if is(name, &["LineColor"]) {
            Some(self.color_index.to_string())
        } else {
            None
        }
    }

    fn set_option(&mut self, name: &str, value: &str, settings: &ChartSettings) -> Result<bool> {
        if is(name, &["LineStyle"]) {
            let code = parse_in("LineFormat.lns", value, 0..=8, "0..=8")?;
            if let Some(style) = LineStyle::from_code(code) {
                self.set_line_style(style);
            }
        } else if is(name, &["LineWeight"]) {
            self.weight = parse_in("LineFormat.we", value, -1..=2, "-1..=2")?;
        } else if is(name, &["LineColor"]) {
            let index = parse_in("LineFormat.icv", value, 0..=u16::MAX, "a color index")?;
            self.set_color_index(index, settings.get_color_table());
        } else {
            return Ok(false);
        }
        Ok(true)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    #[serde(transparent)]
    pub struct AreaFlags: u16 {
        const AUTO = 0x0001;
        const INVERT_NEGATIVE = 0x0002;
    }
}

/// Fill styling (0x100A).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaFormat {
    fore: LongRgb,
    back: LongRgb,
    pattern: u16,
    pub flags: AreaFlags,
    fore_index: u16,
    back_index: u16,
}

impl AreaFormat {
    pub const PATTERN_NONE: u16 = 0;
    pub const PATTERN_SOLID: u16 = 1;

    pub fn pattern(&self) -> u16 {
        self.pattern
    }

    pub fn fore_color_index(&self) -> u16 {
        self.fore_index
    }

    pub fn back_color_index(&self) -> u16 {
        self.back_index
    }

    /// Sets a solid fill in an in-table `index`; the background reverts to the default back color.
    ///
    /// The automatic background index only stores the index and its color. Any other index
    /// past the end of `table` is ignored.
    pub fn set_fore_color_index(&mut self, index: u16, table: &ColorTable) {
        if let Some(rgb) = table.get(index) {
            self.pattern = Self::PATTERN_SOLID;
            self.flags.remove(AreaFlags::AUTO);
            self.fore_index = index;
            self.fore.rgb = rgb;
            self.back_index = ICV_DEFAULT_BACK;
            self.back.rgb = table.resolve(ICV_DEFAULT_BACK);
        } else if index == ICV_AUTO_BACKGROUND {
            self.fore_index = index;
            self.fore.rgb = table.resolve(index);
        }
    }

    pub fn set_back_color_index(&mut self, index: u16, table: &ColorTable) {
        self.flags.remove(AreaFlags::AUTO);
        self.back_index = index;
        self.back.rgb = table.resolve(index);
    }

    /// The effective fill color.
    pub fn fill_color(&self, table: &ColorTable) -> Rgb {
        match self.pattern {
            0 => Rgb::WHITE,
            1 => table.resolve(self.fore_index),
            2 => table.resolve(ICV_GRAY50),
            3 => table.resolve(ICV_GRAY80),
            4 => table.resolve(ICV_GRAY25),
            _ => table.resolve(self.fore_index),
        }
    }
}

impl ChartObject for AreaFormat {
    const KIND: RecordKind = RecordKind::AreaFormat;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(AreaFormat {
            fore: LongRgb::read(&mut c, "AreaFormat.rgbFore")?,
            back: LongRgb::read(&mut c, "AreaFormat.rgbBack")?,
            pattern: c.u16_named("AreaFormat.fls")?,
            flags: AreaFlags::from_bits_retain(c.u16_named("AreaFormat.grbit")?),
            fore_index: c.u16_named("AreaFormat.icvFore")?,
            back_index: c.u16_named("AreaFormat.icvBack")?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        self.fore.write(out);
        self.back.write(out);
        put_u16(out, self.pattern);
        put_u16(out, self.flags.bits());
        put_u16(out, self.fore_index);
        put_u16(out, self.back_index);
    }

    /// Automatic fill with no pattern.
    fn prototype() -> Self {
        AreaFormat {
            fore: LongRgb::black(),
            back: LongRgb::black(),
            pattern: Self::PATTERN_NONE,
            flags: AreaFlags::AUTO,
            fore_index: ICV_AUTO_FOREGROUND,
            back_index: ICV_AUTO_FOREGROUND,
        }
    }

    fn get_option(&self, name: &str) -> Option<String> {
        if is(name, &["FillColor", "ForeColor"]) {
            Some(self.fore_index.to_string())
        } else if is(name, &["BackColor"]) {
            Some(self.back_index.to_string())
        } else {
            None
        }
    }

    fn set_option(&mut self, name: &str, value: &str, settings: &ChartSettings) -> Result<bool> {
        if is(name, &["FillColor", "ForeColor"]) {
            let index = parse_in("AreaFormat.icvFore", value, 0..=u16::MAX, "a color index")?;
            self.set_fore_color_index(index, settings.get_color_table());
        } else if is(name, &["BackColor"]) {
            let index = parse_in("AreaFormat.icvBack", value, 0..=u16::MAX, "a color index")?;
            self.set_back_color_index(index, settings.get_color_table());
        } else {
            return Ok(false);
        }
        Ok(true)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    #[serde(transparent)]
    pub struct MarkerFlags: u16 {
        const AUTO = 0x0001;
        /// No fill in the marker interior.
        const NO_FORE = 0x0010;
        /// No marker border.
        const NO_BACK = 0x0020;
    }
}

/// Data point marker styling (0x1009).
///
/// ```text
/// offset  field     size
/// 0       rgbFore   4
/// 4       rgbBack   4
/// 8       imk       2    marker style 0..=9
/// 10      grbit     2
/// 12      icvFore   2
/// 14      icvBack   2
/// 16      miSize    4    twips, if present
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerFormat {
    fore: LongRgb,
    back: LongRgb,
    style: u16,
    pub flags: MarkerFlags,
    fore_index: u16,
    back_index: u16,
    size: Option<u32>,
}

impl MarkerFormat {
    pub fn style(&self) -> u16 {
        self.style
    }

    pub fn size(&self) -> Option<u32> {
        self.size
    }

    pub fn set_style(&mut self, style: u16) -> Result<()> {
        self.style = check_in("MarkerFormat.imk", style, 0..=9, "0..=9")?;
        Ok(())
    }

    pub fn set_fore_color_index(&mut self, index: u16, table: &ColorTable) {
        self.flags.remove(MarkerFlags::AUTO);
        self.fore_index = index;
        self.fore.rgb = table.resolve(index);
    }

    pub fn set_back_color_index(&mut self, index: u16, table: &ColorTable) {
        self.flags.remove(MarkerFlags::AUTO);
        self.back_index = index;
        self.back.rgb = table.resolve(index);
    }
}

impl ChartObject for MarkerFormat {
    const KIND: RecordKind = RecordKind::MarkerFormat;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(MarkerFormat {
            fore: LongRgb::read(&mut c, "MarkerFormat.rgbFore")?,
            back: LongRgb::read(&mut c, "MarkerFormat.rgbBack")?,
            style: c.u16_named("MarkerFormat.imk")?,
            flags: MarkerFlags::from_bits_retain(c.u16_named("MarkerFormat.grbit")?),
            fore_index: c.u16_named("MarkerFormat.icvFore")?,
            back_index: c.u16_named("MarkerFormat.icvBack")?,
            size: c.opt_u32_named("MarkerFormat.miSize")?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        self.fore.write(out);
        self.back.write(out);
        put_u16(out, self.style);
        put_u16(out, self.flags.bits());
        put_u16(out, self.fore_index);
        put_u16(out, self.back_index);
        if let Some(size) = self.size {
            put_u32(out, size);
        }
    }

    fn prototype() -> Self {
        MarkerFormat {
            fore: LongRgb::black(),
            back: LongRgb::black(),
            style: 0,
            flags: MarkerFlags::empty(),
            fore_index: ICV_AUTO_FOREGROUND,
            back_index: ICV_AUTO_FOREGROUND,
            size: Some(60),
        }
    }

    fn get_option(&self, name: &str) -> Option<String> {
        if is(name, &["MarkerFormat", "MarkerStyle"]) {
            Some(self.style.to_string())
        } else if is(name, &["MarkerSize"]) {
            self.size.map(|s| s.to_string())
        } else {
            None
        }
    }

    fn set_option(&mut self, name: &str, value: &str, _settings: &ChartSettings) -> Result<bool> {
        if is(name, &["MarkerFormat", "MarkerStyle"]) {
            self.style = parse_in("MarkerFormat.imk", value, 0..=9, "0..=9")?;
        } else if is(name, &["MarkerSize"]) {
            self.size = Some(parse_in("MarkerFormat.miSize", value, 40..=1440, "40..=1440")?);
        } else {
            return Ok(false);
        }
        Ok(true)
    }
}

/// Pie slice explosion (0x100B).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PieFormat {
    explode: u16,
}

impl PieFormat {
    /// Distance of the slice from the pie center, in percent of the radius.
    pub fn explode(&self) -> u16 {
        self.explode
    }
}

impl ChartObject for PieFormat {
    const KIND: RecordKind = RecordKind::PieFormat;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(PieFormat {
            explode: c.u16_named("PieFormat.pcExplode")?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u16(out, self.explode);
    }

    fn prototype() -> Self {
        PieFormat::default()
    }

    fn get_option(&self, name: &str) -> Option<String> {
        is(name, &["Percentage"]).then(|| self.explode.to_string())
    }

    fn set_option(&mut self, name: &str, value: &str, _settings: &ChartSettings) -> Result<bool> {
        if !is(name, &["Percentage"]) {
            return Ok(false);
        }
        self.explode = parse_in("PieFormat.pcExplode", value, 0..=400, "0..=400")?;
        Ok(true)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    #[serde(transparent)]
    pub struct LabelFlags: u16 {
        const VALUE = 0x0001;
        const VALUE_PERCENT = 0x0002;
        const CATEGORY_PERCENT = 0x0004;
        const CATEGORY = 0x0010;
        const BUBBLE = 0x0020;
        const SERIES_NAME = 0x0040;
    }
}

const LABEL_OPTIONS: &[(&str, LabelFlags)] = &[
    ("ShowValueLabel", LabelFlags::VALUE),
    ("ShowValueAsPercent", LabelFlags::VALUE_PERCENT),
    ("ShowLabelAsPercent", LabelFlags::CATEGORY_PERCENT),
    ("ShowLabel", LabelFlags::CATEGORY),
    ("ShowBubbleLabel", LabelFlags::BUBBLE),
    ("ShowSeriesName", LabelFlags::SERIES_NAME),
];

/// Which data label parts are shown (0x100C).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AttachedLabel {
    pub flags: LabelFlags,
}

impl ChartObject for AttachedLabel {
    const KIND: RecordKind = RecordKind::AttachedLabel;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(AttachedLabel {
            flags: LabelFlags::from_bits_retain(c.u16_named("AttachedLabel.grbit")?),
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u16(out, self.flags.bits());
    }

    fn prototype() -> Self {
        AttachedLabel::default()
    }

    fn get_option(&self, name: &str) -> Option<String> {
        LABEL_OPTIONS
            .iter()
            .find(|(n, _)| is(name, &[*n]))
            .map(|(_, flag)| bool_str(self.flags.contains(*flag)))
    }

    fn set_option(&mut self, name: &str, value: &str, _settings: &ChartSettings) -> Result<bool> {
        let Some((_, flag)) = LABEL_OPTIONS.iter().find(|(n, _)| is(name, &[*n])) else {
            return Ok(false);
        };
        self.flags.set(*flag, parse_bool("AttachedLabel.grbit", value)?);
        Ok(true)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    #[serde(transparent)]
    pub struct SerFmtFlags: u16 {
        const SMOOTHED = 0x0001;
        const BUBBLES_3D = 0x0002;
        const SHADOW = 0x0004;
    }
}

/// Series line and bubble options (0x105D).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SerFmt {
    pub flags: SerFmtFlags,
}

impl SerFmt {
    pub fn is_smoothed(&self) -> bool {
        self.flags.contains(SerFmtFlags::SMOOTHED)
    }
}

impl ChartObject for SerFmt {
    const KIND: RecordKind = RecordKind::SerFmt;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(SerFmt {
            flags: SerFmtFlags::from_bits_retain(c.u16_named("SerFmt.grbit")?),
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u16(out, self.flags.bits());
    }

    fn prototype() -> Self {
        SerFmt::default()
    }

    fn get_option(&self, name: &str) -> Option<String> {
        if is(name, &["Smooth", "SmoothLines"]) {
            Some(bool_str(self.is_smoothed()))
        } else if is(name, &["ThreeDBubbles"]) {
            Some(bool_str(self.flags.contains(SerFmtFlags::BUBBLES_3D)))
        } else if is(name, &["ArShadow"]) {
            Some(bool_str(self.flags.contains(SerFmtFlags::SHADOW)))
        } else {
            None
        }
    }

    fn set_option(&mut self, name: &str, value: &str, _settings: &ChartSettings) -> Result<bool> {
        let flag = if is(name, &["Smooth", "SmoothLines"]) {
            SerFmtFlags::SMOOTHED
        } else if is(name, &["ThreeDBubbles"]) {
            SerFmtFlags::BUBBLES_3D
        } else if is(name, &["ArShadow"]) {
            SerFmtFlags::SHADOW
        } else {
            return Ok(false);
        };
        self.flags.set(flag, parse_bool("SerFmt.grbit", value)?);
        Ok(true)
    }
}

const BAR_SHAPES: &[(&str, (u8, u8))] = &[
    ("box", (0, 0)),
    ("cylinder", (1, 0)),
    ("pyramid", (0, 1)),
    ("cone", (1, 1)),
    ("pyramidToMax", (0, 2)),
    ("coneToMax", (1, 2)),
];

/// Shape of 3-D bars (0x105F).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Chart3DBarShape {
    /// 0 rectangular base, 1 circular base.
    pub riser: u8,
    /// 0 no taper, 1 taper per bar, 2 taper to the axis maximum.
    pub taper: u8,
}

impl Chart3DBarShape {
    /// The OOXML shape name, if the riser/taper pair is a known one.
    pub fn shape_name(&self) -> Option<String> {
        name_of(BAR_SHAPES, (self.riser, self.taper))
    }
}

impl ChartObject for Chart3DBarShape {
    const KIND: RecordKind = RecordKind::Chart3DBarShape;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(Chart3DBarShape {
            riser: c.u8_named("Chart3DBarShape.riser")?,
            taper: c.u8_named("Chart3DBarShape.taper")?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u8(out, self.riser);
        put_u8(out, self.taper);
    }

    fn prototype() -> Self {
        Chart3DBarShape::default()
    }

    fn get_option(&self, name: &str) -> Option<String> {
        if is(name, &["Shape"]) {
            self.shape_name()
        } else {
            None
        }
    }

    fn set_option(&mut self, name: &str, value: &str, _settings: &ChartSettings) -> Result<bool> {
        if !is(name, &["Shape"]) {
            return Ok(false);
        }
        let (riser, taper) = parse_named(
            "Chart3DBarShape.shape",
            value,
            BAR_SHAPES,
            "box, cylinder, pyramid, cone, pyramidToMax or coneToMax",
        )?;
        self.riser = riser;
        self.taper = taper;
        Ok(true)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    #[serde(transparent)]
    pub struct FrameFlags: u16 {
        const AUTO_SIZE = 0x0001;
        const AUTO_POSITION = 0x0002;
    }
}

/// Border and fill container of a chart element (0x1032).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    /// 0 regular border, 4 border with shadow.
    pub frame_type: u16,
    pub flags: FrameFlags,
}

impl ChartObject for Frame {
    const KIND: RecordKind = RecordKind::Frame;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(Frame {
            frame_type: c.u16_named("Frame.frt")?,
            flags: FrameFlags::from_bits_retain(c.u16_named("Frame.grbit")?),
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u16(out, self.frame_type);
        put_u16(out, self.flags.bits());
    }

    fn prototype() -> Self {
        Frame {
            frame_type: 0,
            flags: FrameFlags::AUTO_POSITION,
        }
    }

    fn get_option(&self, name: &str) -> Option<String> {
        if is(name, &["AutoSize"]) {
            Some(bool_str(self.flags.contains(FrameFlags::AUTO_SIZE)))
        } else if is(name, &["AutoPosition"]) {
            Some(bool_str(self.flags.contains(FrameFlags::AUTO_POSITION)))
        } else {
            None
        }
    }

    fn set_option(&mut self, name: &str, value: &str, _settings: &ChartSettings) -> Result<bool> {
        let flag = if is(name, &["AutoSize"]) {
            FrameFlags::AUTO_SIZE
        } else if is(name, &["AutoPosition"]) {
            FrameFlags::AUTO_POSITION
        } else {
            return Ok(false);
        };
        self.flags.set(flag, parse_bool("Frame.grbit", value)?);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::err::ChartError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_area_fore_color_sets_solid_fill_and_default_back() {
        let table = ColorTable::default();
        let mut area = AreaFormat::prototype();
        area.set_fore_color_index(10, &table);
        assert_eq!(area.pattern(), AreaFormat::PATTERN_SOLID);
        assert!(!area.flags.contains(AreaFlags::AUTO));
        assert_eq!(area.back_color_index(), ICV_DEFAULT_BACK);
        assert_eq!(area.fill_color(&table), table.resolve(10));
        assert_eq!(
            area.to_bytes(),
            vec![
                0xFF, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0x00, 0x01, 0x00, 0x00, 0x00, 0x0A, 0x00,
                0x09, 0x00
            ]
        );
    }

    #[test]
    fn test_area_fore_color_past_the_table() {
        let table = ColorTable::default();
        let mut area = AreaFormat::prototype();
        area.set_fore_color_index(ICV_AUTO_BACKGROUND, &table);
        assert_eq!(area.fore_color_index(), ICV_AUTO_BACKGROUND);
        assert_eq!(area.fore.rgb, Rgb::WHITE);
        assert_eq!(area.pattern(), AreaFormat::PATTERN_NONE);
        assert!(area.flags.contains(AreaFlags::AUTO));
        assert_eq!(area.back_color_index(), ICV_AUTO_FOREGROUND);

        let before = AreaFormat::prototype();
        let mut area = before.clone();
        area.set_fore_color_index(0x51, &table);
        area.set_fore_color_index(0x1234, &table);
        assert_eq!(area, before);
    }

    #[test]
    fn test_area_fill_patterns() {
        let table = ColorTable::default();
        let mut area = AreaFormat::prototype();
        assert_eq!(area.fill_color(&table), Rgb::WHITE);
        area.pattern = 2;
        assert_eq!(area.fill_color(&table), table.resolve(ICV_GRAY50));
        area.pattern = 4;
        assert_eq!(area.fill_color(&table), table.resolve(ICV_GRAY25));
    }

    #[test]
    fn test_automatic_line_color_is_black() {
        let table = ColorTable::default();
        let line = LineFormat::prototype();
        assert_eq!(line.color_index(), 0x4D);
        assert_eq!(line.line_color(&table), Rgb::BLACK);
        assert_eq!(
            line.to_bytes(),
            vec![0, 0, 0, 0, 0, 0, 0xFF, 0xFF, 9, 0, 77, 0]
        );
    }

    #[test]
    fn test_line_color_option_clears_auto_and_makes_hidden_line_solid() {
        let settings = ChartSettings::default();
        let mut line = LineFormat::prototype();
        line.set_line_style(LineStyle::None);
        assert!(line.set_option("LineColor", "2", &settings).unwrap());
        assert_eq!(line.line_style(), Some(LineStyle::Solid));
        assert_eq!(line.rgb(), Rgb::new(255, 0, 0));
        assert!(line.flags.is_empty());
        assert!(matches!(
            line.set_option("LineWeight", "3", &settings),
            Err(ChartError::InvalidFieldValue { .. })
        ));
    }

    #[test]
    fn test_line_color_past_the_table() {
        let table = ColorTable::default();
        let mut line = LineFormat::prototype();
        line.set_line_style(LineStyle::None);
        line.set_color_index(10, &table);
        assert_eq!(line.rgb(), Rgb::new(255, 0, 0));

        line.set_color_index(ICV_AUTO_FOREGROUND, &table);
        assert_eq!(line.color_index(), ICV_AUTO_FOREGROUND);
        assert_eq!(line.rgb(), Rgb::BLACK);
        assert!(line.flags.is_empty());
        assert_eq!(line.line_style(), Some(LineStyle::Solid));

        let before = line.clone();
        line.set_color_index(ICV_AUTO_BACKGROUND, &table);
        line.set_color_index(0x7FFF, &table);
        assert_eq!(line, before);

        let settings = ChartSettings::default();
        assert!(line.set_option("LineColor", "200", &settings).unwrap());
        assert_eq!(line, before);
    }

    #[test]
    fn test_marker_size_is_optional() {
        let short = [0u8; 16];
        let marker = MarkerFormat::decode(&short).unwrap();
        assert_eq!(marker.size(), None);
        assert_eq!(marker.to_bytes().len(), 16);
        assert_eq!(marker.get_option("MarkerSize"), None);
        assert_eq!(MarkerFormat::prototype().to_bytes().len(), 20);
    }

    #[test]
    fn test_marker_options() {
        let settings = ChartSettings::default();
        let mut marker = MarkerFormat::prototype();
        marker.set_option("markerstyle", "2", &settings).unwrap();
        assert_eq!(marker.style(), 2);
        assert!(marker.set_option("MarkerSize", "20", &settings).is_err());
        marker.set_fore_color_index(0x4D, settings.get_color_table());
        assert!(marker.fore.rgb == Rgb::BLACK);
    }

    #[test]
    fn test_attached_label_flags() {
        let settings = ChartSettings::default();
        let mut label = AttachedLabel::prototype();
        label.set_option("ShowSeriesName", "true", &settings).unwrap();
        label.set_option("showvaluelabel", "1", &settings).unwrap();
        assert_eq!(label.to_bytes(), vec![0x41, 0x00]);
        assert_eq!(label.get_option("ShowLabel").as_deref(), Some("false"));
    }

    #[test]
    fn test_bar_shape_names() {
        let settings = ChartSettings::default();
        let mut shape = Chart3DBarShape::prototype();
        assert_eq!(shape.get_option("Shape").as_deref(), Some("box"));
        shape.set_option("Shape", "coneToMax", &settings).unwrap();
        assert_eq!((shape.riser, shape.taper), (1, 2));
        assert!(shape.set_option("Shape", "sphere", &settings).is_err());
    }

    #[test]
    fn test_data_format_whole_series() {
        let df = DataFormat::prototype();
        assert!(df.is_whole_series());
        assert_eq!(df.to_bytes(), vec![0xFF, 0xFF, 0, 0, 0, 0, 0, 0]);
    }
}
