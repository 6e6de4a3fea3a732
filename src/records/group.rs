//! Chart-group records: the chart-kind records that select how a group's series are drawn,
//! and the group-level records around them.

use super::ChartObject;
use super::value::{bool_str, check_in, is, parse_bool, parse_in};
use crate::err::{ChartError, DecodeResult, Result};
use crate::registry::RecordKind;
use crate::settings::ChartSettings;
use crate::utils::ByteCursor;
use crate::utils::bytes::{put_i16, put_u16};
use bitflags::bitflags;
use serde::Serialize;

/// Overlap forced by stacked and 100% stacked bars.
pub const STACKED_OVERLAP: i16 = -100;
/// Default gap between bar clusters, in percent of bar width.
pub const DEFAULT_GAP: u16 = 150;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    #[serde(transparent)]
    pub struct BarFlags: u16 {
        /// Bars are horizontal (a bar chart); otherwise vertical (a column chart).
        const HORIZONTAL = 0x0001;
        const STACKED = 0x0002;
        const PERCENT = 0x0004;
        const SHADOW = 0x0008;
    }
}

/// Bar/column chart group (0x1017).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bar {
    overlap: i16,
    gap: u16,
    flags: BarFlags,
}

impl Bar {
    pub fn overlap(&self) -> i16 {
        self.overlap
    }

    pub fn gap(&self) -> u16 {
        self.gap
    }

    pub fn flags(&self) -> BarFlags {
        self.flags
    }

    /// Sets the overlap between bars of a cluster, -100..=100 percent.
    pub fn set_overlap(&mut self, overlap: i16) -> Result<()> {
        self.overlap = check_in("Bar.overlap", overlap, -100..=100, "-100..=100")?;
        Ok(())
    }

    /// Sets the gap between clusters, 0..=500 percent.
    pub fn set_gap(&mut self, gap: u16) -> Result<()> {
        self.gap = check_in("Bar.gap", gap, 0..=500, "0..=500")?;
        Ok(())
    }

    pub fn is_horizontal(&self) -> bool {
        self.flags.contains(BarFlags::HORIZONTAL)
    }

    pub fn set_horizontal(&mut self, horizontal: bool) {
        self.flags.set(BarFlags::HORIZONTAL, horizontal);
    }

    pub fn is_stacked(&self) -> bool {
        self.flags.contains(BarFlags::STACKED)
    }

    /// Stacking a bar group always resets overlap to -100 and gap to 150.
    pub fn set_stacked(&mut self, stacked: bool) {
        self.flags.set(BarFlags::STACKED, stacked);
        if stacked {
            self.reset_for_stacking();
        }
    }

    pub fn is_100_percent(&self) -> bool {
        self.flags.contains(BarFlags::PERCENT)
    }

    /// Only the percent bit changes; turning it on applies the stacking overlap/gap reset.
    pub fn set_100_percent(&mut self, percent: bool) {
        self.flags.set(BarFlags::PERCENT, percent);
        if percent {
            self.reset_for_stacking();
        }
    }

    pub fn has_shadow(&self) -> bool {
        self.flags.contains(BarFlags::SHADOW)
    }

    pub fn set_shadow(&mut self, shadow: bool) {
        self.flags.set(BarFlags::SHADOW, shadow);
    }

    fn reset_for_stacking(&mut self) {
        self.overlap = STACKED_OVERLAP;
        self.gap = DEFAULT_GAP;
    }
}

impl ChartObject for Bar {
    const KIND: RecordKind = RecordKind::Bar;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(Bar {
            overlap: c.i16_named("Bar.pcOverlap")?,
            gap: c.u16_named("Bar.pcGap")?,
            flags: BarFlags::from_bits_retain(c.u16_named("Bar.grbit")?),
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_i16(out, self.overlap);
        put_u16(out, self.gap);
        put_u16(out, self.flags.bits());
    }

    /// A clustered column group.
    fn prototype() -> Self {
        Bar {
            overlap: 0,
            gap: DEFAULT_GAP,
            flags: BarFlags::empty(),
        }
    }

    fn get_option(&self, name: &str) -> Option<String> {
        if is(name, &["Stacked"]) {
            Some(bool_str(self.is_stacked()))
        } else if is(name, &["PercentageDisplay"]) {
            Some(bool_str(self.is_100_percent()))
        } else if is(name, &["Shadow"]) {
            Some(bool_str(self.has_shadow()))
        } else if is(name, &["Overlap"]) {
            Some(self.overlap.to_string())
        } else if is(name, &["Gap"]) {
            Some(self.gap.to_string())
        } else if is(name, &["Horizontal"]) {
            Some(bool_str(self.is_horizontal()))
        } else {
            None
        }
    }

    fn set_option(&mut self, name: &str, value: &str, _settings: &ChartSettings) -> Result<bool> {
        if is(name, &["Stacked"]) {
            self.set_stacked(parse_bool("Bar.Stacked", value)?);
        } else if is(name, &["PercentageDisplay"]) {
            self.set_100_percent(parse_bool("Bar.PercentageDisplay", value)?);
        } else if is(name, &["Shadow"]) {
            self.set_shadow(parse_bool("Bar.Shadow", value)?);
        } else if is(name, &["Overlap"]) {
            self.overlap = parse_in("Bar.overlap", value, -100..=100, "-100..=100")?;
        } else if is(name, &["Gap"]) {
            self.gap = parse_in("Bar.gap", value, 0..=500, "0..=500")?;
        } else if is(name, &["Horizontal"]) {
            self.set_horizontal(parse_bool("Bar.Horizontal", value)?);
        } else {
            return Ok(false);
        }
        Ok(true)
    }
}

bitflags! {
    /// Flags shared by the line and area chart groups.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    #[serde(transparent)]
    pub struct StackFlags: u16 {
        const STACKED = 0x0001;
        const PERCENT = 0x0002;
        const SHADOW = 0x0004;
    }
}

fn stack_option(flags: StackFlags, name: &str) -> Option<String> {
    if is(name, &["Stacked"]) {
        Some(bool_str(flags.contains(StackFlags::STACKED)))
    } else if is(name, &["PercentageDisplay"]) {
        Some(bool_str(flags.contains(StackFlags::PERCENT)))
    } else if is(name, &["Shadow"]) {
        Some(bool_str(flags.contains(StackFlags::SHADOW)))
    } else {
        None
    }
}

fn set_stack_option(flags: &mut StackFlags, name: &str, value: &str) -> Result<bool> {
    let flag = if is(name, &["Stacked"]) {
        StackFlags::STACKED
    } else if is(name, &["PercentageDisplay"]) {
        StackFlags::PERCENT
    } else if is(name, &["Shadow"]) {
        StackFlags::SHADOW
    } else {
        return Ok(false);
    };
    flags.set(flag, parse_bool("grbit", value)?);
    Ok(true)
}

macro_rules! stack_group {
    ($(#[$doc:meta])* $name:ident, $kind:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
        pub struct $name {
            pub flags: StackFlags,
        }

        impl $name {
            pub fn is_stacked(&self) -> bool {
                self.flags.contains(StackFlags::STACKED)
            }

            pub fn is_100_percent(&self) -> bool {
                self.flags.contains(StackFlags::PERCENT)
            }

            pub fn has_shadow(&self) -> bool {
                self.flags.contains(StackFlags::SHADOW)
            }
        }

        impl ChartObject for $name {
            const KIND: RecordKind = RecordKind::$kind;

            fn decode(payload: &[u8]) -> DecodeResult<Self> {
                let mut c = ByteCursor::new(payload);
                Ok($name {
                    flags: StackFlags::from_bits_retain(c.u16_named(concat!(stringify!($name), ".grbit"))?),
                })
            }

            fn encode(&self, out: &mut Vec<u8>) {
                put_u16(out, self.flags.bits());
            }

            fn prototype() -> Self {
                $name::default()
            }

            fn get_option(&self, name: &str) -> Option<String> {
                stack_option(self.flags, name)
            }

            fn set_option(&mut self, name: &str, value: &str, _settings: &ChartSettings) -> Result<bool> {
                set_stack_option(&mut self.flags, name, value)
            }
        }
    };
}

stack_group!(
    /// Line chart group (0x1018).
    Line,
    Line
);
stack_group!(
    /// Area chart group (0x101A).
    Area,
    Area
);

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    #[serde(transparent)]
    pub struct PieFlags: u16 {
        const SHADOW = 0x0001;
        const LEADER_LINES = 0x0002;
    }
}

/// Whether a pie group draws a full pie or a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PieKind {
    Pie,
    Doughnut,
}

/// Pie/doughnut chart group (0x1019).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pie {
    start_angle: u16,
    donut: u16,
    flags: PieFlags,
}

impl Pie {
    /// The hole size of a doughnut created with [`Pie::set_as_doughnut`].
    pub const DEFAULT_DONUT: u16 = 50;

    /// Pie versus doughnut is derived from the hole size: zero is a pie.
    pub fn kind(&self) -> PieKind {
        if self.donut == 0 {
            PieKind::Pie
        } else {
            PieKind::Doughnut
        }
    }

    pub fn start_angle(&self) -> u16 {
        self.start_angle
    }

    pub fn set_start_angle(&mut self, degrees: u16) -> Result<()> {
        self.start_angle = check_in("Pie.anStart", degrees, 0..=360, "0..=360")?;
        Ok(())
    }

    pub fn donut_size(&self) -> u16 {
        self.donut
    }

    pub fn set_donut_size(&mut self, percent: u16) -> Result<()> {
        self.donut = check_in("Pie.pcDonut", percent, 0..=100, "0..=100")?;
        Ok(())
    }

    pub fn set_as_doughnut(&mut self) {
        self.donut = Self::DEFAULT_DONUT;
    }

    pub fn flags(&self) -> PieFlags {
        self.flags
    }

    pub fn has_shadow(&self) -> bool {
        self.flags.contains(PieFlags::SHADOW)
    }

    pub fn shows_leader_lines(&self) -> bool {
        self.flags.contains(PieFlags::LEADER_LINES)
    }
}

impl ChartObject for Pie {
    const KIND: RecordKind = RecordKind::Pie;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(Pie {
            start_angle: c.u16_named("Pie.anStart")?,
            donut: c.u16_named("Pie.pcDonut")?,
            flags: PieFlags::from_bits_retain(c.u16_named("Pie.grbit")?),
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u16(out, self.start_angle);
        put_u16(out, self.donut);
        put_u16(out, self.flags.bits());
    }

    fn prototype() -> Self {
        Pie {
            start_angle: 0,
            donut: 0,
            flags: PieFlags::LEADER_LINES,
        }
    }

    fn get_option(&self, name: &str) -> Option<String> {
        if is(name, &["Shadow"]) {
            Some(bool_str(self.has_shadow()))
        } else if is(name, &["ShowLdrLines"]) {
            Some(bool_str(self.shows_leader_lines()))
        } else if is(name, &["Donut", "DonutSize"]) {
            Some(self.donut.to_string())
        } else if is(name, &["AnStart", "FirstSliceAng"]) {
            Some(self.start_angle.to_string())
        } else {
            None
        }
    }

    fn set_option(&mut self, name: &str, value: &str, _settings: &ChartSettings) -> Result<bool> {
        if is(name, &["Shadow"]) {
            self.flags.set(PieFlags::SHADOW, parse_bool("Pie.Shadow", value)?);
        } else if is(name, &["ShowLdrLines"]) {
            self.flags
                .set(PieFlags::LEADER_LINES, parse_bool("Pie.ShowLdrLines", value)?);
        } else if is(name, &["Donut", "DonutSize"]) {
            self.donut = parse_in("Pie.pcDonut", value, 0..=100, "0..=100")?;
        } else if is(name, &["AnStart", "FirstSliceAng"]) {
            self.start_angle = parse_in("Pie.anStart", value, 0..=360, "0..=360")?;
        } else {
            return Ok(false);
        }
        Ok(true)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    #[serde(transparent)]
    pub struct ScatterFlags: u16 {
        const BUBBLES = 0x0001;
        const SHOW_NEGATIVE = 0x0002;
        const SHADOW = 0x0004;
    }
}

/// Scatter/bubble chart group (0x101B).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scatter {
    bubble_ratio: u16,
    bubble_size: u16,
    pub flags: ScatterFlags,
}

impl Scatter {
    pub const BUBBLE_SIZE_AREA: u16 = 1;
    pub const BUBBLE_SIZE_WIDTH: u16 = 2;

    pub fn bubble_ratio(&self) -> u16 {
        self.bubble_ratio
    }

    pub fn bubble_size(&self) -> u16 {
        self.bubble_size
    }

    pub fn is_bubble(&self) -> bool {
        self.flags.contains(ScatterFlags::BUBBLES)
    }
}

impl ChartObject for Scatter {
    const KIND: RecordKind = RecordKind::Scatter;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(Scatter {
            bubble_ratio: c.u16_named("Scatter.pcBubbleSizeRatio")?,
            bubble_size: c.u16_named("Scatter.wBubbleSize")?,
            flags: ScatterFlags::from_bits_retain(c.u16_named("Scatter.grbit")?),
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u16(out, self.bubble_ratio);
        put_u16(out, self.bubble_size);
        put_u16(out, self.flags.bits());
    }

    fn prototype() -> Self {
        Scatter {
            bubble_ratio: 100,
            bubble_size: Self::BUBBLE_SIZE_AREA,
            flags: ScatterFlags::empty(),
        }
    }

    fn get_option(&self, name: &str) -> Option<String> {
        if is(name, &["BubbleSizeRatio"]) {
            Some(self.bubble_ratio.to_string())
        } else if is(name, &["BubbleSize"]) {
            Some(self.bubble_size.to_string())
        } else if is(name, &["ShowNeg"]) {
            Some(bool_str(self.flags.contains(ScatterFlags::SHOW_NEGATIVE)))
        } else if is(name, &["Shadow"]) {
            Some(bool_str(self.flags.contains(ScatterFlags::SHADOW)))
        } else {
            None
        }
    }

    fn set_option(&mut self, name: &str, value: &str, _settings: &ChartSettings) -> Result<bool> {
        if is(name, &["BubbleSizeRatio"]) {
            self.bubble_ratio = parse_in("Scatter.pcBubbleSizeRatio", value, 0..=300, "0..=300")?;
        } else if is(name, &["BubbleSize"]) {
            self.bubble_size = parse_in("Scatter.wBubbleSize", value, 1..=2, "1 (area) or 2 (width)")?;
        } else if is(name, &["ShowNeg"]) {
            self.flags
                .set(ScatterFlags::SHOW_NEGATIVE, parse_bool("Scatter.ShowNeg", value)?);
        } else if is(name, &["Shadow"]) {
            self.flags
                .set(ScatterFlags::SHADOW, parse_bool("Scatter.Shadow", value)?);
        } else {
            return Ok(false);
        }
        Ok(true)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    #[serde(transparent)]
    pub struct RadarFlags: u16 {
        const AXIS_LABELS = 0x0001;
        const SHADOW = 0x0002;
    }
}

/// Radar chart group (0x103E).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Radar {
    pub flags: RadarFlags,
    pub reserved: Option<u16>,
}

impl ChartObject for Radar {
    const KIND: RecordKind = RecordKind::Radar;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(Radar {
            flags: RadarFlags::from_bits_retain(c.u16_named("Radar.grbit")?),
            reserved: c.opt_u16_named("Radar.unused")?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u16(out, self.flags.bits());
        if let Some(r) = self.reserved {
            put_u16(out, r);
        }
    }

    fn prototype() -> Self {
        Radar {
            flags: RadarFlags::AXIS_LABELS,
            reserved: Some(0x12),
        }
    }

    fn get_option(&self, name: &str) -> Option<String> {
        if is(name, &["AxisLabels"]) {
            Some(bool_str(self.flags.contains(RadarFlags::AXIS_LABELS)))
        } else if is(name, &["Shadow"]) {
            Some(bool_str(self.flags.contains(RadarFlags::SHADOW)))
        } else {
            None
        }
    }

    fn set_option(&mut self, name: &str, value: &str, _settings: &ChartSettings) -> Result<bool> {
        if is(name, &["AxisLabels"]) {
            self.flags
                .set(RadarFlags::AXIS_LABELS, parse_bool("Radar.AxisLabels", value)?);
        } else if is(name, &["Shadow"]) {
            self.flags.set(RadarFlags::SHADOW, parse_bool("Radar.Shadow", value)?);
        } else {
            return Ok(false);
        }
        Ok(true)
    }
}

/// Filled radar chart group (0x1040). Only the axis-labels bit is defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RadarArea {
    pub flags: RadarFlags,
    pub reserved: Option<u16>,
}

impl ChartObject for RadarArea {
    const KIND: RecordKind = RecordKind::RadarArea;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(RadarArea {
            flags: RadarFlags::from_bits_retain(c.u16_named("RadarArea.grbit")?),
            reserved: c.opt_u16_named("RadarArea.unused")?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u16(out, self.flags.bits());
        if let Some(r) = self.reserved {
            put_u16(out, r);
        }
    }

    fn prototype() -> Self {
        RadarArea {
            flags: RadarFlags::AXIS_LABELS,
            reserved: None,
        }
    }

    fn get_option(&self, name: &str) -> Option<String> {
        is(name, &["AxisLabels"]).then(|| bool_str(self.flags.contains(RadarFlags::AXIS_LABELS)))
    }

    fn set_option(&mut self, name: &str, value: &str, _settings: &ChartSettings) -> Result<bool> {
        if !is(name, &["AxisLabels"]) {
            return Ok(false);
        }
        self.flags
            .set(RadarFlags::AXIS_LABELS, parse_bool("RadarArea.AxisLabels", value)?);
        Ok(true)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    #[serde(transparent)]
    pub struct SurfaceFlags: u16 {
        const FILL = 0x0001;
        const PHONG = 0x0002;
    }
}

/// Surface chart group (0x103F).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Surface {
    pub flags: SurfaceFlags,
    pub reserved: Option<u16>,
}

impl ChartObject for Surface {
    const KIND: RecordKind = RecordKind::Surface;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(Surface {
            flags: SurfaceFlags::from_bits_retain(c.u16_named("Surface.grbit")?),
            reserved: c.opt_u16_named("Surface.unused")?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u16(out, self.flags.bits());
        if let Some(r) = self.reserved {
            put_u16(out, r);
        }
    }

    fn prototype() -> Self {
        Surface {
            flags: SurfaceFlags::empty(),
            reserved: None,
        }
    }

    fn get_option(&self, name: &str) -> Option<String> {
        if is(name, &["ColorFill"]) {
            Some(bool_str(self.flags.contains(SurfaceFlags::FILL)))
        } else if is(name, &["Shading"]) {
            Some(bool_str(self.flags.contains(SurfaceFlags::PHONG)))
        } else {
            None
        }
    }

    fn set_option(&mut self, name: &str, value: &str, _settings: &ChartSettings) -> Result<bool> {
        if is(name, &["ColorFill"]) {
            self.flags
                .set(SurfaceFlags::FILL, parse_bool("Surface.ColorFill", value)?);
        } else if is(name, &["Shading"]) {
            self.flags
                .set(SurfaceFlags::PHONG, parse_bool("Surface.Shading", value)?);
        } else {
            return Ok(false);
        }
        Ok(true)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    #[serde(transparent)]
    pub struct ChartFormatFlags: u16 {
        /// Each data point of a single-series group gets its own color.
        const VARIED = 0x0001;
    }
}

/// Chart group container (0x1014).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartFormat {
    pub reserved: [u8; 16],
    pub flags: ChartFormatFlags,
    /// Z-order of the group among the chart's groups.
    pub drawing_order: u16,
}

impl ChartObject for ChartFormat {
    const KIND: RecordKind = RecordKind::ChartFormat;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(ChartFormat {
            reserved: c.array::<16>("ChartFormat.reserved")?,
            flags: ChartFormatFlags::from_bits_retain(c.u16_named("ChartFormat.grbit")?),
            drawing_order: c.u16_named("ChartFormat.icrt")?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.reserved);
        put_u16(out, self.flags.bits());
        put_u16(out, self.drawing_order);
    }

    fn prototype() -> Self {
        ChartFormat {
            reserved: [0; 16],
            flags: ChartFormatFlags::empty(),
            drawing_order: 0,
        }
    }

    fn get_option(&self, name: &str) -> Option<String> {
        is(name, &["VaryColors"]).then(|| bool_str(self.flags.contains(ChartFormatFlags::VARIED)))
    }

    fn set_option(&mut self, name: &str, value: &str, _settings: &ChartSettings) -> Result<bool> {
        if !is(name, &["VaryColors"]) {
            return Ok(false);
        }
        self.flags
            .set(ChartFormatFlags::VARIED, parse_bool("ChartFormat.VaryColors", value)?);
        Ok(true)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    #[serde(transparent)]
    pub struct ThreeDFlags: u16 {
        const PERSPECTIVE = 0x0001;
        const CLUSTER = 0x0002;
        const SCALING = 0x0004;
        const NOT_PIE = 0x0008;
        const TWO_D_WALLS = 0x0010;
    }
}

/// 3-D options of a chart group (0x103A).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreeD {
    rotation: u16,
    elevation: i16,
    distance: u16,
    height: u16,
    depth: u16,
    gap: u16,
    pub flags: ThreeDFlags,
}

impl ThreeD {
    pub fn rotation(&self) -> u16 {
        self.rotation
    }

    pub fn elevation(&self) -> i16 {
        self.elevation
    }

    pub fn distance(&self) -> u16 {
        self.distance
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn depth(&self) -> u16 {
        self.depth
    }

    pub fn gap(&self) -> u16 {
        self.gap
    }

    pub fn is_clustered(&self) -> bool {
        self.flags.contains(ThreeDFlags::CLUSTER)
    }

    /// Switches the grbit between the pie and non-pie shapes observed in real files.
    ///
    /// Pie mode keeps only bit 3; non-pie mode turns on perspective, cluster, scaling and
    /// 2-D walls on top of whatever was set.
    pub fn set_pie_mode(&mut self, pie: bool) {
        let bits = self.flags.bits();
        self.flags = ThreeDFlags::from_bits_retain(if pie { bits & 0x0008 } else { bits | 0x0017 });
    }

    fn flag_option(&self, flag: ThreeDFlags) -> String {
        if self.flags.contains(flag) { "1" } else { "0" }.to_string()
    }
}

impl ChartObject for ThreeD {
    const KIND: RecordKind = RecordKind::ThreeD;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(ThreeD {
            rotation: c.u16_named("ThreeD.anRot")?,
            elevation: c.i16_named("ThreeD.anElev")?,
            distance: c.u16_named("ThreeD.pcDist")?,
            height: c.u16_named("ThreeD.pcHeight")?,
            depth: c.u16_named("ThreeD.pcDepth")?,
            gap: c.u16_named("ThreeD.pcGap")?,
            flags: ThreeDFlags::from_bits_retain(c.u16_named("ThreeD.grbit")?),
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u16(out, self.rotation);
        put_i16(out, self.elevation);
        put_u16(out, self.distance);
        put_u16(out, self.height);
        put_u16(out, self.depth);
        put_u16(out, self.gap);
        put_u16(out, self.flags.bits());
    }

    fn prototype() -> Self {
        ThreeD {
            rotation: 0,
            elevation: 0,
            distance: 30,
            height: 100,
            depth: 100,
            gap: DEFAULT_GAP,
            flags: ThreeDFlags::empty(),
        }
    }

    fn get_option(&self, name: &str) -> Option<String> {
        if is(name, &["AnRot"]) {
            Some(self.rotation.to_string())
        } else if is(name, &["AnElev"]) {
            Some(self.elevation.to_string())
        } else if is(name, &["PcDist"]) {
            Some(self.distance.to_string())
        } else if is(name, &["PcHeight"]) {
            Some(self.height.to_string())
        } else if is(name, &["PcDepth"]) {
            Some(self.depth.to_string())
        } else if is(name, &["PcGap"]) {
            Some(self.gap.to_string())
        } else if is(name, &["Perspective"]) {
            Some(self.flag_option(ThreeDFlags::PERSPECTIVE))
        } else if is(name, &["Cluster"]) {
            Some(self.flag_option(ThreeDFlags::CLUSTER))
        } else if is(name, &["ThreeDScaling"]) {
            Some(self.flag_option(ThreeDFlags::SCALING))
        } else if is(name, &["TwoDWalls"]) {
            Some(self.flag_option(ThreeDFlags::TWO_D_WALLS))
        } else {
            None
        }
    }

    fn set_option(&mut self, name: &str, value: &str, _settings: &ChartSettings) -> Result<bool> {
        let flag = if is(name, &["AnRot"]) {
            self.rotation = parse_in("ThreeD.anRot", value, 0..=360, "0..=360")?;
            return Ok(true);
        } else if is(name, &["AnElev"]) {
            self.elevation = parse_in("ThreeD.anElev", value, -90..=90, "-90..=90")?;
            return Ok(true);
        } else if is(name, &["PcDist"]) {
            self.distance = parse_in("ThreeD.pcDist", value, 0..=100, "0..=100")?;
            return Ok(true);
        } else if is(name, &["PcHeight"]) {
            self.height = parse_in("ThreeD.pcHeight", value, 5..=500, "5..=500")?;
            return Ok(true);
        } else if is(name, &["PcDepth"]) {
            self.depth = parse_in("ThreeD.pcDepth", value, 20..=2000, "20..=2000")?;
            return Ok(true);
        } else if is(name, &["PcGap"]) {
            self.gap = parse_in("ThreeD.pcGap", value, 0..=500, "0..=500")?;
            return Ok(true);
        } else if is(name, &["Perspective"]) {
            ThreeDFlags::PERSPECTIVE
        } else if is(name, &["Cluster"]) {
            ThreeDFlags::CLUSTER
        } else if is(name, &["ThreeDScaling"]) {
            ThreeDFlags::SCALING
        } else if is(name, &["TwoDWalls"]) {
            ThreeDFlags::TWO_D_WALLS
        } else {
            return Ok(false);
        };
        self.flags.set(flag, parse_bool("ThreeD.grbit", value)?);
        Ok(true)
    }
}

/// Up/down bars of a line chart group (0x103D).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dropbar {
    gap: u16,
}

impl Dropbar {
    pub fn gap(&self) -> u16 {
        self.gap
    }
}

impl ChartObject for Dropbar {
    const KIND: RecordKind = RecordKind::Dropbar;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(Dropbar {
            gap: c.u16_named("Dropbar.pcGap")?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u16(out, self.gap);
    }

    fn prototype() -> Self {
        Dropbar { gap: DEFAULT_GAP }
    }

    fn get_option(&self, name: &str) -> Option<String> {
        is(name, &["Gap"]).then(|| self.gap.to_string())
    }

    fn set_option(&mut self, name: &str, value: &str, _settings: &ChartSettings) -> Result<bool> {
        if !is(name, &["Gap"]) {
            return Ok(false);
        }
        self.gap = parse_in("Dropbar.pcGap", value, 0..=500, "0..=500")?;
        Ok(true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChartLineType {
    DropLines,
    HighLowLines,
    SeriesLines,
    LeaderLines,
}

/// Drop, high-low, series or leader lines of a chart group (0x101C).
///
/// The line styling is a bare LineFormat directly following this record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartLine {
    pub id: u16,
}

impl ChartLine {
    pub fn new(line_type: ChartLineType) -> Self {
        let id = match line_type {
            ChartLineType::DropLines => 0,
            ChartLineType::HighLowLines => 1,
            ChartLineType::SeriesLines => 2,
            ChartLineType::LeaderLines => 3,
        };
        ChartLine { id }
    }

    pub fn line_type(&self) -> Option<ChartLineType> {
        match self.id {
            0 => Some(ChartLineType::DropLines),
            1 => Some(ChartLineType::HighLowLines),
            2 => Some(ChartLineType::SeriesLines),
            3 => Some(ChartLineType::LeaderLines),
            _ => None,
        }
    }
}

impl ChartObject for ChartLine {
    const KIND: RecordKind = RecordKind::ChartLine;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(ChartLine {
            id: c.u16_named("ChartLine.id")?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u16(out, self.id);
    }

    fn prototype() -> Self {
        ChartLine::new(ChartLineType::DropLines)
    }
}

/// One-based indices of the series plotted by an overlay chart group (0x1016).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SeriesList {
    series: Vec<u16>,
}

impl SeriesList {
    pub fn series(&self) -> &[u16] {
        &self.series
    }

    pub fn set_series(&mut self, series: Vec<u16>) -> Result<()> {
        if series.len() > usize::from(u16::MAX) {
            return Err(ChartError::invalid_value(
                "SeriesList.cser",
                series.len(),
                "at most 65535 entries",
            ));
        }
        self.series = series;
        Ok(())
    }
}

impl ChartObject for SeriesList {
    const KIND: RecordKind = RecordKind::SeriesList;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        let count = c.u16_named("SeriesList.cser")?;
        Ok(SeriesList {
            series: c.u16_vec_named(usize::from(count), "SeriesList.rgiser")?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        // set_series bounds the length
        put_u16(out, self.series.len() as u16);
        for s in &self.series {
            put_u16(out, *s);
        }
    }

    fn prototype() -> Self {
        SeriesList::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ChartSettings {
        ChartSettings::default()
    }

    #[test]
    fn test_bar_stacking_resets_overlap_and_gap() {
        let mut bar = Bar::decode(&[0x19, 0x00, 0x2C, 0x01, 0x00, 0x00]).unwrap();
        assert_eq!((bar.overlap(), bar.gap()), (25, 300));
        bar.set_stacked(true);
        assert_eq!((bar.overlap(), bar.gap()), (-100, 150));
        assert_eq!(bar.to_bytes(), vec![0x9C, 0xFF, 0x96, 0x00, 0x02, 0x00]);
    }

    #[test]
    fn test_bar_percent_option_resets_overlap_without_stacking() {
        let mut bar = Bar::prototype();
        bar.set_overlap(40).unwrap();
        assert!(bar.set_option("percentagedisplay", "true", &settings()).unwrap());
        assert!(!bar.is_stacked());
        assert_eq!(bar.flags().bits(), 0x0004);
        assert!(bar.is_100_percent());
        assert_eq!(bar.get_option("Overlap").as_deref(), Some("-100"));
        assert_eq!(bar.get_option("Gap").as_deref(), Some("150"));
    }

    #[test]
    fn test_bar_range_validation() {
        let mut bar = Bar::prototype();
        assert!(matches!(
            bar.set_overlap(-101),
            Err(ChartError::InvalidFieldValue { .. })
        ));
        assert!(bar.set_option("Gap", "501", &settings()).is_err());
        assert_eq!(bar.gap(), 150);
        assert!(!bar.set_option("Smooth", "true", &settings()).unwrap());
    }

    #[test]
    fn test_bar_reserved_bits_survive() {
        let mut bar = Bar::decode(&[0, 0, 0x96, 0, 0x31, 0x80]).unwrap();
        bar.set_shadow(false);
        assert_eq!(bar.flags().bits(), 0x8031);
        bar.set_stacked(true);
        assert_eq!(bar.to_bytes()[4..], [0x33, 0x80]);
    }

    #[test]
    fn test_pie_kind_is_derived_from_donut() {
        let mut pie = Pie::prototype();
        assert_eq!(pie.kind(), PieKind::Pie);
        for size in 1..=100 {
            pie.set_donut_size(size).unwrap();
            assert_eq!(pie.kind(), PieKind::Doughnut);
        }
        assert!(pie.set_donut_size(101).is_err());
        pie.set_option("DonutSize", "0", &settings()).unwrap();
        assert_eq!(pie.kind(), PieKind::Pie);
    }

    #[test]
    fn test_line_and_area_options() {
        let mut line = Line::prototype();
        line.set_option("Stacked", "1", &settings()).unwrap();
        assert!(line.is_stacked());
        assert_eq!(line.to_bytes(), vec![0x01, 0x00]);

        let mut area = Area::decode(&[0x04, 0x00]).unwrap();
        assert!(area.has_shadow());
        area.set_option("PercentageDisplay", "true", &settings()).unwrap();
        assert!(!area.is_stacked());
        assert_eq!(area.to_bytes(), vec![0x06, 0x00]);
    }

    #[test]
    fn test_three_d_options_report_numeric_booleans() {
        let mut td = ThreeD::prototype();
        assert_eq!(td.get_option("Perspective").as_deref(), Some("0"));
        td.set_option("perspective", "true", &settings()).unwrap();
        assert_eq!(td.get_option("Perspective").as_deref(), Some("1"));
        td.set_option("AnRot", "20", &settings()).unwrap();
        assert_eq!(td.rotation(), 20);
        assert!(td.set_option("AnElev", "91", &settings()).is_err());
    }

    // Observed, unverified behaviour: pie mode keeps only grbit bit 3.
    #[test]
    fn test_three_d_pie_mode_unverified() {
        let mut td = ThreeD::prototype();
        td.set_pie_mode(false);
        assert_eq!(td.flags.bits(), 0x0017);
        td.set_pie_mode(true);
        assert_eq!(td.flags.bits(), 0x0000);
    }

    #[test]
    fn test_radar_optional_reserved_word() {
        let short = Radar::decode(&[0x01, 0x00]).unwrap();
        assert_eq!(short.reserved, None);
        assert_eq!(short.to_bytes(), vec![0x01, 0x00]);
        assert_eq!(Radar::prototype().to_bytes(), vec![0x01, 0x00, 0x12, 0x00]);
    }

    #[test]
    fn test_series_list_recomputes_count() {
        let mut list = SeriesList::decode(&[0x02, 0x00, 0x01, 0x00, 0x03, 0x00]).unwrap();
        assert_eq!(list.series(), &[1, 3]);
        list.set_series(vec![2]).unwrap();
        assert_eq!(list.to_bytes(), vec![0x01, 0x00, 0x02, 0x00]);
        assert!(SeriesList::decode(&[0x02, 0x00, 0x01, 0x00]).is_err());
    }

    #[test]
    fn test_chart_line_types() {
        assert_eq!(ChartLine::new(ChartLineType::SeriesLines).id, 2);
        assert_eq!(ChartLine { id: 9 }.line_type(), None);
    }
}
