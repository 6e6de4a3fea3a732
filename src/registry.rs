//! Opcode to record-kind registry.
//!
//! Every chart sub-stream opcode this crate knows about has exactly one [`RecordDescriptor`]:
//! its kind, a human readable name for diagnostics, whether it normally owns a BEGIN/END
//! bracketed child range, and the function that decodes its payload.
//!
//! Opcodes missing from the registry are not errors. The assembler keeps them as
//! [`UnknownRecord`](crate::records::UnknownRecord) nodes with their raw bytes, so that
//! re-encoding never loses data.

use crate::err::DecodeResult;
use crate::records::{self, ChartRecord};
use serde::Serialize;

pub const BEGIN: u16 = 0x1033;
pub const END: u16 = 0x1034;

/// Decodes a payload of the given kind into a record.
pub type DecodeFn = fn(RecordKind, &[u8]) -> DecodeResult<ChartRecord>;

/// Registry entry for one opcode.
#[derive(Clone, Copy)]
pub struct RecordDescriptor {
    pub kind: RecordKind,
    pub opcode: u16,
    pub name: &'static str,
    /// The kind normally owns children bracketed by BEGIN/END.
    pub container: bool,
    pub decode: DecodeFn,
}

impl std::fmt::Debug for RecordDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordDescriptor")
            .field("kind", &self.kind)
            .field("opcode", &format_args!("0x{:04X}", self.opcode))
            .field("name", &self.name)
            .field("container", &self.container)
            .finish()
    }
}

macro_rules! record_registry {
    ($( $(#[$doc:meta])* $variant:ident = $opcode:literal, $container:literal, $decode:expr; )*) => {
        /// Every record kind known to the chart codec.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        pub enum RecordKind {
            $( $(#[$doc])* $variant, )*
        }

        static DESCRIPTORS: &[RecordDescriptor] = &[
            $(
                RecordDescriptor {
                    kind: RecordKind::$variant,
                    opcode: $opcode,
                    name: stringify!($variant),
                    container: $container,
                    decode: $decode,
                },
            )*
        ];

        impl RecordKind {
            pub fn from_opcode(opcode: u16) -> Option<RecordKind> {
                match opcode {
                    $( $opcode => Some(RecordKind::$variant), )*
                    _ => None,
                }
            }

            pub fn opcode(self) -> u16 {
                match self {
                    $( RecordKind::$variant => $opcode, )*
                }
            }
        }
    };
}

record_registry! {
    /// Chart units; a reserved zero word.
    Units = 0x1001, false, records::decode_typed::<records::Units>;
    /// Chart bounding rectangle; begins the chart sub-stream body.
    Chart = 0x1002, true, records::decode_typed::<records::Chart>;
    /// Series data source description.
    Series = 0x1003, true, records::decode_typed::<records::Series>;
    /// Per-series or per-point formatting owner.
    DataFormat = 0x1006, true, records::decode_typed::<records::DataFormat>;
    LineFormat = 0x1007, false, records::decode_typed::<records::LineFormat>;
    MarkerFormat = 0x1009, false, records::decode_typed::<records::MarkerFormat>;
    AreaFormat = 0x100A, false, records::decode_typed::<records::AreaFormat>;
    PieFormat = 0x100B, false, records::decode_typed::<records::PieFormat>;
    AttachedLabel = 0x100C, false, records::decode_typed::<records::AttachedLabel>;
    SeriesText = 0x100D, false, records::decode_typed::<records::SeriesText>;
    /// Chart group: owns one chart-kind record and its formatting.
    ChartFormat = 0x1014, true, records::decode_typed::<records::ChartFormat>;
    Legend = 0x1015, true, records::decode_typed::<records::Legend>;
    SeriesList = 0x1016, false, records::decode_typed::<records::SeriesList>;
    Bar = 0x1017, false, records::decode_typed::<records::Bar>;
    Line = 0x1018, false, records::decode_typed::<records::Line>;
    Pie = 0x1019, false, records::decode_typed::<records::Pie>;
    Area = 0x101A, false, records::decode_typed::<records::Area>;
    Scatter = 0x101B, false, records::decode_typed::<records::Scatter>;
    /// Drop, high-low, series or leader lines; followed by a bare LineFormat.
    ChartLine = 0x101C, false, records::decode_typed::<records::ChartLine>;
    Axis = 0x101D, true, records::decode_typed::<records::Axis>;
    Tick = 0x101E, false, records::decode_typed::<records::Tick>;
    ValueRange = 0x101F, false, records::decode_typed::<records::ValueRange>;
    CatserRange = 0x1020, false, records::decode_typed::<records::CatserRange>;
    AxisLineFormat = 0x1021, false, records::decode_typed::<records::AxisLineFormat>;
    ChartFormatLink = 0x1022, false, records::decode_opaque;
    DefaultText = 0x1024, false, records::decode_typed::<records::DefaultText>;
    /// A text label (title, axis title, data label).
    TextDisp = 0x1025, true, records::decode_typed::<records::TextDisp>;
    FontX = 0x1026, false, records::decode_typed::<records::FontX>;
    ObjectLink = 0x1027, false, records::decode_typed::<records::ObjectLink>;
    Frame = 0x1032, true, records::decode_typed::<records::Frame>;
    Begin = 0x1033, false, records::decode_opaque;
    End = 0x1034, false, records::decode_opaque;
    PlotArea = 0x1035, false, records::decode_typed::<records::PlotArea>;
    ThreeD = 0x103A, false, records::decode_typed::<records::ThreeD>;
    Picf = 0x103C, false, records::decode_opaque;
    Dropbar = 0x103D, true, records::decode_typed::<records::Dropbar>;
    Radar = 0x103E, false, records::decode_typed::<records::Radar>;
    Surface = 0x103F, false, records::decode_typed::<records::Surface>;
    RadarArea = 0x1040, false, records::decode_typed::<records::RadarArea>;
    /// Axis group: owns axes, their labels and the chart groups plotted on them.
    AxisParent = 0x1041, true, records::decode_typed::<records::AxisParent>;
    LegendXn = 0x1043, false, records::decode_opaque;
    ShtProps = 0x1044, false, records::decode_typed::<records::ShtProps>;
    SerToCrt = 0x1045, false, records::decode_typed::<records::SerToCrt>;
    AxesUsed = 0x1046, false, records::decode_typed::<records::AxesUsed>;
    SBaseRef = 0x1048, false, records::decode_opaque;
    SerParent = 0x104A, false, records::decode_typed::<records::SerParent>;
    SerAuxTrend = 0x104B, false, records::decode_opaque;
    IFmt = 0x104E, false, records::decode_typed::<records::IFmt>;
    Pos = 0x104F, false, records::decode_typed::<records::Pos>;
    /// Linked data source (series values, categories, bubble sizes, title).
    Ai = 0x1051, false, records::decode_typed::<records::Ai>;
    SerAuxErrBar = 0x105B, false, records::decode_opaque;
    SerFmt = 0x105D, false, records::decode_typed::<records::SerFmt>;
    Chart3DBarShape = 0x105F, false, records::decode_typed::<records::Chart3DBarShape>;
    FontBasis = 0x1060, false, records::decode_opaque;
    Boppop = 0x1061, false, records::decode_opaque;
    Axcent = 0x1062, false, records::decode_typed::<records::Axcent>;
    /// Data table options.
    Dat = 0x1063, true, records::decode_typed::<records::Dat>;
    PlotGrowth = 0x1064, false, records::decode_opaque;
    SiIndex = 0x1065, false, records::decode_typed::<records::SiIndex>;
    GelFrame = 0x1066, false, records::decode_opaque;
    BopPopCustom = 0x1067, false, records::decode_opaque;
    ChartFrtInfo = 0x0850, false, records::decode_opaque;
    FrtWrapper = 0x0851, false, records::decode_opaque;
    StartBlock = 0x0852, false, records::decode_opaque;
    EndBlock = 0x0853, false, records::decode_opaque;
    StartObject = 0x0854, false, records::decode_opaque;
    EndObject = 0x0855, false, records::decode_opaque;
    CatLab = 0x0856, false, records::decode_opaque;
    YMult = 0x0857, false, records::decode_opaque;
    SxViewLink = 0x0858, false, records::decode_opaque;
    PivotChartBits = 0x0859, false, records::decode_opaque;
    FrtFontList = 0x085A, false, records::decode_opaque;
    PivotChartLink = 0x0861, false, records::decode_opaque;
    DataLabExt = 0x086A, false, records::decode_opaque;
    DataLabExtContents = 0x086B, false, records::decode_opaque;
    CrtLayout12 = 0x089D, false, records::decode_opaque;
    CrtLayout12A = 0x08A7, false, records::decode_opaque;
}

/// Looks up the descriptor for `opcode`, or `None` for opcodes the codec does not know.
pub fn lookup(opcode: u16) -> Option<&'static RecordDescriptor> {
    RecordKind::from_opcode(opcode).map(RecordKind::descriptor)
}

/// All registered descriptors, in opcode-table order.
pub fn descriptors() -> &'static [RecordDescriptor] {
    DESCRIPTORS
}

impl RecordKind {
    pub fn descriptor(self) -> &'static RecordDescriptor {
        // Descriptors are generated in declaration order, so the discriminant is the index.
        &DESCRIPTORS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn is_container(self) -> bool {
        self.descriptor().container
    }

    /// Chart-kind records: the one record in a chart group that selects how series are drawn.
    pub fn is_chart_kind(self) -> bool {
        matches!(
            self,
            RecordKind::Bar
                | RecordKind::Line
                | RecordKind::Pie
                | RecordKind::Area
                | RecordKind::Scatter
                | RecordKind::Radar
                | RecordKind::RadarArea
                | RecordKind::Surface
                | RecordKind::Boppop
        )
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_index_matches_kind() {
        for (i, d) in descriptors().iter().enumerate() {
            assert_eq!(d.kind as usize, i, "{}", d.name);
            assert_eq!(lookup(d.opcode).map(|x| x.kind), Some(d.kind));
            assert_eq!(d.kind.opcode(), d.opcode);
        }
    }

    #[test]
    fn test_opcodes_are_unique() {
        let mut seen = hashbrown::HashSet::new();
        for d in descriptors() {
            assert!(seen.insert(d.opcode), "duplicate opcode 0x{:04X}", d.opcode);
        }
    }

    #[test]
    fn test_lookup() {
        let bar = lookup(0x1017).unwrap();
        assert_eq!(bar.name, "Bar");
        assert!(!bar.container);
        assert!(lookup(0x1002).unwrap().container);
        assert!(lookup(0xFFFF).is_none());
    }
}
