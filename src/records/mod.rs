//! Typed chart records.
//!
//! Each record kind the codec interprets is a plain struct implementing [`ChartObject`]:
//! a pure decoder from a payload, a pure encoder back to bytes, a prototype constructor and
//! the named-option protocol. [`ChartRecord`] is the closed union over all of them, plus
//! [`OpaqueRecord`] (a registered kind kept as raw bytes) and [`UnknownRecord`] (an opcode the
//! registry does not know).
//!
//! Design notes:
//! - Bytes are always derived from fields at encode time; there is no cached payload that
//!   could drift from the fields.
//! - Flag words are `bitflags` types decoded with `from_bits_retain`, so reserved bits survive.
//! - Optional "if present" trailing fields are `Option<_>` and are only emitted when present;
//!   anything past the documented layout is kept by the tree node as trailing bytes.

mod axis;
mod format;
mod group;
mod layout;
mod opaque;
mod text;
pub(crate) mod value;

pub use self::axis::{
    AxcentFlags, Axcent, Axis, AxisLineFormat, AxisParent, AxisRecordType, AxesUsed,
    CatserRange, CatserRangeFlags, Tick, TickFlags, ValueRange, ValueRangeFlags,
};
pub use self::format::{
    AreaFlags, AreaFormat, AttachedLabel, Chart3DBarShape, DataFormat, DataFormatFlags, Frame,
    FrameFlags, LabelFlags, LineFlags, LineFormat, LineStyle, LongRgb, MarkerFlags, MarkerFormat,
    PieFormat, SerFmt, SerFmtFlags,
};
pub use self::group::{
    Area, Bar, BarFlags, ChartFormat, ChartFormatFlags, ChartLine, ChartLineType, Dropbar, Line,
    Pie, PieFlags, PieKind, Radar, RadarArea, RadarFlags, Scatter, ScatterFlags, SeriesList,
    StackFlags, Surface, SurfaceFlags, ThreeD, ThreeDFlags,
};
pub use self::layout::{
    Chart, Dat, DatFlags, IFmt, Legend, LegendFlags, LegendPosition, PlotArea, Pos, SerParent,
    SerToCrt, Series, ShtProps, ShtPropsFlags, SiIndex, Units,
};
pub use self::opaque::{OpaqueRecord, UnknownRecord};
pub use self::text::{
    Ai, AiFlags, DefaultText, FontX, ObjectLink, ObjectLinkType, SeriesText, TextChars, TextDisp,
    TextFlags,
};

use crate::err::{DecodeResult, Result};
use crate::registry::{self, RecordKind};
use crate::settings::ChartSettings;
use log::debug;
use serde::Serialize;

/// A typed chart record.
pub trait ChartObject: Sized {
    const KIND: RecordKind;

    /// Decodes the record from its payload (already sliced to the declared length).
    ///
    /// Missing optional trailing fields decode as `None`; a payload shorter than the required
    /// layout is a [`DecodeError::Truncated`](crate::err::DecodeError::Truncated).
    fn decode(payload: &[u8]) -> DecodeResult<Self>;

    /// Appends the payload encoding of the record to `out`.
    fn encode(&self, out: &mut Vec<u8>);

    /// A record with the field values used when a chart is built programmatically.
    fn prototype() -> Self;

    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode(&mut out);
        out
    }

    fn get_option(&self, _name: &str) -> Option<String> {
        None
    }

    /// Applies a named option. Returns `Ok(false)` if this kind does not know `name`.
    fn set_option(&mut self, _name: &str, _value: &str, _settings: &ChartSettings) -> Result<bool> {
        Ok(false)
    }
}

/// Access to the concrete record behind a [`ChartRecord`].
pub trait RecordVariant: ChartObject {
    fn from_record(record: &ChartRecord) -> Option<&Self>;
    fn from_record_mut(record: &mut ChartRecord) -> Option<&mut Self>;
}

macro_rules! chart_records {
    ($($variant:ident),* $(,)?) => {
        /// Any chart sub-stream record.
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(tag = "kind", content = "fields")]
        pub enum ChartRecord {
            $( $variant($variant), )*
            /// A registered kind whose payload is not interpreted.
            Opaque(OpaqueRecord),
            /// An opcode the registry does not know.
            Unknown(UnknownRecord),
        }

        impl ChartRecord {
            /// The registered kind, or `None` for unknown opcodes.
            pub fn kind(&self) -> Option<RecordKind> {
                match self {
                    $( ChartRecord::$variant(_) => Some(<$variant as ChartObject>::KIND), )*
                    ChartRecord::Opaque(r) => Some(r.kind),
                    ChartRecord::Unknown(_) => None,
                }
            }

            pub fn encode(&self, out: &mut Vec<u8>) {
                match self {
                    $( ChartRecord::$variant(r) => r.encode(out), )*
                    ChartRecord::Opaque(r) => out.extend_from_slice(&r.data),
                    ChartRecord::Unknown(r) => out.extend_from_slice(&r.data),
                }
            }

            pub fn get_option(&self, name: &str) -> Option<String> {
                match self {
                    $( ChartRecord::$variant(r) => r.get_option(name), )*
                    ChartRecord::Opaque(_) | ChartRecord::Unknown(_) => None,
                }
            }

            pub fn set_option(
                &mut self,
                name: &str,
                value: &str,
                settings: &ChartSettings,
            ) -> Result<bool> {
                match self {
                    $( ChartRecord::$variant(r) => r.set_option(name, value, settings), )*
                    ChartRecord::Opaque(_) | ChartRecord::Unknown(_) => Ok(false),
                }
            }

            /// The prototype record for `kind`; kinds without a typed layout get an empty payload.
            pub fn prototype(kind: RecordKind) -> ChartRecord {
                $(
                    if kind == <$variant as ChartObject>::KIND {
                        return ChartRecord::$variant(<$variant as ChartObject>::prototype());
                    }
                )*
                ChartRecord::Opaque(OpaqueRecord { kind, data: Vec::new() })
            }
        }

        $(
            impl From<$variant> for ChartRecord {
                fn from(r: $variant) -> Self {
                    ChartRecord::$variant(r)
                }
            }

            impl RecordVariant for $variant {
                fn from_record(record: &ChartRecord) -> Option<&Self> {
                    match record {
                        ChartRecord::$variant(r) => Some(r),
                        _ => None,
                    }
                }

                fn from_record_mut(record: &mut ChartRecord) -> Option<&mut Self> {
                    match record {
                        ChartRecord::$variant(r) => Some(r),
                        _ => None,
                    }
                }
            }
        )*
    };
}

chart_records! {
    Units, Chart, Series, DataFormat, LineFormat, MarkerFormat, AreaFormat, PieFormat,
    AttachedLabel, SeriesText, ChartFormat, Legend, SeriesList, Bar, Line, Pie, Area, Scatter,
    ChartLine, Axis, Tick, ValueRange, CatserRange, AxisLineFormat, DefaultText, TextDisp, FontX,
    ObjectLink, Frame, PlotArea, ThreeD, Dropbar, Radar, Surface, RadarArea, AxisParent,
    ShtProps, SerToCrt, AxesUsed, SerParent, IFmt, Pos, Ai, SerFmt, Chart3DBarShape, Axcent, Dat,
    SiIndex,
}

impl ChartRecord {
    pub fn opcode(&self) -> u16 {
        match (self, self.kind()) {
            (ChartRecord::Unknown(r), _) => r.opcode,
            (_, Some(kind)) => kind.opcode(),
            // every other variant has a kind
            (_, None) => 0,
        }
    }

    /// Diagnostic name: the registered kind name, or `Unknown` for unregistered opcodes.
    pub fn name(&self) -> &'static str {
        self.kind().map(RecordKind::name).unwrap_or("Unknown")
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode(&mut out);
        out
    }

    pub fn downcast_ref<T: RecordVariant>(&self) -> Option<&T> {
        T::from_record(self)
    }

    pub fn downcast_mut<T: RecordVariant>(&mut self) -> Option<&mut T> {
        T::from_record_mut(self)
    }

    pub fn is_kind(&self, kind: RecordKind) -> bool {
        self.kind() == Some(kind)
    }
}

/// A decoded payload: the record, plus any bytes past its documented layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub record: ChartRecord,
    pub trailing: Vec<u8>,
}

/// Decodes one payload by opcode.
///
/// Unregistered opcodes become [`UnknownRecord`]. A registered kind whose typed encoding does
/// not reproduce the start of its payload is kept as an [`OpaqueRecord`], so re-encoding is
/// always byte-identical.
pub fn decode_record(opcode: u16, payload: &[u8]) -> DecodeResult<Decoded> {
    let Some(descriptor) = registry::lookup(opcode) else {
        return Ok(Decoded {
            record: ChartRecord::Unknown(UnknownRecord {
                opcode,
                data: payload.to_vec(),
            }),
            trailing: Vec::new(),
        });
    };

    let record = (descriptor.decode)(descriptor.kind, payload)?;
    let encoded = record.to_bytes();

    if !payload.starts_with(&encoded) {
        debug!(
            "{} (0x{:04X}) does not re-encode to its payload, keeping it opaque",
            descriptor.name, opcode
        );
        return Ok(Decoded {
            record: ChartRecord::Opaque(OpaqueRecord {
                kind: descriptor.kind,
                data: payload.to_vec(),
            }),
            trailing: Vec::new(),
        });
    }

    let trailing = payload[encoded.len()..].to_vec();
    if !trailing.is_empty() {
        debug!(
            "{} (0x{:04X}) carries {} bytes past its layout",
            descriptor.name,
            opcode,
            trailing.len()
        );
    }
    Ok(Decoded { record, trailing })
}

pub(crate) fn decode_typed<T>(_kind: RecordKind, payload: &[u8]) -> DecodeResult<ChartRecord>
where
    T: ChartObject + Into<ChartRecord>,
{
    T::decode(payload).map(Into::into)
}

pub(crate) fn decode_opaque(kind: RecordKind, payload: &[u8]) -> DecodeResult<ChartRecord> {
    Ok(ChartRecord::Opaque(OpaqueRecord {
        kind,
        data: payload.to_vec(),
    }))
}
