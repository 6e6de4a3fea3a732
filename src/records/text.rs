//! Text records: labels, their links to chart elements, fonts and linked data sources.

use super::ChartObject;
use crate::err::{ChartError, DecodeResult, Result};
use crate::registry::RecordKind;
use crate::utils::ByteCursor;
use crate::utils::bytes::{put_i32, put_u8, put_u16};
use bitflags::bitflags;
use encoding::{DecoderTrap, EncoderTrap, EncodingRef};
use serde::ser::{Serialize, SerializeStruct, Serializer};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize)]
    #[serde(transparent)]
    pub struct TextFlags: u16 {
        const AUTO_COLOR = 0x0001;
        const SHOW_KEY = 0x0002;
        const SHOW_VALUE = 0x0004;
        const AUTO_TEXT = 0x0010;
        const GENERATED = 0x0020;
        const DELETED = 0x0040;
        const AUTO_MODE = 0x0080;
        const SHOW_LABEL_AND_PERCENT = 0x0800;
        const SHOW_PERCENT = 0x1000;
        const SHOW_BUBBLE_SIZES = 0x2000;
        const SHOW_LABEL = 0x4000;
    }
}

/// A text label of a chart element (0x1025).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TextDisp {
    pub horizontal_alignment: u8,
    pub vertical_alignment: u8,
    pub background_mode: u16,
    pub rgb: [u8; 4],
    pub x: i32,
    pub y: i32,
    pub dx: i32,
    pub dy: i32,
    pub flags: TextFlags,
    pub color_index: u16,
    pub flags2: u16,
    pub rotation: u16,
}

impl TextDisp {
    pub fn is_deleted(&self) -> bool {
        self.flags.contains(TextFlags::DELETED)
    }
}

impl ChartObject for TextDisp {
    const KIND: RecordKind = RecordKind::TextDisp;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(TextDisp {
            horizontal_alignment: c.u8_named("Text.at")?,
            vertical_alignment: c.u8_named("Text.vat")?,
            background_mode: c.u16_named("Text.wBkgMode")?,
            rgb: c.array::<4>("Text.rgbText")?,
            x: c.i32_named("Text.x")?,
            y: c.i32_named("Text.y")?,
            dx: c.i32_named("Text.dx")?,
            dy: c.i32_named("Text.dy")?,
            flags: TextFlags::from_bits_retain(c.u16_named("Text.grbit")?),
            color_index: c.u16_named("Text.icvText")?,
            flags2: c.u16_named("Text.grbit2")?,
            rotation: c.u16_named("Text.trot")?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u8(out, self.horizontal_alignment);
        put_u8(out, self.vertical_alignment);
        put_u16(out, self.background_mode);
        out.extend_from_slice(&self.rgb);
        put_i32(out, self.x);
        put_i32(out, self.y);
        put_i32(out, self.dx);
        put_i32(out, self.dy);
        put_u16(out, self.flags.bits());
        put_u16(out, self.color_index);
        put_u16(out, self.flags2);
        put_u16(out, self.rotation);
    }

    /// A centered, automatically generated label.
    fn prototype() -> Self {
        TextDisp {
            horizontal_alignment: 2,
            vertical_alignment: 2,
            background_mode: 1,
            rgb: [0; 4],
            x: 0,
            y: 0,
            dx: 0,
            dy: 0,
            flags: TextFlags::AUTO_COLOR
                | TextFlags::AUTO_TEXT
                | TextFlags::GENERATED
                | TextFlags::AUTO_MODE,
            color_index: 0x4D,
            flags2: 0,
            rotation: 0,
        }
    }
}

/// The element a [`TextDisp`] labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum ObjectLinkType {
    Title,
    ValueAxis,
    CategoryAxis,
    DataPoints,
    SeriesAxis,
    DisplayUnits,
}

impl ObjectLinkType {
    pub fn from_code(code: u16) -> Option<Self> {
        Some(match code {
            1 => ObjectLinkType::Title,
            2 => ObjectLinkType::ValueAxis,
            3 => ObjectLinkType::CategoryAxis,
            4 => ObjectLinkType::DataPoints,
            7 => ObjectLinkType::SeriesAxis,
            0x0C => ObjectLinkType::DisplayUnits,
            _ => return None,
        })
    }

    pub fn code(self) -> u16 {
        match self {
            ObjectLinkType::Title => 1,
            ObjectLinkType::ValueAxis => 2,
            ObjectLinkType::CategoryAxis => 3,
            ObjectLinkType::DataPoints => 4,
            ObjectLinkType::SeriesAxis => 7,
            ObjectLinkType::DisplayUnits => 0x0C,
        }
    }
}

/// Attaches the enclosing [`TextDisp`] to a chart element (0x1027).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ObjectLink {
    pub link_type: u16,
    /// Series index for data point labels.
    pub var1: u16,
    /// Point index for data point labels, 0xFFFF for the whole series.
    pub var2: u16,
}

impl ObjectLink {
    pub fn new(link_type: ObjectLinkType) -> Self {
        ObjectLink {
            link_type: link_type.code(),
            var1: 0,
            var2: 0,
        }
    }

    pub fn target(&self) -> Option<ObjectLinkType> {
        ObjectLinkType::from_code(self.link_type)
    }
}

impl ChartObject for ObjectLink {
    const KIND: RecordKind = RecordKind::ObjectLink;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(ObjectLink {
            link_type: c.u16_named("ObjectLink.wLinkObj")?,
            var1: c.u16_named("ObjectLink.wLinkVar1")?,
            var2: c.u16_named("ObjectLink.wLinkVar2")?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u16(out, self.link_type);
        put_u16(out, self.var1);
        put_u16(out, self.var2);
    }

    fn prototype() -> Self {
        ObjectLink::new(ObjectLinkType::Title)
    }
}

/// Raw characters of a [`SeriesText`], as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextChars {
    /// One byte per character in the workbook's ANSI codepage.
    Compressed(Vec<u8>),
    /// UTF-16 code units.
    Wide(Vec<u16>),
}

impl TextChars {
    fn len(&self) -> usize {
        match self {
            TextChars::Compressed(b) => b.len(),
            TextChars::Wide(w) => w.len(),
        }
    }
}

/// Literal text of a series name, title or label (0x100D).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesText {
    pub id: u16,
    chars: TextChars,
}

impl SeriesText {
    pub const MAX_CHARS: usize = 255;

    pub fn chars(&self) -> &TextChars {
        &self.chars
    }

    /// The text, decoding compressed characters with `codec`.
    pub fn text(&self, codec: EncodingRef) -> String {
        match &self.chars {
            TextChars::Compressed(bytes) => codec
                .decode(bytes, DecoderTrap::Replace)
                .unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned()),
            TextChars::Wide(units) => String::from_utf16_lossy(units),
        }
    }

    /// Stores `text` compressed when `codec` represents it exactly, as UTF-16 otherwise.
    pub fn set_text(&mut self, text: &str, codec: EncodingRef) -> Result<()> {
        let chars = match codec.encode(text, EncoderTrap::Strict) {
            Ok(bytes) if bytes.len() == text.chars().count() => TextChars::Compressed(bytes),
            _ => TextChars::Wide(text.encode_utf16().collect()),
        };
        if chars.len() > Self::MAX_CHARS {
            return Err(ChartError::invalid_value(
                "SeriesText.cch",
                text,
                "at most 255 characters",
            ));
        }
        self.chars = chars;
        Ok(())
    }
}

impl ChartObject for SeriesText {
    const KIND: RecordKind = RecordKind::SeriesText;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        let id = c.u16_named("SeriesText.id")?;
        let count = usize::from(c.u8_named("SeriesText.cch")?);
        let high_byte = c.u8_named("SeriesText.fHighByte")? & 0x01 != 0;
        let chars = if high_byte {
            TextChars::Wide(c.u16_vec_named(count, "SeriesText.rgch")?)
        } else {
            TextChars::Compressed(c.take_bytes(count, "SeriesText.rgch")?.to_vec())
        };
        Ok(SeriesText { id, chars })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u16(out, self.id);
        // set_text bounds the length to 255
        put_u8(out, self.chars.len() as u8);
        match &self.chars {
            TextChars::Compressed(bytes) => {
                put_u8(out, 0);
                out.extend_from_slice(bytes);
            }
            TextChars::Wide(units) => {
                put_u8(out, 1);
                for u in units {
                    put_u16(out, *u);
                }
            }
        }
    }

    fn prototype() -> Self {
        SeriesText {
            id: 0,
            chars: TextChars::Wide("January".encode_utf16().collect()),
        }
    }
}

impl Serialize for SeriesText {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Compressed characters are shown as Latin-1; the codepage is not known here.
        let (text, encoding) = match &self.chars {
            TextChars::Compressed(bytes) => {
                (bytes.iter().map(|b| char::from(*b)).collect::<String>(), "compressed")
            }
            TextChars::Wide(units) => (String::from_utf16_lossy(units), "wide"),
        };
        let mut s = serializer.serialize_struct("SeriesText", 3)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("text", &text)?;
        s.serialize_field("encoding", encoding)?;
        s.end()
    }
}

/// Font of the enclosing text (0x1026).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FontX {
    pub font_index: u16,
}

impl ChartObject for FontX {
    const KIND: RecordKind = RecordKind::FontX;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(FontX {
            font_index: c.u16_named("FontX.iFont")?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u16(out, self.font_index);
    }

    fn prototype() -> Self {
        FontX { font_index: 5 }
    }
}

/// Selects which default text the following TextDisp describes (0x1024).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DefaultText {
    pub id: u16,
}

impl ChartObject for DefaultText {
    const KIND: RecordKind = RecordKind::DefaultText;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        Ok(DefaultText {
            id: c.u16_named("DefaultText.id")?,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u16(out, self.id);
    }

    fn prototype() -> Self {
        DefaultText { id: 0 }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize)]
    #[serde(transparent)]
    pub struct AiFlags: u16 {
        /// `ifmt` overrides the source number format.
        const CUSTOM_FORMAT = 0x0001;
    }
}

/// Linked data source of a series or text (0x1051).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Ai {
    /// 0 title or text, 1 values, 2 categories, 3 bubble sizes.
    pub id: u8,
    /// 0 default, 1 literal text, 2 worksheet reference.
    pub reference_type: u8,
    pub flags: AiFlags,
    pub format_index: u16,
    formula: Vec<u8>,
}

impl Ai {
    pub const VALUES: u8 = 1;
    pub const CATEGORIES: u8 = 2;

    /// Parsed-expression bytes of the link formula.
    pub fn formula(&self) -> &[u8] {
        &self.formula
    }

    pub fn set_formula(&mut self, formula: Vec<u8>) -> Result<()> {
        if formula.len() > usize::from(u16::MAX) {
            return Err(ChartError::invalid_value(
                "Ai.cce",
                formula.len(),
                "at most 65535 bytes",
            ));
        }
        self.formula = formula;
        Ok(())
    }
}

impl ChartObject for Ai {
    const KIND: RecordKind = RecordKind::Ai;

    fn decode(payload: &[u8]) -> DecodeResult<Self> {
        let mut c = ByteCursor::new(payload);
        let id = c.u8_named("Ai.id")?;
        let reference_type = c.u8_named("Ai.rt")?;
        let flags = AiFlags::from_bits_retain(c.u16_named("Ai.grbit")?);
        let format_index = c.u16_named("Ai.ifmt")?;
        let cce = c.u16_named("Ai.cce")?;
        let formula = c.take_bytes(usize::from(cce), "Ai.rgce")?.to_vec();
        Ok(Ai {
            id,
            reference_type,
            flags,
            format_index,
            formula,
        })
    }

    fn encode(&self, out: &mut Vec<u8>) {
        put_u8(out, self.id);
        put_u8(out, self.reference_type);
        put_u16(out, self.flags.bits());
        put_u16(out, self.format_index);
        // set_formula bounds the length
        put_u16(out, self.formula.len() as u16);
        out.extend_from_slice(&self.formula);
    }

    fn prototype() -> Self {
        Ai {
            id: 0,
            reference_type: 1,
            flags: AiFlags::empty(),
            format_index: 0,
            formula: Vec::new(),
        }
    }
}
