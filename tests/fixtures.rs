#![allow(dead_code)]
use biffchart::records::{
    AreaFormat, Axcent, Axis, AxisLineFormat, AxisParent, AxisRecordType, Bar, CatserRange,
    Chart, ChartFormat, ChartLine, ChartLineType, DataFormat, LineFormat, Pie, Pos, SerToCrt,
    Series, Tick, Units, ValueRange,
};
use biffchart::{ChartObject, ColorTable};

use std::sync::Once;

static LOGGER_INIT: Once = Once::new();

pub const BEGIN: u16 = 0x1033;
pub const END: u16 = 0x1034;

/// An opcode no chart record uses.
pub const UNKNOWN_OPCODE: u16 = 0x7777;

// Rust runs the tests concurrently, so unless we synchronize logging access
// it will crash when attempting to run `cargo test` with some logging facilities.
pub fn ensure_env_logger_initialized() {
    use std::io::Write;

    LOGGER_INIT.call_once(|| {
        let mut builder = env_logger::Builder::from_default_env();
        builder
            .format(|buf, record| writeln!(buf, "[{}] - {}", record.level(), record.args()))
            .is_test(true)
            .init();
    });
}

/// Builds a raw chart sub-stream record by record.
#[derive(Debug, Default, Clone)]
pub struct StreamBuilder {
    data: Vec<u8>,
}

impl StreamBuilder {
    pub fn new() -> Self {
        StreamBuilder::default()
    }

    pub fn raw(mut self, opcode: u16, payload: &[u8]) -> Self {
        self.data.extend_from_slice(&opcode.to_le_bytes());
        self.data
            .extend_from_slice(&(payload.len() as u16).to_le_bytes());
        self.data.extend_from_slice(payload);
        self
    }

    pub fn typed<T: ChartObject>(self, record: &T) -> Self {
        let mut payload = Vec::new();
        record.encode(&mut payload);
        self.raw(T::KIND.opcode(), &payload)
    }

    pub fn proto<T: ChartObject>(self) -> Self {
        self.typed(&T::prototype())
    }

    pub fn begin(self) -> Self {
        self.raw(BEGIN, &[])
    }

    pub fn end(self) -> Self {
        self.raw(END, &[])
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }
}

pub fn stacked_bar() -> Bar {
    let mut bar = Bar::prototype();
    bar.set_stacked(true);
    bar
}

pub fn red_line() -> LineFormat {
    let mut line = LineFormat::prototype();
    line.set_color_index(10, &ColorTable::default());
    line
}

/// A category axis with its scaling and tick records.
pub fn category_axis(b: StreamBuilder) -> StreamBuilder {
    b.typed(&Axis::new(AxisRecordType::Category))
        .begin()
        .proto::<CatserRange>()
        .proto::<Axcent>()
        .proto::<Tick>()
        .end()
}

/// A value axis with major gridlines.
pub fn value_axis(b: StreamBuilder) -> StreamBuilder {
    b.typed(&Axis::new(AxisRecordType::Value))
        .begin()
        .proto::<ValueRange>()
        .proto::<Tick>()
        .typed(&AxisLineFormat {
            id: AxisLineFormat::MAJOR_GRIDLINES,
        })
        .proto::<LineFormat>()
        .end()
}

/// A single-series stacked column chart with red series lines.
///
/// The series carries a bare DataFormat decorated by a LineFormat and an AreaFormat.
pub fn stacked_column_stream() -> Vec<u8> {
    let b = StreamBuilder::new()
        .proto::<Units>()
        .proto::<Chart>()
        .begin()
        .proto::<Series>()
        .begin()
        .proto::<DataFormat>()
        .proto::<LineFormat>()
        .proto::<AreaFormat>()
        .proto::<SerToCrt>()
        .end()
        .proto::<AxisParent>()
        .begin()
        .proto::<Pos>();
    let b = category_axis(b);
    let b = value_axis(b);
    b.proto::<ChartFormat>()
        .begin()
        .typed(&stacked_bar())
        .typed(&ChartLine::new(ChartLineType::SeriesLines))
        .typed(&red_line())
        .end()
        .end()
        .end()
        .build()
}

/// A doughnut chart without axes.
pub fn doughnut_stream() -> Vec<u8> {
    let mut pie = Pie::prototype();
    pie.set_as_doughnut();
    StreamBuilder::new()
        .proto::<Chart>()
        .begin()
        .proto::<AxisParent>()
        .begin()
        .proto::<Pos>()
        .proto::<ChartFormat>()
        .begin()
        .typed(&pie)
        .end()
        .end()
        .end()
        .build()
}

/// A stream mixing an unregistered opcode, a record with bytes past its layout and an
/// empty BEGIN/END pair.
pub fn irregular_stream() -> Vec<u8> {
    StreamBuilder::new()
        .raw(Units::KIND.opcode(), &[0x00, 0x00, 0xEE, 0xFF])
        .proto::<Chart>()
        .begin()
        .raw(UNKNOWN_OPCODE, &[1, 2, 3])
        .proto::<Series>()
        .begin()
        .end()
        .end()
        .build()
}

/// Opcodes of every physical record of `data`, in order.
pub fn opcodes(data: &[u8]) -> Vec<u16> {
    biffchart::RecordIter::new(data)
        .map(|r| r.expect("well framed").opcode)
        .collect()
}
