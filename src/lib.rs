#![deny(unused_must_use)]
#![forbid(unsafe_code)]
//! Decoder, tree model and encoder for BIFF8 chart record streams.
//!
//! A chart sub-stream is a flat sequence of `(opcode, length, payload)` records whose nesting
//! is expressed with BEGIN/END marker records and with a few unbracketed decorator runs.
//! [`ChartTree::from_bytes`] rebuilds the nesting into an arena-backed tree of typed records,
//! and [`ChartTree::to_bytes`] writes it back. Records the codec does not understand are kept
//! as raw bytes, so an unmodified tree always re-encodes to its input.
//!
//! ```
//! use biffchart::{ChartSettings, ChartTree, RecordKind};
//! use biffchart::records::Bar;
//!
//! // ChartFormat, BEGIN, Bar (stacked), END
//! let mut data = vec![0x14, 0x10, 0x14, 0x00];
//! data.extend_from_slice(&[0; 20]);
//! data.extend_from_slice(&[0x33, 0x10, 0x00, 0x00]);
//! data.extend_from_slice(&[0x17, 0x10, 0x06, 0x00, 0x9C, 0xFF, 0x96, 0x00, 0x02, 0x00]);
//! data.extend_from_slice(&[0x34, 0x10, 0x00, 0x00]);
//!
//! let tree = ChartTree::from_bytes(&data, ChartSettings::default()).unwrap();
//! let group = tree.chart_groups()[0];
//! let bar = tree.find_child(group, RecordKind::Bar).unwrap();
//! assert!(tree.downcast::<Bar>(bar).unwrap().is_stacked());
//! assert_eq!(tree.to_bytes().unwrap(), data);
//! ```

pub mod assemble;
pub mod axes;
pub mod chart_type;
pub mod color;
pub mod err;
pub mod ooxml;
pub mod options;
pub mod records;
pub mod registry;
pub mod serialize;
pub mod settings;
pub mod stream;
pub mod tree;
mod utils;

pub use axes::{AxisPair, AxisType, get_axis};
pub use chart_type::{ChartGroup, ChartType};
pub use color::{ColorTable, Rgb};
pub use err::{ChartError, DecodeError, Result};
pub use options::{get_chart_option, set_chart_option};
pub use records::{ChartObject, ChartRecord};
pub use registry::{RecordDescriptor, RecordKind};
pub use settings::ChartSettings;
pub use stream::{RawRecord, RecordIter};
pub use tree::{ChartNode, ChartTree, ChildLayout};
pub use utils::bytes::{normalize_color_byte, read_bit, update_bit};
pub use utils::format_hexdump;

// Re-export for the `NodeId` handles used throughout the tree API.
pub use indextree::NodeId;
