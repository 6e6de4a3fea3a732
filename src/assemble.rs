//! Rebuilds a [`ChartTree`] from a flat record stream.
//!
//! Two grouping mechanisms exist in a chart sub-stream:
//!
//! * A record directly followed by BEGIN owns every record up to the matching END.
//! * A few decorator kinds follow their owner without any markers. A `ChartLine` owns the one
//!   `LineFormat` after it; a `DataFormat` that is not bracketed owns the run of presentation
//!   records after it (each kind at most once).
//!
//! The registry's container flag is only a hint; the bracket actually present in the stream
//! decides.

use crate::err::{ChartError, Result};
use crate::records::decode_record;
use crate::registry::{BEGIN, END, RecordKind};
use crate::settings::ChartSettings;
use crate::stream::{RawRecord, read_records};
use crate::tree::{ChartNode, ChartTree, ChildLayout};

use hashbrown::HashMap;
use indextree::NodeId;
use log::{debug, trace, warn};

/// Kinds a bare (unbracketed) `DataFormat` may own, in no particular order.
const DATA_FORMAT_DECORATORS: &[RecordKind] = &[
    RecordKind::Chart3DBarShape,
    RecordKind::LineFormat,
    RecordKind::AreaFormat,
    RecordKind::PieFormat,
    RecordKind::MarkerFormat,
];

const CHART_LINE_DECORATORS: &[RecordKind] = &[RecordKind::LineFormat];

/// An owner currently collecting bare decorators.
struct BareOwner {
    id: NodeId,
    accepts: &'static [RecordKind],
    seen: Vec<RecordKind>,
    limit: usize,
}

impl BareOwner {
    fn for_kind(id: NodeId, kind: RecordKind) -> Option<BareOwner> {
        let (accepts, limit) = match kind {
            RecordKind::ChartLine => (CHART_LINE_DECORATORS, 1),
            RecordKind::DataFormat => (DATA_FORMAT_DECORATORS, DATA_FORMAT_DECORATORS.len()),
            _ => return None,
        };
        Some(BareOwner {
            id,
            accepts,
            seen: Vec::with_capacity(limit),
            limit,
        })
    }

    fn accepts(&self, kind: RecordKind) -> bool {
        self.seen.len() < self.limit && self.accepts.contains(&kind) && !self.seen.contains(&kind)
    }
}

struct Frame {
    owner: NodeId,
    offset: u64,
}

struct Assembler {
    tree: ChartTree,
    stack: Vec<Frame>,
    /// Last node appended at the current level; the owner of a following BEGIN.
    last_sibling: Option<NodeId>,
    /// Last record assembled at any level, for diagnostics.
    last_record: Option<NodeId>,
    bare: Option<BareOwner>,
    unknown: HashMap<u16, usize>,
    max_depth: usize,
}

/// Parses `data` into a chart tree.
pub fn assemble(data: &[u8], settings: ChartSettings) -> Result<ChartTree> {
    let records = read_records(data)?;
    let mut assembler = Assembler::new(settings);

    for (i, raw) in records.iter().enumerate() {
        let next_is_begin = records.get(i + 1).is_some_and(|r| r.opcode == BEGIN);
        match raw.opcode {
            BEGIN => assembler.begin(raw)?,
            END => assembler.end(raw)?,
            _ => assembler.record(raw, next_is_begin)?,
        }
    }

    assembler.finish(data.len() as u64)
}

impl Assembler {
    fn new(settings: ChartSettings) -> Self {
        let max_depth = settings.get_max_depth();
        Assembler {
            tree: ChartTree::new(settings),
            stack: Vec::new(),
            last_sibling: None,
            last_record: None,
            bare: None,
            unknown: HashMap::new(),
            max_depth,
        }
    }

    fn last_record_summary(&self) -> Option<String> {
        self.last_record
            .and_then(|id| self.tree.get(id))
            .map(ChartNode::summary)
    }

    fn unbalanced(&self, reason: &'static str, offset: u64) -> ChartError {
        ChartError::UnbalancedBracket {
            reason,
            offset,
            last_record: self.last_record_summary(),
        }
    }

    fn record(&mut self, raw: &RawRecord<'_>, next_is_begin: bool) -> Result<()> {
        let decoded = decode_record(raw.opcode, raw.payload).map_err(|source| ChartError::Decode {
            opcode: raw.opcode,
            name: RecordKind::from_opcode(raw.opcode)
                .map(RecordKind::name)
                .unwrap_or("Unknown"),
            offset: raw.offset,
            source,
        })?;

        let kind = decoded.record.kind();
        if kind.is_none() {
            *self.unknown.entry(raw.opcode).or_insert(0) += 1;
        }

        trace!(
            "offset {}: {} (0x{:04X}), {} bytes, depth {}",
            raw.offset,
            decoded.record.name(),
            raw.opcode,
            raw.payload.len(),
            self.stack.len()
        );

        let mut node = ChartNode::new(decoded.record);
        node.trailing = decoded.trailing;
        node.offset = Some(raw.offset);

        if let Some(kind) = kind {
            if !next_is_begin && self.bare.as_ref().is_some_and(|b| b.accepts(kind)) {
                return self.absorb(kind, node);
            }
        }
        self.bare = None;

        let id = match self.stack.last() {
            Some(frame) => self.tree.append_child(frame.owner, node)?,
            None => self.tree.push_root(node),
        };
        self.last_sibling = Some(id);
        self.last_record = Some(id);

        if let Some(kind) = kind {
            if kind.is_container() && !next_is_begin {
                debug!(
                    "offset {}: {} is usually bracketed but no BEGIN follows",
                    raw.offset,
                    kind.name()
                );
            }
            if !next_is_begin {
                self.bare = BareOwner::for_kind(id, kind);
            }
        }
        Ok(())
    }

    /// Attaches `node` to the open bare owner.
    fn absorb(&mut self, kind: RecordKind, node: ChartNode) -> Result<()> {
        let Some(bare) = self.bare.as_mut() else {
            return Ok(());
        };
        bare.seen.push(kind);
        let owner = bare.id;

        self.tree.node_mut(owner)?.layout = ChildLayout::Bare;
        let id = self.tree.append_child(owner, node)?;
        debug!(
            "{} absorbed as a bare decorator of {}",
            kind.name(),
            self.tree.node(owner)?.record.name()
        );
        self.last_record = Some(id);
        Ok(())
    }

    fn begin(&mut self, raw: &RawRecord<'_>) -> Result<()> {
        self.bare = None;
        let Some(owner) = self.last_sibling.take() else {
            return Err(self.unbalanced("BEGIN without an owning record", raw.offset));
        };

        let depth = self.stack.len() + 1;
        if depth > self.max_depth {
            return Err(ChartError::NestingTooDeep {
                depth,
                offset: raw.offset,
            });
        }

        if self.tree.node(owner)?.layout != ChildLayout::Leaf {
            return Err(self.unbalanced("second BEGIN for the same record", raw.offset));
        }
        let node = self.tree.node_mut(owner)?;
        node.layout = ChildLayout::Bracketed;
        if !raw.payload.is_empty() {
            warn!(
                "offset {}: BEGIN carries {} payload bytes, keeping them",
                raw.offset,
                raw.payload.len()
            );
            node.begin_data = raw.payload.to_vec();
        }
        if let Some(kind) = node.kind() {
            if !kind.is_container() {
                debug!("offset {}: BEGIN opens children of {}", raw.offset, kind.name());
            }
        }

        trace!("offset {}: BEGIN, depth {}", raw.offset, depth);
        self.stack.push(Frame {
            owner,
            offset: raw.offset,
        });
        Ok(())
    }

    fn end(&mut self, raw: &RawRecord<'_>) -> Result<()> {
        self.bare = None;
        let Some(frame) = self.stack.pop() else {
            return Err(self.unbalanced("END without a matching BEGIN", raw.offset));
        };

        let empty = self.tree.children(frame.owner).is_empty();
        let node = self.tree.node_mut(frame.owner)?;
        if !raw.payload.is_empty() {
            warn!(
                "offset {}: END carries {} payload bytes, keeping them",
                raw.offset,
                raw.payload.len()
            );
            node.end_data = raw.payload.to_vec();
        }
        if empty {
            debug!(
                "offset {}: empty BEGIN/END pair of {} kept",
                frame.offset,
                node.record.name()
            );
        }

        trace!("offset {}: END, depth {}", raw.offset, self.stack.len());
        // the closed record is now the last sibling, though it cannot own another bracket
        self.last_sibling = Some(frame.owner);
        Ok(())
    }

    fn finish(self, end_offset: u64) -> Result<ChartTree> {
        if let Some(frame) = self.stack.last() {
            debug!("unclosed BEGIN at offset {}", frame.offset);
            return Err(self.unbalanced("input ended inside a BEGIN/END bracket", end_offset));
        }

        if !self.unknown.is_empty() {
            let mut opcodes: Vec<_> = self.unknown.iter().collect();
            opcodes.sort();
            debug!(
                "kept {} unknown opcodes verbatim: {}",
                opcodes.len(),
                opcodes
                    .iter()
                    .map(|(opcode, count)| format!("0x{opcode:04X} x{count}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        Ok(self.tree)
    }
}
