use crate::err::{ChartError, Result};
use crate::records::{ChartRecord, RecordVariant};
use crate::registry::RecordKind;
use crate::settings::ChartSettings;

use indextree::{Arena, NodeId};
use serde_json::{Map, Value, json};

/// How a node's children are delimited in the record stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum ChildLayout {
    /// No children.
    Leaf,
    /// Children follow between a BEGIN and an END marker (possibly none).
    Bracketed,
    /// Children are decorators that directly follow the owner, with no markers.
    Bare,
}

/// One record in a chart tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartNode {
    pub record: ChartRecord,
    pub layout: ChildLayout,
    /// Payload bytes past the documented layout of `record`, re-emitted after it.
    pub trailing: Vec<u8>,
    /// Payloads of the BEGIN/END markers around the children; empty in well-formed files.
    pub begin_data: Vec<u8>,
    pub end_data: Vec<u8>,
    /// Offset of the record header in the stream this node was read from.
    pub offset: Option<u64>,
}

impl ChartNode {
    pub fn new(record: impl Into<ChartRecord>) -> Self {
        ChartNode {
            record: record.into(),
            layout: ChildLayout::Leaf,
            trailing: Vec::new(),
            begin_data: Vec::new(),
            end_data: Vec::new(),
            offset: None,
        }
    }

    /// A prototype node that owns a (still empty) BEGIN/END bracket.
    pub fn bracketed(record: impl Into<ChartRecord>) -> Self {
        ChartNode {
            layout: ChildLayout::Bracketed,
            ..ChartNode::new(record)
        }
    }

    pub fn prototype(kind: RecordKind) -> Self {
        ChartNode::new(ChartRecord::prototype(kind))
    }

    pub fn kind(&self) -> Option<RecordKind> {
        self.record.kind()
    }

    pub fn is_kind(&self, kind: RecordKind) -> bool {
        self.record.is_kind(kind)
    }

    /// `Name (0xOPCODE)`, plus the stream offset when known.
    pub fn summary(&self) -> String {
        match self.offset {
            Some(offset) => format!(
                "{} (0x{:04X}) at offset {}",
                self.record.name(),
                self.record.opcode(),
                offset
            ),
            None => format!("{} (0x{:04X})", self.record.name(), self.record.opcode()),
        }
    }
}

/// An arena-backed chart record tree.
///
/// Top-level records (normally a single `Chart` preceded by a few header records) are kept in
/// stream order in `roots`; they have no arena parent. Every other node hangs under exactly one
/// parent. Handles are plain [`NodeId`]s; parent and owning-chart lookups always go through the
/// arena, so they stay correct across insertions and removals.
#[derive(Debug, Clone)]
pub struct ChartTree {
    arena: Arena<ChartNode>,
    roots: Vec<NodeId>,
    settings: ChartSettings,
}

impl Default for ChartTree {
    fn default() -> Self {
        ChartTree::new(ChartSettings::default())
    }
}

impl ChartTree {
    pub fn new(settings: ChartSettings) -> Self {
        ChartTree {
            arena: Arena::new(),
            roots: Vec::new(),
            settings,
        }
    }

    /// Assembles a tree from a raw record stream.
    pub fn from_bytes(data: &[u8], settings: ChartSettings) -> Result<Self> {
        crate::assemble::assemble(data, settings)
    }

    /// Serializes the tree back into a record stream.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        crate::serialize::serialize(self)
    }

    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn arena(&self) -> &Arena<ChartNode> {
        &self.arena
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.arena.iter().filter(|n| !n.is_removed()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// The node behind `id`, or `None` if it was removed.
    pub fn get(&self, id: NodeId) -> Option<&ChartNode> {
        self.arena
            .get(id)
            .filter(|n| !n.is_removed())
            .map(|n| n.get())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut ChartNode> {
        self.arena
            .get_mut(id)
            .filter(|n| !n.is_removed())
            .map(|n| n.get_mut())
    }

    pub fn node(&self, id: NodeId) -> Result<&ChartNode> {
        self.get(id).ok_or(ChartError::StaleHandle)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut ChartNode> {
        self.get_mut(id).ok_or(ChartError::StaleHandle)
    }

    pub fn record(&self, id: NodeId) -> Option<&ChartRecord> {
        self.get(id).map(|n| &n.record)
    }

    /// The typed record behind `id`, if it is a `T`.
    pub fn downcast<T: RecordVariant>(&self, id: NodeId) -> Option<&T> {
        self.record(id).and_then(|r| r.downcast_ref::<T>())
    }

    pub fn downcast_mut<T: RecordVariant>(&mut self, id: NodeId) -> Option<&mut T> {
        self.get_mut(id).and_then(|n| n.record.downcast_mut::<T>())
    }

    pub fn kind(&self, id: NodeId) -> Option<RecordKind> {
        self.get(id).and_then(ChartNode::kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena
            .get(id)
            .filter(|n| !n.is_removed())
            .and_then(|n| n.parent())
    }

    /// Children of `id`, in stream order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        if self.get(id).is_none() {
            return Vec::new();
        }
        id.children(&self.arena).collect()
    }

    pub fn children_of_kind(&self, id: NodeId, kind: RecordKind) -> Vec<NodeId> {
        self.children(id)
            .into_iter()
            .filter(|c| self.kind(*c) == Some(kind))
            .collect()
    }

    pub fn find_child(&self, id: NodeId, kind: RecordKind) -> Option<NodeId> {
        self.children(id)
            .into_iter()
            .find(|c| self.kind(*c) == Some(kind))
    }

    /// `id` and everything below it, in stream order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        if self.get(id).is_none() {
            return Vec::new();
        }
        id.descendants(&self.arena).collect()
    }

    /// Every live node, in stream order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.roots
            .iter()
            .flat_map(move |root| root.descendants(&self.arena))
    }

    /// Every node of `kind`, in stream order.
    pub fn find_all(&self, kind: RecordKind) -> Vec<NodeId> {
        self.iter().filter(|id| self.kind(*id) == Some(kind)).collect()
    }

    /// Nesting depth of `id`; top-level nodes are at depth 0.
    pub fn depth(&self, id: NodeId) -> usize {
        id.ancestors(&self.arena).count().saturating_sub(1)
    }

    /// The `Chart` record that (transitively) owns `id`.
    pub fn owning_chart(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?;
        id.ancestors(&self.arena)
            .find(|a| self.kind(*a) == Some(RecordKind::Chart))
    }

    /// Every ChartFormat (chart group) node, in stream order.
    pub fn chart_groups(&self) -> Vec<NodeId> {
        self.find_all(RecordKind::ChartFormat)
    }

    /// Reads a named option of the record at `id`.
    pub fn get_option(&self, id: NodeId, name: &str) -> Option<String> {
        self.record(id)?.get_option(name)
    }

    /// Applies a named option to the record at `id`, using the tree's settings.
    pub fn set_option(&mut self, id: NodeId, name: &str, value: &str) -> Result<bool> {
        let settings = &self.settings;
        let node = self
            .arena
            .get_mut(id)
            .filter(|n| !n.is_removed())
            .ok_or(ChartError::StaleHandle)?
            .get_mut();
        node.record.set_option(name, value, settings)
    }

    /// Appends a top-level node.
    pub fn push_root(&mut self, node: ChartNode) -> NodeId {
        let id = self.arena.new_node(node);
        self.roots.push(id);
        id
    }

    /// Appends `node` as the last child of `parent`.
    ///
    /// A leaf parent becomes bracketed.
    pub fn append_child(&mut self, parent: NodeId, node: ChartNode) -> Result<NodeId> {
        self.node(parent)?;
        let id = self.arena.new_node(node);
        parent
            .checked_append(id, &mut self.arena)
            .map_err(|_| ChartError::StaleHandle)?;
        self.open_bracket(parent);
        Ok(id)
    }

    /// Inserts `node` right after `sibling`, at the same level.
    pub fn insert_after(&mut self, sibling: NodeId, node: ChartNode) -> Result<NodeId> {
        self.node(sibling)?;
        let id = self.arena.new_node(node);
        match self.parent(sibling) {
            Some(parent) => {
                sibling
                    .checked_insert_after(id, &mut self.arena)
                    .map_err(|_| ChartError::StaleHandle)?;
                self.open_bracket(parent);
            }
            None => {
                let at = self.root_position(sibling)?;
                self.roots.insert(at + 1, id);
            }
        }
        Ok(id)
    }

    /// Inserts `node` right before `sibling`, at the same level.
    pub fn insert_before(&mut self, sibling: NodeId, node: ChartNode) -> Result<NodeId> {
        self.node(sibling)?;
        let id = self.arena.new_node(node);
        match self.parent(sibling) {
            Some(parent) => {
                sibling
                    .checked_insert_before(id, &mut self.arena)
                    .map_err(|_| ChartError::StaleHandle)?;
                self.open_bracket(parent);
            }
            None => {
                let at = self.root_position(sibling)?;
                self.roots.insert(at, id);
            }
        }
        Ok(id)
    }

    /// Inserts `node` as the first child of `parent`.
    pub fn prepend_child(&mut self, parent: NodeId, node: ChartNode) -> Result<NodeId> {
        self.node(parent)?;
        let id = self.arena.new_node(node);
        parent
            .checked_prepend(id, &mut self.arena)
            .map_err(|_| ChartError::StaleHandle)?;
        self.open_bracket(parent);
        Ok(id)
    }

    /// Removes `id` and its whole subtree. The parent keeps its bracket, even if now empty.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        self.node(id)?;
        if self.parent(id).is_none() {
            let at = self.root_position(id)?;
            self.roots.remove(at);
        }
        id.remove_subtree(&mut self.arena);
        Ok(())
    }

    fn root_position(&self, id: NodeId) -> Result<usize> {
        self.roots
            .iter()
            .position(|r| *r == id)
            .ok_or(ChartError::StaleHandle)
    }

    fn open_bracket(&mut self, parent: NodeId) {
        if let Some(node) = self.get_mut(parent) {
            if node.layout == ChildLayout::Leaf {
                node.layout = ChildLayout::Bracketed;
            }
        }
    }

    /// A nested JSON rendering of the tree.
    pub fn to_json(&self) -> Result<Value> {
        let roots = self
            .roots
            .iter()
            .map(|r| self.node_json(*r))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Array(roots))
    }

    fn node_json(&self, id: NodeId) -> Result<Value> {
        let node = self.node(id)?;
        let mut obj = Map::new();
        obj.insert("opcode".to_string(), json!(format!("0x{:04X}", node.record.opcode())));
        obj.insert(
            "record".to_string(),
            serde_json::to_value(&node.record)?,
        );
        if !node.trailing.is_empty() {
            obj.insert("trailing".to_string(), json!(hex(&node.trailing)));
        }
        if node.layout != ChildLayout::Leaf {
            obj.insert("layout".to_string(), json!(format!("{:?}", node.layout)));
            let children = self
                .children(id)
                .into_iter()
                .map(|c| self.node_json(c))
                .collect::<Result<Vec<_>>>()?;
            obj.insert("children".to_string(), Value::Array(children));
        }
        Ok(Value::Object(obj))
    }
}

fn hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{b:02X}")).collect()
}
