//! Axis lookup and synthesis inside an axis group.
//!
//! An `AxisParent` holds its axes and the text records labelling them as siblings. An axis
//! is paired with its label through the label's `ObjectLink` target, not through position.

use crate::err::{ChartError, Result};
use crate::records::{
    Axcent, AxisLineFormat, Axis, AxisParent, AxisRecordType, CatserRange, ChartObject,
    LineFormat, ObjectLink, ObjectLinkType, TextDisp, Tick, ValueRange,
};
use crate::registry::RecordKind;
use crate::tree::{ChartNode, ChartTree};

use indextree::NodeId;
use log::debug;
use serde::Serialize;

/// Which axis of an axis group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AxisType {
    /// Category axis.
    X,
    /// Value axis.
    Y,
    /// Series (depth) axis of 3-D charts.
    Z,
    /// An X axis scaled by values instead of categories (scatter and bubble charts).
    XVal,
}

impl AxisType {
    /// The `wType` this axis is stored with.
    pub fn record_type(self) -> AxisRecordType {
        match self {
            AxisType::X | AxisType::XVal => AxisRecordType::Category,
            AxisType::Y => AxisRecordType::Value,
            AxisType::Z => AxisRecordType::Series,
        }
    }

    /// The `ObjectLink` target of the axis title.
    pub fn label_link(self) -> ObjectLinkType {
        match self {
            AxisType::X | AxisType::XVal => ObjectLinkType::CategoryAxis,
            AxisType::Y => ObjectLinkType::ValueAxis,
            AxisType::Z => ObjectLinkType::SeriesAxis,
        }
    }

    /// OOXML element name of the axis.
    pub fn ooxml_element(self) -> &'static str {
        match self {
            AxisType::X => "c:catAx",
            AxisType::Y | AxisType::XVal => "c:valAx",
            AxisType::Z => "c:serAx",
        }
    }

    /// Children of a newly synthesized axis.
    fn prototype_children(self) -> Vec<ChartNode> {
        match self {
            AxisType::X => vec![
                ChartNode::new(CatserRange::prototype()),
                ChartNode::new(Axcent::prototype()),
                ChartNode::new(Tick::prototype()),
            ],
            AxisType::Y | AxisType::XVal => vec![
                ChartNode::new(ValueRange::prototype()),
                ChartNode::new(Tick::prototype()),
                ChartNode::new(AxisLineFormat {
                    id: AxisLineFormat::MAJOR_GRIDLINES,
                }),
                ChartNode::new(LineFormat::prototype()),
            ],
            AxisType::Z => vec![
                ChartNode::new(CatserRange::prototype()),
                ChartNode::new(Tick::prototype()),
            ],
        }
    }
}

/// An axis and the text record labelling it, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisPair {
    pub axis: NodeId,
    pub label: Option<NodeId>,
}

/// Numeric identifier of an axis, as used by `c:axId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisId {
    pub axis: NodeId,
    pub axis_type: AxisType,
    pub id: u32,
}

const AXIS_ID_BASE: u32 = 50_000_000;

/// The `c:axId` value for an axis of the given axis group.
pub fn axis_id(axis_group_index: u16, axis_type: AxisType) -> u32 {
    let slot = match axis_type {
        AxisType::X | AxisType::XVal => 1,
        AxisType::Y => 2,
        AxisType::Z => 3,
    };
    AXIS_ID_BASE + u32::from(axis_group_index) * 10 + slot
}

/// The axis type of an existing `Axis` node.
///
/// A category-typed axis holding a `ValueRange` is a value-scaled X axis.
pub fn axis_type_of(tree: &ChartTree, axis: NodeId) -> Option<AxisType> {
    let record = tree.downcast::<Axis>(axis)?;
    Some(match record.record_type()? {
        AxisRecordType::Category => {
            if tree.find_child(axis, RecordKind::ValueRange).is_some() {
                AxisType::XVal
            } else {
                AxisType::X
            }
        }
        AxisRecordType::Value => AxisType::Y,
        AxisRecordType::Series => AxisType::Z,
    })
}

/// The text record of `axis_parent` whose `ObjectLink` targets `link`.
pub fn find_label(tree: &ChartTree, axis_parent: NodeId, link: ObjectLinkType) -> Option<NodeId> {
    tree.children_of_kind(axis_parent, RecordKind::TextDisp)
        .into_iter()
        .find(|td| {
            tree.find_child(*td, RecordKind::ObjectLink)
                .and_then(|ol| tree.downcast::<ObjectLink>(ol))
                .is_some_and(|ol| ol.link_type == link.code())
        })
}

/// Finds the axis of `axis_type` in `axis_parent`, creating it if `create` is set.
///
/// X and XVal share the category `wType`, so either request finds an existing X axis.
/// A synthesized axis goes right after the last existing axis (or after the `Pos` record, or
/// first); a synthesized label goes right after the last existing text record (or right after
/// the new axis). A label already targeting this axis is reused.
pub fn get_axis(
    tree: &mut ChartTree,
    axis_parent: NodeId,
    axis_type: AxisType,
    create: bool,
) -> Result<Option<AxisPair>> {
    if !tree.node(axis_parent)?.is_kind(RecordKind::AxisParent) {
        return Err(ChartError::UnexpectedKind {
            expected: "AxisParent",
        });
    }

    let wanted = axis_type.record_type().code();
    let axes = tree.children_of_kind(axis_parent, RecordKind::Axis);
    let existing = axes.iter().copied().find(|a| {
        tree.downcast::<Axis>(*a)
            .is_some_and(|axis| axis.axis_type == wanted)
    });
    let label = find_label(tree, axis_parent, axis_type.label_link());

    if let Some(axis) = existing {
        return Ok(Some(AxisPair { axis, label }));
    }
    if !create {
        return Ok(None);
    }

    let last_text = tree
        .children_of_kind(axis_parent, RecordKind::TextDisp)
        .last()
        .copied();

    let node = ChartNode::bracketed(Axis::new(axis_type.record_type()));
    let axis = match (axes.last(), tree.find_child(axis_parent, RecordKind::Pos)) {
        (Some(last_axis), _) => tree.insert_after(*last_axis, node)?,
        (None, Some(pos)) => tree.insert_after(pos, node)?,
        (None, None) => tree.prepend_child(axis_parent, node)?,
    };
    for child in axis_type.prototype_children() {
        tree.append_child(axis, child)?;
    }

    let label = match label {
        Some(label) => label,
        None => {
            let text = ChartNode::bracketed(TextDisp::prototype());
            let label = match last_text {
                Some(last_text) => tree.insert_after(last_text, text)?,
                None => tree.insert_after(axis, text)?,
            };
            tree.append_child(label, ChartNode::new(ObjectLink::new(axis_type.label_link())))?;
            label
        }
    };

    debug!("synthesized {:?} axis", axis_type);
    Ok(Some(AxisPair {
        axis,
        label: Some(label),
    }))
}

impl ChartTree {
    /// Every axis of every axis group with its `c:axId`, in stream order.
    pub fn axis_ids(&self) -> Vec<AxisId> {
        let mut ids = Vec::new();
        for axis_parent in self.find_all(RecordKind::AxisParent) {
            let index = self
                .downcast::<AxisParent>(axis_parent)
                .map_or(0, |ap| ap.index);
            for axis in self.children_of_kind(axis_parent, RecordKind::Axis) {
                if let Some(axis_type) = axis_type_of(self, axis) {
                    ids.push(AxisId {
                        axis,
                        axis_type,
                        id: axis_id(index, axis_type),
                    });
                }
            }
        }
        ids
    }
}
