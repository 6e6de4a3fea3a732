use crate::err::{ChartError, Result};
use crate::records::{
    Area, Bar, ChartFormat, ChartFormatFlags, ChartLine, ChartLineType, Line, Pie, PieKind,
    Radar, RadarFlags, Scatter, ScatterFlags, ThreeD,
};
use crate::registry::RecordKind;
use crate::tree::ChartTree;

use indextree::NodeId;
use serde::Serialize;
use std::fmt;

/// The rendering family of a chart group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChartType {
    Column,
    Bar,
    Line,
    Pie,
    Doughnut,
    Area,
    Scatter,
    Bubble,
    Radar,
    FilledRadar,
    Surface,
}

impl ChartType {
    pub fn name(self) -> &'static str {
        match self {
            ChartType::Column => "column",
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Pie => "pie",
            ChartType::Doughnut => "doughnut",
            ChartType::Area => "area",
            ChartType::Scatter => "scatter",
            ChartType::Bubble => "bubble",
            ChartType::Radar => "radar",
            ChartType::FilledRadar => "filledRadar",
            ChartType::Surface => "surface",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A `ChartLine` of a group with the `LineFormat` that styles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartLineRef {
    pub node: NodeId,
    pub line_type: Option<ChartLineType>,
    pub format: Option<NodeId>,
}

/// Read-only view of a chart group (a `ChartFormat` node and its children).
#[derive(Debug, Clone, Copy)]
pub struct ChartGroup<'a> {
    tree: &'a ChartTree,
    id: NodeId,
}

impl<'a> ChartGroup<'a> {
    pub fn new(tree: &'a ChartTree, id: NodeId) -> Result<Self> {
        if tree.node(id)?.is_kind(RecordKind::ChartFormat) {
            Ok(ChartGroup { tree, id })
        } else {
            Err(ChartError::UnexpectedKind {
                expected: "ChartFormat",
            })
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'a ChartTree {
        self.tree
    }

    pub fn format(&self) -> Option<&'a ChartFormat> {
        self.tree.downcast::<ChartFormat>(self.id)
    }

    /// The chart-kind record (Bar, Line, Pie, ...) of the group.
    pub fn chart_kind_node(&self) -> Option<NodeId> {
        self.tree
            .children(self.id)
            .into_iter()
            .find(|c| self.tree.kind(*c).is_some_and(RecordKind::is_chart_kind))
    }

    fn chart_kind<T: crate::records::RecordVariant>(&self) -> Option<&'a T> {
        self.chart_kind_node().and_then(|id| self.tree.downcast::<T>(id))
    }

    pub fn chart_type(&self) -> Option<ChartType> {
        let id = self.chart_kind_node()?;
        let record = self.tree.record(id)?;
        let chart_type = match record.kind()? {
            RecordKind::Bar => {
                if record.downcast_ref::<Bar>()?.is_horizontal() {
                    ChartType::Bar
                } else {
                    ChartType::Column
                }
            }
            RecordKind::Line => ChartType::Line,
            RecordKind::Pie => match record.downcast_ref::<Pie>()?.kind() {
                PieKind::Pie => ChartType::Pie,
                PieKind::Doughnut => ChartType::Doughnut,
            },
            RecordKind::Area => ChartType::Area,
            RecordKind::Scatter => {
                if record.downcast_ref::<Scatter>()?.is_bubble() {
                    ChartType::Bubble
                } else {
                    ChartType::Scatter
                }
            }
            RecordKind::Radar => ChartType::Radar,
            RecordKind::RadarArea => ChartType::FilledRadar,
            RecordKind::Surface => ChartType::Surface,
            _ => return None,
        };
        Some(chart_type)
    }

    pub fn three_d(&self) -> Option<&'a ThreeD> {
        self.tree
            .find_child(self.id, RecordKind::ThreeD)
            .and_then(|id| self.tree.downcast::<ThreeD>(id))
    }

    pub fn is_three_d(&self) -> bool {
        self.three_d().is_some()
    }

    pub fn vary_colors(&self) -> bool {
        self.format()
            .is_some_and(|f| f.flags.contains(ChartFormatFlags::VARIED))
    }

    pub fn is_stacked(&self) -> bool {
        self.chart_kind::<Bar>().map(Bar::is_stacked)
            .or_else(|| self.chart_kind::<Line>().map(Line::is_stacked))
            .or_else(|| self.chart_kind::<Area>().map(Area::is_stacked))
            .unwrap_or(false)
    }

    pub fn is_percent_stacked(&self) -> bool {
        self.chart_kind::<Bar>().map(Bar::is_100_percent)
            .or_else(|| self.chart_kind::<Line>().map(Line::is_100_percent))
            .or_else(|| self.chart_kind::<Area>().map(Area::is_100_percent))
            .unwrap_or(false)
    }

    pub fn has_shadow(&self) -> bool {
        let Some(record) = self.chart_kind_node().and_then(|id| self.tree.record(id)) else {
            return false;
        };
        if let Some(bar) = record.downcast_ref::<Bar>() {
            bar.has_shadow()
        } else if let Some(line) = record.downcast_ref::<Line>() {
            line.has_shadow()
        } else if let Some(area) = record.downcast_ref::<Area>() {
            area.has_shadow()
        } else if let Some(pie) = record.downcast_ref::<Pie>() {
            pie.has_shadow()
        } else if let Some(scatter) = record.downcast_ref::<Scatter>() {
            scatter.flags.contains(ScatterFlags::SHADOW)
        } else if let Some(radar) = record.downcast_ref::<Radar>() {
            radar.flags.contains(RadarFlags::SHADOW)
        } else {
            false
        }
    }

    pub fn gap(&self) -> Option<u16> {
        self.chart_kind::<Bar>().map(Bar::gap)
    }

    pub fn overlap(&self) -> Option<i16> {
        self.chart_kind::<Bar>().map(Bar::overlap)
    }

    pub fn first_slice_angle(&self) -> Option<u16> {
        self.chart_kind::<Pie>().map(Pie::start_angle)
    }

    pub fn donut_size(&self) -> Option<u16> {
        self.chart_kind::<Pie>().map(Pie::donut_size)
    }

    pub fn chart_lines(&self) -> Vec<ChartLineRef> {
        self.tree
            .children_of_kind(self.id, RecordKind::ChartLine)
            .into_iter()
            .map(|node| ChartLineRef {
                node,
                line_type: self
                    .tree
                    .downcast::<ChartLine>(node)
                    .and_then(ChartLine::line_type),
                format: self.tree.find_child(node, RecordKind::LineFormat),
            })
            .collect()
    }

    /// Up bars first, then down bars.
    pub fn drop_bars(&self) -> Vec<NodeId> {
        self.tree.children_of_kind(self.id, RecordKind::Dropbar)
    }

    /// The axis group the chart group is plotted on.
    pub fn axis_parent(&self) -> Option<NodeId> {
        self.tree
            .parent(self.id)
            .filter(|p| self.tree.kind(*p) == Some(RecordKind::AxisParent))
    }
}

impl ChartTree {
    /// A view of the chart group at `id`.
    pub fn chart_group(&self, id: NodeId) -> Result<ChartGroup<'_>> {
        ChartGroup::new(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ChartNode;

    fn group_with(kind: RecordKind) -> (ChartTree, NodeId, NodeId) {
        let mut tree = ChartTree::default();
        let group = tree.push_root(ChartNode::prototype(RecordKind::ChartFormat));
        let record = tree.append_child(group, ChartNode::prototype(kind)).unwrap();
        (tree, group, record)
    }

    #[test]
    fn test_pie_and_doughnut_are_derived_from_hole_size() {
        let (mut tree, group, pie) = group_with(RecordKind::Pie);
        tree.downcast_mut::<Pie>(pie).unwrap().set_donut_size(0).unwrap();
        assert_eq!(
            tree.chart_group(group).unwrap().chart_type(),
            Some(ChartType::Pie)
        );
        for size in [1, 50, 100] {
            tree.downcast_mut::<Pie>(pie).unwrap().set_donut_size(size).unwrap();
            let chart_type = tree.chart_group(group).unwrap().chart_type().unwrap();
            assert_eq!(chart_type.name(), "doughnut");
        }
    }

    #[test]
    fn test_bar_direction() {
        let (mut tree, group, bar) = group_with(RecordKind::Bar);
        assert_eq!(
            tree.chart_group(group).unwrap().chart_type(),
            Some(ChartType::Column)
        );
        tree.downcast_mut::<Bar>(bar).unwrap().set_horizontal(true);
        let view = tree.chart_group(group).unwrap();
        assert_eq!(view.chart_type(), Some(ChartType::Bar));
        assert_eq!(view.gap(), Some(150));
        assert_eq!(view.overlap(), Some(0));
        assert_eq!(view.first_slice_angle(), None);
    }

    #[test]
    fn test_stacking_accessors() {
        let (mut tree, group, bar) = group_with(RecordKind::Bar);
        tree.downcast_mut::<Bar>(bar).unwrap().set_100_percent(true);
        tree.append_child(group, ChartNode::prototype(RecordKind::ThreeD))
            .unwrap();
        let view = tree.chart_group(group).unwrap();
        assert!(!view.is_stacked());
        assert!(view.is_percent_stacked());
        assert!(!view.has_shadow());
        assert!(view.is_three_d());
        assert_eq!(view.overlap(), Some(-100));
    }

    #[test]
    fn test_chart_lines_pair_with_their_format() {
        let (mut tree, group, _) = group_with(RecordKind::Line);
        let hi_lo = tree
            .append_child(
                group,
                ChartNode::new(ChartLine::new(ChartLineType::HighLowLines)),
            )
            .unwrap();
        tree.node_mut(hi_lo).unwrap().layout = crate::tree::ChildLayout::Bare;
        let lf = tree
            .append_child(hi_lo, ChartNode::prototype(RecordKind::LineFormat))
            .unwrap();
        let lines = tree.chart_group(group).unwrap().chart_lines();
        assert_eq!(
            lines,
            vec![ChartLineRef {
                node: hi_lo,
                line_type: Some(ChartLineType::HighLowLines),
                format: Some(lf),
            }]
        );
    }

    #[test]
    fn test_view_requires_chart_format() {
        let (tree, _, bar) = group_with(RecordKind::Bar);
        assert!(matches!(
            tree.chart_group(bar),
            Err(ChartError::UnexpectedKind { .. })
        ));
    }
}
