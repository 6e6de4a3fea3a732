//! DrawingML chart fragments (`c:barChart`, `c:catAx`, ...) for a chart tree.
//!
//! Only the chart-group and axis settings carried by the record tree are written; series data
//! is resolved by the workbook layer and is not part of these fragments.

use crate::axes::{AxisType, axis_type_of};
use crate::chart_type::{ChartGroup, ChartType};
use crate::color::ColorTable;
use crate::err::{ChartError, Result};
use crate::records::{
    AxisLineFormat, CatserRange, ChartLineType, Dropbar, LineFormat, LineStyle, ValueRange,
};
use crate::registry::RecordKind;
use crate::tree::ChartTree;

use indextree::NodeId;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use std::io::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grouping {
    /// No `c:grouping` element.
    None,
    /// `clustered` when not stacked (bar charts).
    Clustered,
    /// `standard` when not stacked (line and area charts).
    Standard,
}

/// What a chart-type element may contain.
#[derive(Debug)]
struct Capabilities {
    element: &'static str,
    element_3d: &'static str,
    bar_dir: bool,
    grouping: Grouping,
    vary_colors: bool,
    gap_overlap: bool,
    slices: bool,
    hole: bool,
    scatter_style: bool,
    radar_style: Option<&'static str>,
    lines: &'static [ChartLineType],
    up_down_bars: bool,
    axes: bool,
}

const BASE: Capabilities = Capabilities {
    element: "",
    element_3d: "",
    bar_dir: false,
    grouping: Grouping::None,
    vary_colors: true,
    gap_overlap: false,
    slices: false,
    hole: false,
    scatter_style: false,
    radar_style: None,
    lines: &[],
    up_down_bars: false,
    axes: true,
};

const BAR: Capabilities = Capabilities {
    element: "c:barChart",
    element_3d: "c:bar3DChart",
    bar_dir: true,
    grouping: Grouping::Clustered,
    gap_overlap: true,
    lines: &[ChartLineType::SeriesLines],
    ..BASE
};

const LINE: Capabilities = Capabilities {
    element: "c:lineChart",
    element_3d: "c:line3DChart",
    grouping: Grouping::Standard,
    lines: &[ChartLineType::DropLines, ChartLineType::HighLowLines],
    up_down_bars: true,
    ..BASE
};

const PIE: Capabilities = Capabilities {
    element: "c:pieChart",
    element_3d: "c:pie3DChart",
    slices: true,
    axes: false,
    ..BASE
};

const DOUGHNUT: Capabilities = Capabilities {
    element: "c:doughnutChart",
    element_3d: "c:doughnutChart",
    hole: true,
    ..PIE
};

const AREA: Capabilities = Capabilities {
    element: "c:areaChart",
    element_3d: "c:area3DChart",
    grouping: Grouping::Standard,
    lines: &[ChartLineType::DropLines],
    ..BASE
};

const SCATTER: Capabilities = Capabilities {
    element: "c:scatterChart",
    element_3d: "c:scatterChart",
    scatter_style: true,
    ..BASE
};

const BUBBLE: Capabilities = Capabilities {
    element: "c:bubbleChart",
    element_3d: "c:bubbleChart",
    ..BASE
};

const RADAR: Capabilities = Capabilities {
    element: "c:radarChart",
    element_3d: "c:radarChart",
    radar_style: Some("marker"),
    ..BASE
};

const FILLED_RADAR: Capabilities = Capabilities {
    radar_style: Some("filled"),
    ..RADAR
};

const SURFACE: Capabilities = Capabilities {
    element: "c:surfaceChart",
    element_3d: "c:surface3DChart",
    vary_colors: false,
    ..BASE
};

fn capabilities(chart_type: ChartType) -> &'static Capabilities {
    match chart_type {
        ChartType::Column | ChartType::Bar => &BAR,
        ChartType::Line => &LINE,
        ChartType::Pie => &PIE,
        ChartType::Doughnut => &DOUGHNUT,
        ChartType::Area => &AREA,
        ChartType::Scatter => &SCATTER,
        ChartType::Bubble => &BUBBLE,
        ChartType::Radar => &RADAR,
        ChartType::FilledRadar => &FILLED_RADAR,
        ChartType::Surface => &SURFACE,
    }
}

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn new_writer() -> XmlWriter {
    Writer::new(Cursor::new(Vec::new()))
}

fn finish(writer: XmlWriter) -> Result<String> {
    String::from_utf8(writer.into_inner().into_inner()).map_err(|e| ChartError::XmlOutput {
        message: e.to_string(),
    })
}

fn start(writer: &mut XmlWriter, name: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    Ok(())
}

fn end(writer: &mut XmlWriter, name: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn empty(writer: &mut XmlWriter, name: &str) -> Result<()> {
    writer.write_event(Event::Empty(BytesStart::new(name)))?;
    Ok(())
}

/// `<name val="value"/>`
fn val(writer: &mut XmlWriter, name: &str, value: impl ToString) -> Result<()> {
    let mut element = BytesStart::new(name);
    element.push_attribute(("val", value.to_string().as_str()));
    writer.write_event(Event::Empty(element))?;
    Ok(())
}

fn bool_val(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

/// Line width in EMU for a `LineFormat` weight.
fn line_width_emu(weight: i16) -> u32 {
    match weight {
        -1 => 3175,
        0 => 12700,
        1 => 25400,
        _ => 38100,
    }
}

fn write_line_properties(writer: &mut XmlWriter, line: &LineFormat, table: &ColorTable) -> Result<()> {
    start(writer, "c:spPr")?;
    if line.line_style() == Some(LineStyle::None) {
        start(writer, "a:ln")?;
        empty(writer, "a:noFill")?;
    } else {
        let mut ln = BytesStart::new("a:ln");
        ln.push_attribute(("w", line_width_emu(line.weight()).to_string().as_str()));
        writer.write_event(Event::Start(ln))?;
        start(writer, "a:solidFill")?;
        val(writer, "a:srgbClr", line.line_color(table).to_hex())?;
        end(writer, "a:solidFill")?;
    }
    end(writer, "a:ln")?;
    end(writer, "c:spPr")
}

fn chart_line_element(line_type: ChartLineType) -> Option<&'static str> {
    match line_type {
        ChartLineType::DropLines => Some("c:dropLines"),
        ChartLineType::HighLowLines => Some("c:hiLowLines"),
        ChartLineType::SeriesLines => Some("c:serLines"),
        ChartLineType::LeaderLines => None,
    }
}

/// Writes the chart-type element of the chart group at `group`.
///
/// `axis_ids` are the `c:axId` values of the axes the group is plotted on.
pub fn write_chart_group(tree: &ChartTree, group: NodeId, axis_ids: &[u32]) -> Result<String> {
    let view = ChartGroup::new(tree, group)?;
    let chart_type = view.chart_type().ok_or(ChartError::UnexpectedKind {
        expected: "chart-kind",
    })?;
    let caps = capabilities(chart_type);
    let table = tree.settings().get_color_table();
    let element = if view.is_three_d() {
        caps.element_3d
    } else {
        caps.element
    };

    let mut writer = new_writer();
    start(&mut writer, element)?;

    if caps.bar_dir {
        let dir = if chart_type == ChartType::Bar { "bar" } else { "col" };
        val(&mut writer, "c:barDir", dir)?;
    }
    if caps.radar_style.is_some() || caps.scatter_style {
        let style = caps.radar_style.unwrap_or("lineMarker");
        let name = if caps.scatter_style {
            "c:scatterStyle"
        } else {
            "c:radarStyle"
        };
        val(&mut writer, name, style)?;
    }
    if caps.grouping != Grouping::None {
        let grouping = if view.is_percent_stacked() {
            "percentStacked"
        } else if view.is_stacked() {
            "stacked"
        } else if caps.grouping == Grouping::Clustered {
            "clustered"
        } else {
            "standard"
        };
        val(&mut writer, "c:grouping", grouping)?;
    }
    if caps.vary_colors {
        val(&mut writer, "c:varyColors", bool_val(view.vary_colors()))?;
    }

    if caps.gap_overlap {
        if let Some(gap) = view.gap().filter(|g| *g != 150) {
            val(&mut writer, "c:gapWidth", gap)?;
        }
        if let Some(overlap) = view.overlap().filter(|o| *o != 0) {
            val(&mut writer, "c:overlap", overlap)?;
        }
    }

    for line in view.chart_lines() {
        let Some(line_type) = line.line_type.filter(|t| caps.lines.contains(t)) else {
            continue;
        };
        let Some(name) = chart_line_element(line_type) else {
            continue;
        };
        match line.format.and_then(|f| tree.downcast::<LineFormat>(f)) {
            Some(format) => {
                start(&mut writer, name)?;
                write_line_properties(&mut writer, format, table)?;
                end(&mut writer, name)?;
            }
            None => empty(&mut writer, name)?,
        }
    }

    if caps.up_down_bars {
        let bars = view.drop_bars();
        if let Some(up) = bars.first().and_then(|id| tree.downcast::<Dropbar>(*id)) {
            start(&mut writer, "c:upDownBars")?;
            val(&mut writer, "c:gapWidth", up.gap())?;
            empty(&mut writer, "c:upBars")?;
            empty(&mut writer, "c:downBars")?;
            end(&mut writer, "c:upDownBars")?;
        }
    }

    if caps.slices {
        val(&mut writer, "c:firstSliceAng", view.first_slice_angle().unwrap_or(0))?;
    }
    if caps.hole {
        val(&mut writer, "c:holeSize", view.donut_size().unwrap_or(50))?;
    }

    if caps.axes {
        for id in axis_ids {
            val(&mut writer, "c:axId", id)?;
        }
    }

    end(&mut writer, element)?;
    finish(writer)
}

fn axis_position(axis_type: AxisType) -> &'static str {
    match axis_type {
        AxisType::X | AxisType::XVal | AxisType::Z => "b",
        AxisType::Y => "l",
    }
}

/// Writes the `c:catAx` / `c:valAx` / `c:serAx` element of the axis at `axis`.
pub fn write_axis(tree: &ChartTree, axis: NodeId, id: u32, cross_id: u32) -> Result<String> {
    let axis_type = axis_type_of(tree, axis).ok_or(ChartError::UnexpectedKind {
        expected: "Axis",
    })?;
    let element = axis_type.ooxml_element();

    let reversed = tree
        .find_child(axis, RecordKind::CatserRange)
        .and_then(|id| tree.downcast::<CatserRange>(id))
        .map(CatserRange::is_reversed)
        .or_else(|| {
            tree.find_child(axis, RecordKind::ValueRange)
                .and_then(|id| tree.downcast::<ValueRange>(id))
                .map(ValueRange::is_reversed)
        })
        .unwrap_or(false);
    let major_grid = tree
        .children_of_kind(axis, RecordKind::AxisLineFormat)
        .into_iter()
        .filter_map(|id| tree.downcast::<AxisLineFormat>(id))
        .any(|alf| alf.id == AxisLineFormat::MAJOR_GRIDLINES);
    let tick = tree.find_child(axis, RecordKind::Tick);
    let tick_option = |name: &str, default: &'static str| {
        tick.and_then(|t| tree.get_option(t, name))
            .unwrap_or_else(|| default.to_string())
    };

    let mut writer = new_writer();
    start(&mut writer, element)?;
    val(&mut writer, "c:axId", id)?;
    start(&mut writer, "c:scaling")?;
    val(
        &mut writer,
        "c:orientation",
        if reversed { "maxMin" } else { "minMax" },
    )?;
    end(&mut writer, "c:scaling")?;
    val(&mut writer, "c:delete", "0")?;
    val(&mut writer, "c:axPos", axis_position(axis_type))?;
    if major_grid {
        empty(&mut writer, "c:majorGridlines")?;
    }
    val(&mut writer, "c:majorTickMark", tick_option("majorTickMark", "out"))?;
    val(&mut writer, "c:minorTickMark", tick_option("minorTickMark", "none"))?;
    val(&mut writer, "c:tickLblPos", tick_option("tickLblPos", "nextTo"))?;
    val(&mut writer, "c:crossAx", cross_id)?;
    end(&mut writer, element)?;
    finish(writer)
}

/// Writes a `c:plotArea` with every chart group and axis of the tree.
pub fn write_plot_area(tree: &ChartTree) -> Result<String> {
    let ids = tree.axis_ids();
    let mut out = String::from("<c:plotArea><c:layout/>");

    for group in tree.chart_groups() {
        let view = ChartGroup::new(tree, group)?;
        if view.chart_type().is_none() {
            continue;
        }
        let parent = view.axis_parent();
        let group_ids: Vec<u32> = ids
            .iter()
            .filter(|a| tree.parent(a.axis) == parent)
            .map(|a| a.id)
            .collect();
        out.push_str(&write_chart_group(tree, group, &group_ids)?);
    }

    for axis in &ids {
        // each axis crosses the first other axis of its group
        let cross = ids
            .iter()
            .find(|a| a.axis != axis.axis && tree.parent(a.axis) == tree.parent(axis.axis))
            .map_or(0, |a| a.id);
        out.push_str(&write_axis(tree, axis.axis, axis.id, cross)?);
    }

    out.push_str("</c:plotArea>");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axes::get_axis;
    use crate::records::{Bar, ChartLine, Pie};
    use crate::tree::{ChartNode, ChildLayout};

    fn group_of(kind: RecordKind) -> (ChartTree, NodeId, NodeId) {
        let mut tree = ChartTree::default();
        let ap = tree.push_root(ChartNode::prototype(RecordKind::AxisParent));
        let group = tree
            .append_child(ap, ChartNode::prototype(RecordKind::ChartFormat))
            .unwrap();
        let record = tree.append_child(group, ChartNode::prototype(kind)).unwrap();
        (tree, group, record)
    }

    #[test]
    fn test_stacked_bar_group() {
        let (mut tree, group, bar) = group_of(RecordKind::Bar);
        tree.downcast_mut::<Bar>(bar).unwrap().set_stacked(true);
        let xml = write_chart_group(&tree, group, &[11, 12]).unwrap();
        assert_eq!(
            xml,
            "<c:barChart><c:barDir val=\"col\"/><c:grouping val=\"stacked\"/>\
             <c:varyColors val=\"0\"/><c:overlap val=\"-100\"/>\
             <c:axId val=\"11\"/><c:axId val=\"12\"/></c:barChart>"
        );
    }

    #[test]
    fn test_doughnut_has_hole_and_no_axes() {
        let (mut tree, group, pie) = group_of(RecordKind::Pie);
        tree.downcast_mut::<Pie>(pie).unwrap().set_as_doughnut();
        let xml = write_chart_group(&tree, group, &[1, 2]).unwrap();
        assert!(xml.starts_with("<c:doughnutChart>"));
        assert!(xml.contains("<c:holeSize val=\"50\"/>"));
        assert!(!xml.contains("c:axId"));
    }

    #[test]
    fn test_three_d_element() {
        let (mut tree, group, _) = group_of(RecordKind::Area);
        tree.append_child(group, ChartNode::prototype(RecordKind::ThreeD))
            .unwrap();
        let xml = write_chart_group(&tree, group, &[]).unwrap();
        assert!(xml.starts_with("<c:area3DChart><c:grouping val=\"standard\"/>"));
    }

    #[test]
    fn test_chart_line_color() {
        let (mut tree, group, _) = group_of(RecordKind::Line);
        let hi_lo = tree
            .append_child(group, ChartNode::new(ChartLine::new(ChartLineType::HighLowLines)))
            .unwrap();
        tree.node_mut(hi_lo).unwrap().layout = ChildLayout::Bare;
        let lf = tree
            .append_child(hi_lo, ChartNode::prototype(RecordKind::LineFormat))
            .unwrap();
        let table = tree.settings().get_color_table().clone();
        tree.downcast_mut::<LineFormat>(lf)
            .unwrap()
            .set_color_index(10, &table);
        let xml = write_chart_group(&tree, group, &[]).unwrap();
        assert!(
            xml.contains(
                "<c:hiLowLines><c:spPr><a:ln w=\"3175\"><a:solidFill>\
                 <a:srgbClr val=\"FF0000\"/></a:solidFill></a:ln></c:spPr></c:hiLowLines>"
            ),
            "{xml}"
        );
    }

    #[test]
    fn test_value_axis_with_gridlines() {
        let (mut tree, _, _) = group_of(RecordKind::Bar);
        let ap = tree.roots()[0];
        let pair = get_axis(&mut tree, ap, AxisType::Y, true).unwrap().unwrap();
        let xml = write_axis(&tree, pair.axis, 2, 1).unwrap();
        assert!(xml.starts_with("<c:valAx><c:axId val=\"2\"/>"), "{xml}");
        assert!(xml.contains("<c:orientation val=\"minMax\"/>"));
        assert!(xml.contains("<c:axPos val=\"l\"/>"));
        assert!(xml.contains("<c:majorGridlines/>"));
        assert!(xml.ends_with("<c:crossAx val=\"1\"/></c:valAx>"));
    }

    #[test]
    fn test_plot_area_cross_references_axes() {
        let (mut tree, _, _) = group_of(RecordKind::Bar);
        let ap = tree.roots()[0];
        get_axis(&mut tree, ap, AxisType::X, true).unwrap();
        get_axis(&mut tree, ap, AxisType::Y, true).unwrap();
        let xml = write_plot_area(&tree).unwrap();
        assert!(xml.starts_with("<c:plotArea><c:layout/><c:barChart>"));
        assert_eq!(xml.matches("<c:crossAx").count(), 2);
        assert!(xml.contains("<c:catAx>"));
    }
}
