mod fixtures;

use fixtures::*;

use biffchart::records::{Bar, ChartFormat, ChartLine, ChartLineType, LineFormat};
use biffchart::{
    ChartError, ChartNode, ChartRecord, ChartSettings, ChartTree, ChildLayout, NodeId, RecordKind,
};
use pretty_assertions::assert_eq;

fn assemble(data: &[u8]) -> ChartTree {
    ensure_env_logger_initialized();
    ChartTree::from_bytes(data, ChartSettings::default()).unwrap()
}

fn kinds(tree: &ChartTree, id: NodeId) -> Vec<Option<RecordKind>> {
    tree.children(id).into_iter().map(|c| tree.kind(c)).collect()
}

#[test]
fn test_unmodified_streams_reencode_byte_for_byte() {
    for data in [stacked_column_stream(), doughnut_stream(), irregular_stream()] {
        let tree = assemble(&data);
        assert_eq!(tree.to_bytes().unwrap(), data);
    }
}

#[test]
fn test_stacked_column_tree_shape() {
    let tree = assemble(&stacked_column_stream());
    let roots = tree.roots().to_vec();
    assert_eq!(roots.len(), 2);
    assert_eq!(tree.kind(roots[0]), Some(RecordKind::Units));

    let chart = roots[1];
    assert_eq!(
        kinds(&tree, chart),
        vec![Some(RecordKind::Series), Some(RecordKind::AxisParent)]
    );

    let series = tree.children(chart)[0];
    assert_eq!(
        kinds(&tree, series),
        vec![Some(RecordKind::DataFormat), Some(RecordKind::SerToCrt)]
    );
    let data_format = tree.children(series)[0];
    assert_eq!(tree.node(data_format).unwrap().layout, ChildLayout::Bare);
    assert_eq!(
        kinds(&tree, data_format),
        vec![Some(RecordKind::LineFormat), Some(RecordKind::AreaFormat)]
    );

    let axis_parent = tree.children(chart)[1];
    assert_eq!(
        kinds(&tree, axis_parent),
        vec![
            Some(RecordKind::Pos),
            Some(RecordKind::Axis),
            Some(RecordKind::Axis),
            Some(RecordKind::ChartFormat)
        ]
    );

    let group = tree.chart_groups()[0];
    assert_eq!(
        kinds(&tree, group),
        vec![Some(RecordKind::Bar), Some(RecordKind::ChartLine)]
    );
    let chart_line = tree.find_child(group, RecordKind::ChartLine).unwrap();
    assert_eq!(tree.node(chart_line).unwrap().layout, ChildLayout::Bare);
    assert_eq!(kinds(&tree, chart_line), vec![Some(RecordKind::LineFormat)]);
    assert_eq!(tree.owning_chart(chart_line), Some(chart));
}

#[test]
fn test_edited_bar_reencodes_new_fields() {
    let data = stacked_column_stream();
    let mut tree = assemble(&data);
    let group = tree.chart_groups()[0];
    let bar = tree.find_child(group, RecordKind::Bar).unwrap();

    tree.downcast_mut::<Bar>(bar).unwrap().set_stacked(false);
    let edited = tree.to_bytes().unwrap();
    assert_eq!(edited.len(), data.len());
    assert_ne!(edited, data);

    let reread = assemble(&edited);
    let bar = reread.find_all(RecordKind::Bar)[0];
    assert!(!reread.downcast::<Bar>(bar).unwrap().is_stacked());
    assert_eq!(reread.to_bytes().unwrap(), edited);
}

#[test]
fn test_stacked_bar_payload() {
    let data = StreamBuilder::new()
        .proto::<ChartFormat>()
        .begin()
        .typed(&stacked_bar())
        .end()
        .build();
    // overlap -100, gap 150, stacked
    assert_eq!(&data[32..38], &[0x9C, 0xFF, 0x96, 0x00, 0x02, 0x00]);
    let tree = assemble(&data);
    let bar = tree.find_all(RecordKind::Bar)[0];
    let bar = tree.downcast::<Bar>(bar).unwrap();
    assert_eq!(bar.overlap(), -100);
    assert_eq!(bar.gap(), 150);
    assert!(bar.is_stacked());
}

#[test]
fn test_unknown_opcodes_and_trailing_bytes_survive() {
    let data = irregular_stream();
    let tree = assemble(&data);

    let units = tree.roots()[0];
    assert_eq!(tree.node(units).unwrap().trailing, vec![0xEE, 0xFF]);

    let chart = tree.roots()[1];
    let children = tree.children(chart);
    assert_eq!(children.len(), 2);
    match &tree.node(children[0]).unwrap().record {
        ChartRecord::Unknown(unknown) => {
            assert_eq!(unknown.opcode, UNKNOWN_OPCODE);
            assert_eq!(unknown.data, vec![1, 2, 3]);
        }
        other => panic!("expected an unknown record, got {:?}", other),
    }

    let series = children[1];
    assert_eq!(tree.node(series).unwrap().layout, ChildLayout::Bracketed);
    assert!(tree.children(series).is_empty());

    assert_eq!(opcodes(&tree.to_bytes().unwrap()), opcodes(&data));
}

#[test]
fn test_removed_subtree_is_not_written() {
    let data = stacked_column_stream();
    let mut tree = assemble(&data);
    let chart_line = tree.find_all(RecordKind::ChartLine)[0];
    tree.remove(chart_line).unwrap();

    let out = tree.to_bytes().unwrap();
    // ChartLine (2 byte payload) and its bare LineFormat (12 byte payload)
    assert_eq!(out.len(), data.len() - (4 + 2) - (4 + 12));
    assert!(!opcodes(&out).contains(&RecordKind::ChartLine.opcode()));
    assert!(tree.get(chart_line).is_none());
}

#[test]
fn test_inserted_records_are_bracketed_on_write() {
    let mut tree = assemble(&doughnut_stream());
    let group = tree.chart_groups()[0];
    let chart_line = tree
        .append_child(group, ChartNode::new(ChartLine::new(ChartLineType::LeaderLines)))
        .unwrap();
    // a LineFormat appended under a leaf opens a bracket around it
    tree.append_child(chart_line, ChartNode::new(red_line()))
        .unwrap();
    assert_eq!(tree.node(chart_line).unwrap().layout, ChildLayout::Bracketed);

    let out = tree.to_bytes().unwrap();
    let ops = opcodes(&out);
    let at = ops
        .iter()
        .position(|op| *op == RecordKind::ChartLine.opcode())
        .unwrap();
    assert_eq!(
        &ops[at..at + 4],
        &[
            RecordKind::ChartLine.opcode(),
            BEGIN,
            RecordKind::LineFormat.opcode(),
            END
        ]
    );

    let reread = assemble(&out);
    let lf = reread.find_all(RecordKind::LineFormat)[0];
    assert_eq!(reread.downcast::<LineFormat>(lf).unwrap().color_index(), 10);
}

#[test]
fn test_unbalanced_streams_are_rejected() {
    ensure_env_logger_initialized();
    let mut data = stacked_column_stream();
    // drop the final END
    data.truncate(data.len() - 4);
    let err = ChartTree::from_bytes(&data, ChartSettings::default()).unwrap_err();
    assert!(matches!(err, ChartError::UnbalancedBracket { .. }), "{err}");

    let data = StreamBuilder::new().end().build();
    let err = ChartTree::from_bytes(&data, ChartSettings::default()).unwrap_err();
    assert!(matches!(err, ChartError::UnbalancedBracket { offset: 0, .. }), "{err}");
}

#[test]
fn test_truncated_stream_is_rejected() {
    ensure_env_logger_initialized();
    let mut data = doughnut_stream();
    data.truncate(data.len() - 1);
    assert!(matches!(
        ChartTree::from_bytes(&data, ChartSettings::default()),
        Err(ChartError::Stream { .. })
    ));
}

#[test]
fn test_json_view_of_a_stream() {
    let tree = assemble(&stacked_column_stream());
    let json = tree.to_json().unwrap();
    let chart = &json[1];
    assert_eq!(chart["opcode"], "0x1002");
    assert_eq!(chart["layout"], "Bracketed");
    let group = &chart["children"][1]["children"][3];
    assert_eq!(group["record"]["kind"], "ChartFormat");
    assert_eq!(group["children"][0]["record"]["fields"]["overlap"], -100);
}

#[test]
fn test_partial_optional_tails_are_kept_as_trailing() {
    let marker = [0u8; 18];
    let tick = {
        let mut t = vec![0u8; 29];
        t[0] = 2;
        t[28] = 0x5A;
        t
    };
    let cases: Vec<(RecordKind, Vec<u8>, usize)> = vec![
        (RecordKind::MarkerFormat, marker.to_vec(), 16),
        (RecordKind::Tick, tick, 28),
        (RecordKind::Radar, vec![0x01, 0x00, 0x12], 2),
        (RecordKind::RadarArea, vec![0x01, 0x00, 0x34], 2),
        (RecordKind::Surface, vec![0x03, 0x00, 0x56], 2),
        (RecordKind::ShtProps, vec![0x0A, 0x00, 0x00, 0x00, 0x78], 4),
    ];

    for (kind, payload, layout_len) in cases {
        let data = StreamBuilder::new().raw(kind.opcode(), &payload).build();
        let tree = assemble(&data);
        let node = tree.node(tree.roots()[0]).unwrap();
        assert!(node.record.is_kind(kind), "{:?} fell back to {:?}", kind, node.record);
        assert!(!matches!(node.record, ChartRecord::Opaque(_)), "{:?}", kind);
        assert_eq!(node.record.to_bytes(), payload[..layout_len].to_vec(), "{:?}", kind);
        assert_eq!(node.trailing, payload[layout_len..].to_vec(), "{:?}", kind);
        assert_eq!(tree.to_bytes().unwrap(), data, "{:?}", kind);
    }
}
