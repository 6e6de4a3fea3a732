mod fixtures;

use fixtures::*;

use biffchart::records::{Axis, AxisRecordType, ObjectLink, ObjectLinkType};
use biffchart::{AxisType, ChartSettings, ChartTree, NodeId, RecordKind, get_axis};
use pretty_assertions::assert_eq;

fn parse(data: &[u8]) -> ChartTree {
    ensure_env_logger_initialized();
    ChartTree::from_bytes(data, ChartSettings::default()).unwrap()
}

fn axis_parent(tree: &ChartTree) -> NodeId {
    tree.find_all(RecordKind::AxisParent)[0]
}

#[test]
fn test_existing_axes_are_found() {
    let mut tree = parse(&stacked_column_stream());
    let ap = axis_parent(&tree);
    let len = tree.len();

    let x = get_axis(&mut tree, ap, AxisType::X, true).unwrap().unwrap();
    let y = get_axis(&mut tree, ap, AxisType::Y, false).unwrap().unwrap();
    assert_eq!(tree.len(), len);
    assert_ne!(x.axis, y.axis);
    assert_eq!(
        tree.downcast::<Axis>(y.axis).unwrap().record_type(),
        Some(AxisRecordType::Value)
    );
    // the fixture has no axis titles
    assert_eq!(x.label, None);

    assert_eq!(get_axis(&mut tree, ap, AxisType::Z, false).unwrap(), None);
}

#[test]
fn test_synthesized_axes_survive_a_round_trip() {
    let mut tree = parse(&doughnut_stream());
    let ap = axis_parent(&tree);

    let x = get_axis(&mut tree, ap, AxisType::X, true).unwrap().unwrap();
    let y = get_axis(&mut tree, ap, AxisType::Y, true).unwrap().unwrap();
    assert_eq!(tree.parent(x.axis), Some(ap));
    assert_eq!(tree.parent(y.label.unwrap()), Some(ap));

    let reread = parse(&tree.to_bytes().unwrap());
    let ap = axis_parent(&reread);
    let kinds: Vec<_> = reread
        .children(ap)
        .into_iter()
        .filter_map(|c| reread.kind(c))
        .collect();
    assert_eq!(
        kinds,
        vec![
            RecordKind::Pos,
            RecordKind::Axis,
            RecordKind::Axis,
            RecordKind::TextDisp,
            RecordKind::TextDisp,
            RecordKind::ChartFormat
        ]
    );

    let mut reread = reread;
    let len = reread.len();
    let y = get_axis(&mut reread, ap, AxisType::Y, true).unwrap().unwrap();
    assert_eq!(reread.len(), len);
    let link = reread
        .find_child(y.label.unwrap(), RecordKind::ObjectLink)
        .and_then(|ol| reread.downcast::<ObjectLink>(ol))
        .unwrap();
    assert_eq!(link.target(), Some(ObjectLinkType::ValueAxis));
}

#[test]
fn test_axis_ids_follow_stream_order() {
    let tree = parse(&stacked_column_stream());
    let ids = tree.axis_ids();
    assert_eq!(ids.len(), 2);
    assert_eq!(ids[0].axis_type, AxisType::X);
    assert_eq!(ids[1].axis_type, AxisType::Y);
    assert_eq!(ids[0].id, 50_000_001);
    assert_eq!(ids[1].id, 50_000_002);
}
