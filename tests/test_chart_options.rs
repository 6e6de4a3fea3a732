mod fixtures;

use fixtures::*;

use biffchart::records::{Bar, ChartFormat, LineFormat};
use biffchart::{
    ChartError, ChartSettings, ChartTree, ChartType, RecordKind, get_chart_option,
    set_chart_option,
};
use pretty_assertions::assert_eq;

fn stacked_column() -> ChartTree {
    ensure_env_logger_initialized();
    ChartTree::from_bytes(&stacked_column_stream(), ChartSettings::default()).unwrap()
}

#[test]
fn test_chart_group_view_of_a_stacked_column() {
    let tree = stacked_column();
    let group = tree.chart_group(tree.chart_groups()[0]).unwrap();

    assert_eq!(group.chart_type(), Some(ChartType::Column));
    assert!(group.is_stacked());
    assert!(!group.is_percent_stacked());
    assert!(!group.is_three_d());
    assert_eq!(group.gap(), Some(150));
    assert_eq!(group.overlap(), Some(-100));

    let lines = group.chart_lines();
    assert_eq!(lines.len(), 1);
    let format = lines[0].format.unwrap();
    assert_eq!(tree.downcast::<LineFormat>(format).unwrap().color_index(), 10);
    assert_eq!(
        group.axis_parent().and_then(|ap| tree.kind(ap)),
        Some(RecordKind::AxisParent)
    );
}

#[test]
fn test_doughnut_is_told_apart_from_pie() {
    ensure_env_logger_initialized();
    let tree = ChartTree::from_bytes(&doughnut_stream(), ChartSettings::default()).unwrap();
    let group = tree.chart_group(tree.chart_groups()[0]).unwrap();
    assert_eq!(group.chart_type(), Some(ChartType::Doughnut));
    assert_eq!(group.donut_size(), Some(50));
    assert_eq!(group.chart_type().unwrap().to_string(), "doughnut");
}

#[test]
fn test_options_reach_the_record_that_owns_them() {
    let mut tree = stacked_column();
    let group = tree.chart_groups()[0];

    assert_eq!(get_chart_option(&tree, group, "Stacked").as_deref(), Some("true"));
    assert_eq!(get_chart_option(&tree, group, "Overlap").as_deref(), Some("-100"));
    assert_eq!(get_chart_option(&tree, group, "LineColor").as_deref(), Some("10"));

    assert!(set_chart_option(&mut tree, group, "Gap", "300").unwrap());
    assert!(set_chart_option(&mut tree, group, "VaryColors", "true").unwrap());
    assert!(set_chart_option(&mut tree, group, "LineWeight", "1").unwrap());

    let bar = tree.find_child(group, RecordKind::Bar).unwrap();
    assert_eq!(tree.downcast::<Bar>(bar).unwrap().gap(), 300);
    assert_eq!(
        get_chart_option(&tree, group, "VaryColors").as_deref(),
        Some("true")
    );
    assert!(tree.downcast::<ChartFormat>(group).is_some());

    // edits survive a write and re-read
    let reread = ChartTree::from_bytes(&tree.to_bytes().unwrap(), ChartSettings::default()).unwrap();
    let group = reread.chart_groups()[0];
    assert_eq!(get_chart_option(&reread, group, "Gap").as_deref(), Some("300"));
    assert_eq!(get_chart_option(&reread, group, "LineWeight").as_deref(), Some("1"));
}

#[test]
fn test_option_names_are_case_insensitive() {
    let mut tree = stacked_column();
    let group = tree.chart_groups()[0];
    assert!(set_chart_option(&mut tree, group, "stacked", "false").unwrap());
    assert_eq!(get_chart_option(&tree, group, "STACKED").as_deref(), Some("false"));
}

#[test]
fn test_rejected_values_leave_the_tree_untouched() {
    let mut tree = stacked_column();
    let group = tree.chart_groups()[0];
    let before = tree.to_bytes().unwrap();

    assert!(matches!(
        set_chart_option(&mut tree, group, "Gap", "501"),
        Err(ChartError::InvalidFieldValue { .. })
    ));
    assert!(matches!(
        set_chart_option(&mut tree, group, "Stacked", "maybe"),
        Err(ChartError::InvalidFieldValue { .. })
    ));
    assert!(!set_chart_option(&mut tree, group, "Bogus", "1").unwrap());
    assert_eq!(tree.to_bytes().unwrap(), before);
}

#[test]
fn test_options_require_a_chart_group() {
    let mut tree = stacked_column();
    let units = tree.roots()[0];
    assert!(matches!(
        set_chart_option(&mut tree, units, "Gap", "100"),
        Err(ChartError::UnexpectedKind { expected: "ChartFormat" })
    ));
    assert_eq!(get_chart_option(&tree, units, "Gap"), None);
}
