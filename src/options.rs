//! Named-option dispatch over a chart group.
//!
//! Callers address chart properties by name (`Stacked`, `Gap`, `LineColor`, ...) without
//! knowing which record holds them. The ChartFormat node and its descendants are visited in
//! stream order and the first record that recognizes the name answers.

use crate::err::{ChartError, Result};
use crate::registry::RecordKind;
use crate::tree::ChartTree;

use indextree::NodeId;
use log::debug;

fn group_nodes(tree: &ChartTree, group: NodeId) -> Result<Vec<NodeId>> {
    if !tree.node(group)?.is_kind(RecordKind::ChartFormat) {
        return Err(ChartError::UnexpectedKind {
            expected: "ChartFormat",
        });
    }
    Ok(tree.descendants(group))
}

/// Sets `name` on the first record of the chart group that knows it.
///
/// Returns `Ok(false)` when no record of the group recognizes `name`. A recognized name with
/// an unusable value is an error and stops the dispatch.
pub fn set_chart_option(tree: &mut ChartTree, group: NodeId, name: &str, value: &str) -> Result<bool> {
    for id in group_nodes(tree, group)? {
        if tree.set_option(id, name, value)? {
            debug!(
                "option {}={} applied to {}",
                name,
                value,
                tree.node(id)?.record.name()
            );
            return Ok(true);
        }
    }
    Ok(false)
}

/// Reads `name` from the first record of the chart group that knows it.
pub fn get_chart_option(tree: &ChartTree, group: NodeId, name: &str) -> Option<String> {
    group_nodes(tree, group)
        .ok()?
        .into_iter()
        .find_map(|id| tree.get_option(id, name))
}
