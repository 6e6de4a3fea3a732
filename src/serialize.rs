//! Writes a [`ChartTree`] back into a record stream.
//!
//! Payload bytes are always derived from the records' typed fields, so edited nodes are
//! re-encoded and untouched ones reproduce their input byte for byte.

use crate::err::{ChartError, Result};
use crate::registry::{BEGIN, END};
use crate::stream::{RECORD_HEADER_SIZE, write_record};
use crate::tree::{ChartNode, ChartTree, ChildLayout};
use crate::utils::bytes;

use indextree::NodeId;
use log::trace;

/// Serializes every top-level node of `tree`, in order.
pub fn serialize(tree: &ChartTree) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for root in tree.roots() {
        write_subtree(tree, *root, &mut out)?;
    }
    Ok(out)
}

/// Serializes `id` and everything below it.
pub fn write_subtree(tree: &ChartTree, id: NodeId, out: &mut Vec<u8>) -> Result<()> {
    let node = tree.node(id)?;
    write_node(node, out)?;

    match node.layout {
        ChildLayout::Leaf => {}
        ChildLayout::Bare => {
            for child in tree.children(id) {
                write_subtree(tree, child, out)?;
            }
        }
        ChildLayout::Bracketed => {
            write_record(out, BEGIN, &node.begin_data)?;
            for child in tree.children(id) {
                write_subtree(tree, child, out)?;
            }
            write_record(out, END, &node.end_data)?;
        }
    }
    Ok(())
}

/// Writes the header and payload of a single node, without its children.
fn write_node(node: &ChartNode, out: &mut Vec<u8>) -> Result<()> {
    let opcode = node.record.opcode();
    let header = out.len();
    bytes::put_u16(out, opcode);
    // length is patched once the payload is known
    bytes::put_u16(out, 0);

    let start = out.len();
    node.record.encode(out);
    out.extend_from_slice(&node.trailing);

    let len = out.len() - start;
    let declared = u16::try_from(len).map_err(|_| ChartError::PayloadTooLarge { opcode, len })?;
    bytes::splice_u16(out, header + RECORD_HEADER_SIZE - 2, declared);

    trace!(
        "wrote {} (0x{:04X}), {} bytes at offset {}",
        node.record.name(),
        opcode,
        len,
        header
    );
    Ok(())
}
