//! Multiregs as `<cluster>` nodes.
//!
//! Member registers carry offsets relative to the peripheral. The cluster is
//! placed at the lowest member offset and every member is re-based onto it,
//! following the SVD convention that cluster children are cluster-relative.

use svdgen_model::{MultiregSpec, RegisterEntry};
use tracing::debug;

use crate::error::{Result, SvdError};
use crate::node::{hex, Node, NodeBuilder};
use crate::register::compile_entries;

/// Build the `<cluster>` for a multireg.
///
/// Only one level of clustering is supported: `base` must be zero (the
/// multireg sits directly in a peripheral's register list) and no member may
/// itself be a multireg. Both are checked before any member is compiled.
pub fn build_cluster(multi: &MultiregSpec, base: u64) -> Result<Node> {
    if base != 0 || multi.genregs.iter().any(contains_multireg) {
        return Err(SvdError::NestedMultiregUnsupported {
            name: multi.name.clone(),
        });
    }

    let mut cluster_base = None;
    for entry in &multi.genregs {
        if let Some(offset) = entry_offset(entry)? {
            cluster_base = Some(cluster_base.map_or(offset, |b: u64| b.min(offset)));
        }
    }
    let cluster_base = cluster_base.ok_or_else(|| SvdError::MissingOffset {
        kind: "multireg",
        entry: RegisterEntry::Multireg(multi.clone()).to_pretty_json(),
    })?;

    debug!(cluster = %multi.name, offset = cluster_base, members = multi.genregs.len(), "building cluster");

    Ok(NodeBuilder::new("cluster")
        .leaf("name", &multi.name)
        .leaf("description", &multi.description)
        .leaf("addressOffset", hex(cluster_base))
        .children(compile_entries(&multi.genregs, cluster_base)?)
        .build())
}

fn contains_multireg(entry: &RegisterEntry) -> bool {
    match entry {
        RegisterEntry::Multireg(_) => true,
        RegisterEntry::SameAddr(group) => group.members.iter().any(contains_multireg),
        _ => false,
    }
}

/// Absolute offset an entry occupies, if it occupies any.
///
/// Windows keep their offset on the inner register template; same-address
/// groups occupy the lowest offset among their views; reserved entries
/// occupy nothing.
fn entry_offset(entry: &RegisterEntry) -> Result<Option<u64>> {
    let offset = match entry {
        RegisterEntry::Reserved(_) => return Ok(None),
        RegisterEntry::Register(reg) => reg.offset,
        RegisterEntry::Window(window) => window.register.offset,
        RegisterEntry::SameAddr(group) => {
            let mut lowest = None;
            for member in &group.members {
                if let Some(offset) = entry_offset(member)? {
                    lowest = Some(lowest.map_or(offset, |l: u64| l.min(offset)));
                }
            }
            return Ok(lowest);
        }
        RegisterEntry::Multireg(multi) => {
            return Err(SvdError::NestedMultiregUnsupported {
                name: multi.name.clone(),
            })
        }
    };

    match offset {
        Some(offset) => Ok(Some(offset)),
        None => Err(SvdError::MissingOffset {
            kind: entry.kind(),
            entry: entry.to_pretty_json(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use svdgen_model::{RegisterSpec, ReservedEntry, SameAddrGroup, WindowSpec};

    fn member_offsets(cluster: &Node) -> Vec<&str> {
        cluster
            .children()
            .iter()
            .filter(|c| c.tag() == Some("register"))
            .filter_map(|c| c.child_text("addressOffset"))
            .collect()
    }

    fn intr_multireg() -> MultiregSpec {
        MultiregSpec::new(
            "INTR_ENABLE",
            "Interrupt enable",
            vec![
                RegisterSpec::new("INTR_ENABLE0", "e0", 0x10).into(),
                RegisterSpec::new("INTR_ENABLE1", "e1", 0x14).into(),
                RegisterSpec::new("INTR_ENABLE2", "e2", 0x18).into(),
            ],
        )
    }

    #[test]
    fn cluster_offsets_are_relative() {
        let node = build_cluster(&intr_multireg(), 0).unwrap();
        assert_eq!(node.tag(), Some("cluster"));
        assert_eq!(node.child_text("name"), Some("INTR_ENABLE"));
        assert_eq!(node.child_text("description"), Some("Interrupt enable"));
        assert_eq!(node.child_text("addressOffset"), Some("0x10"));
        assert_eq!(member_offsets(&node), ["0x0", "0x4", "0x8"]);
    }

    #[test]
    fn lowest_offset_wins_regardless_of_order() {
        let multi = MultiregSpec::new(
            "M",
            "m",
            vec![
                RegisterSpec::new("B", "b", 0x24).into(),
                RegisterSpec::new("A", "a", 0x20).into(),
            ],
        );
        let node = build_cluster(&multi, 0).unwrap();
        assert_eq!(node.child_text("addressOffset"), Some("0x20"));
        assert_eq!(member_offsets(&node), ["0x4", "0x0"]);
    }

    #[test]
    fn window_members_use_inner_offset() {
        let multi = MultiregSpec::new(
            "FIFO",
            "fifos",
            vec![
                WindowSpec::new(RegisterSpec::new("fifo0", "f0", 0x100), 8, 32).into(),
                WindowSpec::new(RegisterSpec::new("fifo1", "f1", 0x120), 8, 32).into(),
            ],
        );
        let node = build_cluster(&multi, 0).unwrap();
        assert_eq!(node.child_text("addressOffset"), Some("0x100"));
        assert_eq!(member_offsets(&node), ["0x0", "0x20"]);
        assert_eq!(node.children()[3].child_text("name"), Some("fifo0%s"));
    }

    #[test]
    fn reserved_members_are_ignored() {
        let mut multi = intr_multireg();
        multi
            .genregs
            .insert(1, RegisterEntry::Reserved(ReservedEntry::Reserved(1)));
        let node = build_cluster(&multi, 0).unwrap();
        assert_eq!(node.child_text("addressOffset"), Some("0x10"));
        assert_eq!(member_offsets(&node), ["0x0", "0x4", "0x8"]);
    }

    #[test]
    fn nested_multireg_rejected() {
        let outer = MultiregSpec::new(
            "OUTER",
            "outer",
            vec![
                RegisterSpec::new("R0", "r0", 0x0).into(),
                intr_multireg().into(),
            ],
        );
        let err = build_cluster(&outer, 0).unwrap_err();
        assert!(matches!(err, SvdError::NestedMultiregUnsupported { ref name } if name == "OUTER"));
    }

    #[test]
    fn multireg_hidden_in_same_address_group_rejected() {
        let outer = MultiregSpec::new(
            "OUTER",
            "outer",
            vec![RegisterEntry::SameAddr(SameAddrGroup {
                members: vec![intr_multireg().into()],
            })],
        );
        let err = build_cluster(&outer, 0).unwrap_err();
        assert!(matches!(err, SvdError::NestedMultiregUnsupported { .. }));
    }

    #[test]
    fn non_zero_base_rejected() {
        let err = build_cluster(&intr_multireg(), 0x40).unwrap_err();
        assert!(matches!(err, SvdError::NestedMultiregUnsupported { .. }));
    }

    #[test]
    fn member_without_offset_rejected() {
        let mut lost = RegisterSpec::new("LOST", "no offset", 0);
        lost.offset = None;
        let multi = MultiregSpec::new("M", "m", vec![lost.into()]);
        let err = build_cluster(&multi, 0).unwrap_err();
        assert!(matches!(err, SvdError::MissingOffset { ref entry, .. } if entry.contains("LOST")));
    }

    #[test]
    fn empty_multireg_rejected() {
        let multi = MultiregSpec::new("EMPTY", "nothing", Vec::new());
        let err = build_cluster(&multi, 0).unwrap_err();
        assert!(matches!(err, SvdError::MissingOffset { kind: "multireg", ref entry } if entry.contains("EMPTY")));
    }
}
