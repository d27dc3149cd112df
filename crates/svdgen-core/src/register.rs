//! Register list entries to `<register>` and `<cluster>` nodes.
//!
//! Each kind of entry has its own shape in the output:
//!
//! - reserved and `skipto` entries produce nothing; the offsets of their
//!   neighbours already account for them
//! - a window becomes one register with `dim`/`dimIncrement`
//! - a same-address group produces one register per alternative
//! - a multireg becomes a cluster, see [`crate::cluster`]
//! - a plain register produces one register
//!
//! All offsets are emitted relative to `base`: zero for a peripheral's
//! register list, the cluster offset for a cluster's members.

use svdgen_model::{FieldSpec, RegisterEntry, RegisterSpec, WindowSpec};
use tracing::trace;

use crate::access::access_modes;
use crate::bits::{bit_range, BitRange};
use crate::cluster::build_cluster;
use crate::error::{Result, SvdError};
use crate::node::{hex, Node, NodeBuilder};

/// Index placeholder SVD tools substitute in `dim` register names.
pub const DIM_PLACEHOLDER: &str = "%s";

/// Compile a register list, keeping input order.
pub fn compile_entries(entries: &[RegisterEntry], base: u64) -> Result<Vec<Node>> {
    let mut nodes = Vec::with_capacity(entries.len());
    for entry in entries {
        nodes.extend(compile_entry(entry, base)?);
    }
    Ok(nodes)
}

/// Compile one entry into the nodes it contributes.
pub fn compile_entry(entry: &RegisterEntry, base: u64) -> Result<Vec<Node>> {
    match entry {
        RegisterEntry::Reserved(_) => Ok(Vec::new()),
        RegisterEntry::Window(window) => Ok(vec![compile_window(window, base)?]),
        RegisterEntry::SameAddr(group) => compile_entries(&group.members, base),
        RegisterEntry::Multireg(multi) => Ok(vec![build_cluster(multi, base)?]),
        RegisterEntry::Register(reg) => Ok(vec![compile_register(reg, base)?]),
    }
}

/// Compile a plain register.
pub fn compile_register(reg: &RegisterSpec, base: u64) -> Result<Node> {
    let offset = relative_offset(reg, base, || RegisterEntry::Register(reg.clone()))?;
    Ok(register_node(reg, &reg.name, offset)?.build())
}

/// Compile a window as a dimensioned register: `dim` items spaced
/// `valid_bits / 8` bytes apart.
pub fn compile_window(window: &WindowSpec, base: u64) -> Result<Node> {
    let reg = &window.register;
    let offset = relative_offset(reg, base, || RegisterEntry::Window(window.clone()))?;

    let name = if reg.name.contains(DIM_PLACEHOLDER) {
        reg.name.clone()
    } else {
        format!("{}{DIM_PLACEHOLDER}", reg.name)
    };

    Ok(register_node(reg, &name, offset)?
        .leaf("dim", window.items)
        .leaf("dimIncrement", hex(window.valid_bits / 8))
        .build())
}

/// Width of the register when its single field just restates the register.
///
/// Registers narrower than the bus are described upstream with one field
/// named after the register at bit 0. SVD expresses that with `size`
/// instead, so such a field is folded into the register. Names often differ
/// only in case.
fn flattened_width(reg: &RegisterSpec) -> Result<Option<u32>> {
    let [field] = reg.fields.as_slice() else {
        return Ok(None);
    };
    if field.lsb() != 0 || field.name.to_lowercase() != reg.name.to_lowercase() {
        return Ok(None);
    }
    match BitRange::new(field.width(), 0) {
        Some(_) => Ok(Some(field.width())),
        None => Err(SvdError::InvalidBitWidth {
            field: format!("field {}.{}", reg.name, field.name),
            width: field.width(),
        }),
    }
}

fn relative_offset(
    reg: &RegisterSpec,
    base: u64,
    entry: impl FnOnce() -> RegisterEntry,
) -> Result<u64> {
    let offset = reg.offset.ok_or_else(|| {
        let entry = entry();
        SvdError::MissingOffset {
            kind: entry.kind(),
            entry: entry.to_pretty_json(),
        }
    })?;
    offset.checked_sub(base).ok_or_else(|| SvdError::OffsetBelowBase {
        name: reg.name.clone(),
        offset,
        base,
    })
}

fn register_node(reg: &RegisterSpec, name: &str, offset: u64) -> Result<NodeBuilder> {
    trace!(register = %reg.name, offset, "compiling register");

    let size = flattened_width(reg)?;
    let modes = access_modes(reg.swaccess.as_deref(), &format!("register {}", reg.name))?;

    let builder = NodeBuilder::new("register")
        .leaf("name", name)
        .leaf("description", &reg.description)
        .leaf("addressOffset", hex(offset))
        .leaf_opt("size", size.map(|w| hex(w.into())))
        .leaf_opt("mask", reg.bits_used.map(hex))
        .leaf_opt("resetValue", reg.reset_value.map(hex))
        .leaf_opt("resetMask", reg.reset_mask.map(hex));
    let builder = modes.apply(builder);

    if size.is_some() || reg.fields.is_empty() {
        return Ok(builder);
    }

    let fields = reg
        .fields
        .iter()
        .map(|field| compile_field(field, &reg.name))
        .collect::<Result<Vec<_>>>()?;
    Ok(builder.child(NodeBuilder::new("fields").children(fields).build()))
}

fn compile_field(field: &FieldSpec, register: &str) -> Result<Node> {
    let owner = format!("field {register}.{}", field.name);
    let range = bit_range(field.width(), field.lsb()).ok_or_else(|| SvdError::InvalidBitWidth {
        field: owner.clone(),
        width: field.width(),
    })?;
    let modes = access_modes(field.swaccess.as_deref(), &owner)?;

    let builder = NodeBuilder::new("field")
        .leaf("name", &field.name)
        .leaf("description", &field.description)
        .leaf("bitRange", range);
    Ok(modes.apply(builder).build())
}
