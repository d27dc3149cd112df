//! The `<device>` root.
//!
//! The register description has no notion of the CPU or of the vendor, but
//! SVD requires both. They are fixed here.

use svdgen_model::{BlockMap, TopConfig};
use tracing::debug;

use crate::error::{Result, SvdError};
use crate::node::{Node, NodeBuilder};
use crate::peripheral::{build_peripheral, Peripheral};

/// Vendor string written to every document.
pub const VENDOR: &str = "lowRISC";

/// SVD schema version declared on the root.
pub const SCHEMA_VERSION: &str = "1.1";

const ADDRESS_UNIT_BITS: u32 = 8;

/// A device ready to be built: top-level facts plus every module resolved
/// to its block definition, in module-list order.
#[derive(Debug, Clone)]
pub struct Device<'a> {
    pub name: &'a str,
    pub version: &'a str,
    pub description: &'a str,
    /// Bus width in bits; also the default register size.
    pub width: u32,
    pub peripherals: Vec<Peripheral<'a>>,
}

/// Join each module of `top` with its block definition.
///
/// Every module type must have a definition in `blocks`.
pub fn resolve_device<'a>(
    top: &'a TopConfig,
    blocks: &'a BlockMap,
    version: &'a str,
    description: &'a str,
) -> Result<Device<'a>> {
    let peripherals = top
        .modules
        .iter()
        .map(|module| {
            let block = blocks
                .get(&module.ty)
                .ok_or_else(|| SvdError::UnresolvedModuleType {
                    module: module.name.clone(),
                    ty: module.ty.clone(),
                })?;
            Ok(Peripheral::new(module, block))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Device {
        name: &top.name,
        version,
        description,
        width: top.datawidth,
        peripherals,
    })
}

/// The fixed `<cpu>` node. The values satisfy the schema; none of them
/// describe the actual core.
pub fn cpu_node() -> Node {
    NodeBuilder::new("cpu")
        .leaf("name", "other")
        .leaf("endian", "little")
        .leaf("revision", 0)
        .leaf("mpuPresent", false)
        .leaf("fpuPresent", false)
        .leaf("nvicPrioBits", 0)
        .leaf("vendorSystickConfig", false)
        .build()
}

/// Build the `<device>` root with all of its peripherals.
pub fn build_device(device: &Device<'_>) -> Result<Node> {
    debug!(
        device = device.name,
        peripherals = device.peripherals.len(),
        "building device"
    );

    let peripherals = device
        .peripherals
        .iter()
        .map(build_peripheral)
        .collect::<Result<Vec<_>>>()?;

    Ok(NodeBuilder::new("device")
        .attribute("schemaVersion", SCHEMA_VERSION)
        .attribute("xmlns:xs", "http://www.w3.org/2001/XMLSchema-instance")
        .attribute("xs:noNamespaceSchemaLocation", "CMSIS-SVD.xsd")
        .leaf("vendor", VENDOR)
        .leaf("name", device.name)
        .leaf("version", device.version)
        .leaf("description", device.description)
        .leaf("width", device.width)
        .leaf("size", device.width)
        .leaf("addressUnitBits", ADDRESS_UNIT_BITS)
        .child(cpu_node())
        .child(NodeBuilder::new("peripherals").children(peripherals).build())
        .build())
}
