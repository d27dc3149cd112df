//! `<peripheral>` nodes.

use svdgen_model::{Interrupt, IpBlock, ModuleSpec, RegisterEntry};
use tracing::debug;

use crate::error::Result;
use crate::node::{hex, Node, NodeBuilder};
use crate::register::compile_entries;

/// One module instance joined with its block definition.
#[derive(Debug, Clone, Copy)]
pub struct Peripheral<'a> {
    pub name: &'a str,
    pub base_address: u64,
    pub interrupts: &'a [Interrupt],
    pub registers: &'a [RegisterEntry],
}

impl<'a> Peripheral<'a> {
    pub fn new(module: &'a ModuleSpec, block: &'a IpBlock) -> Self {
        Self {
            name: &module.name,
            base_address: module.base_address,
            interrupts: &block.interrupts,
            registers: &block.registers,
        }
    }
}

/// Build a `<peripheral>`: name, base address, one `<interrupt>` per
/// interrupt, the register list, and a closing `end of` comment.
///
/// Interrupt values are positional within the block, starting at zero.
/// Registers are compiled relative to the peripheral base.
pub fn build_peripheral(peripheral: &Peripheral<'_>) -> Result<Node> {
    debug!(
        peripheral = peripheral.name,
        base = %hex(peripheral.base_address),
        entries = peripheral.registers.len(),
        "building peripheral"
    );

    let interrupts = peripheral.interrupts.iter().enumerate().map(|(num, irq)| {
        NodeBuilder::new("interrupt")
            .leaf("name", &irq.name)
            .leaf("value", num)
            .build()
    });
    let registers = NodeBuilder::new("registers")
        .children(compile_entries(peripheral.registers, 0)?)
        .build();

    Ok(NodeBuilder::new("peripheral")
        .leaf("name", peripheral.name)
        .leaf("baseAddress", hex(peripheral.base_address))
        .children(interrupts)
        .child(registers)
        .child(Node::comment(format!("end of {}", peripheral.name)))
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use svdgen_model::{MultiregSpec, RegisterSpec};

    fn uart() -> IpBlock {
        IpBlock::new("uart")
            .with_interrupt("tx_watermark")
            .with_interrupt("rx_watermark")
            .with_interrupt("rx_overflow")
            .with_register(RegisterSpec::new("CTRL", "control", 0x0).with_swaccess("rw"))
            .with_register(MultiregSpec::new(
                "WDATA",
                "write data",
                vec![
                    RegisterSpec::new("WDATA0", "w0", 0x8).into(),
                    RegisterSpec::new("WDATA1", "w1", 0xc).into(),
                ],
            ))
    }

    #[test]
    fn peripheral_layout() {
        let block = uart();
        let module = ModuleSpec::new("uart1", "uart", 0x4001_0000);
        let node = build_peripheral(&Peripheral::new(&module, &block)).unwrap();

        assert_eq!(node.child_text("name"), Some("uart1"));
        assert_eq!(node.child_text("baseAddress"), Some("0x40010000"));

        let irqs: Vec<_> = node
            .children_named("interrupt")
            .map(|i| (i.child_text("name").unwrap(), i.child_text("value").unwrap()))
            .collect();
        assert_eq!(
            irqs,
            [("tx_watermark", "0"), ("rx_watermark", "1"), ("rx_overflow", "2")]
        );

        let registers = node.child("registers").unwrap();
        let kinds: Vec<_> = registers.children().iter().filter_map(Node::tag).collect();
        assert_eq!(kinds, ["register", "cluster"]);

        assert_eq!(
            node.children().last(),
            Some(&Node::comment("end of uart1"))
        );
    }

    #[test]
    fn peripheral_without_interrupts_or_registers() {
        let block = IpBlock::new("empty");
        let module = ModuleSpec::new("spare", "empty", 0x5000_0000);
        let node = build_peripheral(&Peripheral::new(&module, &block)).unwrap();

        assert_eq!(node.children_named("interrupt").count(), 0);
        assert!(node.child("registers").unwrap().children().is_empty());
    }
}
