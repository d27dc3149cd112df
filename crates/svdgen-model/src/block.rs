//! Peripheral block definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::register::RegisterEntry;

/// Block definitions keyed by block name. Module instances refer to these
/// through their `type`.
pub type BlockMap = BTreeMap<String, IpBlock>;

/// An interrupt raised by a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interrupt {
    pub name: String,
    #[serde(rename = "desc", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Interrupt {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}

/// The register definition of one peripheral type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpBlock {
    pub name: String,
    #[serde(default)]
    pub registers: Vec<RegisterEntry>,
    /// Interrupts in declaration order; numbering is positional.
    #[serde(rename = "interrupt_list", default)]
    pub interrupts: Vec<Interrupt>,
}

impl IpBlock {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            registers: Vec::new(),
            interrupts: Vec::new(),
        }
    }

    pub fn with_register(mut self, entry: impl Into<RegisterEntry>) -> Self {
        self.registers.push(entry.into());
        self
    }

    pub fn with_interrupt(mut self, name: impl Into<String>) -> Self {
        self.interrupts.push(Interrupt::new(name));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::RegisterSpec;

    #[test]
    fn parse_block_with_interrupts() {
        let block: IpBlock = serde_json::from_str(
            r#"{
                "name": "uart",
                "clock_primary": "clk_i",
                "interrupt_list": [
                    {"name": "tx_watermark", "desc": "tx below level"},
                    {"name": "rx_overflow"}
                ],
                "registers": [{"name": "CTRL", "desc": "control", "genoffset": 0}]
            }"#,
        )
        .unwrap();
        assert_eq!(block.name, "uart");
        assert_eq!(block.interrupts.len(), 2);
        assert_eq!(block.interrupts[1].description, None);
        assert_eq!(block.registers.len(), 1);
    }

    #[test]
    fn interrupts_and_registers_default_empty() {
        let block: IpBlock = serde_json::from_str(r#"{"name": "empty"}"#).unwrap();
        assert!(block.interrupts.is_empty());
        assert!(block.registers.is_empty());
    }

    #[test]
    fn builder_preserves_order() {
        let block = IpBlock::new("gpio")
            .with_interrupt("a")
            .with_interrupt("b")
            .with_register(RegisterSpec::new("DATA_IN", "input", 0))
            .with_register(RegisterSpec::new("DIRECT_OUT", "output", 4));
        let names: Vec<_> = block.interrupts.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(block.registers.len(), 2);
    }
}
