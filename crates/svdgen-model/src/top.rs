//! Top-level chip configuration.

use serde::{Deserialize, Serialize};

use crate::number;

/// One module instance in the top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSpec {
    /// Instance name, used as the peripheral name.
    pub name: String,
    /// Block type, resolved against the block definitions.
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(rename = "base_addr", deserialize_with = "number::deserialize")]
    pub base_address: u64,
}

impl ModuleSpec {
    pub fn new(name: impl Into<String>, ty: impl Into<String>, base_address: u64) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            base_address,
        }
    }
}

/// The validated top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopConfig {
    pub name: String,
    /// Bus width in bits.
    #[serde(deserialize_with = "number::deserialize")]
    pub datawidth: u32,
    /// Module instances in address-map order.
    #[serde(rename = "module", default)]
    pub modules: Vec<ModuleSpec>,
}

impl TopConfig {
    pub fn new(name: impl Into<String>, datawidth: u32) -> Self {
        Self {
            name: name.into(),
            datawidth,
            modules: Vec::new(),
        }
    }

    pub fn with_module(mut self, module: ModuleSpec) -> Self {
        self.modules.push(module);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quoted_top() {
        let top: TopConfig = serde_json::from_str(
            r#"{
                "name": "earlgrey",
                "datawidth": "32",
                "module": [
                    {"name": "uart0", "type": "uart", "base_addr": "0x40000000"},
                    {"name": "gpio", "type": "gpio", "base_addr": 1073807360}
                ],
                "memory": []
            }"#,
        )
        .unwrap();
        assert_eq!(top.datawidth, 32);
        assert_eq!(top.modules[0].base_address, 0x4000_0000);
        assert_eq!(top.modules[1].base_address, 0x4001_0000);
        assert_eq!(top.modules[1].ty, "gpio");
    }

    #[test]
    fn missing_base_address_is_rejected() {
        let result: Result<TopConfig, _> = serde_json::from_str(
            r#"{"name": "t", "datawidth": 32, "module": [{"name": "m", "type": "x"}]}"#,
        );
        assert!(result.is_err());
    }
}
