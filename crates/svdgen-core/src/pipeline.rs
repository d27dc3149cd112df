//! End-to-end conversion orchestrator.

use std::time::Instant;

use svdgen_model::{BlockMap, TopConfig};
use tracing::info;

use crate::device::{build_device, resolve_device};
use crate::error::Result;
use crate::node::Node;
use crate::serialize::to_svd_string;
use crate::validate::validate;

/// Configuration for a conversion run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Written to the device `<version>`.
    pub version: String,
    /// Written to the device `<description>`.
    pub description: String,
    /// Run structural validation on the tree before returning it.
    pub verify: bool,
}

impl PipelineConfig {
    /// Defaults for a device named `name`: version `1.0`, a generic
    /// description, validation on.
    pub fn for_device(name: &str) -> Self {
        Self {
            version: "1.0".to_string(),
            description: format!("{name} device"),
            verify: true,
        }
    }
}

/// Element counts for a finished document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub peripherals: usize,
    pub interrupts: usize,
    pub clusters: usize,
    pub registers: usize,
    pub fields: usize,
}

impl TreeStats {
    /// Count the elements under `root`.
    pub fn collect(root: &Node) -> Self {
        let mut stats = Self::default();
        stats.visit(root);
        stats
    }

    fn visit(&mut self, node: &Node) {
        match node.tag() {
            Some("peripheral") => self.peripherals += 1,
            Some("interrupt") => self.interrupts += 1,
            Some("cluster") => self.clusters += 1,
            Some("register") => self.registers += 1,
            Some("field") => self.fields += 1,
            _ => {}
        }
        for child in node.children() {
            self.visit(child);
        }
    }
}

/// Output of a successful conversion.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The `<device>` root.
    pub root: Node,
    pub stats: TreeStats,
    /// Whether the tree went through structural validation.
    pub verified: bool,
}

/// Run the conversion: resolve modules -> build tree -> validate.
pub fn convert(
    top: &TopConfig,
    blocks: &BlockMap,
    config: &PipelineConfig,
) -> Result<PipelineOutput> {
    let start = Instant::now();

    let device = resolve_device(top, blocks, &config.version, &config.description)?;
    let root = build_device(&device)?;

    if config.verify {
        validate(&root)?;
    }

    let stats = TreeStats::collect(&root);
    info!(
        device = %top.name,
        peripherals = stats.peripherals,
        registers = stats.registers,
        clusters = stats.clusters,
        verified = config.verify,
        duration_ms = start.elapsed().as_millis() as u64,
        "conversion complete"
    );

    Ok(PipelineOutput {
        root,
        stats,
        verified: config.verify,
    })
}

/// Run the conversion and serialize the result.
pub fn render(top: &TopConfig, blocks: &BlockMap, config: &PipelineConfig) -> Result<String> {
    let output = convert(top, blocks, config)?;
    to_svd_string(&output.root)
}
