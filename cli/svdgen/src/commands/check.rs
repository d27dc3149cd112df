//! `svdgen check`: convert, validate and summarize without writing.

use anyhow::{bail, Context, Result};
use svdgen_core::{check, convert, TreeStats};

use crate::commands::{InputArgs, Project};

/// Run the conversion and report every structural violation found.
pub fn run(project: &Project, input: &InputArgs) -> Result<()> {
    let paths = project.input_paths(input)?;
    let (top, blocks) = paths.load()?;

    // Validation runs below and reports every violation.
    let config = project.pipeline_config(&top, None, None, true);
    let output = convert(&top, &blocks, &config)
        .with_context(|| format!("converting `{}`", top.name))?;

    let violations = check(&output.root);
    for violation in &violations {
        eprintln!("  {}: {}", violation.node, violation.reason);
    }
    if !violations.is_empty() {
        bail!("{} structural violation(s) in `{}`", violations.len(), top.name);
    }

    print!("{}", summary(&top.name, &output.stats));
    Ok(())
}

fn summary(device: &str, stats: &TreeStats) -> String {
    format!(
        "Device {device}: OK\n  \
         Peripherals: {}\n  \
         Interrupts:  {}\n  \
         Clusters:    {}\n  \
         Registers:   {}\n  \
         Fields:      {}\n",
        stats.peripherals, stats.interrupts, stats.clusters, stats.registers, stats.fields
    )
}
