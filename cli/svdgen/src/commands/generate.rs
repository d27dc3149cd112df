//! `svdgen generate`: write the SVD document for a register map.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use svdgen_core::{convert, to_svd_string};
use tracing::info;

use crate::commands::{InputArgs, Project};

/// Generate the document and write it to the output file, or stdout.
///
/// The document is rendered in full before anything is written, so a failed
/// conversion never leaves a partial file behind.
pub fn run(
    project: &Project,
    input: &InputArgs,
    version: Option<&str>,
    description: Option<&str>,
    output: Option<&Path>,
    no_verify: bool,
) -> Result<()> {
    let paths = project.input_paths(input)?;
    let (top, blocks) = paths.load()?;

    let config = project.pipeline_config(&top, version, description, no_verify);
    let result = convert(&top, &blocks, &config)
        .with_context(|| format!("generating SVD for `{}`", top.name))?;
    let text = to_svd_string(&result.root)?;

    match project.output_path(output) {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            fs::write(&path, &text).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), bytes = text.len(), "wrote SVD");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
